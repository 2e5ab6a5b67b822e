//! # 依赖注入具体实现
//!
//! 提供注入器：在创建时收集并校验模块声明的绑定，之后按键解析实例。
//!
//! ```
//! use di_abstractions::{implements, Binder};
//! use di_impl::Injector;
//! use std::sync::Arc;
//!
//! trait Car: Send + Sync {
//!     fn drive(&self) -> u32;
//! }
//!
//! struct Bmw;
//!
//! impl Car for Bmw {
//!     fn drive(&self) -> u32 {
//!         60
//!     }
//! }
//!
//! implements!(dyn Car => Bmw);
//!
//! let injector = Injector::create([|binder: &mut Binder| {
//!     binder.bind::<dyn Car>().to::<Bmw>();
//!     binder.bind::<Bmw>().to_instance(Arc::new(Bmw));
//! }])
//! .unwrap();
//!
//! assert_eq!(injector.get_instance::<dyn Car>().unwrap().drive(), 60);
//! ```

mod injector;
mod stack;
mod table;

pub use injector::{Injector, InjectorBuilder};
