//! # Component Macros
//!
//! 这个 crate 提供了用于声明可注入类型的过程宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`] - 生成构造描述符并登记到全局目录
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! #[inject(singleton)]
//! pub struct Owner {
//!     #[inject(named = "benz")]
//!     car: Arc<dyn Car>,
//! }
//! ```
//!
//! 生成的代码引用 `::di_abstractions` 与 `::ctor`，使用方需要依赖这两个 crate。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 可注入类型派生宏
///
/// 为结构体实现 `di_abstractions::Injectable`：每个字段对应一个依赖，
/// 依赖键由字段类型推断（`Arc<T>`、`Provider<T>`、`Qualified<T, Q>`），
/// 顺序与字段声明顺序一致。非泛型结构体会在程序启动时登记到全局构造描述符目录，
/// 从而可以被即时绑定。
///
/// # 参数
///
/// 结构体上：
/// - `singleton` - 默认作用域为单例
///
/// 字段上：
/// - `named = "..."` - 注入点限定符
/// - `default` - 使用 `Default::default()`，不声明依赖
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Injectable)]
/// #[inject(singleton)]
/// pub struct Garage {
///     #[inject(named = "bmw")]
///     car: Arc<dyn Car>,
///     #[inject(default)]
///     visits: AtomicU32,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
