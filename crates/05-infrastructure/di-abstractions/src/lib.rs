//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定声明和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Module`] / [`Binder`] - 模块与绑定语句
//! - [`Recipe`] / [`Binding`] - 构造配方与不可变绑定
//! - [`ConstructorDescriptor`] / [`Injectable`] - 具体类型的构造描述
//! - [`ConstructorCatalog`] - 即时绑定使用的构造描述符目录
//! - [`Inject`] / [`ProviderFn`] - 注入点与提供者函数
//! - [`Resolver`] / [`Provider`] - 解析器与延迟提供者

pub mod container;
pub mod factory;
pub mod inject;
pub mod module;
pub mod recipe;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use inject::*;
pub use module::*;
pub use recipe::*;
pub use registry::*;
pub use resolver::*;

pub use infrastructure_common::{
    qualifier, BoxError, ConfigurationError, ConfigurationResult, DependencyError,
    DependencyResult, Key, Qualifier, QualifierTag, ResolutionPath, Scope,
};
