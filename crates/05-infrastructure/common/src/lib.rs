//! # Infrastructure Common
//!
//! 依赖注入容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`Key`] - 由抽象类型与可选限定符组成的绑定键
//! - [`Qualifier`] / [`QualifierTag`] - 区分同一抽象的多个绑定
//! - [`Scope`] - 实例复用策略（无作用域 / 单例）
//! - [`ResolutionPath`] - 出错时正在构造的键链
//! - [`ConfigurationError`] / [`DependencyError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 键是不可变的值对象，可哈希、可比较
//! - 每个错误都携带解析路径，便于诊断

pub mod errors;
pub mod key;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use key::*;
pub use lifecycle::*;
pub use metadata::*;
