//! 实例作用域

use serde::{Deserialize, Serialize};
use std::fmt;

/// 实例作用域策略
///
/// 作用域是包裹在提供者最外层的策略，只作用于被请求的键本身，
/// 依赖的键各自携带自己的作用域。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// 无作用域 - 每次请求都重新执行构造配方
    #[default]
    Unscoped,
    /// 单例 - 首次请求时构造，之后在注入器生命周期内复用同一实例
    Singleton,
}

impl Scope {
    /// 是否为单例作用域
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unscoped => f.write_str("unscoped"),
            Self::Singleton => f.write_str("singleton"),
        }
    }
}
