//! 错误类型定义

use crate::key::{Key, ResolutionPath};
use thiserror::Error;

/// 用户工厂或构造函数返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
///
/// 在创建注入器阶段报告，此时尚未执行任何构造配方。
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("重复绑定: {key} 已由模块 {first} 声明，模块 {second} 再次声明")]
    DuplicateBinding {
        key: Key,
        first: String,
        second: String,
    },

    #[error("绑定语句不完整: {key} (模块 {module}) 没有目标，也没有可用的构造描述符")]
    IncompleteBinding { key: Key, module: String },

    #[error("限定符格式无效: {qualifier:?}")]
    MalformedQualifier { qualifier: String },

    #[error("构造描述符不唯一: {key} 有 {candidates} 个候选 (模块 {module})")]
    AmbiguousConstructor {
        key: Key,
        candidates: usize,
        module: String,
    },

    #[error("链接绑定存在循环: {chain}")]
    CircularLink { chain: ResolutionPath },

    #[error("依赖无法满足: {key}, 路径: {path}")]
    UnresolvableDependency { key: Key, path: ResolutionPath },

    #[error("依赖图存在循环: {path}")]
    CircularDependency { path: ResolutionPath },

    #[error("预先创建单例失败: {key}, 原因: {source}")]
    EagerSingletonFailed {
        key: Key,
        #[source]
        source: DependencyError,
    },
}

/// 依赖解析错误类型
///
/// 解析过程中产生的变体都带有出错时的解析路径；
/// [`DependencyError::DependenciesExhausted`] 与 [`DependencyError::InjectorDropped`]
/// 发生在解析器之外，没有路径。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("缺少绑定: {key}, 路径: {path}")]
    BindingMissing { key: Key, path: ResolutionPath },

    #[error("检测到循环依赖: {key}, 路径: {path}")]
    CircularDependency { key: Key, path: ResolutionPath },

    #[error("实例创建失败: {key}, 路径: {path}, 原因: {source}")]
    Provision {
        key: Key,
        path: ResolutionPath,
        source: BoxError,
    },

    #[error("构造描述符不唯一: {key} 有 {candidates} 个候选, 路径: {path}")]
    AmbiguousConstructor {
        key: Key,
        candidates: usize,
        path: ResolutionPath,
    },

    #[error("类型转换失败: {key} 不是 {expected}, 路径: {path}")]
    TypeMismatch {
        key: Key,
        expected: &'static str,
        path: ResolutionPath,
    },

    #[error("解析深度超过上限 {max_depth}: {key}, 路径: {path}")]
    ResolutionTooDeep {
        key: Key,
        max_depth: usize,
        path: ResolutionPath,
    },

    #[error("依赖已耗尽: {key} 的构造函数请求了未声明的依赖 {requested}")]
    DependenciesExhausted { key: Key, requested: &'static str },

    #[error("注入器已销毁，无法提供: {key}")]
    InjectorDropped { key: Key },
}

impl DependencyError {
    /// 出错的键
    pub fn key(&self) -> &Key {
        match self {
            Self::BindingMissing { key, .. }
            | Self::CircularDependency { key, .. }
            | Self::Provision { key, .. }
            | Self::AmbiguousConstructor { key, .. }
            | Self::TypeMismatch { key, .. }
            | Self::ResolutionTooDeep { key, .. }
            | Self::DependenciesExhausted { key, .. }
            | Self::InjectorDropped { key } => key,
        }
    }

    /// 出错时的解析路径
    pub fn path(&self) -> Option<&ResolutionPath> {
        match self {
            Self::BindingMissing { path, .. }
            | Self::CircularDependency { path, .. }
            | Self::Provision { path, .. }
            | Self::AmbiguousConstructor { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::ResolutionTooDeep { path, .. } => Some(path),
            Self::DependenciesExhausted { .. } | Self::InjectorDropped { .. } => None,
        }
    }
}

/// 注入器错误类型
#[derive(Error, Debug)]
pub enum InjectorError {
    #[error("配置错误: {source}")]
    Configuration {
        #[from]
        source: ConfigurationError,
    },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },
}

/// 结果类型别名
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InjectorResult<T> = Result<T, InjectorError>;
