//! 构造配方与绑定
//!
//! 配方描述如何为一个键产生实例，绑定把键、配方与作用域组合成不可变记录。

use crate::factory::ConstructorDescriptor;
use crate::inject::Dependencies;
use infrastructure_common::{BoxError, Key, Scope};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的实例句柄
///
/// 对于类型为 `T` 的键，载荷总是 `Arc<T>`，因此 `dyn Trait` 也能被存放。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 把强类型实例擦除为 [`Instance`]
pub fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
    Arc::new(value)
}

/// 从 [`Instance`] 还原强类型实例
pub fn downcast<T: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Option<Arc<T>> {
    instance.downcast_ref::<Arc<T>>().cloned()
}

/// 工厂函数类型，按声明顺序消费已解析的依赖
pub type FactoryFn = Arc<dyn Fn(&mut Dependencies) -> Result<Instance, BoxError> + Send + Sync>;

/// 链接绑定的类型转换函数
pub type CastFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// 依赖声明
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// 依赖的键
    pub key: Key,
    /// 是否延迟解析（以 `Provider<T>` 注入）
    pub deferred: bool,
}

impl Dependency {
    /// 立即解析的依赖
    pub fn direct(key: Key) -> Self {
        Self {
            key,
            deferred: false,
        }
    }

    /// 延迟解析的依赖
    pub fn deferred(key: Key) -> Self {
        Self {
            key,
            deferred: true,
        }
    }
}

/// 构造配方
#[derive(Clone)]
pub enum Recipe {
    /// 解析另一个键并返回其实例
    Linked {
        /// 目标键
        target: Key,
        /// 把目标实例转换为当前键的类型
        cast: CastFn,
    },
    /// 总是返回预先构造好的实例
    Instance(Instance),
    /// 以解析好的依赖调用用户工厂
    Factory {
        /// 工厂函数
        factory: FactoryFn,
        /// 依赖列表（按参数顺序）
        dependencies: Vec<Dependency>,
    },
    /// 按构造描述符构造具体类型
    Constructor(ConstructorDescriptor),
}

impl Recipe {
    /// 配方种类名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linked { .. } => "linked",
            Self::Instance(_) => "instance",
            Self::Factory { .. } => "factory",
            Self::Constructor(_) => "constructor",
        }
    }

    /// 配方直接引用的依赖
    pub fn dependencies(&self) -> Vec<Dependency> {
        match self {
            Self::Linked { target, .. } => vec![Dependency::direct(target.clone())],
            Self::Instance(_) => Vec::new(),
            Self::Factory { dependencies, .. } => dependencies.clone(),
            Self::Constructor(descriptor) => descriptor.dependencies().to_vec(),
        }
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linked { target, .. } => f
                .debug_struct("Linked")
                .field("target", target)
                .field("cast", &"<function>")
                .finish(),
            Self::Instance(_) => f.debug_tuple("Instance").field(&"<instance>").finish(),
            Self::Factory { dependencies, .. } => f
                .debug_struct("Factory")
                .field("factory", &"<function>")
                .field("dependencies", dependencies)
                .finish(),
            Self::Constructor(descriptor) => f.debug_tuple("Constructor").field(descriptor).finish(),
        }
    }
}

/// 绑定
///
/// 键、配方与作用域的不可变组合，`source` 记录声明它的模块。
#[derive(Debug, Clone)]
pub struct Binding {
    /// 绑定键
    pub key: Key,
    /// 构造配方
    pub recipe: Recipe,
    /// 作用域
    pub scope: Scope,
    /// 声明来源（模块名称）
    pub source: String,
}

impl Binding {
    /// 创建新的绑定
    pub fn new(key: Key, recipe: Recipe, scope: Scope, source: impl Into<String>) -> Self {
        Self {
            key,
            recipe,
            scope,
            source: source.into(),
        }
    }
}
