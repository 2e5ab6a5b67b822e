//! 依赖注入点
//!
//! [`Inject`] 描述一种可以被注入的参数或字段类型：它声明自己对应的依赖，
//! 并能从解析结果中还原自身。构造函数和工厂通过 [`Dependencies`] 游标
//! 按声明顺序取出依赖。

use crate::recipe::{downcast, Dependency, Instance};
use crate::resolver::{Provider, Resolver};
use infrastructure_common::{
    DependencyError, DependencyResult, Key, Qualifier, QualifierTag, ResolutionPath,
};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// 单个依赖的解析结果
pub enum Resolved {
    /// 已解析的实例及其键
    Instance(Key, Instance),
    /// 延迟依赖，只记录键
    Deferred(Key),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(key, _) => f
                .debug_tuple("Instance")
                .field(key)
                .field(&"<instance>")
                .finish(),
            Self::Deferred(key) => f.debug_tuple("Deferred").field(key).finish(),
        }
    }
}

/// 依赖游标
///
/// 按配方声明的顺序逐个交出已解析的依赖。
pub struct Dependencies {
    owner: Key,
    values: std::vec::IntoIter<Resolved>,
    resolver: Weak<dyn Resolver>,
}

impl Dependencies {
    /// 创建新的依赖游标
    pub fn new(owner: Key, values: Vec<Resolved>, resolver: Weak<dyn Resolver>) -> Self {
        Self {
            owner,
            values: values.into_iter(),
            resolver,
        }
    }

    /// 正在构造的键
    pub fn owner(&self) -> &Key {
        &self.owner
    }

    /// 尚未取出的依赖数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// 取出下一个依赖
    pub fn next<I: Inject>(&mut self) -> DependencyResult<I> {
        let resolved = self
            .values
            .next()
            .ok_or_else(|| DependencyError::DependenciesExhausted {
                key: self.owner.clone(),
                requested: std::any::type_name::<I>(),
            })?;
        I::inject(resolved, &self.resolver)
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("owner", &self.owner)
            .field("remaining", &self.values.len())
            .finish()
    }
}

/// 可注入类型 trait
pub trait Inject: Sized + Send + Sync + 'static {
    /// 声明对应的依赖；`qualifier` 来自注入点上的显式限定符
    fn dependency(qualifier: Option<Qualifier>) -> Dependency;

    /// 从解析结果还原
    fn inject(resolved: Resolved, resolver: &Weak<dyn Resolver>) -> DependencyResult<Self>;
}

fn mismatch<T: ?Sized + 'static>(key: Key) -> DependencyError {
    DependencyError::TypeMismatch {
        path: ResolutionPath::new().with(key.clone()),
        key,
        expected: std::any::type_name::<T>(),
    }
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Arc<T> {
    fn dependency(qualifier: Option<Qualifier>) -> Dependency {
        Dependency::direct(Key::of::<T>().with_optional_qualifier(qualifier))
    }

    fn inject(resolved: Resolved, _resolver: &Weak<dyn Resolver>) -> DependencyResult<Self> {
        match resolved {
            Resolved::Instance(key, instance) => {
                downcast::<T>(&instance).ok_or_else(|| mismatch::<Arc<T>>(key))
            }
            Resolved::Deferred(key) => Err(mismatch::<Arc<T>>(key)),
        }
    }
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Provider<T> {
    fn dependency(qualifier: Option<Qualifier>) -> Dependency {
        Dependency::deferred(Key::of::<T>().with_optional_qualifier(qualifier))
    }

    fn inject(resolved: Resolved, resolver: &Weak<dyn Resolver>) -> DependencyResult<Self> {
        match resolved {
            Resolved::Deferred(key) => Ok(Provider::new(key, resolver.clone())),
            Resolved::Instance(key, _) => Err(mismatch::<Self>(key)),
        }
    }
}

/// 带类型层面限定符的注入点
///
/// `Qualified<dyn Car, CarBenz>` 等价于以 `@benz` 限定的 `Arc<dyn Car>`。
pub struct Qualified<T: ?Sized, Q> {
    value: Arc<T>,
    _tag: PhantomData<fn() -> Q>,
}

impl<T: ?Sized, Q> Qualified<T, Q> {
    /// 包装实例
    pub fn new(value: Arc<T>) -> Self {
        Self {
            value,
            _tag: PhantomData,
        }
    }

    /// 取出内部实例
    pub fn into_inner(self) -> Arc<T> {
        self.value
    }
}

impl<T: ?Sized, Q> Deref for Qualified<T, Q> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: ?Sized, Q> Clone for Qualified<T, Q> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: ?Sized, Q: QualifierTag> fmt::Debug for Qualified<T, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qualified<{}@{}>", std::any::type_name::<T>(), Q::NAME)
    }
}

impl<T, Q> Inject for Qualified<T, Q>
where
    T: ?Sized + Send + Sync + 'static,
    Q: QualifierTag,
{
    fn dependency(qualifier: Option<Qualifier>) -> Dependency {
        Dependency::direct(Key::named::<T>(qualifier.unwrap_or_else(Q::qualifier)))
    }

    fn inject(resolved: Resolved, resolver: &Weak<dyn Resolver>) -> DependencyResult<Self> {
        <Arc<T> as Inject>::inject(resolved, resolver).map(Self::new)
    }
}

/// 实现关系 trait
///
/// `C: Implements<I>` 表示 `Arc<C>` 可以转换为 `Arc<I>`，链接绑定依赖它完成类型转换。
/// 每个类型都实现了自身；接口实现关系通过 [`implements!`](crate::implements) 声明。
pub trait Implements<I: ?Sized>: Send + Sync + 'static {
    /// 向上转换
    fn upcast(this: Arc<Self>) -> Arc<I>;
}

impl<T: ?Sized + Send + Sync + 'static> Implements<T> for T {
    fn upcast(this: Arc<Self>) -> Arc<T> {
        this
    }
}

/// 声明具体类型实现了某个 trait 对象
///
/// ```
/// use di_abstractions::{implements, Implements};
/// use std::sync::Arc;
///
/// trait Car: Send + Sync {
///     fn drive(&self) -> u32;
/// }
///
/// struct Bmw;
///
/// impl Car for Bmw {
///     fn drive(&self) -> u32 {
///         60
///     }
/// }
///
/// implements!(dyn Car => Bmw);
///
/// let car: Arc<dyn Car> = <Bmw as Implements<dyn Car>>::upcast(Arc::new(Bmw));
/// assert_eq!(car.drive(), 60);
/// ```
#[macro_export]
macro_rules! implements {
    ($iface:ty => $($concrete:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$iface> for $concrete {
                fn upcast(this: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$iface> {
                    this
                }
            }
        )+
    };
}
