//! 构造描述符与提供者函数
//!
//! Rust 没有运行时反射，具体类型的构造方式由 [`ConstructorDescriptor`] 显式描述：
//! 它按参数顺序列出依赖，并携带一个消费这些依赖的构造函数。
//! 描述符可以手写，也可以由 `#[derive(Injectable)]` 生成。

use crate::inject::{Dependencies, Inject};
use crate::recipe::{erase, Dependency, FactoryFn, Instance};
use infrastructure_common::{BoxError, Key, Scope};
use std::fmt;
use std::sync::Arc;

/// 构造描述符
#[derive(Clone)]
pub struct ConstructorDescriptor {
    key: Key,
    dependencies: Vec<Dependency>,
    constructor: FactoryFn,
    scope: Scope,
}

impl ConstructorDescriptor {
    /// 为具体类型 `T` 创建描述符
    pub fn new<T, F>(dependencies: Vec<Dependency>, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Dependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            key: Key::of::<T>(),
            dependencies,
            constructor: Arc::new(move |deps: &mut Dependencies| {
                constructor(deps).map(|value| erase(Arc::new(value)))
            }),
            scope: Scope::Unscoped,
        }
    }

    /// 设置默认作用域
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 被构造类型的键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 依赖列表（按参数顺序）
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// 构造函数
    pub fn constructor(&self) -> &FactoryFn {
        &self.constructor
    }

    /// 默认作用域
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("key", &self.key)
            .field("dependencies", &self.dependencies)
            .field("scope", &self.scope)
            .field("constructor", &"<function>")
            .finish()
    }
}

/// 可由容器构造的具体类型
///
/// 通常由 `#[derive(Injectable)]` 实现。
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 返回构造描述符
    fn descriptor() -> ConstructorDescriptor;
}

/// 提供者函数的返回值
///
/// 允许提供者直接返回 `Arc<T>`，或返回可能失败的 `Result<Arc<T>, E>`。
pub trait IntoProvided {
    /// 提供的类型
    type Target: ?Sized + Send + Sync + 'static;

    /// 转换为提供结果
    fn into_provided(self) -> Result<Arc<Self::Target>, BoxError>;
}

impl<T: ?Sized + Send + Sync + 'static> IntoProvided for Arc<T> {
    type Target = T;

    fn into_provided(self) -> Result<Arc<T>, BoxError> {
        Ok(self)
    }
}

impl<T, E> IntoProvided for Result<Arc<T>, E>
where
    T: ?Sized + Send + Sync + 'static,
    E: Into<BoxError>,
{
    type Target = T;

    fn into_provided(self) -> Result<Arc<T>, BoxError> {
        self.map_err(Into::into)
    }
}

/// 提供者函数 trait
///
/// 为参数均实现了 [`Inject`] 的普通函数与闭包实现，依赖键从参数类型推断，
/// 返回键从返回类型推断。
pub trait ProviderFn<Args>: Send + Sync + 'static {
    /// 提供的类型
    type Output: ?Sized + Send + Sync + 'static;

    /// 从参数类型推断出的依赖
    fn dependencies() -> Vec<Dependency>;

    /// 以依赖游标调用函数
    fn provide(&self, deps: &mut Dependencies) -> Result<Arc<Self::Output>, BoxError>;

    /// 转换为类型擦除的工厂函数
    fn into_factory(self) -> FactoryFn
    where
        Self: Sized,
    {
        Arc::new(move |deps: &mut Dependencies| {
            self.provide(deps).map(|value| -> Instance { erase(value) })
        })
    }
}

macro_rules! impl_provider_fn {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> ProviderFn<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: IntoProvided,
            $($arg: Inject,)*
        {
            type Output = R::Target;

            fn dependencies() -> Vec<Dependency> {
                vec![$(<$arg as Inject>::dependency(None)),*]
            }

            #[allow(unused_variables)]
            fn provide(&self, deps: &mut Dependencies) -> Result<Arc<Self::Output>, BoxError> {
                (self)($(deps.next::<$arg>()?),*).into_provided()
            }
        }
    };
}

impl_provider_fn!();
impl_provider_fn!(A1);
impl_provider_fn!(A1, A2);
impl_provider_fn!(A1, A2, A3);
impl_provider_fn!(A1, A2, A3, A4);
impl_provider_fn!(A1, A2, A3, A4, A5);
impl_provider_fn!(A1, A2, A3, A4, A5, A6);
impl_provider_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_provider_fn!(A1, A2, A3, A4, A5, A6, A7, A8);
