//! 解析器抽象接口
//!
//! 注入器实现此 trait，[`Provider`] 与依赖游标通过它延迟回调注入器。

use crate::recipe::{downcast, Instance};
use infrastructure_common::{DependencyError, DependencyResult, Key, ResolutionPath};
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// 解析器 trait
///
/// 负责按键解析实例
pub trait Resolver: Send + Sync {
    /// 解析指定键的实例
    fn resolve(&self, key: &Key) -> DependencyResult<Instance>;

    /// 检查是否存在显式绑定或可用的即时绑定
    fn can_resolve(&self, key: &Key) -> bool;
}

/// 延迟提供者
///
/// 等价于一个调用 `get_instance(key)` 的闭包。只持有注入器的弱引用，
/// 因此被单例持有时不会让注入器无法释放。
pub struct Provider<T: ?Sized> {
    key: Key,
    resolver: Weak<dyn Resolver>,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> Provider<T> {
    /// 创建新的提供者
    pub fn new(key: Key, resolver: Weak<dyn Resolver>) -> Self {
        Self {
            key,
            resolver,
            _marker: PhantomData,
        }
    }

    /// 提供者对应的键
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// 解析实例；单例键仍然返回同一实例
    pub fn get(&self) -> DependencyResult<Arc<T>> {
        let resolver = self
            .resolver
            .upgrade()
            .ok_or_else(|| DependencyError::InjectorDropped {
                key: self.key.clone(),
            })?;
        let instance = resolver.resolve(&self.key)?;
        downcast::<T>(&instance).ok_or_else(|| DependencyError::TypeMismatch {
            key: self.key.clone(),
            expected: std::any::type_name::<Arc<T>>(),
            path: ResolutionPath::new().with(self.key.clone()),
        })
    }
}

impl<T: ?Sized> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            resolver: self.resolver.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("key", &self.key).finish()
    }
}
