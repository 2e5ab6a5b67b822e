//! 构造描述符目录
//!
//! 即时绑定的数据来源：按类型登记的构造描述符。进程级的全局目录由
//! `#[derive(Injectable)]` 在程序启动时自动填充，也可以为注入器单独提供私有目录。

use crate::factory::{ConstructorDescriptor, Injectable};
use infrastructure_common::Key;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 全局构造描述符目录
static GLOBAL_CATALOG: Lazy<Arc<ConstructorCatalog>> =
    Lazy::new(|| Arc::new(ConstructorCatalog::new()));

/// 目录查找结果
#[derive(Debug, Clone)]
pub enum CatalogLookup {
    /// 没有登记描述符
    Missing,
    /// 唯一的描述符
    Unique(ConstructorDescriptor),
    /// 登记了多个描述符
    Ambiguous(usize),
}

/// 构造描述符目录
#[derive(Debug, Default)]
pub struct ConstructorCatalog {
    descriptors: RwLock<HashMap<TypeId, Vec<ConstructorDescriptor>>>,
}

impl ConstructorCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级全局目录
    pub fn global() -> Arc<Self> {
        GLOBAL_CATALOG.clone()
    }

    /// 登记描述符；同一类型登记多次会使其即时绑定变得不唯一
    pub fn register(&self, descriptor: ConstructorDescriptor) {
        debug!("登记构造描述符: {}", descriptor.key());
        self.descriptors
            .write()
            .entry(descriptor.key().type_id())
            .or_default()
            .push(descriptor);
    }

    /// 登记实现了 [`Injectable`] 的类型
    pub fn register_type<T: Injectable>(&self) {
        self.register(T::descriptor());
    }

    /// 按键查找描述符，只有无限定符的键才能匹配
    pub fn lookup(&self, key: &Key) -> CatalogLookup {
        if key.qualifier().is_some() {
            return CatalogLookup::Missing;
        }
        match self.descriptors.read().get(&key.type_id()).map(Vec::as_slice) {
            None | Some([]) => CatalogLookup::Missing,
            Some([descriptor]) => CatalogLookup::Unique(descriptor.clone()),
            Some(candidates) => CatalogLookup::Ambiguous(candidates.len()),
        }
    }

    /// 是否登记了该类型
    pub fn contains(&self, key: &Key) -> bool {
        self.descriptors.read().contains_key(&key.type_id())
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }
}
