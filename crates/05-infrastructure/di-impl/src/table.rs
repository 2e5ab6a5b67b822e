//! 绑定表
//!
//! 注入器创建时冻结的显式绑定集合，负责重复键、链接循环和依赖图的检查。

use di_abstractions::{Binding, CatalogLookup, ConstructorCatalog, Dependency, Recipe};
use infrastructure_common::{ConfigurationError, ConfigurationResult, Key, ResolutionPath};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// 冻结的绑定表
#[derive(Debug, Default)]
pub(crate) struct BindingTable {
    bindings: HashMap<Key, Arc<Binding>>,
}

impl BindingTable {
    /// 由密封后的绑定构建，同一个键出现两次即报错
    pub(crate) fn build(bindings: Vec<Binding>) -> ConfigurationResult<Self> {
        let mut table = HashMap::with_capacity(bindings.len());

        for binding in bindings {
            match table.entry(binding.key.clone()) {
                Entry::Occupied(existing) => {
                    let existing: &Arc<Binding> = existing.get();
                    return Err(ConfigurationError::DuplicateBinding {
                        key: binding.key,
                        first: existing.source.clone(),
                        second: binding.source,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(binding));
                }
            }
        }

        Ok(Self { bindings: table })
    }

    pub(crate) fn get(&self, key: &Key) -> Option<&Arc<Binding>> {
        self.bindings.get(key)
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.bindings.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 按键的显示名称排序的绑定
    pub(crate) fn sorted(&self) -> Vec<Arc<Binding>> {
        let mut bindings: Vec<Arc<Binding>> = self.bindings.values().cloned().collect();
        bindings.sort_by_cached_key(|binding| binding.key.to_string());
        bindings
    }

    /// 检查链接绑定构成的子图中是否存在环，自链接也算环
    pub(crate) fn check_linked_cycles(&self) -> ConfigurationResult<()> {
        for start in self.bindings.values() {
            let mut chain = vec![start.key.clone()];
            let mut current = start;

            while let Recipe::Linked { target, .. } = &current.recipe {
                if chain.contains(target) {
                    chain.push(target.clone());
                    return Err(ConfigurationError::CircularLink {
                        chain: chain.into(),
                    });
                }
                chain.push(target.clone());
                match self.bindings.get(target) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// 遍历所有显式绑定的依赖，报告无法满足的依赖和循环
    ///
    /// 延迟依赖只检查是否可解析，不参与循环检测。
    pub(crate) fn validate(
        &self,
        catalog: &ConstructorCatalog,
        jit_bindings: bool,
    ) -> ConfigurationResult<()> {
        let graph = GraphWalk {
            table: self,
            catalog,
            jit_bindings,
        };
        let mut visited = HashSet::new();
        let mut visiting = Vec::new();

        for binding in self.sorted() {
            graph.dfs_check(&binding.key, &mut visited, &mut visiting)?;
        }
        Ok(())
    }
}

struct GraphWalk<'a> {
    table: &'a BindingTable,
    catalog: &'a ConstructorCatalog,
    jit_bindings: bool,
}

impl GraphWalk<'_> {
    /// 节点的依赖；无法解析时返回 `None`
    fn dependencies_of(&self, key: &Key) -> Option<Vec<Dependency>> {
        if let Some(binding) = self.table.get(key) {
            return Some(binding.recipe.dependencies());
        }
        if !self.jit_bindings {
            return None;
        }
        match self.catalog.lookup(key) {
            CatalogLookup::Unique(descriptor) => Some(descriptor.dependencies().to_vec()),
            CatalogLookup::Missing | CatalogLookup::Ambiguous(_) => None,
        }
    }

    fn dfs_check(
        &self,
        current: &Key,
        visited: &mut HashSet<Key>,
        visiting: &mut Vec<Key>,
    ) -> ConfigurationResult<()> {
        if visiting.contains(current) {
            let mut path = ResolutionPath::from(visiting.clone());
            path.push(current.clone());
            return Err(ConfigurationError::CircularDependency { path });
        }

        if visited.contains(current) {
            return Ok(());
        }

        let Some(dependencies) = self.dependencies_of(current) else {
            let mut path = ResolutionPath::from(visiting.clone());
            path.push(current.clone());
            return Err(ConfigurationError::UnresolvableDependency {
                key: current.clone(),
                path,
            });
        };

        visiting.push(current.clone());

        for dependency in &dependencies {
            if dependency.deferred {
                if self.dependencies_of(&dependency.key).is_none() {
                    let mut path = ResolutionPath::from(visiting.clone());
                    path.push(dependency.key.clone());
                    return Err(ConfigurationError::UnresolvableDependency {
                        key: dependency.key.clone(),
                        path,
                    });
                }
                continue;
            }
            self.dfs_check(&dependency.key, visited, visiting)?;
        }

        visiting.pop();
        visited.insert(current.clone());

        Ok(())
    }
}
