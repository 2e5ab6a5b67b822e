//! 注入器
//!
//! 冻结绑定表之上的解析器：按键查找绑定（必要时生成即时绑定），
//! 执行构造配方，并在单例作用域下缓存实例。

use crate::stack::{current_path, ResolutionGuard};
use crate::table::BindingTable;
use dashmap::DashMap;
use di_abstractions::{
    downcast, Binder, Binding, CatalogLookup, ConstructorCatalog, ContainerConfig, Dependencies,
    Dependency, FactoryFn, InjectorStats, Instance, Module, Provider, Recipe, Resolved, Resolver,
};
use infrastructure_common::{
    BoxError, ConfigurationError, ConfigurationResult, DependencyError, DependencyResult, Key,
    Qualifier, ResolutionPath,
};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// 即时绑定的来源名称
const JIT_SOURCE: &str = "<jit>";

/// 依赖注入器
///
/// 创建后绑定表不再变化；克隆得到的是同一个注入器的句柄。
///
/// # 并发与循环依赖
///
/// 循环依赖通过当前线程的解析栈检测。若多个单例构成环，且两个线程同时从环的
/// 不同位置开始解析，双方会互相等待对方的单例初始化而阻塞，
/// 不会报告 [`DependencyError::CircularDependency`]。
///
/// - [`ContainerConfig::validate_dependency_graph`] 在创建注入器时拒绝由直接依赖构成的环。
/// - 提供者依赖不计入环；在工厂内部调用 [`Provider::get`] 闭合的环需要启用
///   [`ContainerConfig::eager_singletons`]，单例在创建时于同一线程上构造，
///   环会以 [`ConfigurationError::EagerSingletonFailed`] 报告。
#[derive(Clone)]
pub struct Injector {
    inner: Arc<InjectorInner>,
}

struct InjectorInner {
    id: Uuid,
    config: ContainerConfig,
    table: BindingTable,
    catalog: Arc<ConstructorCatalog>,
    jit: DashMap<Key, Arc<Binding>>,
    singletons: DashMap<Key, Arc<OnceCell<Instance>>>,
    provisions: AtomicU64,
    this: Weak<InjectorInner>,
}

impl Injector {
    /// 以默认配置和全局构造描述符目录创建注入器
    pub fn create<I, M>(modules: I) -> ConfigurationResult<Self>
    where
        I: IntoIterator<Item = M>,
        M: Module + 'static,
    {
        modules
            .into_iter()
            .fold(Self::builder(), InjectorBuilder::module)
            .build()
    }

    /// 创建注入器构建器
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    /// 获取类型 `T` 的实例
    pub fn get_instance<T: ?Sized + Send + Sync + 'static>(&self) -> DependencyResult<Arc<T>> {
        self.get_instance_by_key(&Key::of::<T>())
    }

    /// 获取带限定符的实例
    pub fn get_named<T: ?Sized + Send + Sync + 'static>(
        &self,
        qualifier: impl Into<Qualifier>,
    ) -> DependencyResult<Arc<T>> {
        self.get_instance_by_key(&Key::named::<T>(qualifier))
    }

    /// 按键获取实例
    pub fn get_instance_by_key<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: &Key,
    ) -> DependencyResult<Arc<T>> {
        let instance = self.resolve(key)?;
        downcast::<T>(&instance).ok_or_else(|| DependencyError::TypeMismatch {
            key: key.clone(),
            expected: std::any::type_name::<Arc<T>>(),
            path: ResolutionPath::new().with(key.clone()),
        })
    }

    /// 按键解析类型擦除的实例
    pub fn resolve(&self, key: &Key) -> DependencyResult<Instance> {
        self.inner.resolve_key(key)
    }

    /// 获取类型 `T` 的延迟提供者，此时并不解析
    pub fn get_provider<T: ?Sized + Send + Sync + 'static>(&self) -> Provider<T> {
        self.get_provider_by_key(Key::of::<T>())
    }

    /// 按键获取延迟提供者
    pub fn get_provider_by_key<T: ?Sized + Send + Sync + 'static>(&self, key: Key) -> Provider<T> {
        Provider::new(key, self.inner.resolver())
    }

    /// 是否存在显式绑定或可生成的即时绑定
    pub fn has_binding(&self, key: &Key) -> bool {
        self.inner.can_resolve(key)
    }

    /// 所有显式绑定，按键的显示名称排序
    pub fn bindings(&self) -> Vec<Arc<Binding>> {
        self.inner.table.sorted()
    }

    /// 统计信息
    pub fn stats(&self) -> InjectorStats {
        InjectorStats {
            bindings: self.inner.table.len(),
            jit_bindings: self.inner.jit.len(),
            cached_singletons: self
                .inner
                .singletons
                .iter()
                .filter(|cell| cell.value().get().is_some())
                .count(),
            provisions: self.inner.provisions.load(Ordering::Relaxed),
        }
    }

    /// 注入器ID
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    fn build_eager_singletons(&self) -> ConfigurationResult<()> {
        for binding in self.inner.table.sorted() {
            if !binding.scope.is_singleton() {
                continue;
            }
            debug!("预先创建单例: {}", binding.key);
            self.resolve(&binding.key)
                .map_err(|source| ConfigurationError::EagerSingletonFailed {
                    key: binding.key.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("id", &self.inner.id)
            .field("bindings", &self.inner.table.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl InjectorInner {
    fn resolver(&self) -> Weak<dyn Resolver> {
        self.this.clone()
    }

    fn cached(&self, key: &Key) -> Option<Instance> {
        self.singletons
            .get(key)
            .and_then(|cell| cell.value().get().cloned())
    }

    fn resolve_key(&self, key: &Key) -> DependencyResult<Instance> {
        if let Some(instance) = self.cached(key) {
            trace!("单例缓存命中: {}", key);
            return Ok(instance);
        }

        let _guard = ResolutionGuard::enter(self.id, key, self.config.max_resolution_depth)?;
        let binding = self.binding_for(key)?;

        if !binding.scope.is_singleton() {
            return self.provision(&binding);
        }

        // 先克隆单元格再初始化，构造期间不持有分片锁
        let cell = self.singletons.entry(key.clone()).or_default().clone();
        cell.get_or_try_init(|| {
            debug!("创建单例: {}", key);
            self.provision(&binding)
        })
        .cloned()
    }

    fn binding_for(&self, key: &Key) -> DependencyResult<Arc<Binding>> {
        if let Some(binding) = self.table.get(key) {
            return Ok(binding.clone());
        }
        if let Some(binding) = self.jit.get(key) {
            return Ok(binding.value().clone());
        }
        self.synthesize(key)
    }

    /// 从构造描述符目录生成即时绑定，只适用于无限定符的键
    fn synthesize(&self, key: &Key) -> DependencyResult<Arc<Binding>> {
        let missing = || DependencyError::BindingMissing {
            key: key.clone(),
            path: current_path(self.id),
        };

        if !self.config.jit_bindings || key.qualifier().is_some() {
            return Err(missing());
        }

        match self.catalog.lookup(key) {
            CatalogLookup::Unique(descriptor) => {
                let scope = descriptor.scope();
                let binding = Arc::new(Binding::new(
                    key.clone(),
                    Recipe::Constructor(descriptor),
                    scope,
                    JIT_SOURCE,
                ));
                debug!("生成即时绑定: {} ({})", key, scope);
                Ok(self.jit.entry(key.clone()).or_insert(binding).value().clone())
            }
            CatalogLookup::Ambiguous(candidates) => {
                warn!("即时绑定不唯一: {} 有 {} 个构造描述符", key, candidates);
                Err(DependencyError::AmbiguousConstructor {
                    key: key.clone(),
                    candidates,
                    path: current_path(self.id),
                })
            }
            CatalogLookup::Missing => Err(missing()),
        }
    }

    fn provision(&self, binding: &Binding) -> DependencyResult<Instance> {
        self.provisions.fetch_add(1, Ordering::Relaxed);

        match &binding.recipe {
            Recipe::Linked { target, cast } => {
                let instance = self.resolve_key(target)?;
                cast(&instance).ok_or_else(|| DependencyError::TypeMismatch {
                    key: binding.key.clone(),
                    expected: binding.key.type_name(),
                    path: current_path(self.id),
                })
            }
            Recipe::Instance(instance) => Ok(instance.clone()),
            Recipe::Factory {
                factory,
                dependencies,
            } => self.invoke(binding, factory, dependencies),
            Recipe::Constructor(descriptor) => {
                self.invoke(binding, descriptor.constructor(), descriptor.dependencies())
            }
        }
    }

    /// 按声明顺序解析依赖后调用工厂
    fn invoke(
        &self,
        binding: &Binding,
        factory: &FactoryFn,
        dependencies: &[Dependency],
    ) -> DependencyResult<Instance> {
        let values = dependencies
            .iter()
            .map(|dependency| {
                if dependency.deferred {
                    Ok(Resolved::Deferred(dependency.key.clone()))
                } else {
                    self.resolve_key(&dependency.key)
                        .map(|instance| Resolved::Instance(dependency.key.clone(), instance))
                }
            })
            .collect::<DependencyResult<Vec<_>>>()?;

        let mut deps = Dependencies::new(binding.key.clone(), values, self.resolver());
        factory(&mut deps).map_err(|source| self.provision_error(&binding.key, source))
    }

    /// 工厂内部传出的解析错误保持原样，其余错误包装为 `Provision`
    fn provision_error(&self, key: &Key, source: BoxError) -> DependencyError {
        match source.downcast::<DependencyError>() {
            Ok(error) => *error,
            Err(source) => DependencyError::Provision {
                key: key.clone(),
                path: current_path(self.id),
                source,
            },
        }
    }
}

impl Resolver for InjectorInner {
    fn resolve(&self, key: &Key) -> DependencyResult<Instance> {
        self.resolve_key(key)
    }

    fn can_resolve(&self, key: &Key) -> bool {
        if self.table.contains(key) || self.jit.contains_key(key) {
            return true;
        }
        self.config.jit_bindings && matches!(self.catalog.lookup(key), CatalogLookup::Unique(_))
    }
}

/// 注入器构建器
pub struct InjectorBuilder {
    modules: Vec<Box<dyn Module>>,
    config: ContainerConfig,
    catalog: Option<Arc<ConstructorCatalog>>,
}

impl InjectorBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            config: ContainerConfig::default(),
            catalog: None,
        }
    }

    /// 添加模块
    pub fn module<M: Module + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// 设置容器配置
    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 使用私有的构造描述符目录代替全局目录
    pub fn catalog(mut self, catalog: Arc<ConstructorCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 构建注入器
    ///
    /// 所有配置错误都在执行任何构造配方之前返回，预先创建单例除外。
    pub fn build(self) -> ConfigurationResult<Injector> {
        let catalog = self.catalog.unwrap_or_else(ConstructorCatalog::global);
        let config = self.config;

        let mut binder = Binder::new();
        for module in &self.modules {
            binder.install(module.as_ref());
        }

        let table = BindingTable::build(binder.seal(&catalog)?)?;
        table.check_linked_cycles()?;
        if config.validate_dependency_graph {
            table.validate(&catalog, config.jit_bindings)?;
        }

        let id = Uuid::new_v4();
        let eager = config.eager_singletons;
        let inner = Arc::new_cyclic(|this| InjectorInner {
            id,
            config,
            table,
            catalog,
            jit: DashMap::new(),
            singletons: DashMap::new(),
            provisions: AtomicU64::new(0),
            this: this.clone(),
        });
        let injector = Injector { inner };

        info!(
            "创建注入器 {}: {} 个模块, {} 个绑定",
            id,
            self.modules.len(),
            injector.inner.table.len()
        );

        if eager {
            injector.build_eager_singletons()?;
        }
        Ok(injector)
    }
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InjectorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectorBuilder")
            .field("modules", &self.modules.len())
            .field("config", &self.config)
            .finish()
    }
}
