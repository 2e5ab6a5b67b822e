//! 模块与绑定语句
//!
//! 模块通过 [`Binder`] 声明绑定语句。语句在创建注入器时被密封为 [`Binding`]：
//! 校验限定符、从构造描述符目录补全未指定目标的语句、确定作用域。
//!
//! ```
//! use di_abstractions::{implements, Binder, ConstructorCatalog, Scope};
//! use std::sync::Arc;
//!
//! trait Car: Send + Sync {}
//! struct Bmw;
//! impl Car for Bmw {}
//! implements!(dyn Car => Bmw);
//!
//! let mut binder = Binder::new();
//! binder.bind::<dyn Car>().to::<Bmw>();
//! binder.bind::<Bmw>().to_instance(Arc::new(Bmw));
//!
//! let bindings = binder.seal(&ConstructorCatalog::new()).unwrap();
//! assert_eq!(bindings.len(), 2);
//! assert_eq!(bindings[1].scope, Scope::Singleton);
//! ```

use crate::factory::{ConstructorDescriptor, ProviderFn};
use crate::inject::{Dependencies, Implements};
use crate::recipe::{downcast, erase, Binding, Dependency, Instance, Recipe};
use crate::registry::{CatalogLookup, ConstructorCatalog};
use infrastructure_common::{
    short_type_name, BoxError, ConfigurationError, ConfigurationResult, Key, Qualifier,
    QualifierTag, Scope,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 配置模块 trait
pub trait Module {
    /// 向绑定器声明绑定
    fn configure(&self, binder: &mut Binder);

    /// 模块名称，出现在重复绑定等诊断信息中
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

impl<F> Module for F
where
    F: Fn(&mut Binder),
{
    fn configure(&self, binder: &mut Binder) {
        self(binder)
    }
}

/// 装箱的模块，允许把不同类型的模块放进同一个集合
impl Module for Box<dyn Module> {
    fn configure(&self, binder: &mut Binder) {
        (**self).configure(binder)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl Module for &dyn Module {
    fn configure(&self, binder: &mut Binder) {
        (**self).configure(binder)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// 绑定语句
#[derive(Debug, Clone)]
pub struct BindingStatement {
    /// 绑定键
    pub key: Key,
    /// 目标配方；为空时由构造描述符目录补全
    pub recipe: Option<Recipe>,
    /// 显式作用域
    pub scope: Option<Scope>,
    /// 声明语句的模块
    pub source: String,
}

/// 绑定器
///
/// 收集模块声明的绑定语句，每次 `bind` 调用对应一条语句。
#[derive(Debug, Default)]
pub struct Binder {
    statements: Vec<BindingStatement>,
    modules: Vec<String>,
}

impl Binder {
    /// 创建空绑定器
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始绑定类型 `T`
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&mut self) -> BindingBuilder<'_, T, Annotatable> {
        self.push(Key::of::<T>(), None)
    }

    /// 以指定键开始绑定，键的类型部分以 `T` 为准
    pub fn bind_key<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        key: &Key,
    ) -> BindingBuilder<'_, T, Linkable> {
        let key = Key::of::<T>().with_optional_qualifier(key.qualifier().cloned());
        self.push(key, None)
    }

    /// 以提供者函数声明绑定
    ///
    /// 键由返回类型推断，依赖由参数类型推断。
    pub fn provide<Args, F>(&mut self, provider: F) -> BindingBuilder<'_, F::Output, Provided>
    where
        F: ProviderFn<Args>,
    {
        let recipe = Recipe::Factory {
            dependencies: F::dependencies(),
            factory: provider.into_factory(),
        };
        self.push(Key::of::<F::Output>(), Some(recipe))
    }

    /// 安装另一个模块
    pub fn install<M: Module + ?Sized>(&mut self, module: &M) {
        self.modules.push(module.name());
        module.configure(self);
        self.modules.pop();
    }

    /// 当前正在配置的模块名称
    pub fn current_module(&self) -> &str {
        self.modules.last().map(String::as_str).unwrap_or("<root>")
    }

    /// 已收集的语句
    pub fn statements(&self) -> &[BindingStatement] {
        &self.statements
    }

    /// 密封所有语句，生成不可变的绑定列表
    ///
    /// 语句顺序保持不变；重复键的检查由注入器完成。
    pub fn seal(self, catalog: &ConstructorCatalog) -> ConfigurationResult<Vec<Binding>> {
        let mut bindings = Vec::with_capacity(self.statements.len());

        for statement in self.statements {
            let BindingStatement {
                key,
                recipe,
                scope,
                source,
            } = statement;

            if let Some(qualifier) = key.qualifier() {
                qualifier.validate()?;
            }

            let recipe = match recipe {
                Some(recipe) => recipe,
                None => match catalog.lookup(&key) {
                    CatalogLookup::Unique(descriptor) => Recipe::Constructor(descriptor),
                    CatalogLookup::Missing => {
                        return Err(ConfigurationError::IncompleteBinding {
                            key,
                            module: source,
                        })
                    }
                    CatalogLookup::Ambiguous(candidates) => {
                        return Err(ConfigurationError::AmbiguousConstructor {
                            key,
                            candidates,
                            module: source,
                        })
                    }
                },
            };

            for dependency in recipe.dependencies() {
                if let Some(qualifier) = dependency.key.qualifier() {
                    qualifier.validate()?;
                }
            }

            let scope = scope.unwrap_or_else(|| default_scope(&recipe));
            debug!("密封绑定: {} -> {} ({}, 模块 {})", key, recipe.kind(), scope, source);
            bindings.push(Binding::new(key, recipe, scope, source));
        }

        Ok(bindings)
    }

    fn push<T: ?Sized, S>(&mut self, key: Key, recipe: Option<Recipe>) -> BindingBuilder<'_, T, S> {
        let source = self.current_module().to_string();
        self.statements.push(BindingStatement {
            key,
            recipe,
            scope: None,
            source,
        });
        BindingBuilder {
            index: self.statements.len() - 1,
            binder: self,
            _marker: PhantomData,
        }
    }
}

/// 未显式指定作用域时：实例绑定是单例，构造绑定沿用描述符的作用域
fn default_scope(recipe: &Recipe) -> Scope {
    match recipe {
        Recipe::Instance(_) => Scope::Singleton,
        Recipe::Constructor(descriptor) => descriptor.scope(),
        Recipe::Linked { .. } | Recipe::Factory { .. } => Scope::Unscoped,
    }
}

fn linked<T, C>(target: Key) -> Recipe
where
    T: ?Sized + Send + Sync + 'static,
    C: ?Sized + Implements<T>,
{
    Recipe::Linked {
        target,
        cast: Arc::new(|instance: &Instance| {
            downcast::<C>(instance).map(|concrete| erase::<T>(C::upcast(concrete)))
        }),
    }
}

/// 刚开始的语句，可以加限定符或指定目标
#[derive(Debug)]
pub struct Annotatable;

/// 已加限定符的语句，可以指定目标
#[derive(Debug)]
pub struct Linkable;

/// 已指定目标的语句，只能再指定作用域
#[derive(Debug)]
pub struct Scopable;

/// 由 [`Binder::provide`] 声明的语句，可以加限定符或指定作用域
#[derive(Debug)]
pub struct Provided;

/// 可以加限定符的状态
pub trait Annotate {
    /// 加限定符之后的状态
    type Next;
}

impl Annotate for Annotatable {
    type Next = Linkable;
}

impl Annotate for Provided {
    type Next = Scopable;
}

/// 可以指定目标的状态
pub trait Complete {}

impl Complete for Annotatable {}
impl Complete for Linkable {}

/// 绑定语句构建器
///
/// 类型状态保证一条语句至多一个限定符、至多一个目标。
pub struct BindingBuilder<'a, T: ?Sized, S> {
    binder: &'a mut Binder,
    index: usize,
    _marker: PhantomData<(fn() -> Arc<T>, S)>,
}

impl<'a, T: ?Sized, S> BindingBuilder<'a, T, S> {
    fn statement(&mut self) -> &mut BindingStatement {
        &mut self.binder.statements[self.index]
    }

    fn transition<N>(self) -> BindingBuilder<'a, T, N> {
        BindingBuilder {
            binder: self.binder,
            index: self.index,
            _marker: PhantomData,
        }
    }

    /// 语句当前的键
    pub fn key(&self) -> &Key {
        &self.binder.statements[self.index].key
    }

    /// 指定作用域
    pub fn in_scope(mut self, scope: Scope) {
        self.statement().scope = Some(scope);
    }

    /// 单例作用域
    pub fn as_singleton(self) {
        self.in_scope(Scope::Singleton)
    }
}

impl<'a, T: ?Sized + Send + Sync + 'static, S: Annotate> BindingBuilder<'a, T, S> {
    /// 加字符串限定符
    pub fn named(mut self, qualifier: impl Into<Qualifier>) -> BindingBuilder<'a, T, S::Next> {
        let statement = self.statement();
        statement.key = statement.key.clone().with_qualifier(qualifier);
        self.transition()
    }

    /// 加类型层面的限定符
    pub fn qualified_with<Q: QualifierTag>(self) -> BindingBuilder<'a, T, S::Next> {
        self.named(Q::qualifier())
    }
}

impl<'a, T: ?Sized + Send + Sync + 'static, S: Complete> BindingBuilder<'a, T, S> {
    fn complete(mut self, recipe: Recipe) -> BindingBuilder<'a, T, Scopable> {
        self.statement().recipe = Some(recipe);
        self.transition()
    }

    /// 链接到具体类型 `C`
    pub fn to<C>(self) -> BindingBuilder<'a, T, Scopable>
    where
        C: ?Sized + Implements<T>,
    {
        self.complete(linked::<T, C>(Key::of::<C>()))
    }

    /// 链接到带限定符的 `C`
    pub fn to_named<C>(self, qualifier: impl Into<Qualifier>) -> BindingBuilder<'a, T, Scopable>
    where
        C: ?Sized + Implements<T>,
    {
        self.complete(linked::<T, C>(Key::named::<C>(qualifier)))
    }

    /// 绑定到预先构造的实例，默认单例
    pub fn to_instance(self, instance: Arc<T>) -> BindingBuilder<'a, T, Scopable> {
        self.complete(Recipe::Instance(erase(instance)))
    }

    /// 绑定到工厂函数，依赖按 `dependencies` 的顺序从游标中取出
    pub fn to_provider<F>(
        self,
        dependencies: Vec<Dependency>,
        factory: F,
    ) -> BindingBuilder<'a, T, Scopable>
    where
        F: Fn(&mut Dependencies) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        self.complete(Recipe::Factory {
            factory: Arc::new(move |deps: &mut Dependencies| factory(deps).map(erase)),
            dependencies,
        })
    }

    /// 绑定到提供者函数，依赖由参数类型推断
    pub fn to_provider_fn<Args, F>(self, provider: F) -> BindingBuilder<'a, T, Scopable>
    where
        F: ProviderFn<Args, Output = T>,
    {
        self.complete(Recipe::Factory {
            dependencies: F::dependencies(),
            factory: provider.into_factory(),
        })
    }

    /// 绑定到构造描述符
    pub fn to_constructor(self, descriptor: ConstructorDescriptor) -> BindingBuilder<'a, T, Scopable> {
        self.complete(Recipe::Constructor(descriptor))
    }
}
