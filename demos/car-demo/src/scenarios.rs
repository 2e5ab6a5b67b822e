//! 各个示例的模块与运行逻辑

use crate::cars::{Benz, BenzOwner, Bmw, Car, CarBenz, CarBmw, Owner};
use clap::ValueEnum;
use di_abstractions::{Binder, ContainerConfig, Module};
use di_impl::Injector;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// 示例名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Example {
    /// 链接绑定 `dyn Car -> Bmw`
    Plain,
    /// 不使用容器，手动组装
    Manual,
    /// 单例作用域
    Singleton,
    /// 实例绑定
    Instance,
    /// 提供者方法
    Provider,
    /// 限定符区分两种汽车
    Qualifier,
    /// 依次运行所有示例
    All,
}

impl Example {
    /// 除 `All` 之外的所有示例
    pub const EACH: [Example; 6] = [
        Example::Manual,
        Example::Plain,
        Example::Singleton,
        Example::Instance,
        Example::Provider,
        Example::Qualifier,
    ];
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

struct PlainCarModule;

impl Module for PlainCarModule {
    fn configure(&self, binder: &mut Binder) {
        binder.bind::<dyn Car>().to::<Bmw>();
    }
}

struct SingletonCarModule;

impl Module for SingletonCarModule {
    fn configure(&self, binder: &mut Binder) {
        binder.bind::<dyn Car>().to::<Bmw>().as_singleton();
    }
}

struct InstanceCarModule;

impl Module for InstanceCarModule {
    fn configure(&self, binder: &mut Binder) {
        binder.bind::<dyn Car>().to_instance(Arc::new(Bmw::create()));
    }
}

fn provide_car() -> Arc<dyn Car> {
    Arc::new(Bmw::create())
}

struct ProviderCarModule;

impl Module for ProviderCarModule {
    fn configure(&self, binder: &mut Binder) {
        binder.provide(provide_car).as_singleton();
    }
}

fn provide_bmw() -> Arc<dyn Car> {
    Arc::new(Bmw::create())
}

fn provide_benz() -> Arc<dyn Car> {
    Arc::new(Benz::create())
}

struct QualifiedCarModule;

impl Module for QualifiedCarModule {
    fn configure(&self, binder: &mut Binder) {
        binder.provide(provide_bmw).qualified_with::<CarBmw>();
        binder.provide(provide_benz).qualified_with::<CarBenz>();
    }
}

fn injector<M: Module + 'static>(module: M, config: &ContainerConfig) -> anyhow::Result<Injector> {
    Ok(Injector::builder().config(config.clone()).module(module).build()?)
}

/// 运行单个示例，返回车主的汽车速度
pub fn run(example: Example, config: &ContainerConfig) -> anyhow::Result<u32> {
    let speed = match example {
        Example::Manual => Owner::new(Arc::new(Bmw::create())).car().drive(),
        Example::Plain => injector(PlainCarModule, config)?
            .get_instance::<Owner>()?
            .car()
            .drive(),
        Example::Singleton => {
            let injector = injector(SingletonCarModule, config)?;
            let first = injector.get_instance::<Owner>()?;
            let second = injector.get_instance::<Owner>()?;
            info!(
                "两位车主共用同一辆车: {}",
                Arc::ptr_eq(first.car(), second.car())
            );
            first.car().drive()
        }
        Example::Instance => injector(InstanceCarModule, config)?
            .get_instance::<Owner>()?
            .car()
            .drive(),
        Example::Provider => injector(ProviderCarModule, config)?
            .get_instance::<Owner>()?
            .car()
            .drive(),
        Example::Qualifier => injector(QualifiedCarModule, config)?
            .get_instance::<BenzOwner>()?
            .car()
            .drive(),
        Example::All => anyhow::bail!("`all` 需要逐个运行示例"),
    };
    Ok(speed)
}

/// 示例的输出行
pub fn describe(example: Example, speed: u32) -> String {
    let prefix = match example {
        Example::Manual => "Without container",
        _ => "With container",
    };
    format!("{prefix} car example ({example}): This car can drive at speed: {speed}")
}
