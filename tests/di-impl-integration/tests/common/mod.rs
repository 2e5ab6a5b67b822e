//! 集成测试共用的领域类型

#![allow(dead_code)]

use di_abstractions::{
    implements, ConstructorCatalog, ConstructorDescriptor, Dependency, Inject, Injectable, Key,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub trait Car: Send + Sync {
    fn drive(&self) -> u32;
}

#[derive(Debug, Default)]
pub struct Bmw;

impl Car for Bmw {
    fn drive(&self) -> u32 {
        60
    }
}

#[derive(Debug, Default)]
pub struct Benz;

impl Car for Benz {
    fn drive(&self) -> u32 {
        80
    }
}

implements!(dyn Car => Bmw, Benz);

impl Injectable for Bmw {
    fn descriptor() -> ConstructorDescriptor {
        ConstructorDescriptor::new::<Self, _>(Vec::new(), |_| Ok(Bmw))
    }
}

impl Injectable for Benz {
    fn descriptor() -> ConstructorDescriptor {
        ConstructorDescriptor::new::<Self, _>(Vec::new(), |_| Ok(Benz))
    }
}

pub struct Owner {
    car: Arc<dyn Car>,
}

impl Owner {
    pub fn new(car: Arc<dyn Car>) -> Self {
        Self { car }
    }

    pub fn car(&self) -> &Arc<dyn Car> {
        &self.car
    }
}

impl Injectable for Owner {
    fn descriptor() -> ConstructorDescriptor {
        owner_with(None)
    }
}

/// 车主的构造描述符，依赖可以带限定符
pub fn owner_with(qualifier: Option<&str>) -> ConstructorDescriptor {
    ConstructorDescriptor::new::<Owner, _>(
        vec![<Arc<dyn Car> as Inject>::dependency(qualifier.map(Into::into))],
        |deps| Ok(Owner::new(deps.next()?)),
    )
}

/// 登记了 `Bmw`、`Benz` 与 `Owner` 的私有目录
pub fn car_catalog() -> Arc<ConstructorCatalog> {
    let catalog = ConstructorCatalog::new();
    catalog.register_type::<Bmw>();
    catalog.register_type::<Benz>();
    catalog.register_type::<Owner>();
    Arc::new(catalog)
}

pub fn car_key(qualifier: &str) -> Key {
    Key::named::<dyn Car>(qualifier)
}

pub fn direct<T: ?Sized + 'static>() -> Dependency {
    Dependency::direct(Key::of::<T>())
}
