//! 示例领域：汽车与车主

use component_macros::Injectable;
use di_abstractions::{implements, qualifier, Qualified};
use std::sync::Arc;

/// 汽车
pub trait Car: Send + Sync {
    /// 最高速度
    fn drive(&self) -> u32;
}

#[derive(Debug, Injectable)]
pub struct Bmw;

impl Bmw {
    /// 不经过容器手动创建，模拟第三方库提供的类型
    pub fn create() -> Self {
        Self
    }
}

impl Car for Bmw {
    fn drive(&self) -> u32 {
        60
    }
}

#[derive(Debug, Injectable)]
pub struct Benz;

impl Benz {
    pub fn create() -> Self {
        Self
    }
}

impl Car for Benz {
    fn drive(&self) -> u32 {
        80
    }
}

implements!(dyn Car => Bmw, Benz);

qualifier!(pub CarBmw = "bmw");
qualifier!(pub CarBenz = "benz");

/// 车主，依赖无限定符的汽车
#[derive(Injectable)]
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

/// 奔驰车主，依赖 `@benz` 限定的汽车
#[derive(Injectable)]
pub struct BenzOwner {
    car: Qualified<dyn Car, CarBenz>,
}

impl BenzOwner {
    pub fn car(&self) -> &dyn Car {
        &*self.car
    }
}
