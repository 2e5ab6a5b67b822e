use component_macros::Injectable;
use di_abstractions::{Injectable as _, Provider};
use std::sync::Arc;

#[derive(Injectable)]
#[inject(singleton)]
struct Engine;

#[derive(Injectable)]
struct Wheels(#[inject(named = "front")] Arc<u32>, #[inject(default)] u8);

#[derive(Injectable)]
struct Car {
    engine: Arc<Engine>,
    #[inject(named = "spare")]
    spare: Provider<Wheels>,
    #[inject(default)]
    mileage: u64,
}

fn main() {
    assert_eq!(Engine::descriptor().dependencies().len(), 0);
    assert_eq!(Wheels::descriptor().dependencies().len(), 1);
    assert_eq!(Car::descriptor().dependencies().len(), 2);
}
