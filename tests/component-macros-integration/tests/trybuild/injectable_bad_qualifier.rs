use component_macros::Injectable;
use std::sync::Arc;

#[derive(Injectable)]
pub struct Owner {
    #[inject(named = "two words")]
    car: Arc<u32>,
}

fn main() {}
