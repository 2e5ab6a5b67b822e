//! 端到端场景：普通构造、单例、实例绑定、限定符、缺失绑定与提供者方法

mod common;

use common::*;
use di_abstractions::{Binder, DependencyError, Key};
use di_impl::Injector;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_plain_construction() -> anyhow::Result<()> {
    init_test_logger();
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().to::<Bmw>();
        })
        .build()?;

    let owner = injector.get_instance::<Owner>()?;
    assert_eq!(owner.car().drive(), 60);
    Ok(())
}

#[test]
fn test_singleton_car_shared_between_owners() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().to::<Bmw>().as_singleton();
        })
        .build()?;

    let first = injector.get_instance::<dyn Car>()?;
    let second = injector.get_instance::<dyn Car>()?;
    assert!(Arc::ptr_eq(&first, &second));

    let owner_a = injector.get_instance::<Owner>()?;
    let owner_b = injector.get_instance::<Owner>()?;
    assert!(!Arc::ptr_eq(&owner_a, &owner_b));
    assert!(Arc::ptr_eq(owner_a.car(), owner_b.car()));
    assert!(Arc::ptr_eq(owner_a.car(), &first));
    Ok(())
}

#[test]
fn test_instance_binding_returns_fixed_instance() -> anyhow::Result<()> {
    let fixed: Arc<dyn Car> = Arc::new(Bmw);
    let bound = fixed.clone();
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(move |binder: &mut Binder| {
            binder.bind::<dyn Car>().to_instance(bound.clone());
        })
        .build()?;

    for _ in 0..3 {
        assert!(Arc::ptr_eq(&injector.get_instance::<dyn Car>()?, &fixed));
    }
    assert!(Arc::ptr_eq(injector.get_instance::<Owner>()?.car(), &fixed));
    Ok(())
}

#[test]
fn test_qualifier_disambiguation() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().named("bmw").to::<Bmw>();
            binder.bind::<dyn Car>().named("benz").to::<Benz>();
            binder.bind::<Owner>().to_constructor(owner_with(Some("benz")));
        })
        .build()?;

    assert_eq!(injector.get_instance::<Owner>()?.car().drive(), 80);
    assert_eq!(injector.get_named::<dyn Car>("bmw")?.drive(), 60);
    assert_eq!(injector.get_instance_by_key::<dyn Car>(&car_key("benz"))?.drive(), 80);
    Ok(())
}

#[test]
fn test_missing_binding_names_key_and_path() -> anyhow::Result<()> {
    let injector = Injector::builder().catalog(car_catalog()).build()?;

    let error = match injector.get_instance::<Owner>() {
        Ok(_) => panic!("dyn Car 没有绑定，解析应当失败"),
        Err(error) => error,
    };
    match error {
        DependencyError::BindingMissing { key, path } => {
            assert_eq!(key, Key::of::<dyn Car>());
            assert_eq!(path.to_string(), "Owner -> dyn Car");
        }
        other => panic!("意外的错误: {other}"),
    }
    Ok(())
}

#[test]
fn test_provider_method_runs_on_demand() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(move |binder: &mut Binder| {
            let counter = counter.clone();
            binder
                .provide(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Arc::new(Benz) as Arc<dyn Car>
                })
                .named("benz");
            binder.bind::<Owner>().to_constructor(owner_with(Some("benz")));
        })
        .build()?;

    assert_eq!(calls.load(Ordering::SeqCst), 0);

    for expected in 1..=3 {
        assert_eq!(injector.get_named::<dyn Car>("benz")?.drive(), 80);
        assert_eq!(calls.load(Ordering::SeqCst), expected);
    }

    injector.get_instance::<Owner>()?;
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    Ok(())
}
