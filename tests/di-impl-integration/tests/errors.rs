//! 配置错误与解析错误

mod common;

use common::*;
use di_abstractions::{
    Binder, ConfigurationError, ConstructorCatalog, ContainerConfig, DependencyError, Key, Scope,
};
use di_impl::Injector;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Garage;

fn config(update: impl FnOnce(&mut ContainerConfig)) -> ContainerConfig {
    let mut config = ContainerConfig::default();
    update(&mut config);
    config
}

#[test]
fn test_incomplete_statement() {
    let result = Injector::builder()
        .catalog(Arc::new(ConstructorCatalog::new()))
        .module(|binder: &mut Binder| {
            binder.bind::<Owner>();
        })
        .build();
    assert!(matches!(
        result,
        Err(ConfigurationError::IncompleteBinding { ref key, .. }) if key.is::<Owner>()
    ));
}

#[test]
fn test_untargeted_statement_uses_catalog() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<Bmw>().as_singleton();
        })
        .build()?;

    let first = injector.get_instance::<Bmw>()?;
    assert!(Arc::ptr_eq(&first, &injector.get_instance::<Bmw>()?));
    assert_eq!(injector.stats().jit_bindings, 0);
    Ok(())
}

#[test]
fn test_malformed_qualifier() {
    let result = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().named("car benz").to::<Benz>();
        })
        .build();
    assert!(matches!(
        result,
        Err(ConfigurationError::MalformedQualifier { ref qualifier }) if qualifier == "car benz"
    ));
}

#[test]
fn test_circular_link() {
    let result = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().to_named::<dyn Car>("loop");
            binder.bind::<dyn Car>().named("loop").to::<dyn Car>();
        })
        .build();
    match result {
        Err(ConfigurationError::CircularLink { chain }) => {
            assert_eq!(chain.len(), 3);
            assert_eq!(chain.keys().first(), chain.last());
        }
        Err(other) => panic!("意外的错误: {other}"),
        Ok(_) => panic!("链接循环应当失败"),
    }
}

#[test]
fn test_graph_validation_reports_missing_dependency() {
    let result = Injector::builder()
        .catalog(car_catalog())
        .config(config(|c| c.validate_dependency_graph = true))
        .module(|binder: &mut Binder| {
            binder.bind::<Owner>().to_constructor(owner_with(Some("tesla")));
        })
        .build();

    match result {
        Err(ConfigurationError::UnresolvableDependency { key, path }) => {
            assert_eq!(key, car_key("tesla"));
            assert_eq!(path.to_string(), "Owner -> dyn Car@tesla");
        }
        Err(other) => panic!("意外的错误: {other}"),
        Ok(_) => panic!("依赖图校验应当失败"),
    }
}

#[test]
fn test_graph_validation_accepts_complete_graph() {
    let result = Injector::builder()
        .catalog(car_catalog())
        .config(config(|c| c.validate_dependency_graph = true))
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().to::<Bmw>();
            binder.bind::<Owner>();
        })
        .build();
    assert!(result.is_ok());
}

#[test]
fn test_eager_singletons_built_at_create() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let injector = Injector::builder()
        .catalog(car_catalog())
        .config(config(|c| c.eager_singletons = true))
        .module(move |binder: &mut Binder| {
            let counter = counter.clone();
            binder
                .bind::<dyn Car>()
                .to_provider_fn(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Arc::new(Benz) as Arc<dyn Car>
                })
                .as_singleton();
        })
        .build()?;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    injector.get_instance::<dyn Car>()?;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_eager_singleton_failure() {
    let result = Injector::builder()
        .catalog(car_catalog())
        .config(config(|c| c.eager_singletons = true))
        .module(|binder: &mut Binder| {
            binder.bind::<Owner>().in_scope(Scope::Singleton);
        })
        .build();
    match result {
        Err(ConfigurationError::EagerSingletonFailed { key, source }) => {
            assert!(key.is::<Owner>());
            assert!(matches!(source, DependencyError::BindingMissing { .. }));
        }
        Err(other) => panic!("意外的错误: {other}"),
        Ok(_) => panic!("预先创建单例应当失败"),
    }
}

#[test]
fn test_provision_error_wraps_user_failure() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .catalog(car_catalog())
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().to_provider_fn(|| {
                Err::<Arc<dyn Car>, _>(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "engine stalled",
                ))
            });
        })
        .build()?;

    match injector.get_instance::<Owner>() {
        Err(DependencyError::Provision { key, path, source }) => {
            assert_eq!(key, Key::of::<dyn Car>());
            assert_eq!(path.to_string(), "Owner -> dyn Car");
            assert_eq!(source.to_string(), "engine stalled");
        }
        Err(other) => panic!("意外的错误: {other}"),
        Ok(_) => panic!("工厂失败应当传出"),
    }
    Ok(())
}

#[test]
fn test_jit_disabled() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .catalog(car_catalog())
        .config(config(|c| c.jit_bindings = false))
        .build()?;

    assert!(!injector.has_binding(&Key::of::<Bmw>()));
    assert!(matches!(
        injector.get_instance::<Bmw>(),
        Err(DependencyError::BindingMissing { .. })
    ));
    Ok(())
}

#[test]
fn test_qualified_keys_are_never_synthesized() -> anyhow::Result<()> {
    let injector = Injector::builder().catalog(car_catalog()).build()?;
    assert!(injector.has_binding(&Key::of::<Bmw>()));
    assert!(!injector.has_binding(&Key::named::<Bmw>("fast")));
    assert!(matches!(
        injector.get_named::<Bmw>("fast"),
        Err(DependencyError::BindingMissing { .. })
    ));
    Ok(())
}

#[test]
fn test_ambiguous_jit_constructor() -> anyhow::Result<()> {
    let catalog = car_catalog();
    catalog.register_type::<Bmw>();
    let injector = Injector::builder().catalog(catalog).build()?;

    assert!(matches!(
        injector.get_instance::<Bmw>(),
        Err(DependencyError::AmbiguousConstructor { candidates: 2, .. })
    ));
    Ok(())
}

#[test]
fn test_type_mismatch_at_typed_boundary() -> anyhow::Result<()> {
    let injector = Injector::builder().catalog(car_catalog()).build()?;
    assert!(matches!(
        injector.get_instance_by_key::<Benz>(&Key::of::<Bmw>()),
        Err(DependencyError::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_resolution_depth_limit() -> anyhow::Result<()> {
    let injector = Injector::builder()
        .catalog(car_catalog())
        .config(config(|c| c.max_resolution_depth = 2))
        .module(|binder: &mut Binder| {
            binder.bind::<dyn Car>().named("a").to_named::<dyn Car>("b");
            binder.bind::<dyn Car>().named("b").to::<Bmw>();
        })
        .build()?;

    assert!(injector.get_named::<dyn Car>("b").is_ok());
    assert!(matches!(
        injector.get_named::<dyn Car>("a"),
        Err(DependencyError::ResolutionTooDeep { max_depth: 2, .. })
    ));
    Ok(())
}

#[test]
fn test_provider_outlives_injector() -> anyhow::Result<()> {
    let injector = Injector::builder().catalog(car_catalog()).build()?;
    let provider = injector.get_provider::<Bmw>();
    assert!(provider.get().is_ok());

    drop(injector);
    assert!(matches!(
        provider.get(),
        Err(DependencyError::InjectorDropped { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_binding_surfaces_on_provider_get() -> anyhow::Result<()> {
    let injector = Injector::builder().catalog(car_catalog()).build()?;
    let provider = injector.get_provider::<Garage>();
    assert!(matches!(
        provider.get(),
        Err(DependencyError::BindingMissing { .. })
    ));
    Ok(())
}

#[test]
fn test_bindings_listed_in_key_order() -> anyhow::Result<()> {
    let injector = Injector::create([|binder: &mut Binder| {
        binder.bind::<dyn Car>().named("bmw").to::<Bmw>();
        binder.bind::<Bmw>().to_instance(Arc::new(Bmw));
        binder.bind::<dyn Car>().named("benz").to::<Benz>();
        binder.bind::<Benz>().to_instance(Arc::new(Benz));
    }])?;

    let keys: Vec<String> = injector
        .bindings()
        .iter()
        .map(|binding| binding.key.to_string())
        .collect();
    assert_eq!(keys, vec!["Benz", "Bmw", "dyn Car@benz", "dyn Car@bmw"]);
    assert_eq!(injector.stats().bindings, 4);
    Ok(())
}

#[test]
fn test_config_from_json_and_env() -> anyhow::Result<()> {
    let config = ContainerConfig::from_json_str(r#"{ "jit_bindings": false }"#)?
        .with_env_overrides("CAR_DEMO_TEST_UNSET");
    let injector = Injector::builder().catalog(car_catalog()).config(config).build()?;
    assert!(!injector.config().jit_bindings);
    assert_eq!(injector.config().max_resolution_depth, 100);
    Ok(())
}
