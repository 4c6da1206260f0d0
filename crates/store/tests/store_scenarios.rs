mod support;

use std::sync::Arc;

use configs::{BackendKind, StoreConfig};
use store::{JsonFileBackend, MemoryBackend, RawBackend, Scope, StoreError, TypedStore, TypedValue};

#[tokio::test]
async fn counter_lifecycle() -> Result<(), anyhow::Error> {
    let store = TypedStore::new(Arc::new(MemoryBackend::new()));
    let scope = Scope::from("req-42");

    assert_eq!(store.increment("x", 5, &scope).await?, 5);
    assert_eq!(store.get("x", &scope).await?, Some(TypedValue::Number(5.0)));
    assert_eq!(store.increment("x", 3, &scope).await?, 8);
    assert_eq!(store.increment("x", "2 apples", &scope).await?, 10);
    assert_eq!(store.increment("y", "abc", &scope).await?, 0);

    store.unset("x", &scope).await?;
    store.unset("x", &scope).await?;
    assert_eq!(store.get("x", &scope).await?, None);
    assert_eq!(store.increment("x", 1, &scope).await?, 1);
    Ok(())
}

#[tokio::test]
async fn foreign_raw_values_are_read_by_their_tag() -> Result<(), anyhow::Error> {
    let backend = MemoryBackend::new();
    let store = TypedStore::new(Arc::new(backend.clone()));
    let scope = Scope::from("global");

    // written by another client of the host store, bypassing the typed layer
    backend.raw_set("looks_numeric", "n:5".into(), &scope).await?;
    backend.raw_set("bad", "q:oops".into(), &scope).await?;

    assert_eq!(store.get("looks_numeric", &scope).await?, Some(TypedValue::Number(5.0)));
    assert!(matches!(store.get("bad", &scope).await, Err(StoreError::Decode { .. })));

    // strings written through the store keep their content even if it looks tagged
    store.set("text", Some("n:5".into()), &scope).await?;
    assert_eq!(store.get("text", &scope).await?, Some(TypedValue::String("n:5".into())));
    Ok(())
}

#[tokio::test]
async fn dump_needs_listing_support() -> Result<(), anyhow::Error> {
    let store = TypedStore::new(Arc::new(support::SlowBackend {
        inner: MemoryBackend::new(),
        delay: std::time::Duration::ZERO,
    }));
    let res = store.dump(&Scope::from("global"), "").await;
    assert!(matches!(res, Err(StoreError::Unsupported(_))));
    Ok(())
}

#[tokio::test]
async fn file_backed_store_from_config_survives_restart() -> Result<(), anyhow::Error> {
    let path = support::temp_file("typed_store_cfg");
    let cfg = StoreConfig {
        backend: BackendKind::File,
        file_path: path.to_string_lossy().into_owned(),
        lock_timeout_ms: 1000,
    };
    let scope = Scope::from("global");

    let store = TypedStore::from_config(&cfg).await?;
    assert_eq!(store.lock_timeout(), Some(std::time::Duration::from_millis(1000)));
    store.increment("hits", 2, &scope).await?;
    store.set("name", Some("edge-1".into()), &scope).await?;
    store.set("enabled", Some(true.into()), &scope).await?;

    let reopened = TypedStore::new(Arc::new(JsonFileBackend::open(&path).await?));
    assert_eq!(reopened.increment("hits", 1, &scope).await?, 3);
    assert_eq!(
        reopened.dump_json(&scope, "").await?,
        r#"{"enabled":true,"hits":3.0,"name":"edge-1"}"#
    );

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}

#[tokio::test]
async fn memory_store_from_default_config() -> Result<(), anyhow::Error> {
    let mut app = configs::from_toml_str("[logging]\nformat = \"json\"\n")?;
    app.normalize_and_validate()?;
    common::utils::logging::init_logging(&app.logging);

    let store = TypedStore::from_config(&app.store).await?;
    let scope = Scope::from("task");
    store.set_json("k", serde_json::json!("v"), &scope).await?;
    assert!(store.is_set("k", &scope).await?);
    assert!(store.backend().raw_get("k", &scope).await?.is_some());
    Ok(())
}
