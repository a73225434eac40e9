use ctn_storage::{Storage, StorageError};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Draft {
    identifier_type: String,
    value: String,
}

fn draft(value: &str) -> Draft {
    Draft { identifier_type: "KVK".into(), value: value.into() }
}

#[tokio::test]
async fn put_then_get_returns_latest_document() -> Result<(), StorageError> {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path()).connect().await?;

    assert_eq!(storage.get::<Draft>("session").await?, None);

    storage.put("session", &draft("1234")).await?;
    storage.put("session", &draft("12345678")).await?;

    assert_eq!(storage.get::<Draft>("session").await?, Some(draft("12345678")));
    Ok(())
}

#[tokio::test]
async fn namespaces_are_isolated() -> Result<(), StorageError> {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path()).connect().await?;

    let drafts = storage.namespace("drafts")?;
    let prefs = storage.namespace("prefs")?;

    drafts.put("identifier.LE-1", &draft("A")).await?;
    assert_eq!(prefs.get::<Draft>("identifier.LE-1").await?, None);
    assert_eq!(drafts.keys().await?, vec!["identifier.LE-1".to_owned()]);
    assert!(storage.keys().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn remove_and_clear_report_what_existed() -> Result<(), StorageError> {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path()).connect().await?;
    let prefs = storage.namespace("prefs")?;

    prefs.put("grid.members", &["legalName"]).await?;
    prefs.put("grid.audit", &["action"]).await?;

    assert!(prefs.remove("grid.members").await?);
    assert!(!prefs.remove("grid.members").await?);
    assert_eq!(prefs.clear().await?, 1);
    assert!(prefs.keys().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn traversal_keys_and_namespaces_are_rejected() -> Result<(), StorageError> {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path().join("root")).connect().await?;

    assert!(matches!(storage.put("../escape", &1).await, Err(StorageError::InvalidKey { .. })));
    assert!(matches!(storage.get::<u8>("a/b").await, Err(StorageError::InvalidKey { .. })));
    assert!(storage.namespace("..").is_err());
    assert!(!temp.path().join("escape.json").exists());
    Ok(())
}

#[tokio::test]
async fn corrupt_document_is_a_decode_error() -> Result<(), StorageError> {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path()).connect().await?;
    std::fs::write(storage.root().join("session.json"), b"{ not json").expect("write");

    let err = storage.get::<Draft>("session").await.expect_err("decode must fail");
    assert_eq!(err.kind(), "Json");
    Ok(())
}

#[tokio::test]
async fn missing_root_without_create_fails() {
    let temp = TempDir::new().expect("tempdir");
    let result = Storage::builder().root(temp.path().join("absent")).create(false).connect().await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_leave_a_whole_document() -> Result<(), StorageError> {
    let temp = TempDir::new().expect("tempdir");
    let storage = Storage::builder().root(temp.path()).connect().await?;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let storage = storage.clone();
        tasks.push(tokio::spawn(async move { storage.put("prefs", &draft(&i.to_string())).await }));
    }
    for task in tasks {
        task.await.expect("join")?;
    }

    let last: Draft = storage.get("prefs").await?.expect("document present");
    assert_eq!(last.identifier_type, "KVK");
    assert_eq!(storage.keys().await?, vec!["prefs".to_owned()]);
    Ok(())
}
