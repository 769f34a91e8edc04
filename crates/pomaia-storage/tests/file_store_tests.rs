use std::sync::Arc;

use pomaia_storage::{FileStore, KeyValueStore, MemoryStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = FileStore::new(temp_dir.path());
        store.set("@PoMAIA/source-text", "line one\nline two").await.unwrap();
    }

    let reopened = FileStore::new(temp_dir.path());
    assert_eq!(
        reopened.get("@PoMAIA/source-text").await.unwrap().as_deref(),
        Some("line one\nline two")
    );
}

#[tokio::test]
async fn test_file_store_remove() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());

    assert!(!store.remove("missing").await.unwrap());

    store.set("slot", "value").await.unwrap();
    assert!(store.remove("slot").await.unwrap());
    assert_eq!(store.get("slot").await.unwrap(), None);
}

#[tokio::test]
async fn test_lookalike_keys_get_separate_slots() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());

    store.set("@PoMAIA/results", "r").await.unwrap();
    store.set("@PoMAIA/source-text", "s").await.unwrap();
    store.set("a/b", "slash").await.unwrap();
    store.set("a_b", "underscore").await.unwrap();
    store.set("a%2Fb", "percent").await.unwrap();

    assert_eq!(store.get("@PoMAIA/results").await.unwrap().as_deref(), Some("r"));
    assert_eq!(store.get("@PoMAIA/source-text").await.unwrap().as_deref(), Some("s"));
    assert_eq!(store.get("a/b").await.unwrap().as_deref(), Some("slash"));
    assert_eq!(store.get("a_b").await.unwrap().as_deref(), Some("underscore"));
    assert_eq!(store.get("a%2Fb").await.unwrap().as_deref(), Some("percent"));

    // every slot stays directly under the base directory
    let mut entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 5);
    assert!(store.remove("a/b").await.unwrap());
    entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 4);
}

#[tokio::test]
async fn test_trait_objects_and_arc_forwarding() {
    let memory: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    memory.set("a", "1").await.unwrap();
    assert_eq!(memory.get("a").await.unwrap().as_deref(), Some("1"));

    let shared = Arc::new(MemoryStore::new());
    let handle = shared.clone();
    handle.set("b", "2").await.unwrap();
    assert_eq!(shared.get("b").await.unwrap().as_deref(), Some("2"));
}
