use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use recordlayer_core::{
    config::ConfigParams,
    engine::PersistenceEngine,
    entity::Entity,
    error::StoreError,
    persister::{Loader, Saver},
    query::ListQuery,
};
use recordlayer_file::{FilePersistence, JsonFilePersister};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Dummy {
    id: Option<String>,
    key: String,
    content: String,
}

impl Dummy {
    fn with_id(id: &str, key: &str, content: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            key: key.to_string(),
            content: content.to_string(),
        }
    }
}

impl Entity for Dummy {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn store_name() -> &'static str {
        "dummies"
    }
}

fn data_path(dir: &TempDir) -> PathBuf {
    dir.path().join("dummies.json")
}

fn read_file(path: &PathBuf) -> Vec<Dummy> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let persister = JsonFilePersister::<Dummy>::with_path(data_path(&dir));

    for count in [0usize, 1, 5] {
        let entities: Vec<Dummy> = (0..count)
            .map(|i| Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Content {i}")))
            .collect();

        persister.save(None, &entities).await.unwrap();
        let loaded = persister.load(None).await.unwrap();

        assert_eq!(loaded, entities);
    }
}

#[tokio::test]
async fn absent_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let persister = JsonFilePersister::<Dummy>::with_path(data_path(&dir));

    assert!(persister.load(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let path = data_path(&dir);
    fs::write(&path, "  \n").unwrap();

    let persister = JsonFilePersister::<Dummy>::with_path(&path);

    assert!(persister.load(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_file_fails_open_with_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = data_path(&dir);
    fs::write(&path, "{ this is not an array").unwrap();

    let store = FilePersistence::<Dummy>::with_path(&path);
    let err = store.open(None).await.unwrap_err();

    match err.root_cause() {
        StoreError::FileParse { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_path_is_a_config_error() {
    let mut persister = JsonFilePersister::<Dummy>::new();
    let err = persister.configure(&ConfigParams::new()).unwrap_err();
    assert!(matches!(err, StoreError::Config { .. }));

    let err = persister.load(None).await.unwrap_err();
    assert!(matches!(err, StoreError::Config { .. }));

    let mut store = FilePersistence::<Dummy>::new();
    let err = store
        .configure(&ConfigParams::from_tuples(&[("max_page_size", "10")]))
        .unwrap_err();
    assert!(matches!(err, StoreError::Config { .. }));
}

#[tokio::test]
async fn every_mutation_flushes_to_the_file() {
    let dir = TempDir::new().unwrap();
    let path = data_path(&dir);

    let store = FilePersistence::<Dummy>::with_path(&path);
    store.open(None).await.unwrap();

    store
        .create(None, Dummy::with_id("1", "Key 1", "Content 1"))
        .await
        .unwrap();
    assert_eq!(read_file(&path).len(), 1);

    store
        .create(None, Dummy::with_id("2", "Key 2", "Content 2"))
        .await
        .unwrap();
    assert_eq!(read_file(&path).len(), 2);

    store
        .update(None, Dummy::with_id("1", "Key 1", "Updated Content 1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read_file(&path)[0].content, "Updated Content 1");

    store.delete_by_id(None, &"2".to_string()).await.unwrap();
    assert_eq!(read_file(&path).len(), 1);

    store.clear(None).await.unwrap();
    assert!(read_file(&path).is_empty());
}

#[tokio::test]
async fn close_then_reopen_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = data_path(&dir);

    let store = FilePersistence::<Dummy>::with_path(&path);
    store.open(None).await.unwrap();

    let dummy1 = store
        .create(None, Dummy::with_id("1", "Key 1", "Content 1"))
        .await
        .unwrap();
    let dummy2 = store
        .create(None, Dummy::with_id("2", "Key 2", "Content 2"))
        .await
        .unwrap();

    store.close(None).await.unwrap();

    let reopened = FilePersistence::<Dummy>::with_path(&path);
    reopened.open(None).await.unwrap();

    let all = reopened.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all, vec![dummy1, dummy2]);
}

#[tokio::test]
async fn configure_sets_path_and_page_cap() {
    let dir = TempDir::new().unwrap();
    let path = data_path(&dir);

    let mut store = FilePersistence::<Dummy>::new();
    store
        .configure(&ConfigParams::from_tuples(&[
            ("path", path.to_str().unwrap()),
            ("max_page_size", "2"),
        ]))
        .unwrap();
    store.open(None).await.unwrap();

    for i in 0..5 {
        store
            .create(
                None,
                Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Content {i}")),
            )
            .await
            .unwrap();
    }

    assert_eq!(read_file(&path).len(), 5);

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), 2);
}
