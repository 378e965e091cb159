use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use recordlayer_core::{
    config::ConfigParams,
    engine::{LifecycleState, PersistenceEngine},
    entity::Entity,
    error::StoreError,
    page::PagingParams,
    query::ListQuery,
};
use recordlayer_memory::MemoryPersistence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Dummy {
    id: Option<String>,
    key: String,
    content: String,
}

impl Dummy {
    fn new(key: &str, content: &str) -> Self {
        Self {
            id: None,
            key: key.to_string(),
            content: content.to_string(),
        }
    }

    fn with_id(id: &str, key: &str, content: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::new(key, content)
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counter {
    id: Option<i64>,
    value: i64,
}

impl Entity for Counter {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn store_name() -> &'static str {
        "counters"
    }
}

#[tokio::test]
async fn crud_operations() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    let dummy1 = store
        .create(None, Dummy::new("Key 1", "Content 1"))
        .await
        .unwrap();
    assert!(dummy1.id.as_deref().is_some_and(|id| !id.is_empty()));
    assert_eq!(dummy1.key, "Key 1");
    assert_eq!(dummy1.content, "Content 1");

    let dummy2 = store
        .create(None, Dummy::new("Key 2", "Content 2"))
        .await
        .unwrap();
    assert!(dummy2.id.is_some());
    assert_ne!(dummy1.id, dummy2.id);

    let mut changed = dummy1.clone();
    changed.content = "Updated Content 1".to_string();
    let updated = store.update(None, changed).await.unwrap().unwrap();
    assert_eq!(updated.id, dummy1.id);
    assert_eq!(updated.key, "Key 1");
    assert_eq!(updated.content, "Updated Content 1");

    let id = dummy1.id.clone().unwrap();
    let deleted = store.delete_by_id(None, &id).await.unwrap().unwrap();
    assert_eq!(deleted.id, dummy1.id);

    assert!(store.get_one_by_id(None, &id).await.unwrap().is_none());

    store.close(None).await.unwrap();
}

#[tokio::test]
async fn lifecycle_is_linear() {
    let store = MemoryPersistence::<Dummy>::new();
    assert_eq!(store.state().await, LifecycleState::Unopened);

    store.open(None).await.unwrap();
    assert_eq!(store.state().await, LifecycleState::Open);

    store.close(None).await.unwrap();
    assert_eq!(store.state().await, LifecycleState::Closed);
}

#[tokio::test]
async fn update_on_absent_identity_adds_nothing() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    let result = store
        .update(None, Dummy::with_id("missing", "Key", "Content"))
        .await
        .unwrap();
    assert!(result.is_none());

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert!(all.is_empty());

    // An entity without any identity is also a tolerated miss.
    let result = store.update(None, Dummy::new("Key", "Content")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_on_absent_identity_is_idempotent() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    store
        .create(None, Dummy::with_id("1", "Key 1", "Content 1"))
        .await
        .unwrap();

    let id = "ghost".to_string();
    assert!(store.delete_by_id(None, &id).await.unwrap().is_none());
    assert!(store.delete_by_id(None, &id).await.unwrap().is_none());

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn set_matches_create_for_new_identity() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    let set = store.set(None, Dummy::new("Key 1", "Content 1")).await.unwrap();
    assert!(set.id.as_deref().is_some_and(|id| !id.is_empty()));
    assert_eq!(set.key, "Key 1");
    assert_eq!(set.content, "Content 1");

    let fetched = store
        .get_one_by_id(None, set.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, set);
}

#[tokio::test]
async fn set_replaces_in_place_preserving_order() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    for i in 1..=3 {
        store
            .create(
                None,
                Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Content {i}")),
            )
            .await
            .unwrap();
    }

    store
        .set(None, Dummy::with_id("2", "Key 2", "Replaced"))
        .await
        .unwrap();

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    let ids: Vec<&str> = all.iter().filter_map(|d| d.id.as_deref()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(all[1].content, "Replaced");
    assert_eq!(all[0].content, "Content 1");
    assert_eq!(all[2].content, "Content 3");

    store
        .set(None, Dummy::with_id("9", "Key 9", "Content 9"))
        .await
        .unwrap();

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.last().and_then(|d| d.id.as_deref()), Some("9"));
}

#[tokio::test]
async fn create_rejects_duplicate_identity() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    store
        .create(None, Dummy::with_id("1", "Key 1", "Content 1"))
        .await
        .unwrap();

    let err = store
        .create(None, Dummy::with_id("1", "Key 1", "Other"))
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), StoreError::AlreadyExists { .. }));

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "Content 1");
}

#[tokio::test]
async fn create_without_generatable_identity_is_rejected() {
    let store = MemoryPersistence::<Counter>::new();
    store.open(None).await.unwrap();

    let err = store
        .create(None, Counter { id: None, value: 1 })
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), StoreError::IdentityRequired { .. }));

    let created = store
        .create(None, Counter { id: Some(7), value: 1 })
        .await
        .unwrap();
    assert_eq!(created.id, Some(7));
}

#[tokio::test]
async fn generated_identities_are_pairwise_distinct() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    let mut ids = HashSet::new();
    for i in 0..50 {
        let created = store
            .create(None, Dummy::new(&format!("Key {i}"), &format!("Content {i}")))
            .await
            .unwrap();
        ids.insert(created.id.unwrap());
    }

    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn list_applies_filter_and_sort_hooks() {
    let store = MemoryPersistence::<Dummy>::new();
    store.open(None).await.unwrap();

    for i in 1..=6 {
        store
            .create(
                None,
                Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Content {i}")),
            )
            .await
            .unwrap();
    }

    let query = ListQuery::new()
        .with_query("reserved, not interpreted")
        .with_filter(|d: &Dummy| d.id.as_deref().is_some_and(|id| id.parse::<u32>().unwrap_or(0) % 2 == 0))
        .with_sort(|a: &Dummy, b: &Dummy| b.key.cmp(&a.key));

    let items = store.get_list(None, query).await.unwrap();
    let keys: Vec<&str> = items.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["Key 6", "Key 4", "Key 2"]);
}

#[tokio::test]
async fn page_size_is_capped_by_configuration() {
    let mut store = MemoryPersistence::<Dummy>::new();
    store
        .configure(&ConfigParams::from_tuples(&[("max_page_size", "3")]))
        .unwrap();
    store.open(None).await.unwrap();

    for i in 0..10 {
        store
            .create(
                None,
                Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Content {i}")),
            )
            .await
            .unwrap();
    }

    let page = store
        .get_page(None, ListQuery::new(), PagingParams::new(1, 100))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.count, 10);
    assert_eq!(page.next_page, Some(2));
    assert_eq!(page.previous_page, None);

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn clear_empties_the_store()  {
    let store = MemoryPersistence::<Dummy>::new();
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

    store.clear(None).await.unwrap();

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_mutations_are_not_lost() {
    const ITEMS: usize = 50;

    let store = Arc::new(MemoryPersistence::<Dummy>::new());
    store.open(None).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..ITEMS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(
                    None,
                    Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Content {i}")),
                )
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), ITEMS);

    let mut handles = Vec::new();
    for i in 0..ITEMS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let updated = store
                .update(
                    None,
                    Dummy::with_id(&i.to_string(), &format!("Key {i}"), &format!("Updated Content {i}")),
                )
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.content, format!("Updated Content {i}"));
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert_eq!(all.len(), ITEMS);
    for entity in &all {
        let id = entity.id.as_deref().unwrap();
        assert_eq!(entity.content, format!("Updated Content {id}"));
        assert_eq!(entity.key, format!("Key {id}"));
    }

    let mut handles = Vec::new();
    for i in 0..ITEMS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let id = i.to_string();
            assert!(store.delete_by_id(None, &id).await.unwrap().is_some());
            assert!(store.get_one_by_id(None, &id).await.unwrap().is_none());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let all = store.get_list(None, ListQuery::new()).await.unwrap();
    assert!(all.is_empty());
}
