//! Movies Handler Property Tests
//!
//! End-to-end behaviour of the dispatcher over the in-memory store:
//! - Create/read fidelity and fresh identifiers
//! - Validation failures never touch the store
//! - Conditional update and delete on missing records
//! - List reflects creates and deletes

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use movies_api::codec::{Attribute, Item};
use movies_api::movies::{Dispatcher, InboundEvent, ResponseEnvelope};
use movies_api::store::{InMemoryStore, RecordStore, StoreResult, UpdateExpression};
use rust_decimal::Decimal;
use serde_json::{json, Value};

// =============================================================================
// Counting Store
// =============================================================================

/// In-memory store that counts every call
#[derive(Default)]
struct CountingStore {
    inner: InMemoryStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingStore {
    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn calls(&self) -> usize {
        self.reads() + self.writes()
    }
}

impl RecordStore for CountingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Item>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.scan().await
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put(item).await
    }

    async fn update(&self, key: &str, update: &UpdateExpression) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(key, update).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }
}

type TestDispatcher = Dispatcher<Arc<CountingStore>>;

fn setup() -> (TestDispatcher, Arc<CountingStore>) {
    let store = Arc::new(CountingStore::default());
    (Dispatcher::new(Arc::clone(&store)), store)
}

async fn send(dispatcher: &TestDispatcher, event: InboundEvent) -> (u16, Value) {
    let envelope: ResponseEnvelope = dispatcher.handle(event).await;
    let body = envelope.body_json().unwrap();
    (envelope.status_code, body)
}

async fn create(dispatcher: &TestDispatcher, body: Value) -> String {
    let (status, body) = send(dispatcher, InboundEvent::new("POST").with_body(body.to_string())).await;
    assert_eq!(status, 201, "{}", body);
    body["movieId"].as_str().unwrap().to_string()
}

// =============================================================================
// Create / Read
// =============================================================================

/// Every create gets a fresh id and reads back unchanged.
#[tokio::test]
async fn test_create_then_read_returns_stored_fields() {
    let (dispatcher, _) = setup();
    let mut seen = HashSet::new();

    for (title, genre, rating) in [
        ("Alien", "Horror", json!(8.5)),
        ("Heat", "Crime", json!(8)),
        ("Plan 9", "Sci-Fi", json!(0)),
        ("Ran", "Drama", json!("8.20")),
    ] {
        let id = create(
            &dispatcher,
            json!({"title": title, "genre": genre, "rating": rating}),
        )
        .await;
        assert!(seen.insert(id.clone()), "duplicate id {}", id);

        let (status, body) = send(&dispatcher, InboundEvent::new("GET").with_query("movieId", id.as_str())).await;
        assert_eq!(status, 200);
        assert_eq!(body["movieId"], id.as_str());
        assert_eq!(body["title"], title);
        assert_eq!(body["genre"], genre);
    }
}

/// Missing, null, or empty required fields are rejected before any write.
#[tokio::test]
async fn test_create_missing_fields_never_writes() {
    let (dispatcher, store) = setup();

    for body in [
        json!({"genre": "Horror", "rating": 8}),
        json!({"title": null, "genre": "Horror", "rating": 8}),
        json!({"title": "", "genre": "Horror", "rating": 8}),
        json!({"title": "Alien", "rating": 8}),
        json!({"title": "Alien", "genre": "", "rating": 8}),
        json!({"title": "Alien", "genre": "Horror"}),
        json!({"title": "Alien", "genre": "Horror", "rating": null}),
    ] {
        let (status, response) =
            send(&dispatcher, InboundEvent::new("POST").with_body(body.to_string())).await;
        assert_eq!(status, 400, "{}", body);
        assert_eq!(response["error"], "Title, Genre, and Rating are required");
    }

    assert_eq!(store.writes(), 0);
    assert!(store.inner.is_empty().unwrap());
}

// =============================================================================
// Update
// =============================================================================

/// Updating an unknown id is a 404 and the store is unchanged.
#[tokio::test]
async fn test_update_missing_record_is_404() {
    let (dispatcher, store) = setup();
    let id = create(&dispatcher, json!({"title": "Heat", "genre": "Crime", "rating": 8})).await;

    let (status, body) = send(
        &dispatcher,
        InboundEvent::new("PUT").with_body(json!({"movieId": "ghost", "rating": 1}).to_string()),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Movie not found");

    assert_eq!(store.inner.len().unwrap(), 1);
    assert!(store.inner.get("ghost").await.unwrap().is_none());
    let stored = store.inner.get(&id).await.unwrap().unwrap();
    assert_eq!(stored["rating"], Attribute::Number(Decimal::from(8)));
}

/// A rating-only update leaves title and genre alone.
#[tokio::test]
async fn test_update_rating_only() {
    let (dispatcher, store) = setup();
    let id = create(&dispatcher, json!({"title": "Heat", "genre": "Crime", "rating": 8})).await;

    let (status, body) = send(
        &dispatcher,
        InboundEvent::new("PUT").with_body(json!({"movieId": id, "rating": 0}).to_string()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Movie updated successfully");

    let stored = store.inner.get(&id).await.unwrap().unwrap();
    assert_eq!(stored["title"], Attribute::from("Heat"));
    assert_eq!(stored["genre"], Attribute::from("Crime"));
    assert_eq!(stored["rating"], Attribute::Number(Decimal::ZERO));
}

/// Empty strings in an update leave their fields alone.
#[tokio::test]
async fn test_update_skips_empty_strings() {
    let (dispatcher, store) = setup();
    let id = create(&dispatcher, json!({"title": "Heat", "genre": "Crime", "rating": 8})).await;

    let (status, _) = send(
        &dispatcher,
        InboundEvent::new("PUT").with_body(json!({"movieId": id, "title": "", "rating": 9}).to_string()),
    )
    .await;
    assert_eq!(status, 200);

    let stored = store.inner.get(&id).await.unwrap().unwrap();
    assert_eq!(stored["title"], Attribute::from("Heat"));
    assert_eq!(stored["rating"], Attribute::Number(Decimal::from(9)));
}

/// An update naming no fields on an unknown id is a 404 with no write.
#[tokio::test]
async fn test_update_without_fields_on_missing_record_is_404() {
    let (dispatcher, store) = setup();

    let (status, body) = send(
        &dispatcher,
        InboundEvent::new("PUT").with_body(json!({"movieId": "ghost"}).to_string()),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Movie not found");
    assert_eq!(store.writes(), 0);
}

/// An update naming no fields is a 400 and never writes.
#[tokio::test]
async fn test_update_without_fields_is_400() {
    let (dispatcher, store) = setup();
    let id = create(&dispatcher, json!({"title": "Heat", "genre": "Crime", "rating": 8})).await;
    let writes = store.writes();

    let (status, body) = send(
        &dispatcher,
        InboundEvent::new("PUT").with_body(json!({"movieId": id}).to_string()),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No fields provided for update");
    assert_eq!(store.writes(), writes);
}

// =============================================================================
// Delete / List
// =============================================================================

/// Deleting twice returns 200 then 404.
#[tokio::test]
async fn test_delete_twice() {
    let (dispatcher, _) = setup();
    let id = create(&dispatcher, json!({"title": "Heat", "genre": "Crime", "rating": 8})).await;

    let delete = || InboundEvent::new("DELETE").with_query("movieId", id.as_str());

    let (status, _) = send(&dispatcher, delete()).await;
    assert_eq!(status, 200);

    let (status, body) = send(&dispatcher, delete()).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Movie not found");
}

/// List shows created records, hides deleted ones, renders ratings as floats.
#[tokio::test]
async fn test_list_reflects_creates_and_deletes() {
    let (dispatcher, _) = setup();
    let kept = create(&dispatcher, json!({"title": "Alien", "genre": "Horror", "rating": 8.5})).await;
    let dropped = create(&dispatcher, json!({"title": "Heat", "genre": "Crime", "rating": 7.25})).await;

    let (status, _) = send(
        &dispatcher,
        InboundEvent::new("DELETE").with_body(json!({"movieId": dropped}).to_string()),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = send(&dispatcher, InboundEvent::new("GET")).await;
    assert_eq!(status, 200);

    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0]["movieId"], kept.as_str());
    assert!(movies[0]["rating"].is_f64());
    assert_eq!(movies[0]["rating"].as_f64(), Some(8.5));
}

// =============================================================================
// No Store Access
// =============================================================================

/// OPTIONS and unsupported methods never touch the store.
#[tokio::test]
async fn test_preflight_and_bad_method_skip_store() {
    let (dispatcher, store) = setup();
    create(&dispatcher, json!({"title": "Alien", "genre": "Horror", "rating": 8.5})).await;
    let before = store.calls();

    let (status, body) = send(&dispatcher, InboundEvent::new("OPTIONS")).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "CORS preflight success");

    for method in ["PATCH", "HEAD", "get", ""] {
        let (status, body) = send(&dispatcher, InboundEvent::new(method)).await;
        assert_eq!(status, 400, "{}", method);
        assert_eq!(body["error"], "Invalid request method");
    }

    assert_eq!(store.calls(), before);
}

/// Malformed JSON is a 500 with a message and no store access.
#[tokio::test]
async fn test_malformed_body_is_500() {
    let (dispatcher, store) = setup();

    for method in ["POST", "PUT"] {
        for body in ["{\"title\": ", "not json", "[1,2,3]"] {
            let (status, response) =
                send(&dispatcher, InboundEvent::new(method).with_body(body)).await;
            assert_eq!(status, 500, "{} {}", method, body);
            assert!(!response["error"].as_str().unwrap().is_empty());
        }
    }

    assert_eq!(store.calls(), 0);
}
