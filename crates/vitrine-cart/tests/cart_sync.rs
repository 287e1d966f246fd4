//! Integration tests for `CartSync` and `StorefrontClient`.
//!
//! Uses `wiremock` to stand up a local server per test so no real network
//! traffic is made. Covers the mutation contracts (idempotence,
//! single-flight coalescing, join-on-equal-quantity), the section fan-out,
//! and the error taxonomy.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrine_cart::{
    CartSync, LineKey, RenderedSections, SectionSink, StorefrontClient, StorefrontError,
};
use vitrine_core::{SectionId, SurfaceId, ThemeConfig};

fn sync_for(server: &MockServer) -> CartSync {
    let config = ThemeConfig::new(server.uri());
    CartSync::new(StorefrontClient::new(&config).expect("failed to build StorefrontClient"))
}

fn line_key(line: u32) -> LineKey {
    LineKey::new(SurfaceId::new("cart-page"), line)
}

/// Cart payload fixture from `(variant_id, quantity, unit_price)` rows.
fn cart_body(items: &[(i64, i64, i64)]) -> serde_json::Value {
    let item_count: i64 = items.iter().map(|(_, q, _)| q).sum();
    let total_price: i64 = items.iter().map(|(_, q, p)| q * p).sum();
    json!({
        "item_count": item_count,
        "total_price": total_price,
        "currency": "USD",
        "items": items.iter().map(|(id, q, p)| json!({
            "id": id,
            "quantity": q,
            "title": format!("Item {id}"),
            "price": p,
            "line_price": q * p,
        })).collect::<Vec<_>>(),
    })
}

/// Sink that records every fragment it was handed for its wanted sections.
struct RecordingSink {
    key: SurfaceId,
    wanted: Vec<SectionId>,
    seen: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn new(key: &str, wanted: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            key: SurfaceId::new(key),
            wanted: wanted.iter().map(|id| SectionId::new(*id)).collect(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl SectionSink for RecordingSink {
    fn key(&self) -> SurfaceId {
        self.key.clone()
    }

    fn section_ids(&self) -> Vec<SectionId> {
        self.wanted.clone()
    }

    fn apply(&self, sections: &RenderedSections) {
        let mut seen = self.seen.lock().unwrap();
        for id in &self.wanted {
            if let Some(html) = sections.get(id) {
                seen.push(html.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// change_line - idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sequential_awaited_changes_with_same_quantity_are_idempotent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 2, 1999)])))
        .expect(2)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let first = sync.change_line(line_key(1), 2).await.unwrap();
    let second = sync.change_line(line_key(1), 2).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(sync.latest_cart().unwrap().line(1).unwrap().quantity, 2);
}

// ---------------------------------------------------------------------------
// change_line - single-flight coalescing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_changes_coalesce_to_the_newest_quantity() {
    let server = MockServer::start().await;

    // The first request is slow so the second call arrives while it is on
    // the wire. Each body may be despatched at most once: never two
    // concurrent requests racing for the same line.
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 2})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_body(&[(101, 2, 1999)]))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 5, 1999)])))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let (first, second) = tokio::join!(
        sync.change_line(line_key(1), 2),
        sync.change_line(line_key(1), 5),
    );

    assert_eq!(first.unwrap().line(1).unwrap().quantity, 2);
    assert_eq!(second.unwrap().line(1).unwrap().quantity, 5);
    // The newest requested quantity is what the cart converged to.
    assert_eq!(sync.latest_cart().unwrap().line(1).unwrap().quantity, 5);
}

#[tokio::test]
async fn three_rapid_changes_supersede_the_middle_quantity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 2})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_body(&[(101, 2, 1999)]))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Quantity 5 is overwritten in the queue before the wire frees up: it
    // must never reach the server.
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 5, 1999)])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 7, 1999)])))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let (first, second, third) = tokio::join!(
        sync.change_line(line_key(1), 2),
        sync.change_line(line_key(1), 5),
        sync.change_line(line_key(1), 7),
    );

    assert_eq!(first.unwrap().line(1).unwrap().quantity, 2);
    // The superseded caller resolves with the latest observed state.
    assert_eq!(second.unwrap().line(1).unwrap().quantity, 7);
    assert_eq!(third.unwrap().line(1).unwrap().quantity, 7);
}

#[tokio::test]
async fn equal_quantity_call_joins_the_outstanding_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 3})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_body(&[(101, 3, 1999)]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let (first, second) = tokio::join!(
        sync.change_line(line_key(1), 3),
        sync.change_line(line_key(1), 3),
    );

    assert_eq!(first.unwrap(), second.unwrap());
}

#[tokio::test]
async fn different_lines_do_not_serialize_against_each_other() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 2, 1999)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 2, "quantity": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(102, 4, 999)])))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let (first, second) = tokio::join!(
        sync.change_line(line_key(1), 2),
        sync.change_line(line_key(2), 4),
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
}

// ---------------------------------------------------------------------------
// add_line - fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_add_publishes_count_and_fetches_sections_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({"id": "101", "quantity": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 101, "quantity": 1, "title": "Item 101",
            "price": 1999, "line_price": 1999,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cart.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 1, 1999), (102, 2, 999)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Exactly one sections fetch covering every registered id, sorted.
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sections", "cart-drawer,header-mini-cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cart-drawer": "<div>drawer</div>",
            "header-mini-cart": "<div>header</div>",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let drawer = RecordingSink::new("drawer", &["cart-drawer"]);
    let header = RecordingSink::new("header", &["header-mini-cart"]);
    sync.register_sink(drawer.clone()).await;
    sync.register_sink(header.clone()).await;

    let cart = sync
        .add_line(&"101".into(), 1, &[])
        .await
        .expect("add should succeed");

    assert_eq!(cart.item_count, 3);
    assert_eq!(sync.latest_cart().unwrap().item_count, 3);
    assert_eq!(drawer.seen(), vec!["<div>drawer</div>"]);
    assert_eq!(header.seen(), vec!["<div>header</div>"]);
}

// ---------------------------------------------------------------------------
// change_line(line, 0) - removal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn removal_propagates_to_every_registered_surface() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .and(body_json(json!({"line": 1, "quantity": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sections", "cart-drawer,cart-page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cart-drawer": "<div>empty drawer</div>",
            "cart-page": "<div>empty page</div>",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let drawer = RecordingSink::new("drawer", &["cart-drawer"]);
    let page = RecordingSink::new("page", &["cart-page"]);
    sync.register_sink(drawer.clone()).await;
    sync.register_sink(page.clone()).await;

    let cart = sync.change_line(line_key(1), 0).await.unwrap();

    // No manual re-fetch needed anywhere: the change response is the
    // authoritative state and every surface already got its fragment.
    assert!(cart.is_empty());
    assert_eq!(sync.latest_cart().unwrap().item_count, 0);
    assert_eq!(drawer.seen(), vec!["<div>empty drawer</div>"]);
    assert_eq!(page.seen(), vec!["<div>empty page</div>"]);
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_add_maps_to_mutation_error_with_platform_description() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": 422,
            "message": "Cart Error",
            "description": "All 4 Red / S are in your cart.",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let err = sync.add_line(&"101".into(), 1, &[]).await.unwrap_err();

    match err {
        StorefrontError::Mutation {
            status,
            message,
            line,
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "All 4 Red / S are in your cart.");
            assert_eq!(line, None);
        }
        other => panic!("expected Mutation error, got: {other:?}"),
    }
    // A failed add publishes nothing.
    assert!(sync.latest_cart().is_none());
}

#[tokio::test]
async fn rejected_change_carries_the_line_index() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "description": "Cart Error",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let err = sync.change_line(line_key(2), 3).await.unwrap_err();

    assert_eq!(err.line(), Some(2));
    assert!(err.is_mutation());
}

#[tokio::test]
async fn section_fetch_failure_does_not_fail_the_mutation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 2, 1999)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let drawer = RecordingSink::new("drawer", &["cart-drawer"]);
    sync.register_sink(drawer.clone()).await;

    let cart = sync.change_line(line_key(1), 2).await;

    // The quantity change itself succeeded; only the visual refresh is stale.
    assert!(cart.is_ok());
    assert!(drawer.seen().is_empty());
    assert_eq!(sync.latest_cart().unwrap().item_count, 2);
}

#[tokio::test]
async fn missing_product_maps_to_catalog_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/discontinued.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let err = sync
        .client()
        .fetch_product("discontinued")
        .await
        .unwrap_err();

    match err {
        StorefrontError::CatalogFetch { handle, .. } => assert_eq!(handle, "discontinued"),
        other => panic!("expected CatalogFetch error, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// refresh / sink registry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_publishes_cart_and_fans_out_sections() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 1, 1999)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sections", "cart-drawer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"cart-drawer": "<div>d</div>"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let drawer = RecordingSink::new("drawer", &["cart-drawer"]);
    sync.register_sink(drawer.clone()).await;

    let cart = sync.refresh().await.unwrap();

    assert_eq!(cart.item_count, 1);
    assert_eq!(drawer.seen(), vec!["<div>d</div>"]);
}

#[tokio::test]
async fn unregistered_sinks_stop_receiving_fragments() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cart/change.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(&[(101, 2, 1999)])))
        .expect(1)
        .mount(&server)
        .await;

    let sync = sync_for(&server);
    let drawer = RecordingSink::new("drawer", &["cart-drawer"]);
    sync.register_sink(drawer.clone()).await;
    sync.unregister_sink(&SurfaceId::new("drawer")).await;

    // No sinks left: no sections fetch is made at all (no mock mounted for
    // it, and wiremock would 404 an unexpected GET /).
    let cart = sync.change_line(line_key(1), 2).await;
    assert!(cart.is_ok());
    assert!(drawer.seen().is_empty());
}
