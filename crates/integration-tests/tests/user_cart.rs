//! End-to-end tests for the user cart widget against the stub API.
//!
//! Run with: cargo test -p usercart-integration-tests

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use serde_json::json;
use usercart_core::{CartItem, CartSnapshot, ItemId, UserId};
use usercart_integration_tests::StubApi;
use usercart_storefront::{
    ApiError, CartApiClient, FetchStage, RequestOutcome, UserCartService, UserCartView,
    ViewError, WidgetConfig,
};

async fn service_for(api: &StubApi) -> Arc<UserCartService<CartApiClient>> {
    let base_url = api.spawn().await.unwrap();
    let config = WidgetConfig::with_base_url(&base_url).unwrap();
    Arc::new(UserCartService::new(CartApiClient::new(&config).unwrap()))
}

fn names(items: &[CartItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[tokio::test]
async fn test_request_publishes_full_snapshot() {
    let api = StubApi::ann();
    let service = service_for(&api).await;

    let seen = Arc::new(Mutex::new(Vec::<CartSnapshot>::new()));
    let sink = Arc::clone(&seen);
    let _subscription = service.subscribe(move |snapshot| {
        sink.lock().unwrap().push(snapshot.clone());
    });

    let outcome = service.request_user_data(&UserId::from("u1")).await.unwrap();
    assert_eq!(outcome, RequestOutcome::Published);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let user = seen[0].user.as_ref().unwrap();
    assert_eq!(user.display_name, "Ann");
    assert_eq!(user.cart_id.as_str(), "c1");
    assert_eq!(names(&seen[0].cart), ["Shoes", "Shirt"]);

    assert_eq!(api.requests(), ["GET /v2/user/u1", "GET /v2/cart/c1"]);
}

#[tokio::test]
async fn test_filter_is_relative_to_fetched_cart() {
    let service = service_for(&StubApi::ann()).await;
    service.request_user_data(&UserId::from("u1")).await.unwrap();

    service.filter_cart_items("Shi");
    let snapshot = service.snapshot().unwrap();
    assert!(snapshot.user.is_none());
    assert_eq!(names(&snapshot.cart), ["Shirt"]);

    service.filter_cart_items("Sh");
    assert_eq!(names(&service.snapshot().unwrap().cart), ["Shoes", "Shirt"]);
}

#[tokio::test]
async fn test_unknown_user_fails_at_profile_stage() {
    let api = StubApi::ann();
    let service = service_for(&api).await;

    let err = service
        .request_user_data(&UserId::from("nobody"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, FetchStage::Profile);
    assert!(matches!(err.source, ApiError::Status { status: 404, .. }));
    assert!(service.snapshot().is_none());
    assert_eq!(api.requests(), ["GET /v2/user/nobody"]);
}

#[tokio::test]
async fn test_missing_cart_fails_at_cart_stage() {
    let api = StubApi::new().user("u9", "Orphan", "gone");
    let service = service_for(&api).await;

    let err = service
        .request_user_data(&UserId::from("u9"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, FetchStage::Cart);
    assert!(service.snapshot().is_none());
}

#[tokio::test]
async fn test_error_envelope_is_a_failure() {
    let api = StubApi::ann().user_error("u1", json!({ "message": "account locked" }));
    let service = service_for(&api).await;

    let err = service
        .request_user_data(&UserId::from("u1"))
        .await
        .unwrap_err();

    assert!(matches!(&err.source, ApiError::Remote(message) if message == "account locked"));
    assert!(service.snapshot().is_none());
}

#[tokio::test]
async fn test_view_renders_loaded_cart() {
    let mut view = UserCartView::new(service_for(&StubApi::ann()).await);
    view.set_user_id(UserId::from("u1")).await.unwrap();

    let html = view.render().unwrap();
    assert!(html.contains("<h1>Ann</h1>"));
    assert!(html.contains("User's cart:"));
    assert!(html.contains(r#"<a href="/product/p1">Shoes</a>"#));
    assert!(html.contains(r#"<a href="/product/p2">Shirt</a>"#));
    assert!(html.contains("Remove From Cart"));
}

#[tokio::test]
async fn test_view_filter_keeps_user() {
    let mut view = UserCartView::new(service_for(&StubApi::ann()).await);
    view.set_user_id(UserId::from("u1")).await.unwrap();

    view.filter_items("Sho");

    assert_eq!(view.user().unwrap().display_name, "Ann");
    assert_eq!(names(&view.cart()), ["Shoes"]);
    let html = view.render().unwrap();
    assert!(html.contains("<h1>Ann</h1>"));
    assert!(!html.contains("Shirt"));
}

#[tokio::test]
async fn test_view_remove_deletes_remotely_and_locally() {
    let api = StubApi::ann();
    let mut view = UserCartView::new(service_for(&api).await);
    view.set_user_id(UserId::from("u1")).await.unwrap();

    let removed = view.remove(&ItemId::from("p1")).await.unwrap();

    assert!(removed);
    assert_eq!(names(&view.cart()), ["Shirt"]);
    assert_eq!(api.removed(), [("u1".to_owned(), "p1".to_owned())]);

    // A reload reflects the server-side removal.
    view.refresh().await.unwrap();
    assert_eq!(names(&view.cart()), ["Shirt"]);
}

#[tokio::test]
async fn test_view_failed_remove_keeps_item() {
    let api = StubApi::ann().failing_remove("p2");
    let mut view = UserCartView::new(service_for(&api).await);
    view.set_user_id(UserId::from("u1")).await.unwrap();

    let err = view.remove(&ItemId::from("p2")).await.unwrap_err();

    assert!(matches!(
        err,
        ViewError::Remove(ApiError::Status { status: 500, .. })
    ));
    assert_eq!(names(&view.cart()), ["Shoes", "Shirt"]);
    assert!(api.removed().is_empty());
    assert!(view.render().unwrap().contains(r#"role="alert""#));
}

#[tokio::test]
async fn test_view_switches_user() {
    let api = StubApi::ann()
        .user("u2", "Bo", "c2")
        .cart("c2", &[("p9", "Socks")]);
    let mut view = UserCartView::new(service_for(&api).await);

    view.set_user_id(UserId::from("u1")).await.unwrap();
    view.set_user_id(UserId::from("u2")).await.unwrap();

    assert_eq!(view.user().unwrap().display_name, "Bo");
    assert_eq!(names(&view.cart()), ["Socks"]);
}
