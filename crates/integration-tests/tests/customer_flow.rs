//! Customer journey against a running server.
//!
//! Run with: `cargo test -p clearspring-integration-tests -- --ignored`

use clearspring_integration_tests::{Browser, linked_order_ids, location, unique_phone};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running clearspring-web server"]
async fn test_health() {
    let browser = Browser::new().unwrap();

    let resp = browser.get("/health").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = browser.get("/health/ready").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running clearspring-web server"]
async fn test_customer_places_and_views_order() {
    let browser = Browser::new().unwrap();
    let phone = unique_phone();

    let resp = browser.continue_as(&phone).await.unwrap();
    assert_eq!(location(&resp), "/customer?success=continuing");

    let resp = browser.place_order("12 Well Street", "3").await.unwrap();
    assert_eq!(location(&resp), "/customer?success=order_placed");

    let body = browser.get("/customer").await.unwrap().text().await.unwrap();
    assert!(body.contains(&phone));
    assert!(body.contains("12 Well Street"));

    let ids = linked_order_ids(&body);
    assert_eq!(ids.len(), 1);

    let resp = browser.get(&format!("/orders/{}", ids[0])).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running clearspring-web server"]
async fn test_customer_cannot_view_other_customers_order() {
    let owner = Browser::new().unwrap();
    owner.continue_as(&unique_phone()).await.unwrap();
    owner.place_order("7 Spring Lane", "1").await.unwrap();
    let body = owner.get("/customer").await.unwrap().text().await.unwrap();
    let id = linked_order_ids(&body)[0];

    let other = Browser::new().unwrap();
    other.continue_as(&unique_phone()).await.unwrap();

    let resp = other.get(&format!("/orders/{id}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running clearspring-web server"]
async fn test_order_requires_address() {
    let browser = Browser::new().unwrap();
    browser.continue_as(&unique_phone()).await.unwrap();

    let resp = browser.place_order("", "2").await.unwrap();
    assert_eq!(
        location(&resp),
        "/customer?error=phone_and_address_required"
    );

    let body = browser.get("/customer").await.unwrap().text().await.unwrap();
    assert!(linked_order_ids(&body).is_empty());
}

#[tokio::test]
#[ignore = "Requires running clearspring-web server"]
async fn test_logout_ends_customer_session() {
    let browser = Browser::new().unwrap();
    browser.continue_as(&unique_phone()).await.unwrap();

    let resp = browser.get("/logout").await.unwrap();
    assert_eq!(location(&resp), "/?success=logged_out");

    let resp = browser.get("/customer").await.unwrap();
    assert_eq!(location(&resp), "/");
}
