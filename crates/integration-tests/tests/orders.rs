//! The order list against the fake backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use hadi_books_admin::ConsoleError;
use hadi_books_admin::listing::{
    FetchOutcome, OrderFilter, OrderMutation, PaymentDecision, ShippingDetails,
};
use hadi_books_core::{OrderStatus, PaymentRecordStatus, PaymentStatus};
use hadi_books_integration_tests::FakeBackend;

#[tokio::test]
async fn test_orders_list() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();

    orders.fetch(1).await.unwrap();

    let state = orders.state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.total, 3);
    assert!(state.items[0].has_payment_proof());
    assert_eq!(state.items[0].customer_name(), "Ayesha Khan");
}

#[tokio::test]
async fn test_status_filter_applies_immediately() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();

    let outcome = orders
        .change_filter(OrderFilter {
            status: Some(OrderStatus::Delivered),
            ..OrderFilter::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    let state = orders.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id.as_str(), "o1003");
}

#[tokio::test]
async fn test_filter_without_matches_shows_message() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();

    orders
        .change_filter(OrderFilter {
            payment_status: Some(PaymentStatus::Failed),
            ..OrderFilter::default()
        })
        .await
        .unwrap();

    assert_eq!(orders.state().empty_message, Some("No orders found"));
}

#[tokio::test]
async fn test_approving_payment_confirms_order() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();
    orders.fetch(1).await.unwrap();
    backend.clear_calls();

    orders
        .mutate(
            "o1001",
            OrderMutation::VerifyPayment(PaymentDecision::Approve),
        )
        .await
        .unwrap();

    let state = orders.state();
    let order = &state.items[0];
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(
        order.payment.as_ref().unwrap().status,
        PaymentRecordStatus::Completed
    );
    assert_eq!(backend.calls("PUT /api/adminCtrl/status/o1001"), 1);
    assert_eq!(backend.calls("GET /api/adminCtrl/all"), 0);
    backend.state(|s| {
        assert_eq!(s.orders[0]["status"], "confirmed");
        assert_eq!(s.orders[0]["paymentStatus"], "paid");
        assert_eq!(s.orders[0]["payment"]["status"], "completed");
    });
}

#[tokio::test]
async fn test_rejecting_payment_cancels_order() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();
    orders.fetch(1).await.unwrap();

    orders
        .mutate("o1001", OrderMutation::VerifyPayment(PaymentDecision::Reject))
        .await
        .unwrap();

    let state = orders.state();
    assert_eq!(state.items[0].status, OrderStatus::Cancelled);
    assert_eq!(state.items[0].payment_status, PaymentStatus::Failed);
    assert!(backend.state(|s| s.orders[0]["payment"]["status"] == "failed"));
}

#[tokio::test]
async fn test_shipping_details_keep_status() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();
    orders.fetch(1).await.unwrap();

    orders
        .mutate(
            "o1002",
            OrderMutation::SetDetails(ShippingDetails {
                tracking_id: Some("TCS-4471".to_string()),
                shipping_method: Some("TCS Overnight".to_string()),
                estimated_delivery: None,
            }),
        )
        .await
        .unwrap();

    let state = orders.state();
    let order = state.items.iter().find(|o| o.id.as_str() == "o1002").unwrap();
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.tracking_id.as_deref(), Some("TCS-4471"));
    backend.state(|s| {
        assert_eq!(s.orders[1]["status"], "processing");
        assert_eq!(s.orders[1]["trackingId"], "TCS-4471");
        assert_eq!(s.orders[1]["shippingMethod"], "TCS Overnight");
    });
}

#[tokio::test]
async fn test_set_status() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();
    orders.fetch(1).await.unwrap();

    orders
        .mutate("o1002", OrderMutation::SetStatus(OrderStatus::Shipped))
        .await
        .unwrap();

    assert!(backend.state(|s| s.orders[1]["status"] == "shipped"));
    let state = orders.state();
    assert_eq!(state.items[1].status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_unknown_order_makes_no_request() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let orders = console.orders();
    orders.fetch(1).await.unwrap();
    backend.clear_calls();

    let err = orders
        .mutate("o9999", OrderMutation::SetStatus(OrderStatus::Shipped))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::UnknownItem(_)));
    assert!(backend.state(|s| s.calls.is_empty()));
}

#[tokio::test]
async fn test_unpaginated_response_is_searched_locally() {
    let backend = FakeBackend::seeded().await;
    backend.state(|s| s.paginate_orders = false);
    let console = backend.signed_in().await;
    let orders = console.orders();

    orders.search("sana").await.unwrap();
    let mut rx = orders.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        rx.wait_for(|state| {
            !state.loading
                && state
                    .last_query
                    .as_ref()
                    .is_some_and(|query| query.search == "sana")
        }),
    )
    .await
    .unwrap()
    .unwrap();

    let state = orders.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id.as_str(), "o1003");
    assert_eq!(state.pages, 1);
}

#[tokio::test]
async fn test_unpaginated_local_search_uses_short_terms() {
    let backend = FakeBackend::seeded().await;
    backend.state(|s| s.paginate_orders = false);
    let console = backend.signed_in().await;
    let orders = console.orders();

    assert_eq!(orders.search("q").await.unwrap(), FetchOutcome::Applied);

    let state = orders.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id.as_str(), "o1003");
    assert_eq!(state.total, 1);
    assert_eq!(state.last_query.as_ref().unwrap().search, "");
}
