/// Order console: single and bulk status changes against the memory store.

use marketdesk::errors::AppError;
use marketdesk::models::event::find_for_entity;
use marketdesk::models::order::{self, OrderFilter};
use marketdesk::workflow::guard::ActionKey;
use marketdesk::workflow::{EntityKind, OrderStatus, WorkflowError};

mod common;
use common::{CORRELATION, create_order, setup};

#[tokio::test]
async fn test_pending_order_can_ship_directly() {
    let env = setup();
    let created = create_order(&env.store, OrderStatus::Pending).await;

    let view = env
        .orders
        .change_status(created.id, OrderStatus::Shipped, CORRELATION)
        .await
        .expect("pending -> shipped");

    assert_eq!(view.order.status, OrderStatus::Shipped);
    assert_eq!(view.next_options, vec![OrderStatus::Delivered, OrderStatus::Returned]);

    let stored = order::find_by_id(&env.store, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_refused_transition_leaves_order_unchanged() {
    let env = setup();
    let created = create_order(&env.store, OrderStatus::Delivered).await;

    let err = env
        .orders
        .change_status(created.id, OrderStatus::Pending, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::TransitionRefused { .. })
    ));

    let stored = order::find_by_id(&env.store, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Delivered);
    assert!(env.orders.events(created.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let env = setup();
    let err = env
        .orders
        .change_status(999, OrderStatus::Shipped, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_status_change_is_audited_with_correlation() {
    let env = setup();
    let created = create_order(&env.store, OrderStatus::Pending).await;
    env.orders
        .change_status(created.id, OrderStatus::Processing, CORRELATION)
        .await
        .unwrap();

    let events = find_for_entity(&env.store, EntityKind::Order, created.id).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].from_status, "pending");
    assert_eq!(events[0].to_status, "processing");
    assert_eq!(events[0].correlation_id, CORRELATION);
}

#[tokio::test]
async fn test_in_flight_change_is_refused() {
    let env = setup();
    let created = create_order(&env.store, OrderStatus::Pending).await;

    let _held = env
        .guard
        .try_acquire(ActionKey::new(EntityKind::Order, created.id, "status"))
        .expect("first claim");

    let err = env
        .orders
        .change_status(created.id, OrderStatus::Shipped, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InFlight(_)));
}

#[tokio::test]
async fn test_stale_expected_status_conflicts() {
    let env = setup();
    let created = create_order(&env.store, OrderStatus::Pending).await;
    order::update_status(&env.store, created.id, OrderStatus::Pending, OrderStatus::Processing)
        .await
        .unwrap();

    let err = order::update_status(&env.store, created.id, OrderStatus::Pending, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_bulk_options_for_mixed_selection_are_empty() {
    let env = setup();
    let pending = create_order(&env.store, OrderStatus::Pending).await;
    let shipped = create_order(&env.store, OrderStatus::Shipped).await;

    let options = env.orders.bulk_options(&[pending.id, shipped.id]).await.unwrap();
    assert!(options.is_empty());

    let none = env.orders.bulk_options(&[]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_bulk_options_for_uniform_selection() {
    let env = setup();
    let a = create_order(&env.store, OrderStatus::Pending).await;
    let b = create_order(&env.store, OrderStatus::Pending).await;

    let options = env.orders.bulk_options(&[a.id, b.id, a.id]).await.unwrap();
    assert_eq!(options, vec![OrderStatus::Processing, OrderStatus::Shipped]);
}

#[tokio::test]
async fn test_bulk_change_moves_every_order() {
    let env = setup();
    let a = create_order(&env.store, OrderStatus::Processing).await;
    let b = create_order(&env.store, OrderStatus::Processing).await;

    let updated = env
        .orders
        .bulk_change_status(&[a.id, b.id], OrderStatus::Shipped, CORRELATION)
        .await
        .expect("bulk ship");
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|v| v.order.status == OrderStatus::Shipped));

    let shipped = env
        .orders
        .list(&OrderFilter {
            status: Some(OrderStatus::Shipped),
            q: None,
        })
        .await
        .unwrap();
    assert_eq!(shipped.len(), 2);
    assert_eq!(env.orders.events(a.id).await.unwrap()[0].action, "bulk-status");
}

#[tokio::test]
async fn test_bulk_change_of_mixed_selection_changes_nothing() {
    let env = setup();
    let pending = create_order(&env.store, OrderStatus::Pending).await;
    let shipped = create_order(&env.store, OrderStatus::Shipped).await;

    let err = env
        .orders
        .bulk_change_status(&[pending.id, shipped.id], OrderStatus::Delivered, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::HeterogeneousSelection)
    ));

    let stored = order::find_by_id(&env.store, pending.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_bulk_selection_with_unknown_id_is_not_found() {
    let env = setup();
    let a = create_order(&env.store, OrderStatus::Pending).await;

    let err = env.orders.bulk_options(&[a.id, 4242]).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_list_filters_by_text() {
    let env = setup();
    create_order(&env.store, OrderStatus::Pending).await;

    let hits = env
        .orders
        .list(&OrderFilter {
            status: None,
            q: Some("GADGET".into()),
        })
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    let misses = env
        .orders
        .list(&OrderFilter {
            status: None,
            q: Some("walkman".into()),
        })
        .await
        .unwrap();
    assert!(misses.is_empty());
}
