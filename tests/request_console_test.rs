/// Gadget request console: status graph, offer actions, chat flag and the
/// payment link outbox.

use marketdesk::errors::AppError;
use marketdesk::models::notification::NotificationKind;
use marketdesk::models::request;
use marketdesk::workflow::guard::ActionKey;
use marketdesk::workflow::{EntityKind, RequestStatus, WorkflowError};

mod common;
use common::{CORRELATION, create_request, setup, setup_with_price_max};

#[tokio::test]
async fn test_entering_in_progress_enables_chat() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::Pending, false).await;

    let view = env
        .requests
        .change_status(created.id, RequestStatus::InProgress, CORRELATION)
        .await
        .expect("pending -> in-progress");
    assert_eq!(view.request.status, RequestStatus::InProgress);
    assert!(view.request.chat_enabled);
    assert!(view.can_create_offer);

    let stored = request::find_by_id(&env.store, created.id).await.unwrap().unwrap();
    assert!(stored.chat_enabled);
}

#[tokio::test]
async fn test_not_available_keeps_chat_off() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::Pending, false).await;

    let view = env
        .requests
        .change_status(created.id, RequestStatus::NotAvailable, CORRELATION)
        .await
        .unwrap();
    assert!(!view.request.chat_enabled);
    assert!(view.next_options.is_empty());
}

#[tokio::test]
async fn test_offer_statuses_are_not_graph_targets() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;

    let err = env
        .requests
        .change_status(created.id, RequestStatus::OfferMade, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::TransitionRefused { .. })
    ));
}

#[tokio::test]
async fn test_create_offer_queues_payment_link() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;

    let view = env
        .requests
        .create_offer(created.id, 149.9, CORRELATION)
        .await
        .expect("offer from in-progress");
    assert_eq!(view.request.status, RequestStatus::OfferMade);
    assert_eq!(view.request.offer_price, Some(149.9));
    assert!(view.can_close_offer);
    assert!(!view.can_create_offer);

    let outbox = env.requests.notifications(created.id).await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].kind, NotificationKind::PaymentLinkSent);
    assert_eq!(outbox[0].recipient, "requester@example.com");
    assert_eq!(outbox[0].payload["price"], 149.9);
    assert_eq!(outbox[0].payload["correlationId"], CORRELATION);
}

#[tokio::test]
async fn test_create_offer_outside_in_progress_is_rejected() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::Pending, false).await;

    let err = env
        .requests
        .create_offer(created.id, 50.0, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Workflow(WorkflowError::Precondition { .. })
    ));
    assert!(env.requests.notifications(created.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_offer_validates_price() {
    let env = setup_with_price_max(Some(1000.0));
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;

    for bad in [0.0, -5.0, f64::NAN, 5000.0] {
        let err = env
            .requests
            .create_offer(created.id, bad, CORRELATION)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Workflow(WorkflowError::InvalidPrice(_))),
            "price {bad} accepted"
        );
    }

    let stored = request::find_by_id(&env.store, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::InProgress);
}

#[tokio::test]
async fn test_close_offer_declines() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::OfferMade, true).await;

    let view = env.requests.close_offer(created.id, CORRELATION).await.unwrap();
    assert_eq!(view.request.status, RequestStatus::OfferDeclined);

    let again = env.requests.close_offer(created.id, CORRELATION).await.unwrap_err();
    assert!(matches!(
        again,
        AppError::Workflow(WorkflowError::Precondition { .. })
    ));
}

#[tokio::test]
async fn test_toggle_chat_flips_and_sets() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;

    assert!(!env.requests.toggle_chat(created.id, None, CORRELATION).await.unwrap());
    assert!(env.requests.toggle_chat(created.id, None, CORRELATION).await.unwrap());
    assert!(env.requests.toggle_chat(created.id, Some(true), CORRELATION).await.unwrap());
    assert!(!env.requests.toggle_chat(created.id, Some(false), CORRELATION).await.unwrap());

    let stored = request::find_by_id(&env.store, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::InProgress);
    assert!(!stored.chat_enabled);
}

#[tokio::test]
async fn test_duplicate_offer_while_in_flight_is_refused() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;

    let _held = env
        .guard
        .try_acquire(ActionKey::new(EntityKind::Request, created.id, "create-offer"))
        .expect("first claim");

    let err = env
        .requests
        .create_offer(created.id, 99.0, CORRELATION)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InFlight(_)));
    assert!(env.requests.notifications(created.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_offer_actions_are_audited() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;
    env.requests.create_offer(created.id, 20.0, CORRELATION).await.unwrap();
    env.requests.close_offer(created.id, CORRELATION).await.unwrap();

    let events = env.requests.events(created.id).await.unwrap();
    let trail: Vec<(&str, &str, &str)> = events
        .iter()
        .map(|e| (e.action.as_str(), e.from_status.as_str(), e.to_status.as_str()))
        .collect();
    assert_eq!(
        trail,
        vec![
            ("create-offer", "in-progress", "offer-made"),
            ("close-offer", "offer-made", "offer-declined"),
        ]
    );
}

#[tokio::test]
async fn test_unknown_request_is_not_found() {
    let env = setup();
    assert!(matches!(env.requests.detail(77).await, Err(AppError::NotFound)));
    assert!(matches!(
        env.requests.toggle_chat(77, None, CORRELATION).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_stale_transition_does_not_undo_chat_toggle() {
    let env = setup();
    let created = create_request(&env.store, RequestStatus::InProgress, true).await;

    let read = created.state();
    let stale_next = read.transition(RequestStatus::Shipped).expect("in-progress -> shipped");

    assert!(!env.requests.toggle_chat(created.id, Some(false), CORRELATION).await.unwrap());

    let err = request::update_state(&env.store, created.id, &read, &stale_next)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let stored = request::find_by_id(&env.store, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RequestStatus::InProgress);
    assert!(!stored.chat_enabled);

    let view = env
        .requests
        .change_status(created.id, RequestStatus::Shipped, CORRELATION)
        .await
        .expect("fresh transition");
    assert!(!view.request.chat_enabled);
}

#[tokio::test]
async fn test_offer_action_name_matches_in_errors_and_audit() {
    let env = setup();
    let pending = create_request(&env.store, RequestStatus::Pending, false).await;
    let working = create_request(&env.store, RequestStatus::InProgress, true).await;

    let err = env
        .requests
        .create_offer(pending.id, 10.0, CORRELATION)
        .await
        .unwrap_err();
    let refused_action = match err {
        AppError::Workflow(WorkflowError::Precondition { action, .. }) => action,
        other => panic!("unexpected error: {other}"),
    };

    env.requests.create_offer(working.id, 10.0, CORRELATION).await.unwrap();
    let events = env.requests.events(working.id).await.unwrap();
    assert_eq!(events[0].action, refused_action);
    assert_eq!(refused_action, marketdesk::console::ACTION_CREATE_OFFER);
}
