//! Shared test infrastructure.
//!
//! Every test gets its own in-memory store, so tests never share state and
//! need no database.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, middleware, web};

use marketdesk::console::{OrderConsole, RequestConsole};
use marketdesk::db::Store;
use marketdesk::handlers;
use marketdesk::models::order::{self, NewOrder, Order};
use marketdesk::models::request::{self, GadgetRequest, NewGadgetRequest};
use marketdesk::workflow::guard::InFlightGuard;
use marketdesk::workflow::{OrderStatus, PriceRules, RequestStatus};

pub const CORRELATION: &str = "test-correlation";

// ============================================================================
// STORE + CONSOLES
// ============================================================================

pub struct TestEnv {
    pub store: Store,
    pub guard: InFlightGuard,
    pub orders: OrderConsole,
    pub requests: RequestConsole,
}

pub fn setup() -> TestEnv {
    setup_with_price_max(None)
}

pub fn setup_with_price_max(max: Option<f64>) -> TestEnv {
    let store = Store::memory();
    let guard = InFlightGuard::new();
    TestEnv {
        orders: OrderConsole::new(store.clone(), guard.clone()),
        requests: RequestConsole::new(store.clone(), guard.clone(), PriceRules { max }),
        store,
        guard,
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub async fn create_order(store: &Store, status: OrderStatus) -> Order {
    let new = NewOrder {
        customer_name: "Test Customer".into(),
        customer_email: "customer@example.com".into(),
        item_summary: "Test gadget x1".into(),
        total: 42.5,
        status,
    };
    order::create(store, &new).await.expect("create order")
}

pub async fn create_request(store: &Store, status: RequestStatus, chat_enabled: bool) -> GadgetRequest {
    let new = NewGadgetRequest {
        requester_name: "Test Requester".into(),
        requester_email: "requester@example.com".into(),
        gadget_name: "Test Gadget".into(),
        description: String::new(),
        status,
        chat_enabled,
        offer_price: (status == RequestStatus::OfferMade).then_some(100.0),
    };
    request::create(store, &new).await.expect("create request")
}

// ============================================================================
// HTTP APP
// ============================================================================

/// The application as `main` assembles it, minus the access log.
pub fn app(
    env: &TestEnv,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .wrap(middleware::from_fn(handlers::middleware::correlation_id))
        .app_data(web::Data::new(env.orders.clone()))
        .app_data(web::Data::new(env.requests.clone()))
        .configure(handlers::configure)
        .default_service(web::to(handlers::not_found))
}
