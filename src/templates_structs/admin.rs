use askama::Template;

use crate::console::{OrderView, RequestView};
use super::{BadgeCell, PageContext, StatusOption};

pub struct OrderRow {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub item_summary: String,
    pub total: String,
    pub badge: BadgeCell,
    pub next_options: Vec<StatusOption>,
}

impl From<OrderView> for OrderRow {
    fn from(view: OrderView) -> Self {
        Self {
            id: view.order.id,
            customer_name: view.order.customer_name,
            customer_email: view.order.customer_email,
            item_summary: view.order.item_summary,
            total: format!("{:.2}", view.order.total),
            badge: view.badge.into(),
            next_options: StatusOption::list(&view.next_options, None),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/orders.html")]
pub struct OrdersPageTemplate {
    pub ctx: PageContext,
    pub rows: Vec<OrderRow>,
    pub status_choices: Vec<StatusOption>,
    /// Options the gate allows for every order in `bulk_ids`.
    pub bulk_choices: Vec<StatusOption>,
    pub bulk_ids: String,
    pub q: String,
}

pub struct RequestRow {
    pub id: i64,
    pub requester_name: String,
    pub requester_email: String,
    pub gadget_name: String,
    pub description: String,
    pub badge: BadgeCell,
    pub chat_enabled: bool,
    pub offer_price: String,
    pub can_create_offer: bool,
    pub can_close_offer: bool,
    pub next_options: Vec<StatusOption>,
}

impl From<RequestView> for RequestRow {
    fn from(view: RequestView) -> Self {
        Self {
            id: view.request.id,
            requester_name: view.request.requester_name,
            requester_email: view.request.requester_email,
            gadget_name: view.request.gadget_name,
            description: view.request.description,
            badge: view.badge.into(),
            chat_enabled: view.request.chat_enabled,
            offer_price: view
                .request
                .offer_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default(),
            can_create_offer: view.can_create_offer,
            can_close_offer: view.can_close_offer,
            next_options: StatusOption::list(&view.next_options, None),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/requests.html")]
pub struct RequestsPageTemplate {
    pub ctx: PageContext,
    pub rows: Vec<RequestRow>,
    pub status_choices: Vec<StatusOption>,
    pub q: String,
}
