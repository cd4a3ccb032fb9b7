use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::console::RequestConsole;
use crate::errors::{AppError, render};
use crate::handlers::middleware::CorrelationId;
use crate::models::request::RequestFilter;
use crate::templates_structs::{PageContext, RequestRow, RequestsPageTemplate, StatusOption};
use crate::workflow::{RequestStatus, WireStatus};
use super::{PageQuery, StatusForm, settle};

const REQUESTS_PATH: &str = "/admin/requests";

#[derive(Debug, Deserialize)]
pub struct OfferForm {
    pub price: String,
}

pub async fn page(
    console: web::Data<RequestConsole>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<RequestStatus>()?),
    };
    let filter = RequestFilter {
        status,
        q: query.q.clone(),
    };
    let rows = console
        .list(&filter)
        .await?
        .into_iter()
        .map(RequestRow::from)
        .collect();

    render(RequestsPageTemplate {
        ctx: PageContext::new("requests", query.notice),
        rows,
        status_choices: StatusOption::list(RequestStatus::ALL, status),
        q: query.q.unwrap_or_default(),
    })
}

pub async fn change_status(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let outcome = match form.status.trim().parse::<RequestStatus>() {
        Ok(target) => console.change_status(id, target, correlation.as_str()).await,
        Err(e) => Err(e.into()),
    };
    settle(REQUESTS_PATH, outcome, |view| {
        format!("Request {id} is now {}", view.badge.label)
    })
}

pub async fn create_offer(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    form: web::Form<OfferForm>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let outcome = match console.price_rules().parse(&form.price) {
        Ok(price) => console.create_offer(id, price, correlation.as_str()).await,
        Err(e) => Err(e.into()),
    };
    settle(REQUESTS_PATH, outcome, |view| match view.request.offer_price {
        Some(price) => format!("Offer of {price:.2} sent for request {id}"),
        None => format!("Offer sent for request {id}"),
    })
}

pub async fn close_offer(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let outcome = console.close_offer(id, correlation.as_str()).await;
    settle(REQUESTS_PATH, outcome, |_| format!("Offer closed for request {id}"))
}

pub async fn toggle_chat(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let outcome = console.toggle_chat(id, None, correlation.as_str()).await;
    settle(REQUESTS_PATH, outcome, |enabled| {
        if enabled {
            format!("Chat enabled for request {id}")
        } else {
            format!("Chat disabled for request {id}")
        }
    })
}
