use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::console::OrderConsole;
use crate::errors::{AppError, render};
use crate::handlers::middleware::CorrelationId;
use crate::models::order::OrderFilter;
use crate::templates_structs::{OrderRow, OrdersPageTemplate, PageContext, StatusOption};
use crate::workflow::{OrderStatus, WireStatus};
use super::{PageQuery, StatusForm, settle};

const ORDERS_PATH: &str = "/admin/orders";

#[derive(Debug, Deserialize)]
pub struct BulkForm {
    pub ids: String,
    pub status: String,
}

/// Parse "3, 4,7" into ids. Blank entries are skipped.
fn parse_ids(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| AppError::Validation(format!("'{part}' is not an order id")))
        })
        .collect()
}

pub async fn page(
    console: web::Data<OrderConsole>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<OrderStatus>()?),
    };
    let filter = OrderFilter {
        status,
        q: query.q.clone(),
    };
    let rows = console
        .list(&filter)
        .await?
        .into_iter()
        .map(OrderRow::from)
        .collect();

    // Bulk menu only offers what the gate allows for the whole selection.
    let bulk_ids = query.ids.as_deref().map(str::trim).unwrap_or("").to_string();
    let mut notice = query.notice;
    let bulk_choices = if bulk_ids.is_empty() {
        Vec::new()
    } else {
        let options = match parse_ids(&bulk_ids) {
            Ok(ids) => console.bulk_options(&ids).await,
            Err(e) => Err(e),
        };
        match options {
            Ok(options) => StatusOption::list(&options, None),
            Err(e @ (AppError::Validation(_) | AppError::NotFound)) => {
                if notice.is_none() {
                    notice = Some(format!("Selection {bulk_ids}: {e}"));
                }
                Vec::new()
            }
            Err(e) => return Err(e),
        }
    };

    render(OrdersPageTemplate {
        ctx: PageContext::new("orders", notice),
        rows,
        status_choices: StatusOption::list(OrderStatus::ALL, status),
        bulk_choices,
        bulk_ids,
        q: query.q.unwrap_or_default(),
    })
}

pub async fn change_status(
    console: web::Data<OrderConsole>,
    path: web::Path<i64>,
    form: web::Form<StatusForm>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let outcome = match form.status.trim().parse::<OrderStatus>() {
        Ok(target) => console.change_status(id, target, correlation.as_str()).await,
        Err(e) => Err(e.into()),
    };
    settle(ORDERS_PATH, outcome, |view| {
        format!("Order {id} is now {}", view.badge.label)
    })
}

pub async fn bulk_status(
    console: web::Data<OrderConsole>,
    form: web::Form<BulkForm>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let outcome = match (parse_ids(&form.ids), form.status.trim().parse::<OrderStatus>()) {
        (Ok(ids), Ok(target)) => {
            console
                .bulk_change_status(&ids, target, correlation.as_str())
                .await
        }
        (Err(e), _) => Err(e),
        (_, Err(e)) => Err(e.into()),
    };
    settle(ORDERS_PATH, outcome, |updated| {
        format!("Updated {} orders", updated.len())
    })
}
