use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::console::OrderConsole;
use crate::errors::AppError;
use crate::handlers::middleware::CorrelationId;
use crate::models::order::OrderFilter;
use crate::workflow::OrderStatus;
use super::{ListQuery, StatusBody};

#[derive(Debug, Deserialize)]
pub struct BulkSelection {
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusBody {
    pub ids: Vec<i64>,
    pub status: String,
}

/// GET /api/orders?status=&q=
pub async fn list(
    console: web::Data<OrderConsole>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = OrderFilter {
        status: query.status::<OrderStatus>()?,
        q: query.q.clone(),
    };
    let orders = console.list(&filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id}
pub async fn detail(
    console: web::Data<OrderConsole>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let view = console.detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/orders/{id}/events
pub async fn events(
    console: web::Data<OrderConsole>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let events = console.events(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// PATCH /api/orders/status/{id}
pub async fn change_status(
    console: web::Data<OrderConsole>,
    path: web::Path<i64>,
    body: web::Json<StatusBody>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let target: OrderStatus = body.status.trim().parse()?;
    let view = console
        .change_status(path.into_inner(), target, correlation.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/orders/bulk-options
/// Answers a bare array. An empty or mixed-status selection gets `[]`.
pub async fn bulk_options(
    console: web::Data<OrderConsole>,
    body: web::Json<BulkSelection>,
) -> Result<HttpResponse, AppError> {
    let options = console.bulk_options(&body.ids).await?;
    Ok(HttpResponse::Ok().json(options))
}

/// PATCH /api/orders/bulk-status
pub async fn bulk_status(
    console: web::Data<OrderConsole>,
    body: web::Json<BulkStatusBody>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let target: OrderStatus = body.status.trim().parse()?;
    let updated = console
        .bulk_change_status(&body.ids, target, correlation.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}
