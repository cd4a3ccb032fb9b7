use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::console::RequestConsole;
use crate::errors::AppError;
use crate::handlers::middleware::CorrelationId;
use crate::models::request::RequestFilter;
use crate::workflow::RequestStatus;
use super::{ListQuery, StatusBody};

/// Offer price as a JSON number or a numeric string (`"149.90"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct OfferBody {
    pub price: Option<PriceInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    pub chat_enabled: Option<bool>,
}

/// GET /request?status=&q=
pub async fn list(
    console: web::Data<RequestConsole>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = RequestFilter {
        status: query.status::<RequestStatus>()?,
        q: query.q.clone(),
    };
    let requests = console.list(&filter).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// GET /request/{id}
pub async fn detail(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let view = console.detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /request/{id}/events
pub async fn events(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let events = console.events(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// GET /request/{id}/notifications
pub async fn notifications(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let items = console.notifications(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// PATCH /request/status/{id}
pub async fn change_status(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    body: web::Json<StatusBody>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let target: RequestStatus = body.status.trim().parse()?;
    let view = console
        .change_status(path.into_inner(), target, correlation.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /request/create-offer/{id}
pub async fn create_offer(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    body: web::Json<OfferBody>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let rules = console.price_rules();
    let price = match &body.price {
        Some(PriceInput::Number(n)) => rules.validate(*n)?,
        Some(PriceInput::Text(raw)) => rules.parse(raw)?,
        None => return Err(AppError::Validation("price is required".into())),
    };
    let view = console
        .create_offer(path.into_inner(), price, correlation.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /request/close-offer/{id}
pub async fn close_offer(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let view = console
        .close_offer(path.into_inner(), correlation.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// PATCH /request/{id}
/// No body flips the chat flag; `{"chatEnabled": bool}` sets it.
pub async fn toggle_chat(
    console: web::Data<RequestConsole>,
    path: web::Path<i64>,
    body: web::Bytes,
    correlation: CorrelationId,
) -> Result<HttpResponse, AppError> {
    let chat = if body.iter().all(u8::is_ascii_whitespace) {
        ChatBody::default()
    } else {
        serde_json::from_slice::<ChatBody>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?
    };
    let chat_enabled = console
        .toggle_chat(path.into_inner(), chat.chat_enabled, correlation.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "chatEnabled": chat_enabled })))
}
