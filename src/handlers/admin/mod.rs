//! Server-rendered admin console. Forms post back and redirect with a
//! `?notice=` message so refusals show up on the page instead of as errors.

pub mod orders;
pub mod requests;

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::errors::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub notice: Option<String>,
    /// Bulk selection on the orders page, e.g. `3,4,7`.
    pub ids: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("", web::get().to(index))
            .route("/orders", web::get().to(orders::page))
            .route("/orders/bulk-status", web::post().to(orders::bulk_status))
            .route("/orders/{id}/status", web::post().to(orders::change_status))
            .route("/requests", web::get().to(requests::page))
            .route("/requests/{id}/status", web::post().to(requests::change_status))
            .route("/requests/{id}/offer", web::post().to(requests::create_offer))
            .route("/requests/{id}/close-offer", web::post().to(requests::close_offer))
            .route("/requests/{id}/chat", web::post().to(requests::toggle_chat)),
    );
}

async fn index() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", "/admin/orders"))
        .finish()
}

/// 303 back to `path`, carrying `notice` in the query string.
pub(crate) fn redirect_with_notice(path: &str, notice: &str) -> Result<HttpResponse, AppError> {
    let query = serde_urlencoded::to_string([("notice", notice)])
        .map_err(|e| AppError::Validation(format!("Could not encode notice: {e}")))?;
    let location = format!("{path}?{query}");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", location.as_str()))
        .finish())
}

/// Turn the outcome of a console action into a redirect. Refusals the
/// operator can act on become notices; storage failures propagate.
pub(crate) fn settle<T>(
    path: &str,
    outcome: Result<T, AppError>,
    success: impl FnOnce(T) -> String,
) -> Result<HttpResponse, AppError> {
    match outcome {
        Ok(value) => redirect_with_notice(path, &success(value)),
        Err(
            e @ (AppError::Workflow(_)
            | AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::InFlight(_)
            | AppError::NotFound),
        ) => redirect_with_notice(path, &e.to_string()),
        Err(e) => Err(e),
    }
}
