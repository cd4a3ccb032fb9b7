pub mod orders;
pub mod requests;

use actix_web::web;
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::middleware::require_json_content_type;
use crate::workflow::WireStatus;

/// Query string shared by the list endpoints: `?status=shipped&q=pixel`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    /// Empty `status` means no filter; an unknown literal is a 400.
    pub fn status<S: WireStatus>(&self) -> Result<Option<S>, AppError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Ok(Some(raw.parse::<S>()?)),
        }
    }
}

/// Body of single-entity status changes: `{"status": "shipped"}`.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// Configure the JSON API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(orders::list))
            .route("/bulk-options", web::post().to(orders::bulk_options))
            .route("/bulk-status", web::patch().to(orders::bulk_status))
            .route("/status/{id}", web::patch().to(orders::change_status))
            .route("/{id}", web::get().to(orders::detail))
            .route("/{id}/events", web::get().to(orders::events)),
    );
    cfg.service(
        web::scope("/request")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(requests::list))
            .route("/status/{id}", web::patch().to(requests::change_status))
            .route("/create-offer/{id}", web::post().to(requests::create_offer))
            .route("/close-offer/{id}", web::post().to(requests::close_offer))
            .route("/{id}", web::get().to(requests::detail))
            .route("/{id}", web::patch().to(requests::toggle_chat))
            .route("/{id}/events", web::get().to(requests::events))
            .route("/{id}/notifications", web::get().to(requests::notifications)),
    );
}
