pub mod admin;
pub mod api;
pub mod middleware;

use actix_web::{HttpResponse, error, web};

/// Register every route plus the JSON extractor config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "error": format!("Invalid JSON body: {err}") });
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    }));
    cfg.route("/health", web::get().to(health));
    cfg.route(
        "/",
        web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/admin/orders"))
                .finish()
        }),
    );
    api::configure(cfg);
    admin::configure(cfg);
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// JSON 404 for anything no route matched.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}
