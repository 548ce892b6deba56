use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

async fn process() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// `GET /health`, unauthenticated.
pub fn configure_routes() -> actix_web::Resource {
    web::resource("/health").route(web::get().to(process))
}
