use crate::services::authorize;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use serde_json::json;

/// Echoes the authenticated caller back.
async fn process(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    match authorize(&req, &state) {
        Ok(user) => HttpResponse::Ok().json(json!({
            "message": "Authenticated request successful.",
            "user": user,
        })),
        Err(e) => e.error_response(),
    }
}

/// `GET /api/me`, authenticated.
pub fn configure_routes() -> actix_web::Resource {
    web::resource("/api/me").route(web::get().to(process))
}
