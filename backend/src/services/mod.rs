//! HTTP surface of the service.
//!
//! Each sub-module owns one route group and exposes `configure_routes()`,
//! which `main.rs` mounts on the application.

pub mod health;
pub mod leads;
pub mod me;

use crate::error::{AuthError, RequestError};
use crate::state::AppState;
use actix_web::http::header;
use actix_web::{HttpRequest, ResponseError};
use common::model::identity::Identity;
use log::warn;

/// Mounts every route group. Shared by `main.rs` and the integration tests.
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(health::configure_routes())
        .service(me::configure_routes())
        .service(leads::configure_routes());
}

/// Authenticates the caller from the `Authorization` header.
pub(crate) fn authorize(req: &HttpRequest, state: &AppState) -> Result<Identity, AuthError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    state.auth.authenticate(authorization).map_err(|e| {
        warn!("Rejected request to {}: {}", req.path(), e);
        e
    })
}

/// Runs decoding and SQLite work on the blocking pool so the async workers stay free.
pub(crate) async fn run_blocking<F, T, E>(work: F) -> Result<T, actix_web::Error>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: ResponseError + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(e.into()),
        Err(join_err) => Err(RequestError::Worker(join_err.to_string()).into()),
    }
}
