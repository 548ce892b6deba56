use crate::import;
use crate::services::leads::upload::read_upload;
use crate::services::run_blocking;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::import::Detection;

/// HTTP handler for phase one.
///
/// - On success: `200 OK` with the `Detection` as JSON.
/// - On failure: the error's own status (`400` for bad files) and message.
pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match detect_upload(state, payload).await {
        Ok(detection) => HttpResponse::Ok().json(detection),
        Err(e) => e.error_response(),
    }
}

async fn detect_upload(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<Detection, actix_web::Error> {
    let upload = read_upload(payload, state.max_upload_bytes).await?;
    run_blocking(move || import::detect(&upload.bytes, &upload.filename)).await
}
