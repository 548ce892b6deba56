use crate::import;
use crate::services::authorize;
use crate::services::leads::commit::commit_buffered;
use crate::services::leads::upload::read_upload;
use crate::services::run_blocking;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

/// Combined endpoint: detects when the form has no `mapping`, commits otherwise.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    match import_upload(req, state, payload).await {
        Ok(response) => response,
        Err(e) => e.error_response(),
    }
}

async fn import_upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let identity = authorize(&req, &state)?;
    let upload = read_upload(payload, state.max_upload_bytes).await?;

    if upload.mapping.is_none() {
        let detection =
            run_blocking(move || import::detect(&upload.bytes, &upload.filename)).await?;
        return Ok(HttpResponse::Ok().json(detection));
    }

    let result = commit_buffered(&state, upload, identity).await?;
    Ok(HttpResponse::Ok().json(result))
}
