use crate::import;
use crate::services::authorize;
use crate::services::leads::upload::{read_upload, Upload};
use crate::services::run_blocking;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::identity::Identity;
use common::model::import::ImportResult;

/// HTTP handler for phase two.
///
/// - On success: `200 OK` with the `ImportResult`, even when some rows were skipped.
/// - `401` without a valid bearer token, checked before the body is read.
/// - `400` for unreadable files or a mapping without an email column.
/// - `409` when the store rejects the batch; nothing is imported in that case.
pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    match commit_upload(req, state, payload).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => e.error_response(),
    }
}

async fn commit_upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<ImportResult, actix_web::Error> {
    let identity = authorize(&req, &state)?;
    let upload = read_upload(payload, state.max_upload_bytes).await?;
    commit_buffered(&state, upload, identity).await
}

/// Commits an already buffered upload on the blocking pool.
pub(crate) async fn commit_buffered(
    state: &AppState,
    upload: Upload,
    identity: Identity,
) -> Result<ImportResult, actix_web::Error> {
    let store = state.store.clone();
    run_blocking(move || {
        let mapping = upload.mapping.unwrap_or_default();
        import::commit(
            &store,
            &upload.bytes,
            &upload.filename,
            &mapping,
            upload.source.as_deref(),
            &identity,
        )
    })
    .await
}
