use crate::services::authorize;
use crate::services::run_blocking;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::lead::Lead;
use common::requests::ListLeadsQuery;
use serde_json::json;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1_000;

pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListLeadsQuery>,
) -> impl Responder {
    match list_leads(req, state, query.into_inner()).await {
        Ok(leads) => HttpResponse::Ok().json(json!({ "data": leads })),
        Err(e) => e.error_response(),
    }
}

async fn list_leads(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: ListLeadsQuery,
) -> Result<Vec<Lead>, actix_web::Error> {
    authorize(&req, &state)?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let store = state.store.clone();
    run_blocking(move || store.list(limit)).await
}
