//! Lead import and listing endpoints.
//!
//! Importing is a two-step conversation with the caller:
//! - `POST /api/leads/import/detect`: upload the file (multipart `file` part).
//!   The response lists the columns, a proposed `mapping` and up to five
//!   sample rows. Nothing is stored and no credentials are needed.
//!
//! - `POST /api/leads/import/commit`: upload the same file again together with
//!   the confirmed `mapping` (JSON text part) and an optional `source` label.
//!   Requires a bearer token. Valid, previously unseen emails are stored; the
//!   response reports how many rows were imported or skipped and why.
//!
//! - `POST /api/leads/import`: single-endpoint variant of the above. Without a
//!   `mapping` part it behaves like `detect`, with one like `commit`. The whole
//!   route requires a bearer token.
//!
//! - `GET /api/leads?limit=N`: most recent stored leads, authenticated.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod commit;
mod detect;
mod import;
mod list;
mod upload;

const API_PATH: &str = "/api/leads";

/// Configures and returns the Actix scope for lead routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/import", post().to(import::process))
        .route("/import/detect", post().to(detect::process))
        .route("/import/commit", post().to(commit::process))
}
