//! Shared application state handed to every request handler.

use crate::auth::Authenticator;
use crate::store::SqliteLeadStore;
use std::sync::Arc;

/// A cloneable, thread-safe bundle of the collaborators a request may need.
///
/// Built once in `main.rs` and registered as `web::Data`. The store opens its
/// own connection per operation, so cloning the state is cheap and holds no
/// database handle across requests.
#[derive(Clone)]
pub struct AppState {
    /// Where committed leads are written and looked up.
    pub store: SqliteLeadStore,

    /// Gate for every endpoint that writes or reads stored leads.
    pub auth: Arc<dyn Authenticator + Send + Sync>,

    /// Uploads larger than this are refused while streaming, before decoding.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: SqliteLeadStore,
        auth: Arc<dyn Authenticator + Send + Sync>,
        max_upload_bytes: usize,
    ) -> Self {
        AppState {
            store,
            auth,
            max_upload_bytes,
        }
    }
}
