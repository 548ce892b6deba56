use serde::{Deserialize, Serialize};

/// The authenticated caller. Only used to gate access, never in import logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}
