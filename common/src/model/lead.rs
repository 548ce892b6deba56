use serde::{Deserialize, Serialize};

/// A contact record as stored after a successful import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String, // UUID
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Always trimmed and lower-cased; unique across the store.
    pub email: String,
    pub phone: Option<String>,
    pub source: String,
    /// The original file row this lead was built from.
    pub raw_data: serde_json::Value,
    /// RFC 3339 timestamp.
    pub created_at: String,
}
