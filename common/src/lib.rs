//! Wire models shared between the lead import service and its callers.

pub mod model;
pub mod requests;
