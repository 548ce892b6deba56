//! The persistent lead store.
//!
//! The import pipeline only needs two operations from a store: a batched
//! lookup of emails already present and a batched insert. [`LeadStore`] is that
//! seam; [`SqliteLeadStore`] is the implementation the service runs with.

mod sqlite;

pub use sqlite::SqliteLeadStore;

use crate::error::StoreError;
use common::model::row::Row;
use std::collections::BTreeSet;

/// A record about to be written. `email` is normalized and valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub source: String,
    pub raw_data: Row,
}

pub trait LeadStore {
    /// Returns the lower-cased emails from `emails` that are already stored.
    fn find_by_emails(&self, emails: &BTreeSet<String>) -> Result<Vec<String>, StoreError>;

    /// Writes every lead or none of them.
    ///
    /// Fails with [`StoreError::ConstraintViolation`] if any email is already taken.
    fn insert_many(&self, leads: &[NewLead]) -> Result<usize, StoreError>;
}
