//! Two-phase import workflow.
//!
//! Phase one ([`detect`]) decodes the file and proposes a mapping without
//! touching the store. Phase two ([`commit`]) decodes the same bytes again,
//! applies the caller's mapping, filters rows through the validation engine
//! and bulk-inserts the survivors. Nothing is kept between the two calls.

use crate::error::{ImportFailure, StoreError};
use crate::import::decoder::{self, ParsedTable};
use crate::import::detector;
use crate::import::engine::{self, AcceptedRecord, CandidateRecord};
use crate::store::{LeadStore, NewLead};
use common::model::identity::Identity;
use common::model::import::{Detection, ImportResult};
use common::model::mapping::{CanonicalField, FieldMapping};
use log::{info, warn};
use std::collections::{BTreeSet, HashSet};

/// Number of rows echoed back by [`detect`].
pub const SAMPLE_ROWS: usize = 5;

/// Source label stored on leads when the caller gives none.
pub const DEFAULT_SOURCE: &str = "import";

fn decode_with_headers(bytes: &[u8], filename: &str) -> Result<ParsedTable, ImportFailure> {
    let table = decoder::decode(bytes, filename)?;
    if table.columns.is_empty() {
        return Err(ImportFailure::NoHeaders);
    }
    Ok(table)
}

/// Phase one: decode `bytes` and guess which column holds which field.
pub fn detect(bytes: &[u8], filename: &str) -> Result<Detection, ImportFailure> {
    let ParsedTable { columns, rows } = decode_with_headers(bytes, filename)?;
    let mapping = detector::detect(&columns);

    info!(
        "Detected {} columns and {} rows in '{}'",
        columns.len(),
        rows.len(),
        filename
    );

    Ok(Detection {
        columns,
        mapping,
        sample_rows: rows.into_iter().take(SAMPLE_ROWS).collect(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<AcceptedRecord> for NewLead {
    fn from(record: AcceptedRecord) -> Self {
        NewLead {
            first_name: non_empty(record.first_name),
            last_name: non_empty(record.last_name),
            email: record.email,
            phone: non_empty(record.phone),
            source: record.source,
            raw_data: record.raw,
        }
    }
}

/// Phase two: apply `mapping` to every row, skip rejected rows and persist the rest.
///
/// Aborts before touching any row or the store when the file cannot be decoded,
/// has no headers, or `mapping` has no email column. A store failure during the
/// insert aborts the call as well; per-row rejections do not.
pub fn commit<S: LeadStore>(
    store: &S,
    bytes: &[u8],
    filename: &str,
    mapping: &FieldMapping,
    source: Option<&str>,
    identity: &Identity,
) -> Result<ImportResult, ImportFailure> {
    let table = decode_with_headers(bytes, filename)?;
    if mapping.column(CanonicalField::Email).is_none() {
        return Err(ImportFailure::MissingEmailMapping);
    }

    let source = source
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SOURCE);
    let total = table.rows.len();

    let candidates: Vec<CandidateRecord> = table
        .rows
        .iter()
        .map(|row| CandidateRecord::from_row(row, mapping, source))
        .collect();

    let batch_emails: BTreeSet<String> = candidates
        .iter()
        .filter_map(|candidate| candidate.email.clone())
        .collect();
    let existing: HashSet<String> = store
        .find_by_emails(&batch_emails)?
        .into_iter()
        .map(|email| email.to_lowercase())
        .collect();

    let evaluation = engine::evaluate(candidates, &existing);
    let imported = evaluation.accepted.len();

    if !evaluation.accepted.is_empty() {
        let leads: Vec<NewLead> = evaluation.accepted.into_iter().map(NewLead::from).collect();
        if let Err(e) = store.insert_many(&leads) {
            if let StoreError::ConstraintViolation(email) = &e {
                warn!(
                    "Import of '{}' by user {} lost a race on {}; nothing stored",
                    filename, identity.id, email
                );
            }
            return Err(e.into());
        }
    }

    info!(
        "User {} imported {} of {} rows from '{}' (source '{}')",
        identity.id, imported, total, filename, source
    );

    Ok(ImportResult {
        imported_count: imported,
        skipped_count: total - imported,
        errors: evaluation.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::import::ImportError;
    use std::cell::{Cell, RefCell};

    /// In-memory store that records how it was used.
    #[derive(Default)]
    struct RecordingStore {
        existing: Vec<String>,
        lookups: Cell<usize>,
        inserted: RefCell<Vec<NewLead>>,
        insert_calls: Cell<usize>,
        fail_insert: bool,
    }

    impl LeadStore for RecordingStore {
        fn find_by_emails(&self, emails: &BTreeSet<String>) -> Result<Vec<String>, StoreError> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self
                .existing
                .iter()
                .filter(|e| emails.contains(&e.to_lowercase()))
                .cloned()
                .collect())
        }

        fn insert_many(&self, leads: &[NewLead]) -> Result<usize, StoreError> {
            self.insert_calls.set(self.insert_calls.get() + 1);
            if self.fail_insert {
                return Err(StoreError::ConstraintViolation(leads[0].email.clone()));
            }
            self.inserted.borrow_mut().extend_from_slice(leads);
            Ok(leads.len())
        }
    }

    fn identity() -> Identity {
        Identity {
            id: "user-1".to_string(),
            email: "owner@example.com".to_string(),
        }
    }

    fn mapping(email: Option<&str>) -> FieldMapping {
        FieldMapping {
            first_name: Some("Name".to_string()),
            last_name: None,
            email: email.map(str::to_string),
            phone: Some("Phone".to_string()),
        }
    }

    const FILE: &[u8] = b"Name,Email,Phone\nJo,jo@a.com,555\nEd,jo@a.com,556\nAl,bad-email,557\n";

    #[test]
    fn detect_returns_columns_mapping_and_samples() {
        let data = b"First Name,E-mail\nA,a@x.com\nB,b@x.com\nC,c@x.com\nD,d@x.com\nE,e@x.com\nF,f@x.com\n";
        let detection = detect(data, "people.csv").unwrap();

        assert_eq!(detection.columns, vec!["First Name", "E-mail"]);
        assert_eq!(detection.mapping.email.as_deref(), Some("E-mail"));
        assert_eq!(detection.mapping.first_name.as_deref(), Some("First Name"));
        assert_eq!(detection.sample_rows.len(), SAMPLE_ROWS);
        assert_eq!(detection.sample_rows[0].get("First Name"), Some("A"));

        assert_eq!(detect(data, "people.csv").unwrap(), detection);
    }

    #[test]
    fn detect_without_rows_is_no_headers() {
        let err = detect(b"Name,Email\n", "people.csv").unwrap_err();
        assert!(matches!(err, ImportFailure::NoHeaders));
    }

    #[test]
    fn commit_reports_partial_success() {
        let store = RecordingStore::default();
        let result = commit(&store, FILE, "leads.csv", &mapping(Some("Email")), None, &identity())
            .unwrap();

        assert_eq!(
            result,
            ImportResult {
                imported_count: 1,
                skipped_count: 2,
                errors: vec![
                    ImportError {
                        row: 2,
                        message: "Duplicate email in file.".to_string()
                    },
                    ImportError {
                        row: 3,
                        message: "Invalid email.".to_string()
                    },
                ],
            }
        );

        let inserted = store.inserted.borrow();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].email, "jo@a.com");
        assert_eq!(inserted[0].first_name.as_deref(), Some("Jo"));
        assert_eq!(inserted[0].phone.as_deref(), Some("555"));
        assert_eq!(inserted[0].source, DEFAULT_SOURCE);
        assert_eq!(inserted[0].raw_data.get("Name"), Some("Jo"));
    }

    #[test]
    fn missing_email_mapping_never_reaches_the_store() {
        let store = RecordingStore::default();
        for email in [None, Some(""), Some("  ")] {
            let err = commit(&store, FILE, "leads.csv", &mapping(email), None, &identity())
                .unwrap_err();
            assert!(matches!(err, ImportFailure::MissingEmailMapping));
        }
        assert_eq!(store.lookups.get(), 0);
        assert_eq!(store.insert_calls.get(), 0);
    }

    #[test]
    fn existing_emails_are_skipped_case_insensitively() {
        let store = RecordingStore {
            existing: vec!["JO@A.COM".to_string()],
            ..Default::default()
        };
        let result = commit(&store, FILE, "leads.csv", &mapping(Some("Email")), Some("fair"), &identity())
            .unwrap();

        assert_eq!(result.imported_count, 0);
        assert_eq!(result.skipped_count, 3);
        assert_eq!(result.errors[0].message, "Email already exists.");
        assert_eq!(result.errors[1].message, "Email already exists.");
        assert_eq!(store.insert_calls.get(), 0);
    }

    #[test]
    fn empty_optional_cells_become_absent() {
        let store = RecordingStore::default();
        let data = b"Name,Email,Phone\n,a@x.com,\n";
        commit(&store, data, "leads.csv", &mapping(Some("Email")), Some("expo"), &identity()).unwrap();

        let inserted = store.inserted.borrow();
        assert_eq!(inserted[0].first_name, None);
        assert_eq!(inserted[0].phone, None);
        assert_eq!(inserted[0].source, "expo");
    }

    #[test]
    fn blank_source_falls_back_to_default() {
        let store = RecordingStore::default();
        let data = b"Email\na@x.com\n";
        commit(&store, data, "leads.csv", &mapping(Some("Email")), Some("   "), &identity()).unwrap();
        commit(&store, b"Email\nb@x.com\n", "leads.csv", &mapping(Some("Email")), Some(" web "), &identity()).unwrap();

        let inserted = store.inserted.borrow();
        assert_eq!(inserted[0].source, DEFAULT_SOURCE);
        assert_eq!(inserted[1].source, "web");
    }

    #[test]
    fn store_conflict_fails_the_whole_commit() {
        let store = RecordingStore {
            fail_insert: true,
            ..Default::default()
        };
        let err = commit(&store, FILE, "leads.csv", &mapping(Some("Email")), None, &identity())
            .unwrap_err();
        assert!(matches!(
            err,
            ImportFailure::Store(StoreError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn counts_always_cover_every_row() {
        let store = RecordingStore {
            existing: vec!["c@x.com".to_string()],
            ..Default::default()
        };
        let data = b"Email\na@x.com\n\nb@x\nc@x.com\nA@x.com\n,\nd@x.com\n";
        let result = commit(&store, data, "leads.csv", &mapping(Some("Email")), None, &identity())
            .unwrap();

        let total = 6;
        assert_eq!(result.imported_count + result.skipped_count, total);
        assert_eq!(result.imported_count, 2);
        assert!(result.errors.iter().all(|e| e.row >= 1 && e.row <= total));
    }
}
