//! Per-row acceptance policy for committed imports.
//!
//! Rows are judged strictly in file order. A row is rejected for the first of
//! these reasons that applies:
//!
//! 1. no email after normalization,
//! 2. the email is not `local@domain.tld` shaped,
//! 3. an earlier row of the same file was already accepted with that email,
//! 4. the store already holds that email.
//!
//! An accepted email is remembered immediately, so "duplicate in file" is an
//! ordered relation: the first occurrence may pass, later ones never do.

use common::model::import::ImportError;
use common::model::mapping::{CanonicalField, FieldMapping};
use common::model::row::Row;
use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// One input row projected through a [`FieldMapping`], ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Trimmed and lower-cased; `None` when the cell is absent or blank.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub raw: Row,
}

impl CandidateRecord {
    pub fn from_row(row: &Row, mapping: &FieldMapping, source: &str) -> Self {
        let cell = |field: CanonicalField| {
            mapping
                .column(field)
                .and_then(|column| row.get(column))
                .map(str::to_string)
        };

        CandidateRecord {
            first_name: cell(CanonicalField::FirstName),
            last_name: cell(CanonicalField::LastName),
            email: cell(CanonicalField::Email).and_then(|email| normalize_email(&email)),
            phone: cell(CanonicalField::Phone),
            source: source.to_string(),
            raw: row.clone(),
        }
    }
}

/// Trims and lower-cases an email; blank input yields `None`.
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

/// Syntax check applied to already-normalized emails.
pub fn is_valid_email(email: &str) -> bool {
    email.is_ascii() && EMAIL_RE.is_match(email)
}

/// Why a row was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    MissingEmail,
    InvalidEmail,
    DuplicateInFile,
    AlreadyExists,
}

impl RowRejection {
    pub fn message(&self) -> &'static str {
        match self {
            RowRejection::MissingEmail => "Missing email.",
            RowRejection::InvalidEmail => "Invalid email.",
            RowRejection::DuplicateInFile => "Duplicate email in file.",
            RowRejection::AlreadyExists => "Email already exists.",
        }
    }
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A candidate that passed every check. Its email is guaranteed present and valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub source: String,
    pub raw: Row,
}

#[derive(Debug, Default)]
pub struct Evaluation {
    pub accepted: Vec<AcceptedRecord>,
    pub errors: Vec<ImportError>,
}

fn check(
    candidate: &CandidateRecord,
    seen: &HashSet<String>,
    existing: &HashSet<String>,
) -> Result<String, RowRejection> {
    let email = candidate
        .email
        .as_deref()
        .ok_or(RowRejection::MissingEmail)?;
    if !is_valid_email(email) {
        return Err(RowRejection::InvalidEmail);
    }
    if seen.contains(email) {
        return Err(RowRejection::DuplicateInFile);
    }
    if existing.contains(email) {
        return Err(RowRejection::AlreadyExists);
    }
    Ok(email.to_string())
}

/// Splits `candidates` into accepted records and per-row errors.
///
/// `existing_emails` must hold lower-cased addresses already present in the
/// store. Error rows are the 1-based positions of the candidates in the input.
pub fn evaluate(
    candidates: Vec<CandidateRecord>,
    existing_emails: &HashSet<String>,
) -> Evaluation {
    let mut seen = HashSet::new();
    let mut evaluation = Evaluation::default();

    for (idx, candidate) in candidates.into_iter().enumerate() {
        let row = idx + 1;
        match check(&candidate, &seen, existing_emails) {
            Ok(email) => {
                seen.insert(email.clone());
                evaluation.accepted.push(AcceptedRecord {
                    first_name: candidate.first_name,
                    last_name: candidate.last_name,
                    email,
                    phone: candidate.phone,
                    source: candidate.source,
                    raw: candidate.raw,
                });
            }
            Err(rejection) => {
                debug!("row {} skipped: {}", row, rejection);
                evaluation.errors.push(ImportError {
                    row,
                    message: rejection.message().to_string(),
                });
            }
        }
    }

    evaluation
}
