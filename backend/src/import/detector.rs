//! Heuristic column-to-field detection.

use common::model::mapping::{CanonicalField, FieldMapping};

/// Candidate substrings per canonical field, matched against normalized header names.
const FIELD_CANDIDATES: [(CanonicalField, &[&str]); 4] = [
    (
        CanonicalField::FirstName,
        &["firstname", "fname", "givenname", "first"],
    ),
    (
        CanonicalField::LastName,
        &["lastname", "lname", "surname", "last"],
    ),
    (CanonicalField::Email, &["email", "emailaddress"]),
    (
        CanonicalField::Phone,
        &["phone", "phonenumber", "mobile", "cell"],
    ),
];

/// Lower-cases a header and strips everything that is not `[a-z0-9]`.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Proposes a mapping for `columns`.
///
/// Each field is resolved on its own: the first column, in file order, whose
/// normalized name contains one of the field's candidates wins. Two fields may
/// end up on the same column.
pub fn detect(columns: &[String]) -> FieldMapping {
    let normalized: Vec<(&str, String)> = columns
        .iter()
        .map(|column| (column.as_str(), normalize_header(column)))
        .collect();

    let mut mapping = FieldMapping::default();
    for (field, candidates) in FIELD_CANDIDATES {
        let found = normalized
            .iter()
            .find(|(_, norm)| candidates.iter().any(|candidate| norm.contains(candidate)))
            .map(|(raw, _)| raw.to_string());
        mapping.set(field, found);
    }
    mapping
}
