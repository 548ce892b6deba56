use serde::{Deserialize, Serialize};

/// The four target attributes a file column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    FirstName,
    LastName,
    Email,
    Phone,
}

/// Correspondence between canonical fields and column names.
///
/// Produced by detection, or supplied by the caller when committing an import.
/// A field is unmapped when its entry is `None`. Caller-supplied entries that are
/// empty or whitespace-only are treated as unmapped as well, see [`FieldMapping::column`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl FieldMapping {
    /// Column mapped to `field`, ignoring blank entries.
    pub fn column(&self, field: CanonicalField) -> Option<&str> {
        let entry = match field {
            CanonicalField::FirstName => &self.first_name,
            CanonicalField::LastName => &self.last_name,
            CanonicalField::Email => &self.email,
            CanonicalField::Phone => &self.phone,
        };
        entry.as_deref().filter(|column| !column.trim().is_empty())
    }

    pub fn set(&mut self, field: CanonicalField, column: Option<String>) {
        let entry = match field {
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::Email => &mut self.email,
            CanonicalField::Phone => &mut self.phone,
        };
        *entry = column;
    }
}
