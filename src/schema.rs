//! Field mapping for registry records
//!
//! The registry file is keyed by Arabic column headers. Each [`Field`] names
//! one of the columns this tool understands, the label it is displayed under,
//! and whether a blank value makes the record incomplete.

use serde::{Deserialize, Serialize};

/// Canonical name of the identity column after load
pub const IDENTITY_COLUMN: &str = "رقم الهوية";

/// Header spellings recognised as the identity column (exact match)
pub const IDENTITY_ALIASES: &[&str] = &[
    "رقم الهوية",
    "رقم هوية",
    "الهوية",
    "هوية",
    "ID",
    "id",
    "National ID",
];

/// Substring that marks a header as the identity column
pub const IDENTITY_TERM: &str = "هوية";

/// A column the lookup understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Identity,
    FullName,
    Phone,
    Branch,
    MaritalStatus,
    FamilySize,
    SpouseIdentity,
}

/// All fields in display order
pub const FIELDS: [Field; 7] = [
    Field::Identity,
    Field::FullName,
    Field::Phone,
    Field::Branch,
    Field::MaritalStatus,
    Field::FamilySize,
    Field::SpouseIdentity,
];

/// Fields whose absence or blankness is reported as missing data
pub const REQUIRED_FIELDS: [Field; 5] = [
    Field::FullName,
    Field::Phone,
    Field::Branch,
    Field::MaritalStatus,
    Field::FamilySize,
];

impl Field {
    /// Column header this field is read from
    pub fn column(&self) -> &'static str {
        match self {
            Field::Identity => IDENTITY_COLUMN,
            Field::FullName => "الاسم",
            Field::Phone => "رقم الهاتف",
            Field::Branch => "الفرع",
            Field::MaritalStatus => "الحالة الاجتماعية",
            Field::FamilySize => "عدد افراد الاسرة",
            Field::SpouseIdentity => "هوية الزوجة 1",
        }
    }

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Field::Identity => "رقم الهوية",
            Field::FullName => "الاسم الرباعي",
            Field::Phone => "رقم الجوال",
            Field::Branch => "الفرع",
            Field::MaritalStatus => "الحالة الاجتماعية",
            Field::FamilySize => "عدد الأفراد",
            Field::SpouseIdentity => "هوية الزوج/ة",
        }
    }

    pub fn is_required(&self) -> bool {
        REQUIRED_FIELDS.contains(self)
    }
}
