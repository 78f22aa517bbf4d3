//! Canonical shipment schema.
//!
//! Single source of truth for the fields every normalized dataset carries,
//! their display labels and semantic types, whether they are sourced from the
//! upload or derived during normalization, and the aliases automatic column
//! matching accepts for them.

use crate::constants::columns;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fields of the canonical shipment schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    #[serde(rename = "Quantity")]
    Quantity,
    #[serde(rename = "Date")]
    Date,
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "Month")]
    Month,
    #[serde(rename = "Consignee Name")]
    ConsigneeName,
    #[serde(rename = "Exporter Name")]
    ExporterName,
    #[serde(rename = "State")]
    State,
    #[serde(rename = "Importer ID")]
    ImporterId,
    #[serde(rename = "Exporter ID")]
    ExporterId,
}

/// Semantic type of a canonical field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Non-negative decimal quantity
    Number,
    /// Calendar date
    Date,
    /// Calendar year
    Integer,
    /// English month name
    MonthName,
    /// Free text, non-empty after trimming
    Text,
    /// Surrogate identifier
    Identifier,
}

/// Where the values of a canonical field come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    /// Must be mapped from a source column
    Source,
    /// Computed during normalization, never read from the source
    Derived,
}

/// Static description of a canonical field
#[derive(Debug)]
pub struct FieldSpec {
    pub field: CanonicalField,
    pub label: &'static str,
    pub field_type: FieldType,
    pub origin: FieldOrigin,
    /// Column-name keys (see [`column_key`]) that automatic matching accepts
    pub aliases: &'static [&'static str],
}

static FIELD_SPECS: [FieldSpec; 9] = [
    FieldSpec {
        field: CanonicalField::Quantity,
        label: columns::QUANTITY,
        field_type: FieldType::Number,
        origin: FieldOrigin::Source,
        aliases: &["qty", "quantity kgs", "quantity (kgs)", "total quantity"],
    },
    FieldSpec {
        field: CanonicalField::Date,
        label: columns::DATE,
        field_type: FieldType::Date,
        origin: FieldOrigin::Source,
        aliases: &["shipment date", "import date", "arrival date", "be date"],
    },
    FieldSpec {
        field: CanonicalField::Year,
        label: columns::YEAR,
        field_type: FieldType::Integer,
        origin: FieldOrigin::Derived,
        aliases: &[],
    },
    FieldSpec {
        field: CanonicalField::Month,
        label: columns::MONTH,
        field_type: FieldType::MonthName,
        origin: FieldOrigin::Derived,
        aliases: &[],
    },
    FieldSpec {
        field: CanonicalField::ConsigneeName,
        label: columns::CONSIGNEE_NAME,
        field_type: FieldType::Text,
        origin: FieldOrigin::Source,
        aliases: &["consignee", "importer", "importer name", "buyer"],
    },
    FieldSpec {
        field: CanonicalField::ExporterName,
        label: columns::EXPORTER_NAME,
        field_type: FieldType::Text,
        origin: FieldOrigin::Source,
        aliases: &["exporter", "shipper", "shipper name", "supplier", "supplier name"],
    },
    FieldSpec {
        field: CanonicalField::State,
        label: columns::STATE,
        field_type: FieldType::Text,
        origin: FieldOrigin::Source,
        aliases: &["consignee state", "importer state", "state name"],
    },
    FieldSpec {
        field: CanonicalField::ImporterId,
        label: columns::IMPORTER_ID,
        field_type: FieldType::Identifier,
        origin: FieldOrigin::Derived,
        aliases: &[],
    },
    FieldSpec {
        field: CanonicalField::ExporterId,
        label: columns::EXPORTER_ID,
        field_type: FieldType::Identifier,
        origin: FieldOrigin::Derived,
        aliases: &[],
    },
];

impl CanonicalField {
    /// Every canonical field in dataset column order
    pub const ALL: [CanonicalField; 9] = [
        CanonicalField::Quantity,
        CanonicalField::Date,
        CanonicalField::Year,
        CanonicalField::Month,
        CanonicalField::ConsigneeName,
        CanonicalField::ExporterName,
        CanonicalField::State,
        CanonicalField::ImporterId,
        CanonicalField::ExporterId,
    ];

    /// Static description of this field
    pub fn spec(self) -> &'static FieldSpec {
        // FIELD_SPECS is declared in the same order as ALL
        &FIELD_SPECS[self as usize]
    }

    /// Display label, which is also the column name in the canonical dataset
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn origin(self) -> FieldOrigin {
        self.spec().origin
    }

    pub fn field_type(self) -> FieldType {
        self.spec().field_type
    }

    /// Whether the field must be mapped from a source column
    pub fn is_sourced(self) -> bool {
        self.origin() == FieldOrigin::Source
    }

    /// Look up a field by its exact label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.label() == label)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CanonicalField {
    type Err = crate::Error;

    /// Parse a field from its label, ignoring case and separators
    fn from_str(s: &str) -> crate::Result<Self> {
        let key = column_key(s);
        Self::ALL
            .into_iter()
            .find(|field| column_key(field.label()) == key)
            .ok_or_else(|| {
                crate::Error::configuration(format!(
                    "Unknown canonical field '{}'. Expected one of: {}",
                    s,
                    Self::ALL.map(|field| field.label()).join(", ")
                ))
            })
    }
}

/// Every canonical field, in dataset column order
pub fn required_fields() -> &'static [CanonicalField] {
    &CanonicalField::ALL
}

/// Fields that must be mapped from the source before normalization
pub fn required_source_fields() -> impl Iterator<Item = CanonicalField> {
    CanonicalField::ALL
        .into_iter()
        .filter(|field| field.is_sourced())
}

/// Whether a column name equals the label of any canonical field
pub fn is_canonical_name(name: &str) -> bool {
    CanonicalField::from_label(name.trim()).is_some()
}

/// Comparison key for column names: trimmed, lowercased, with `_`, `-` and `.`
/// treated as spaces and runs of whitespace collapsed
pub fn column_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(['_', '-', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
