//! Wire models for the records the admin screens work with.
//!
//! Field names follow the backend's JSON (camelCase, Mongo-style `_id`
//! accepted as an alias for `id`). Enumerated fields keep unknown wire values
//! verbatim instead of failing the whole batch.

pub mod catalog;
pub mod orders;
pub mod patients;
pub mod reports;
pub mod testimonials;

pub use catalog::{Category, CategoryForm, LabTest, LabTestForm, LabTestInput};
pub use orders::{Order, OrderItem, OrderPatient, OrderSortKey, OrderStatus};
pub use patients::{Patient, PatientSortKey};
pub use reports::{Report, ReportSortKey, ReportStatus};
pub use testimonials::Testimonial;

use crate::constants::PRIORITY_RANKS;
use serde::{Deserialize, Deserializer};

/// Declares a string-backed enum whose unknown values land in `Other`.
///
/// Parsing is case-insensitive and ignores surrounding whitespace; `as_str`
/// returns the canonical lowercase spelling for known variants.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A value the backend sent that this build does not know.
            Other(String),
        }

        impl $name {
            /// Canonical wire spelling.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            /// Parse a wire value. Never fails.
            pub fn from_wire(raw: &str) -> Self {
                let trimmed = raw.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($wire) {
                        return $name::$variant;
                    }
                )+
                $name::Other(trimmed.to_string())
            }

            /// Whether this is one of the known variants.
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name::from_wire(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from_wire(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Urgency attached to orders and reports.
    pub enum Priority {
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

impl Priority {
    /// Rank used by the "priority" sort key. Unranked values return `None`.
    pub fn rank(&self) -> Option<u8> {
        let wire = self.as_str();
        PRIORITY_RANKS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wire))
            .map(|(_, rank)| *rank)
    }
}

/// Treat `Some("")` and whitespace-only strings as absent.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A reference field the backend sends either as a bare id or as the
/// populated document.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reference {
    Id(String),
    Populated {
        #[serde(default, alias = "_id")]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl Reference {
    /// Name of a populated document, falling back to its id.
    fn label(self) -> Option<String> {
        let label = match self {
            Reference::Id(id) => Some(id),
            Reference::Populated { id, name } => {
                name.filter(|n| !n.trim().is_empty()).or(id)
            }
        };
        label.filter(|l| !l.trim().is_empty())
    }
}

/// `deserialize_with` helper reducing an id-or-document reference to a label.
pub(crate) fn reference_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Reference>::deserialize(deserializer)?.and_then(Reference::label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_table() {
        assert_eq!(Priority::Urgent.rank(), Some(3));
        assert_eq!(Priority::High.rank(), Some(2));
        assert_eq!(Priority::Normal.rank(), Some(1));
        assert_eq!(Priority::from_wire("routine").rank(), None);
    }

    #[test]
    fn test_wire_enum_parsing_is_case_insensitive() {
        assert_eq!(Priority::from_wire(" URGENT "), Priority::Urgent);
        assert_eq!(
            Priority::from_wire("stat"),
            Priority::Other("stat".to_string())
        );
        assert!(!Priority::from_wire("stat").is_known());
    }

    #[test]
    fn test_wire_enum_serde_roundtrip_keeps_unknowns() {
        let parsed: Vec<Priority> = serde_json::from_str(r#"["High","stat"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Priority::High, Priority::Other("stat".to_string())]
        );
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            r#"["high","stat"]"#
        );
    }

    #[test]
    fn test_present_ignores_blank_strings() {
        assert_eq!(present(&Some("  x ".into())), Some("x"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }
}
