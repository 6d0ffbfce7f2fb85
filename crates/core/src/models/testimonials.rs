//! Patient testimonials shown on the public site after moderation.

use crate::forms::validate_rating;
use crate::time::parse_instant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default, alias = "isApproved")]
    pub approved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Testimonial {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_instant)
    }

    /// Rating as stars, blank when missing or out of range.
    pub fn stars(&self) -> String {
        self.rating
            .and_then(|r| validate_rating(r).ok())
            .map(|r| "*".repeat(usize::from(r)))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testimonial_accepts_is_approved_alias() {
        let t: Testimonial = serde_json::from_str(
            r#"{"_id": "x1", "name": "Kiran", "rating": 4, "isApproved": true}"#,
        )
        .unwrap();
        assert!(t.approved);
        assert_eq!(t.stars(), "****");
    }

    #[test]
    fn test_out_of_range_rating_has_no_stars() {
        let t: Testimonial = serde_json::from_str(r#"{"id": "x2", "rating": 9}"#).unwrap();
        assert!(!t.approved);
        assert_eq!(t.stars(), "");
    }
}
