//! Lab reports awaiting or carrying an uploaded result document.

use super::{present, wire_enum, Priority};
use crate::time::parse_instant;
use crate::view::{parse_sort_key, Record, SortValue};
use crate::DashboardResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

wire_enum! {
    pub enum ReportStatus {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub lab_name: Option<String>,
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub report_url: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl Report {
    /// Completion time when known, otherwise creation time.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.completed_at
            .as_deref()
            .and_then(parse_instant)
            .or_else(|| self.created_at.as_deref().and_then(parse_instant))
    }

    pub fn has_upload(&self) -> bool {
        present(&self.report_url).is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportSortKey {
    #[default]
    Date,
    PatientName,
    TestType,
    Priority,
    Status,
}

const REPORT_SORT_KEYS: [(&str, ReportSortKey); 5] = [
    ("date", ReportSortKey::Date),
    ("name", ReportSortKey::PatientName),
    ("test", ReportSortKey::TestType),
    ("priority", ReportSortKey::Priority),
    ("status", ReportSortKey::Status),
];

impl FromStr for ReportSortKey {
    type Err = crate::DashboardError;

    fn from_str(s: &str) -> DashboardResult<Self> {
        parse_sort_key(s, &REPORT_SORT_KEYS)
    }
}

impl Record for Report {
    type Status = ReportStatus;
    type SortKey = ReportSortKey;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [
            present(&self.patient_name),
            Some(self.id.as_str()),
            present(&self.test_type),
            present(&self.lab_name),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn status(&self) -> Option<&ReportStatus> {
        self.status.as_ref()
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.effective_date()
    }

    fn sort_value(&self, key: ReportSortKey) -> SortValue<'_> {
        match key {
            ReportSortKey::Date => SortValue::Instant(self.effective_date()),
            ReportSortKey::PatientName => SortValue::Text(present(&self.patient_name)),
            ReportSortKey::TestType => SortValue::Text(present(&self.test_type)),
            ReportSortKey::Priority => {
                SortValue::Rank(self.priority.as_ref().and_then(Priority::rank))
            }
            ReportSortKey::Status => {
                SortValue::Text(self.status.as_ref().map(ReportStatus::as_str))
            }
        }
    }

    fn group_key(&self) -> Option<&str> {
        present(&self.patient_id)
    }

    fn attachment_url(&self) -> Option<&str> {
        present(&self.report_url)
    }

    fn amount(&self) -> Option<f64> {
        self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_date_prefers_completion() {
        let report: Report = serde_json::from_str(
            r#"{"id": "r-1", "createdAt": "2024-03-01T10:00:00Z",
                "completedAt": "2024-03-03T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(
            report.effective_date(),
            parse_instant("2024-03-03T09:00:00Z")
        );
    }

    #[test]
    fn test_malformed_completion_falls_back_to_creation() {
        let report: Report = serde_json::from_str(
            r#"{"id": "r-2", "createdAt": "2024-03-01T10:00:00Z", "completedAt": "soon"}"#,
        )
        .unwrap();
        assert_eq!(
            report.effective_date(),
            parse_instant("2024-03-01T10:00:00Z")
        );
    }

    #[test]
    fn test_search_fields_order() {
        let report: Report = serde_json::from_str(
            r#"{"_id": "r-3", "patientName": "Meera", "testType": "HbA1c", "labName": "Central"}"#,
        )
        .unwrap();
        assert_eq!(
            report.search_fields(),
            vec!["Meera", "r-3", "HbA1c", "Central"]
        );
        assert!(!report.has_upload());
    }
}
