//! Registered patients.

use super::present;
use crate::time::parse_instant;
use crate::view::{parse_sort_key, Record, SortValue};
use crate::DashboardResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatientSortKey {
    Name,
    #[default]
    Date,
    Age,
}

const PATIENT_SORT_KEYS: [(&str, PatientSortKey); 3] = [
    ("name", PatientSortKey::Name),
    ("date", PatientSortKey::Date),
    ("age", PatientSortKey::Age),
];

impl FromStr for PatientSortKey {
    type Err = crate::DashboardError;

    fn from_str(s: &str) -> DashboardResult<Self> {
        parse_sort_key(s, &PATIENT_SORT_KEYS)
    }
}

/// Patients carry no status, so the status filter can only be `All`.
impl Record for Patient {
    type Status = Infallible;
    type SortKey = PatientSortKey;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [
            present(&self.name),
            present(&self.email),
            present(&self.phone),
            Some(self.id.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn status(&self) -> Option<&Infallible> {
        None
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_instant)
    }

    fn sort_value(&self, key: PatientSortKey) -> SortValue<'_> {
        match key {
            PatientSortKey::Name => SortValue::Text(present(&self.name)),
            PatientSortKey::Date => SortValue::Instant(self.timestamp()),
            PatientSortKey::Age => SortValue::Number(self.age.map(f64::from)),
        }
    }

    fn group_key(&self) -> Option<&str> {
        present(&self.email)
    }
}
