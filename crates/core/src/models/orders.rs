//! Test orders placed by patients.
//!
//! Pending orders are approved or denied by an admin; later the lab moves them
//! through processing to completed and attaches a report URL.

use super::{present, wire_enum, Priority};
use crate::time::parse_instant;
use crate::view::{parse_sort_key, Record, SortValue};
use crate::DashboardResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

wire_enum! {
    /// Lifecycle status of an order.
    pub enum OrderStatus {
        Pending => "pending",
        Approved => "approved",
        Denied => "denied",
        Processing => "processing",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// Contact details captured with the order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPatient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// One lab test line item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, alias = "_id")]
    pub test_id: Option<String>,
    /// Empty when the backend only sent the test id.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LineItem {
    Id(String),
    Item(OrderItem),
}

impl From<LineItem> for OrderItem {
    fn from(item: LineItem) -> Self {
        match item {
            LineItem::Id(id) => OrderItem {
                test_id: Some(id),
                name: String::new(),
                price: None,
            },
            LineItem::Item(item) => item,
        }
    }
}

/// Accepts line items as populated objects, bare test ids, or a mix.
fn line_items<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<LineItem>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(OrderItem::from)
        .collect())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub patient: OrderPatient,
    #[serde(default, deserialize_with = "line_items")]
    pub tests: Vec<OrderItem>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub collection_date: Option<String>,
    #[serde(default)]
    pub report_url: Option<String>,
}

impl Order {
    /// Declared total, or the sum of line item prices when the backend left
    /// it out.
    pub fn effective_amount(&self) -> Option<f64> {
        self.total_amount.or_else(|| {
            let prices: Vec<f64> = self.tests.iter().filter_map(|t| t.price).collect();
            (!prices.is_empty()).then(|| prices.iter().sum())
        })
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_instant)
    }

    /// Comma-separated test names for table display.
    pub fn test_names(&self) -> String {
        self.tests
            .iter()
            .map(|t| t.name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderSortKey {
    #[default]
    Date,
    PatientName,
    Amount,
    Priority,
    Status,
}

const ORDER_SORT_KEYS: [(&str, OrderSortKey); 5] = [
    ("date", OrderSortKey::Date),
    ("name", OrderSortKey::PatientName),
    ("amount", OrderSortKey::Amount),
    ("priority", OrderSortKey::Priority),
    ("status", OrderSortKey::Status),
];

impl FromStr for OrderSortKey {
    type Err = crate::DashboardError;

    fn from_str(s: &str) -> DashboardResult<Self> {
        parse_sort_key(s, &ORDER_SORT_KEYS)
    }
}

impl Record for Order {
    type Status = OrderStatus;
    type SortKey = OrderSortKey;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = [
            present(&self.patient.name),
            Some(self.id.as_str()),
            present(&self.patient.email),
            present(&self.patient.phone),
        ]
        .into_iter()
        .flatten()
        .collect();
        fields.extend(
            self.tests
                .iter()
                .map(|t| t.name.trim())
                .filter(|name| !name.is_empty()),
        );
        fields
    }

    fn status(&self) -> Option<&OrderStatus> {
        self.status.as_ref()
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created()
    }

    fn sort_value(&self, key: OrderSortKey) -> SortValue<'_> {
        match key {
            OrderSortKey::Date => SortValue::Instant(self.created()),
            OrderSortKey::PatientName => SortValue::Text(present(&self.patient.name)),
            OrderSortKey::Amount => SortValue::Number(self.effective_amount()),
            OrderSortKey::Priority => SortValue::Rank(self.priority.as_ref().and_then(Priority::rank)),
            OrderSortKey::Status => SortValue::Text(self.status.as_ref().map(OrderStatus::as_str)),
        }
    }

    fn group_key(&self) -> Option<&str> {
        present(&self.patient.email).or_else(|| present(&self.patient.phone))
    }

    fn attachment_url(&self) -> Option<&str> {
        present(&self.report_url)
    }

    fn amount(&self) -> Option<f64> {
        self.effective_amount()
    }
}
