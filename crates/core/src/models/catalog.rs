//! Lab-test catalog entries and their categories.

use super::reference_label;
use crate::forms::{optional_text, validate_amount, RequiredText};
use crate::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTest {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    /// Category name when the backend populated it, otherwise its id.
    #[serde(default, deserialize_with = "reference_label")]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sample_type: Option<String>,
    #[serde(default)]
    pub turnaround_time: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl LabTest {
    /// Price the patient pays.
    pub fn selling_price(&self) -> Option<f64> {
        self.discounted_price.or(self.price)
    }
}

/// Body for creating or updating a category.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: RequiredText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn new(name: &str, description: Option<String>) -> DashboardResult<Self> {
        Ok(Self {
            name: RequiredText::new("category name", name)?,
            description: optional_text(description),
        })
    }
}

/// Body for creating or updating a lab test.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTestForm {
    pub name: RequiredText,
    pub category: RequiredText,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnaround_time: Option<String>,
    pub is_active: bool,
}

/// Unvalidated lab test input as collected from the user.
#[derive(Clone, Debug, Default)]
pub struct LabTestInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub description: Option<String>,
    pub sample_type: Option<String>,
    pub turnaround_time: Option<String>,
    pub inactive: bool,
}

impl LabTestForm {
    /// Validate user input.
    ///
    /// # Errors
    ///
    /// Returns an error if name or category are blank, an amount is negative
    /// or not finite, or the discounted price is above the price.
    pub fn validate(input: LabTestInput) -> DashboardResult<Self> {
        let price = validate_amount("price", input.price)?;
        let discounted_price = input
            .discounted_price
            .map(|d| validate_amount("discounted price", d))
            .transpose()?;
        if let Some(discounted) = discounted_price {
            if discounted > price {
                return Err(DashboardError::DiscountAbovePrice { price, discounted });
            }
        }

        Ok(Self {
            name: RequiredText::new("test name", &input.name)?,
            category: RequiredText::new("category", &input.category)?,
            price,
            discounted_price,
            description: optional_text(input.description),
            sample_type: optional_text(input.sample_type),
            turnaround_time: optional_text(input.turnaround_time),
            is_active: !input.inactive,
        })
    }
}
