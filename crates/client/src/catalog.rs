//! Lab-test catalog and category endpoints.

use crate::client::{item_path, ApiClient, Auth};
use crate::error::ClientResult;
use ayura_core::models::{Category, CategoryForm, LabTest, LabTestForm};
use reqwest::Method;

const TESTS_PATH: &str = "api/tests";
const CATEGORIES_PATH: &str = "api/categories";

impl ApiClient {
    pub async fn list_lab_tests(&self) -> ClientResult<Vec<LabTest>> {
        self.get_list(TESTS_PATH).await
    }

    pub async fn create_lab_test(&self, form: &LabTestForm) -> ClientResult<LabTest> {
        self.send_for_item(Method::POST, TESTS_PATH, Some(form), Auth::Bearer)
            .await
    }

    pub async fn update_lab_test(&self, id: &str, form: &LabTestForm) -> ClientResult<LabTest> {
        self.send_for_item(
            Method::PUT,
            &item_path(TESTS_PATH, id, None)?,
            Some(form),
            Auth::Bearer,
        )
        .await
    }

    pub async fn delete_lab_test(&self, id: &str) -> ClientResult<()> {
        self.send_for_ack(Method::DELETE, &item_path(TESTS_PATH, id, None)?, None::<&()>)
            .await
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.get_list(CATEGORIES_PATH).await
    }

    pub async fn create_category(&self, form: &CategoryForm) -> ClientResult<Category> {
        self.send_for_item(Method::POST, CATEGORIES_PATH, Some(form), Auth::Bearer)
            .await
    }

    pub async fn update_category(&self, id: &str, form: &CategoryForm) -> ClientResult<Category> {
        self.send_for_item(
            Method::PUT,
            &item_path(CATEGORIES_PATH, id, None)?,
            Some(form),
            Auth::Bearer,
        )
        .await
    }

    pub async fn delete_category(&self, id: &str) -> ClientResult<()> {
        self.send_for_ack(
            Method::DELETE,
            &item_path(CATEGORIES_PATH, id, None)?,
            None::<&()>,
        )
        .await
    }
}
