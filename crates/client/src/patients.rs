use crate::client::ApiClient;
use crate::error::ClientResult;
use ayura_core::models::Patient;

const PATIENTS_PATH: &str = "api/patients";

impl ApiClient {
    pub async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        self.get_list(PATIENTS_PATH).await
    }
}
