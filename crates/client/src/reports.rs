//! Report endpoints, including result document upload.

use crate::client::{item_path, ApiClient, Auth};
use crate::error::{ClientError, ClientResult};
use ayura_core::models::{Report, ReportStatus};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

const REPORTS_PATH: &str = "api/reports";

/// Multipart field the backend reads the document from.
const UPLOAD_FIELD: &str = "report";

#[derive(Serialize)]
struct StatusUpdateReq<'a> {
    status: &'a str,
}

/// A result document ready to upload.
#[derive(Clone, Debug)]
pub struct ReportUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ReportUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Content type guessed from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => "application/pdf",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        }
    }
}

impl ApiClient {
    pub async fn list_reports(&self) -> ClientResult<Vec<Report>> {
        self.get_list(REPORTS_PATH).await
    }

    pub async fn update_report_status(&self, id: &str, status: &ReportStatus) -> ClientResult<()> {
        let body = StatusUpdateReq {
            status: status.as_str(),
        };
        self.send_for_ack(Method::PUT, &item_path(REPORTS_PATH, id, Some("status"))?, Some(&body))
            .await
    }

    /// Upload the result document for a report.
    ///
    /// # Returns
    ///
    /// The URL the backend stored the document under, when its response
    /// includes one.
    pub async fn upload_report(
        &self,
        id: &str,
        upload: ReportUpload,
    ) -> ClientResult<Option<String>> {
        let mime = upload.mime_type();
        let part = document_part(upload.bytes, upload.file_name, mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let builder = self
            .request(
                Method::POST,
                &item_path(REPORTS_PATH, id, Some("upload"))?,
                Auth::Bearer,
            )?
            .multipart(form);
        let response = self.send(builder, Auth::Bearer).await?;
        let bytes = response.bytes().await.map_err(ClientError::Network)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let body: Value = serde_json::from_slice(&bytes).map_err(ClientError::Decode)?;
        Ok(uploaded_url(&body))
    }
}

fn document_part(bytes: Vec<u8>, file_name: String, mime: &str) -> ClientResult<Part> {
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)
        .map_err(ClientError::Request)
}

/// Find the stored document URL in an upload response.
///
/// Accepts `{ "reportUrl": ... }`, `{ "url": ... }`, or either nested under
/// `data` or `report`.
fn uploaded_url(body: &Value) -> Option<String> {
    const KEYS: [&str; 3] = ["reportUrl", "url", "fileUrl"];

    let direct = |value: &Value| {
        KEYS.iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
    };

    direct(body).or_else(|| {
        ["data", "report"]
            .iter()
            .find_map(|key| body.get(*key).and_then(direct))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(
            ReportUpload::new("cbc.PDF", vec![]).mime_type(),
            "application/pdf"
        );
        assert_eq!(
            ReportUpload::new("scan.jpeg", vec![]).mime_type(),
            "image/jpeg"
        );
        assert_eq!(
            ReportUpload::new("notes", vec![]).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_bad_content_type_is_not_retryable() {
        let err = document_part(b"%PDF".to_vec(), "cbc.pdf".into(), "not a mime type")
            .expect_err("content type should be rejected");
        assert!(matches!(err, ClientError::Request(_)));
        assert!(!err.is_retryable());

        assert!(document_part(b"%PDF".to_vec(), "cbc.pdf".into(), "application/pdf").is_ok());
    }

    #[test]
    fn test_uploaded_url_shapes() {
        assert_eq!(
            uploaded_url(&json!({"reportUrl": "https://files/a.pdf"})).as_deref(),
            Some("https://files/a.pdf")
        );
        assert_eq!(
            uploaded_url(&json!({"data": {"url": "https://files/b.pdf"}})).as_deref(),
            Some("https://files/b.pdf")
        );
        assert_eq!(
            uploaded_url(&json!({"report": {"_id": "r", "reportUrl": "https://files/c.pdf"}}))
                .as_deref(),
            Some("https://files/c.pdf")
        );
        assert_eq!(uploaded_url(&json!({"message": "ok"})), None);
        assert_eq!(uploaded_url(&json!({"reportUrl": " "})), None);
    }
}
