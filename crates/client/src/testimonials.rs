use crate::client::{item_path, ApiClient};
use crate::error::ClientResult;
use ayura_core::models::Testimonial;
use reqwest::Method;

const TESTIMONIALS_PATH: &str = "api/testimonials";

impl ApiClient {
    pub async fn list_testimonials(&self) -> ClientResult<Vec<Testimonial>> {
        self.get_list(TESTIMONIALS_PATH).await
    }

    /// Publish a testimonial on the public site.
    pub async fn approve_testimonial(&self, id: &str) -> ClientResult<()> {
        self.send_for_ack(
            Method::PUT,
            &item_path(TESTIMONIALS_PATH, id, Some("approve"))?,
            None::<&()>,
        )
        .await
    }

    pub async fn delete_testimonial(&self, id: &str) -> ClientResult<()> {
        self.send_for_ack(
            Method::DELETE,
            &item_path(TESTIMONIALS_PATH, id, None)?,
            None::<&()>,
        )
        .await
    }
}
