//! Order endpoints.

use crate::client::{item_path, ApiClient, Auth};
use crate::error::ClientResult;
use ayura_core::models::{Order, OrderStatus};
use reqwest::Method;
use serde::Serialize;

const ORDERS_PATH: &str = "api/orders";
const PENDING_ORDERS_PATH: &str = "api/orders/pending";

#[derive(Serialize)]
struct StatusUpdateReq<'a> {
    status: &'a str,
}

impl ApiClient {
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.get_list(ORDERS_PATH).await
    }

    /// Orders waiting for an admin decision.
    pub async fn list_pending_orders(&self) -> ClientResult<Vec<Order>> {
        self.get_list(PENDING_ORDERS_PATH).await
    }

    pub async fn approve_order(&self, id: &str) -> ClientResult<()> {
        self.send_for_ack(Method::PUT, &item_path(ORDERS_PATH, id, Some("approve"))?, None::<&()>)
            .await
    }

    pub async fn deny_order(&self, id: &str) -> ClientResult<()> {
        self.send_for_ack(Method::PUT, &item_path(ORDERS_PATH, id, Some("deny"))?, None::<&()>)
            .await
    }

    pub async fn update_order_status(&self, id: &str, status: &OrderStatus) -> ClientResult<()> {
        let body = StatusUpdateReq {
            status: status.as_str(),
        };
        self.send_for_ack(Method::PUT, &item_path(ORDERS_PATH, id, Some("status"))?, Some(&body))
            .await
    }

    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.send_for_item(
            Method::GET,
            &item_path(ORDERS_PATH, id, None)?,
            None::<&()>,
            Auth::Bearer,
        )
        .await
    }
}
