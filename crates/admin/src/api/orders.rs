//! Order endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use hadi_books_core::{OrderId, OrderStatus, PaymentStatus, Price};

use super::{Ack, ApiError, BackendClient};
use crate::models::{BearerToken, Order, Pagination};

const LIST_PATH: &str = "/api/adminCtrl/all";
const STATS_PATH: &str = "/adminCtrl/order-stats";

/// Query for the order list. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
}

/// Order list response. Older backends return every order at once and
/// omit `pagination`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Body of an order update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
}

/// Aggregate order figures for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub processing_orders: u64,
    #[serde(default)]
    pub delivered_orders: u64,
    #[serde(default)]
    pub total_revenue: Price,
}

#[derive(Debug, Deserialize)]
struct OrderStatsResponse {
    stats: OrderStats,
}

impl BackendClient {
    /// Fetch orders matching the query.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or decode failure.
    #[instrument(skip(self, token))]
    pub async fn list_orders(
        &self,
        token: &BearerToken,
        query: &OrderQuery,
    ) -> Result<OrderPage, ApiError> {
        self.send(self.authed(Method::GET, LIST_PATH, token)?.query(query))
            .await
    }

    /// Update an order's status, payment status, or shipping details.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn update_order(
        &self,
        token: &BearerToken,
        id: &OrderId,
        update: &OrderUpdate,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/status/{id}");
        self.send(self.authed(Method::PUT, &path, token)?.json(update))
            .await
    }

    /// Fetch aggregate order statistics.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or decode failure.
    #[instrument(skip_all)]
    pub async fn order_stats(&self, token: &BearerToken) -> Result<OrderStats, ApiError> {
        let response: OrderStatsResponse =
            self.send(self.authed(Method::GET, STATS_PATH, token)?).await?;
        Ok(response.stats)
    }
}
