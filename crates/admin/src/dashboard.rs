//! Dashboard figures.
//!
//! Three independent requests run concurrently: the product total (one
//! item per page, reading `pagination.total`), the order count, and the
//! order statistics. Only a failed product request fails the dashboard;
//! the other two fall back to zeroes.

use tracing::instrument;

use crate::api::{
    ApiError, BackendClient, OrderPage, OrderQuery, OrderStats, ProductPage, ProductQuery,
};
use crate::error::ConsoleError;
use crate::session::SessionStore;

const FALLBACK: &str = "Failed to fetch dashboard data";

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub products: u64,
    pub orders: u64,
    pub order_stats: OrderStats,
}

/// Fetch every dashboard figure for the signed-in admin.
///
/// # Errors
///
/// Returns `ConsoleError::Api` if there is no session or the product
/// request fails in transport or with a non-success status.
#[instrument(skip_all)]
pub async fn load(
    client: &BackendClient,
    store: &SessionStore,
) -> Result<DashboardStats, ConsoleError> {
    let token = store
        .token()
        .ok_or_else(|| ConsoleError::api(ApiError::NoToken, FALLBACK))?;

    let product_query = ProductQuery {
        page: 1,
        limit: 1,
        search: String::new(),
        category: String::new(),
    };
    let order_query = OrderQuery::default();
    let (products, orders, stats) = tokio::join!(
        client.list_products(&token, &product_query),
        client.list_orders(&token, &order_query),
        client.order_stats(&token),
    );
    assemble(products, orders, stats)
}

/// Combine the three responses.
fn assemble(
    products: Result<ProductPage, ApiError>,
    orders: Result<OrderPage, ApiError>,
    stats: Result<OrderStats, ApiError>,
) -> Result<DashboardStats, ConsoleError> {
    let products = match products {
        Ok(page) => page.pagination.total,
        Err(ApiError::Rejected { .. }) => 0,
        Err(e) => return Err(ConsoleError::api(e, FALLBACK)),
    };
    let orders = orders.map_or_else(
        |e| {
            tracing::debug!(error = %e, "Order count unavailable");
            0
        },
        |page| page.orders.len() as u64,
    );
    let order_stats = stats.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Order statistics unavailable");
        OrderStats::default()
    });

    Ok(DashboardStats {
        products,
        orders,
        order_stats,
    })
}
