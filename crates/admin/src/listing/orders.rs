//! The order list.
//!
//! Some backend deployments return every order at once with no
//! `pagination` block. Those results are searched here and shown as a
//! single page.

use tracing::instrument;

use hadi_books_core::{OrderStatus, PaymentRecordStatus, PaymentStatus};

use super::controller::{ListFilter, ListMessages, ListPage, ListQuery, ListSource, MutationOutcome};
use crate::api::{ApiError, BackendClient, OrderQuery, OrderUpdate};
use crate::models::Order;
use crate::session::SessionStore;

/// Status and payment-status selects. Both apply immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl ListFilter for OrderFilter {
    fn is_active(&self) -> bool {
        self.status.is_some() || self.payment_status.is_some()
    }

    fn needs_debounce(&self) -> bool {
        false
    }
}

/// Shipping fields an admin can set on an order. Unset fields are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub tracking_id: Option<String>,
    pub shipping_method: Option<String>,
    pub estimated_delivery: Option<String>,
}

/// Outcome of reviewing an uploaded payment proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDecision {
    Approve,
    Reject,
}

impl PaymentDecision {
    /// Order status, order payment status, and payment record status
    /// after the decision.
    #[must_use]
    pub const fn outcome(self) -> (OrderStatus, PaymentStatus, PaymentRecordStatus) {
        match self {
            Self::Approve => (
                OrderStatus::Confirmed,
                PaymentStatus::Paid,
                PaymentRecordStatus::Completed,
            ),
            Self::Reject => (
                OrderStatus::Cancelled,
                PaymentStatus::Failed,
                PaymentRecordStatus::Failed,
            ),
        }
    }
}

impl std::str::FromStr for PaymentDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown payment decision: {other}")),
        }
    }
}

/// Changes an admin can make from the order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderMutation {
    SetStatus(OrderStatus),
    SetDetails(ShippingDetails),
    VerifyPayment(PaymentDecision),
}

impl OrderMutation {
    /// The request body for this change to `order`.
    #[must_use]
    pub fn to_update(&self, order: &Order) -> OrderUpdate {
        match self {
            Self::SetStatus(status) => OrderUpdate {
                status: Some(*status),
                ..OrderUpdate::default()
            },
            Self::SetDetails(details) => OrderUpdate {
                status: Some(order.status),
                tracking_id: details.tracking_id.clone(),
                shipping_method: details.shipping_method.clone(),
                estimated_delivery: details.estimated_delivery.clone(),
                ..OrderUpdate::default()
            },
            Self::VerifyPayment(decision) => {
                let (status, payment_status, _) = decision.outcome();
                OrderUpdate {
                    status: Some(status),
                    payment_status: Some(payment_status),
                    ..OrderUpdate::default()
                }
            }
        }
    }

    /// `order` as it looks once the backend has accepted this change.
    #[must_use]
    pub fn apply(&self, order: &Order) -> Order {
        let mut updated = order.clone();
        match self {
            Self::SetStatus(status) => updated.status = *status,
            Self::SetDetails(details) => {
                if let Some(tracking_id) = &details.tracking_id {
                    updated.tracking_id = Some(tracking_id.clone());
                }
                if let Some(method) = &details.shipping_method {
                    updated.shipping_method = Some(method.clone());
                }
                if let Some(eta) = &details.estimated_delivery {
                    updated.estimated_delivery = Some(eta.clone());
                }
            }
            Self::VerifyPayment(decision) => {
                let (status, payment_status, record_status) = decision.outcome();
                updated.status = status;
                updated.payment_status = payment_status;
                if let Some(payment) = updated.payment.as_mut() {
                    payment.status = record_status;
                }
            }
        }
        updated
    }
}

/// Pages through orders for the signed-in admin.
#[derive(Debug, Clone)]
pub struct OrderSource {
    client: BackendClient,
    store: SessionStore,
}

impl OrderSource {
    #[must_use]
    pub const fn new(client: BackendClient, store: SessionStore) -> Self {
        Self { client, store }
    }
}

impl ListSource for OrderSource {
    type Item = Order;
    type Filter = OrderFilter;
    type Mutation = OrderMutation;

    const MESSAGES: ListMessages = ListMessages {
        no_results: "No orders found",
        no_data: "No orders yet",
        fetch_failed: "Failed to fetch orders",
    };

    #[instrument(skip(self))]
    async fn fetch(&self, query: &ListQuery<OrderFilter>) -> Result<ListPage<Order>, ApiError> {
        let token = self.store.token().ok_or(ApiError::NoToken)?;
        let request = OrderQuery {
            status: query.filter.status,
            payment_status: query.filter.payment_status,
            page: Some(query.page),
            limit: Some(query.limit),
            search: query.search.clone(),
        };
        let page = self.client.list_orders(&token, &request).await?;
        Ok(match page.pagination {
            Some(pagination) => ListPage {
                items: page.orders,
                total: pagination.total,
                pages: pagination.pages,
                page: query.page,
            },
            None => single_page(page.orders, &query.typed_search),
        })
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn mutate(
        &self,
        order: &Order,
        mutation: &OrderMutation,
    ) -> Result<MutationOutcome<Order>, ApiError> {
        let token = self.store.token().ok_or(ApiError::NoToken)?;
        self.client
            .update_order(&token, &order.id, &mutation.to_update(order))
            .await?;
        Ok(MutationOutcome::Replace(mutation.apply(order)))
    }

    fn item_id(order: &Order) -> &str {
        order.id.as_str()
    }

    fn failure_message(mutation: &OrderMutation) -> &'static str {
        match mutation {
            OrderMutation::SetStatus(_) => "Failed to update status",
            OrderMutation::SetDetails(_) => "Failed to update order details",
            OrderMutation::VerifyPayment(_) => "Failed to verify payment",
        }
    }
}

/// Present an unpaginated result as one page, searched locally on any
/// non-empty term.
fn single_page(orders: Vec<Order>, search: &str) -> ListPage<Order> {
    let items: Vec<Order> = orders
        .into_iter()
        .filter(|order| order.matches_search(search))
        .collect();
    ListPage {
        total: items.len() as u64,
        items,
        pages: 1,
        page: 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(id: &str, name: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "user": {"name": name, "lastName": "Khan", "email": "c@example.pk", "mobileNumber": "03001234567"},
            "items": [],
            "totalPrice": 1500,
            "status": "pending",
            "paymentStatus": "pending",
            "payment": {"paymentMethod": "JazzCash", "status": "pending", "paymentProof": "https://cdn/proof.jpg"}
        }))
        .unwrap()
    }

    #[test]
    fn test_approve_payment() {
        let mutation = OrderMutation::VerifyPayment(PaymentDecision::Approve);
        let before = order("o1", "Ayesha");

        let update = serde_json::to_value(mutation.to_update(&before)).unwrap();
        assert_eq!(
            update,
            serde_json::json!({"status": "confirmed", "paymentStatus": "paid"})
        );

        let after = mutation.apply(&before);
        assert_eq!(after.status, OrderStatus::Confirmed);
        assert_eq!(after.payment_status, PaymentStatus::Paid);
        assert_eq!(after.payment.unwrap().status, PaymentRecordStatus::Completed);
    }

    #[test]
    fn test_reject_payment() {
        let after =
            OrderMutation::VerifyPayment(PaymentDecision::Reject).apply(&order("o1", "Ayesha"));
        assert_eq!(after.status, OrderStatus::Cancelled);
        assert_eq!(after.payment_status, PaymentStatus::Failed);
        assert_eq!(after.payment.unwrap().status, PaymentRecordStatus::Failed);
    }

    #[test]
    fn test_details_keep_current_status() {
        let mutation = OrderMutation::SetDetails(ShippingDetails {
            tracking_id: Some("TCS-991".to_string()),
            ..ShippingDetails::default()
        });
        let before = order("o1", "Ayesha");

        let update = mutation.to_update(&before);
        assert_eq!(update.status, Some(OrderStatus::Pending));
        assert_eq!(update.tracking_id.as_deref(), Some("TCS-991"));
        assert!(update.shipping_method.is_none());

        let after = mutation.apply(&before);
        assert_eq!(after.tracking_id.as_deref(), Some("TCS-991"));
        assert_eq!(after.status, OrderStatus::Pending);
    }

    #[test]
    fn test_unpaginated_result_is_searched_locally() {
        let orders = vec![order("o1", "Ayesha"), order("o2", "Bilal"), order("o3", "Ayaan")];
        let page = single_page(orders.clone(), "aya");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "o3");
        assert_eq!((page.total, page.pages, page.page), (1, 1, 1));

        let page = single_page(orders.clone(), "");
        assert_eq!(page.total, 3);

        let page = single_page(orders, "b");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "o2");
    }

    #[test]
    fn test_order_filter_is_immediate() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Shipped),
            payment_status: None,
        };
        assert!(filter.is_active());
        assert!(!filter.needs_debounce());
        assert!(!OrderFilter::default().is_active());
    }

    #[test]
    fn test_decision_from_str() {
        assert_eq!("approve".parse::<PaymentDecision>(), Ok(PaymentDecision::Approve));
        assert!("maybe".parse::<PaymentDecision>().is_err());
    }
}
