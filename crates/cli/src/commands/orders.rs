//! Order commands.
//!
//! Changes go through the order list controller: the order is looked up
//! by searching for its id, then mutated in place.

use hadi_books_admin::Console;
use hadi_books_admin::listing::{
    OrderFilter, OrderList, OrderMutation, PaymentDecision, ShippingDetails,
};
use hadi_books_core::{OrderStatus, PaymentStatus};

use super::CliError;
use crate::output;

/// List one page of orders.
pub async fn list(
    console: &Console,
    page: u32,
    status: Option<OrderStatus>,
    payment_status: Option<PaymentStatus>,
    search: Option<String>,
) -> Result<(), CliError> {
    let orders = console.orders();
    let filter = OrderFilter {
        status,
        payment_status,
    };
    if filter != OrderFilter::default() {
        orders.change_filter(filter).await?;
    }
    if let Some(search) = search {
        orders.search(&search).await?;
    }
    orders.cancel_pending();
    orders.fetch(page).await?;

    output::orders(&orders.state());
    Ok(())
}

pub async fn set_status(console: &Console, id: &str, status: OrderStatus) -> Result<(), CliError> {
    apply(console, id, OrderMutation::SetStatus(status)).await
}

pub async fn set_details(
    console: &Console,
    id: &str,
    details: ShippingDetails,
) -> Result<(), CliError> {
    apply(console, id, OrderMutation::SetDetails(details)).await
}

pub async fn verify_payment(
    console: &Console,
    id: &str,
    decision: PaymentDecision,
) -> Result<(), CliError> {
    apply(console, id, OrderMutation::VerifyPayment(decision)).await
}

async fn apply(console: &Console, id: &str, mutation: OrderMutation) -> Result<(), CliError> {
    let orders = locate(console, id).await?;
    orders.mutate(id, mutation).await?;

    if let Some(order) = orders.state().items.iter().find(|o| o.id.as_str() == id) {
        output::order(order);
    }
    Ok(())
}

/// A list whose current page holds the order with `id`, if it exists.
async fn locate(console: &Console, id: &str) -> Result<OrderList, CliError> {
    let orders = console.orders();
    orders.search(id).await?;
    orders.cancel_pending();
    orders.fetch(1).await?;
    Ok(orders)
}
