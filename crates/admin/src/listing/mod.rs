//! List views backed by paginated backend collections.
//!
//! [`ListController`] holds the page, search, filter and item state and
//! talks to a [`ListSource`]. The catalog and the order book are the two
//! sources.

pub mod controller;
pub mod orders;
pub mod products;

pub use controller::{
    FetchOutcome, ListController, ListFilter, ListMessages, ListPage, ListQuery, ListSource,
    ListState, MutationOutcome,
};
pub use orders::{OrderFilter, OrderMutation, OrderSource, PaymentDecision, ShippingDetails};
pub use products::{CategoryFilter, ProductMutation, ProductSource};

/// Controller over the catalog.
pub type ProductList = ListController<ProductSource>;

/// Controller over the order book.
pub type OrderList = ListController<OrderSource>;
