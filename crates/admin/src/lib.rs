//! Hadi Books admin console library.
//!
//! A headless rendition of the bookstore's admin panel: it talks to the
//! store backend over HTTP and keeps the console's state (session, lists,
//! reset flow) for a front end to render.
//!
//! # Security
//!
//! The session holds an admin bearer token with full catalog and order
//! access. The token never appears in `Debug` output or logs.
//!
//! # Modules
//!
//! - [`session`] - Persisted session, store, and the retrying profile verifier
//! - [`listing`] - Paginated, searchable lists of products and orders
//! - [`reset`] - Email, OTP, new password flow
//! - [`api`] - Typed backend client
//! - [`state`] - The [`Console`] handle tying everything together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod hero;
pub mod listing;
pub mod models;
pub mod profile;
pub mod reset;
pub mod session;
pub mod state;
pub mod validation;

pub use config::ConsoleConfig;
pub use error::ConsoleError;
pub use state::Console;
