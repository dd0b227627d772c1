//! Hadi Books Core - Shared types library.
//!
//! This crate provides common types used across all Hadi Books console components:
//! - `admin` - Headless admin console (session, lists, reset flow, backend client)
//! - `cli` - `hb-admin` command-line front end
//! - `integration-tests` - Fake backend and end-to-end scenarios
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows the fake backend to share the exact
//! wire types the console decodes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for backend IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
