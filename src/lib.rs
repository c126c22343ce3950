//! Storefront Service Library
//!
//! This library crate defines the core modules of the catalog/order web
//! service. It serves as the foundation for the binary executable
//! (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`db`**: The connection routing layer. Holds the process-wide active
//!   database endpoint (primary or replica) and the explicit, operator-driven
//!   switch between them.
//! - **`store`**: The embedded transactional store. One table set per
//!   endpoint with begin/commit/rollback semantics and an exclusive-writer
//!   locking model.
//! - **`orders`**: The order placement transaction (stock check, stock
//!   decrement, header and line inserts in one atomic unit) plus the
//!   compensating stock restoration on cancellation.
//! - **`catalog`**: Category and product CRUD with the cascade/set-null
//!   referential rules.
//! - **`users`**: Customer records, with the password credential kept opaque
//!   and unexposed.

pub mod catalog;
pub mod db;
pub mod error;
pub mod orders;
pub mod store;
pub mod users;
