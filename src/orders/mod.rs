//! Order Placement Module
//!
//! The transactional heart of the service: turning a (user, line items)
//! request into an order header plus lines with consistent stock accounting.
//!
//! ## Core Concepts
//! - **All or nothing**: stock checks, stock decrements, the header insert
//!   and the line inserts share one transaction; any failure rolls back all
//!   of them.
//! - **Sequential lines**: items are processed in request order, so a later
//!   line for the same product sees the earlier decrement.
//! - **Price snapshot**: `price_at_purchase` is captured at placement and
//!   decoupled from the live product price.
//! - **Compensation on cancel**: deleting an order restores stock in the
//!   same transaction as the delete.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
