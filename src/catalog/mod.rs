//! Catalog Module
//!
//! CRUD for categories and products, with the referential rules the order
//! path depends on: removing a category nulls product references, removing a
//! product nulls historical order line references.

pub mod handlers;
pub mod protocol;
pub mod types;
