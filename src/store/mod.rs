//! Embedded Transactional Store
//!
//! The concrete implementation of the relational collaborator the rest of
//! the service is written against: begin/commit/rollback, row lookup by
//! primary key, insert/update/delete, all scoped to one endpoint.
//!
//! ## Core Concepts
//! - **One `MemoryDb` per endpoint**: the primary and the replica each own an
//!   independent table set; keeping them in sync is the data store's job,
//!   not this service's.
//! - **Transactions**: an exclusive guard over the whole table set, acquired
//!   with a bounded wait. Commit publishes, drop-without-commit rolls back.
//! - **Referential rules**: cascade and set-null behavior lives in `Tables`
//!   so every caller gets the same semantics.

pub mod memory;
pub mod tables;
