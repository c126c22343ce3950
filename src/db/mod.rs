//! Connection Routing Module
//!
//! Holds the single active database endpoint for the whole process and the
//! explicit switch operation between the primary and the replica.
//!
//! ## Core Concepts
//! - **Capture at start**: operations grab the active endpoint once and
//!   finish against it; a switch only affects operations that start later.
//! - **Explicit switching**: redirection is an operator action exposed over
//!   HTTP, never a background health monitor's decision.
//! - **Tolerant probing**: `probe` reports reachability without raising, so
//!   the status endpoint can describe a dead endpoint instead of failing.

pub mod handlers;
pub mod protocol;
pub mod router;
pub mod types;

#[cfg(test)]
mod tests;
