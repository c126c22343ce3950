//! Users Module
//!
//! Customer records. Credential handling (hashing, token issuance) belongs
//! to the authentication collaborator; this module only persists the opaque
//! hash and keeps it out of every response.

pub mod handlers;
pub mod protocol;
pub mod types;
