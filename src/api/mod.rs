//! Wire shapes of the playbook backend.
//!
//! These mirror the backend's JSON field names one to one and are only ever fed to
//! the normalizer (`crate::model::normalize`) or produced by the gateway's request
//! builders. Application code works with the canonical types in `crate::model`.

pub mod lenient;
pub mod types;

pub use types::*;
