//! Ledger state, persistence-friendly types, and duplicate detection.

pub mod duplicate;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod policy;

pub use duplicate::is_duplicate;
pub use ledger::{SharedLedger, CURRENT_SCHEMA_VERSION, STORAGE_KEY};
pub use policy::LedgerPolicy;
