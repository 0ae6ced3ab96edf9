pub mod json_backend;

use crate::{domain::Contact, errors::LedgerError, ledger::SharedLedger};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over persistence backends holding the ledger state and the contacts list.
pub trait StorageBackend: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<SharedLedger>>;
    fn save(&self, ledger: &SharedLedger) -> Result<()>;
    fn load_contacts(&self) -> Result<Vec<Contact>>;
    fn save_contacts(&self, contacts: &[Contact]) -> Result<()>;
}

pub use json_backend::JsonStorage;
