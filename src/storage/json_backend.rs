use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    domain::Contact,
    ledger::SharedLedger,
    utils::{
        paths::{contacts_file_in, ledger_file_in, resolve_base},
        persistence::{ensure_dir, load_json, save_json_atomic},
    },
};

use super::{Result, StorageBackend};

/// Stores the ledger and contacts as pretty-printed JSON documents under one directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    ledger_file: PathBuf,
    contacts_file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self {
            ledger_file: ledger_file_in(&root),
            contacts_file: contacts_file_in(&root),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_file
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Option<SharedLedger>> {
        let ledger: Option<SharedLedger> = load_json(&self.ledger_file)?;
        debug!(
            path = %self.ledger_file.display(),
            found = ledger.is_some(),
            "ledger loaded"
        );
        Ok(ledger)
    }

    fn save(&self, ledger: &SharedLedger) -> Result<()> {
        save_json_atomic(ledger, &self.ledger_file)?;
        debug!(
            path = %self.ledger_file.display(),
            expenses = ledger.expense_count(),
            "ledger saved"
        );
        Ok(())
    }

    fn load_contacts(&self) -> Result<Vec<Contact>> {
        Ok(load_json::<Vec<Contact>>(&self.contacts_file)?.unwrap_or_default())
    }

    fn save_contacts(&self, contacts: &[Contact]) -> Result<()> {
        save_json_atomic(&contacts, &self.contacts_file)
    }
}
