use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".shared_expenses";
const CONFIG_FILE: &str = "config.json";
const CONTACTS_FILE: &str = "contacts.json";

/// Environment variable that overrides the application data directory.
pub const HOME_ENV: &str = "SHARED_EXPENSES_HOME";

/// Returns the application-specific data directory, defaulting to `~/.shared_expenses`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves `root` or falls back to [`app_data_dir`].
pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(app_data_dir)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// File holding the whole ledger state, named after its storage key.
pub fn ledger_file_in(base: &std::path::Path) -> PathBuf {
    base.join(format!("{}.json", crate::ledger::STORAGE_KEY))
}

pub fn contacts_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONTACTS_FILE)
}
