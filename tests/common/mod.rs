#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use shared_expenses_core::{
    config::ConfigManager,
    core::{ExpenseManager, FixedClock},
    domain::Contact,
    storage::{JsonStorage, StorageBackend},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct TestEnv {
    pub base: PathBuf,
    pub clock: FixedClock,
    pub manager: ExpenseManager,
    pub config: ConfigManager,
}

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn start_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 11, 2, 18, 30, 0).unwrap())
}

pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::new("alice", "Alice").with_email("alice@example.com"),
        Contact::new("bob", "Bob"),
        Contact::new("carol", "Carol"),
    ]
}

/// Creates an isolated manager backed by a unique directory seeded with sample contacts.
pub fn setup_test_env() -> TestEnv {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    storage
        .save_contacts(&sample_contacts())
        .expect("seed contacts");
    let config =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let policy = config.load().expect("default config").policy();
    let clock = start_clock();
    let manager = ExpenseManager::open(Box::new(storage), Box::new(clock.clone()), policy)
        .expect("open manager");
    TestEnv {
        base,
        clock,
        manager,
        config,
    }
}

/// Reopens the ledger stored under `base`, as a fresh process would.
pub fn reopen(base: &std::path::Path, clock: FixedClock) -> ExpenseManager {
    let storage = JsonStorage::new(Some(base.to_path_buf())).expect("storage");
    ExpenseManager::open(Box::new(storage), Box::new(clock), Default::default()).expect("reopen")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
