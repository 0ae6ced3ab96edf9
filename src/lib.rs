#![doc(test(attr(deny(warnings))))]

//! Shared Expenses Core tracks money shared between the current user and their
//! contacts: split calculation, duplicate-safe recording, per-contact balances,
//! and settlement.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod split;
pub mod storage;
pub mod utils;

pub use crate::core::ExpenseManager;
pub use errors::LedgerError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Shared Expenses Core tracing initialized.");
    });
}
