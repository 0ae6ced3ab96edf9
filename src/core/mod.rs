//! Ledger services and the facade that wires them to their collaborators.

pub mod clock;
pub mod contacts;
pub mod ledger_manager;
pub mod services;
pub mod wallet;

pub use clock::{Clock, FixedClock, SystemClock};
pub use contacts::{ContactDirectory, InMemoryContacts};
pub use ledger_manager::ExpenseManager;
pub use wallet::{InMemoryWallet, Wallet, WalletTransaction, WalletTransactionKind};
