use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("No split for {participant} in expense {expense}")]
    SplitNotFound {
        expense: String,
        participant: String,
    },
    #[error("Contact not found: {0}")]
    ContactNotFound(String),
    #[error("Insufficient funds: need {needed:.2}, available {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("Nothing to settle with {0}")]
    NothingToSettle(String),
    #[error("Wallet error: {0}")]
    Wallet(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }
}
