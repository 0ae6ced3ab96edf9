pub mod balance_service;
pub mod expense_service;
pub mod settlement_service;

pub use balance_service::BalanceService;
pub use expense_service::{generate_expense_id, ExpenseService};
pub use settlement_service::{SettlementReceipt, SettlementService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}

impl ServiceError {
    /// True when the failure is a rejected precondition rather than a missing target or
    /// collaborator failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Ledger(LedgerError::Validation(_)))
    }
}
