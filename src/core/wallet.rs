use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::LedgerError;

/// Money-movement collaborator. Settlement flags live in the ledger; balances live here.
pub trait Wallet {
    fn balance(&self) -> f64;

    /// Sends `amount` to `recipient`, failing when the balance does not cover it.
    fn send_money(
        &mut self,
        recipient: &str,
        amount: f64,
        description: Option<&str>,
    ) -> Result<(), LedgerError>;

    /// Credits (or debits, when negative) the balance directly.
    fn update_balance(&mut self, amount: f64) -> Result<(), LedgerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionKind {
    Send,
    Receive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub kind: WalletTransactionKind,
    pub title: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

/// Simple wallet holding a balance and a most-recent-first transaction log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWallet {
    balance: f64,
    transactions: Vec<WalletTransaction>,
}

impl InMemoryWallet {
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            transactions: Vec::new(),
        }
    }

    pub fn transactions(&self) -> &[WalletTransaction] {
        &self.transactions
    }
}

impl Wallet for InMemoryWallet {
    fn balance(&self) -> f64 {
        self.balance
    }

    fn send_money(
        &mut self,
        recipient: &str,
        amount: f64,
        description: Option<&str>,
    ) -> Result<(), LedgerError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::Wallet(format!("invalid transfer amount {amount}")));
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.transactions.insert(
            0,
            WalletTransaction {
                kind: WalletTransactionKind::Send,
                title: description.unwrap_or("Money transfer").to_string(),
                amount,
                recipient: Some(recipient.to_string()),
            },
        );
        info!(recipient, amount, "wallet transfer sent");
        Ok(())
    }

    fn update_balance(&mut self, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::Wallet(format!("invalid balance change {amount}")));
        }
        self.balance += amount;
        if amount > 0.0 {
            self.transactions.insert(
                0,
                WalletTransaction {
                    kind: WalletTransactionKind::Receive,
                    title: "Balance credit".into(),
                    amount,
                    recipient: None,
                },
            );
        }
        Ok(())
    }
}
