use serde::Serialize;

use crate::domain::expense::SharedExpense;

/// Which way money flows between the current user and a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDirection {
    OwedToYou,
    YouOwe,
    Even,
}

impl BalanceDirection {
    /// Classifies a signed net amount, treating anything within `epsilon` of zero as even.
    pub fn from_net(net: f64, epsilon: f64) -> Self {
        if net > epsilon {
            BalanceDirection::OwedToYou
        } else if net < -epsilon {
            BalanceDirection::YouOwe
        } else {
            BalanceDirection::Even
        }
    }
}

/// Derived per-counterparty view; recomputed from the ledger on every query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBalance {
    pub contact_id: String,
    /// Amount you owe them.
    pub total_owed: f64,
    /// Amount they owe you.
    pub total_owed_to_you: f64,
    /// Positive when they owe you, negative when you owe them.
    pub net_balance: f64,
    pub expenses: Vec<SharedExpense>,
}

impl ContactBalance {
    pub fn new(contact_id: impl Into<String>) -> Self {
        Self {
            contact_id: contact_id.into(),
            total_owed: 0.0,
            total_owed_to_you: 0.0,
            net_balance: 0.0,
            expenses: Vec::new(),
        }
    }

    pub fn direction(&self, epsilon: f64) -> BalanceDirection {
        BalanceDirection::from_net(self.net_balance, epsilon)
    }

    /// True while any split between this contact and the current user is still open.
    /// Splits owed by other contacts on the same expense do not count.
    pub fn has_unsettled_expenses(&self) -> bool {
        self.expenses.iter().any(|expense| {
            expense
                .counterparty_split(&self.contact_id)
                .is_some_and(|split| !split.is_settled)
        })
    }

    pub(crate) fn record_expense(&mut self, expense: &SharedExpense) {
        if !self.expenses.iter().any(|known| known.id == expense.id) {
            self.expenses.push(expense.clone());
        }
    }
}
