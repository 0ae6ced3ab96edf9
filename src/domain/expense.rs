use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::domain::participant::Participant;

/// One participant's obligation within a shared expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    pub contact_id: Participant,
    pub amount: f64,
    pub percentage: f64,
    #[serde(default)]
    pub is_settled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
}

impl ExpenseSplit {
    pub fn new(contact_id: Participant, amount: f64, percentage: f64) -> Self {
        Self {
            contact_id,
            amount,
            percentage,
            is_settled: false,
            settled_at: None,
        }
    }

    /// Marks the split as settled. A split that is already settled keeps its
    /// first `settled_at`.
    pub fn settle(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_settled {
            return false;
        }
        self.is_settled = true;
        self.settled_at = Some(at);
        true
    }

    /// Unsettled amount still owed under this split.
    pub fn outstanding(&self) -> f64 {
        if self.is_settled {
            0.0
        } else {
            self.amount
        }
    }
}

/// A recorded expense with its computed splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedExpense {
    pub id: String,
    pub title: String,
    pub total_amount: f64,
    pub paid_by: Participant,
    pub created_at: DateTime<Utc>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub splits: Vec<ExpenseSplit>,
    #[serde(default)]
    pub is_settled: bool,
}

impl SharedExpense {
    /// Materializes a pending expense with its assigned identity and timestamp.
    pub fn from_new(expense: NewExpense, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: expense.title,
            total_amount: expense.total_amount,
            paid_by: expense.paid_by,
            created_at,
            category: expense.category,
            description: expense.description,
            splits: expense.splits,
            is_settled: false,
        }
    }

    pub fn paid_by_current_user(&self) -> bool {
        self.paid_by.is_current_user()
    }

    pub fn split_for(&self, participant: &Participant) -> Option<&ExpenseSplit> {
        self.splits
            .iter()
            .find(|split| &split.contact_id == participant)
    }

    /// Re-derives `is_settled` as the conjunction of every split's flag.
    pub fn refresh_settled(&mut self) {
        self.is_settled = self.splits.iter().all(|split| split.is_settled);
    }

    /// The split that links `contact_id` to the current user, if any.
    ///
    /// When the current user paid this is the contact's own split; when the contact paid
    /// it is the current user's split.
    pub fn counterparty_split(&self, contact_id: &str) -> Option<&ExpenseSplit> {
        if self.paid_by_current_user() {
            self.split_for(&Participant::contact(contact_id))
        } else if self.paid_by.is_contact(contact_id) {
            self.split_for(&Participant::CurrentUser)
        } else {
            None
        }
    }

    /// Whether this expense ties the current user to `contact_id` in either direction.
    pub fn involves_contact(&self, contact_id: &str) -> bool {
        self.counterparty_split(contact_id).is_some()
    }

    /// Applies a partial update. Replacing the splits re-derives `is_settled`.
    pub fn apply(&mut self, update: ExpenseUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(total_amount) = update.total_amount {
            self.total_amount = total_amount;
        }
        if let Some(paid_by) = update.paid_by {
            self.paid_by = paid_by;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(splits) = update.splits {
            self.splits = splits;
            self.refresh_settled();
        }
    }
}

impl Identifiable for SharedExpense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for SharedExpense {
    fn display_label(&self) -> String {
        let status = if self.is_settled { "settled" } else { "open" };
        format!(
            "{} ({:.2}, paid by {}, {})",
            self.title, self.total_amount, self.paid_by, status
        )
    }
}

/// The caller-supplied part of an expense; the ledger assigns id, timestamp and
/// settlement state.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub total_amount: f64,
    pub paid_by: Participant,
    pub category: String,
    pub description: Option<String>,
    pub splits: Vec<ExpenseSplit>,
}

impl NewExpense {
    pub fn new(
        title: impl Into<String>,
        total_amount: f64,
        paid_by: Participant,
        splits: Vec<ExpenseSplit>,
    ) -> Self {
        Self {
            title: title.into(),
            total_amount,
            paid_by,
            category: "General".into(),
            description: None,
            splits,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update applied by `update_expense`. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub total_amount: Option<f64>,
    pub paid_by: Option<Participant>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub splits: Option<Vec<ExpenseSplit>>,
}
