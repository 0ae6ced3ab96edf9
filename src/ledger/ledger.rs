use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SharedExpense;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Key under which the whole ledger state is persisted.
pub const STORAGE_KEY: &str = "shared-expenses-storage";

/// Single source of truth for shared expenses: the expense list (most recent first)
/// plus the last reminder sent to each contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SharedLedger {
    #[serde(default)]
    pub expenses: Vec<SharedExpense>,
    #[serde(default)]
    pub reminders: BTreeMap<String, DateTime<Utc>>,
    #[serde(default = "SharedLedger::schema_version_default")]
    pub schema_version: u8,
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedLedger {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
            reminders: BTreeMap::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Inserts at the front so iteration order stays most-recent-first.
    pub fn prepend_expense(&mut self, expense: SharedExpense) -> String {
        let id = expense.id.clone();
        self.expenses.insert(0, expense);
        id
    }

    pub fn expense(&self, id: &str) -> Option<&SharedExpense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: &str) -> Option<&mut SharedExpense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn remove_expense(&mut self, id: &str) -> Option<SharedExpense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    pub fn record_reminder(&mut self, contact_id: &str, at: DateTime<Utc>) {
        self.reminders.insert(contact_id.to_string(), at);
    }

    pub fn last_reminder(&self, contact_id: &str) -> Option<DateTime<Utc>> {
        self.reminders.get(contact_id).copied()
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewExpense, Participant};
    use chrono::TimeZone;

    fn expense(id: &str) -> SharedExpense {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        SharedExpense::from_new(
            NewExpense::new(id, 10.0, Participant::CurrentUser, Vec::new()),
            id.into(),
            created,
        )
    }

    #[test]
    fn prepend_keeps_most_recent_first() {
        let mut ledger = SharedLedger::new();
        ledger.prepend_expense(expense("first"));
        ledger.prepend_expense(expense("second"));
        let ids: Vec<&str> = ledger.expenses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn remove_returns_deleted_expense() {
        let mut ledger = SharedLedger::new();
        ledger.prepend_expense(expense("gone"));
        assert_eq!(ledger.remove_expense("gone").map(|e| e.id), Some("gone".into()));
        assert!(ledger.remove_expense("gone").is_none());
        assert_eq!(ledger.expense_count(), 0);
    }

    #[test]
    fn missing_fields_deserialize_with_defaults() {
        let ledger: SharedLedger = serde_json::from_str("{}").unwrap();
        assert!(ledger.expenses.is_empty());
        assert_eq!(ledger.schema_version, CURRENT_SCHEMA_VERSION);
    }
}
