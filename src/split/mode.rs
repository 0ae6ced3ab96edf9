use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::Participant;
use crate::errors::LedgerError;

/// Who fronted the money and how the remainder is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    PaidByYouSplitEqually,
    PaidByYouTheyOweFull,
    PaidByYouCustomSplit,
    PaidByThemSplitEqually,
    PaidByThemYouOweFull,
}

impl SplitType {
    pub const ALL: [SplitType; 5] = [
        SplitType::PaidByYouSplitEqually,
        SplitType::PaidByYouTheyOweFull,
        SplitType::PaidByYouCustomSplit,
        SplitType::PaidByThemSplitEqually,
        SplitType::PaidByThemYouOweFull,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::PaidByYouSplitEqually => "paid_by_you_split_equally",
            SplitType::PaidByYouTheyOweFull => "paid_by_you_they_owe_full",
            SplitType::PaidByYouCustomSplit => "paid_by_you_custom_split",
            SplitType::PaidByThemSplitEqually => "paid_by_them_split_equally",
            SplitType::PaidByThemYouOweFull => "paid_by_them_you_owe_full",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SplitType::PaidByYouSplitEqually => "I paid, split equally",
            SplitType::PaidByYouTheyOweFull => "I paid, they owe the full amount",
            SplitType::PaidByYouCustomSplit => "I paid, custom split",
            SplitType::PaidByThemSplitEqually => "They paid, split equally",
            SplitType::PaidByThemYouOweFull => "They paid, I owe the full amount",
        }
    }

    /// True for the modes in which the current user fronted the expense.
    pub fn paid_by_current_user(&self) -> bool {
        matches!(
            self,
            SplitType::PaidByYouSplitEqually
                | SplitType::PaidByYouTheyOweFull
                | SplitType::PaidByYouCustomSplit
        )
    }

    pub fn requires_custom_splits(&self) -> bool {
        matches!(self, SplitType::PaidByYouCustomSplit)
    }

    /// Payer implied by the mode: the current user, or else the first listed contact.
    pub fn default_payer(&self, participants: &[Participant]) -> Participant {
        if self.paid_by_current_user() {
            return Participant::CurrentUser;
        }
        participants
            .iter()
            .find(|participant| !participant.is_current_user())
            .cloned()
            .unwrap_or(Participant::CurrentUser)
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitType {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        SplitType::ALL
            .into_iter()
            .find(|mode| mode.as_str() == trimmed)
            .ok_or_else(|| LedgerError::validation(format!("unknown split type `{trimmed}`")))
    }
}

/// Caller-supplied percentage for one participant in the custom mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSplit {
    pub contact_id: Participant,
    pub percentage: f64,
}

impl CustomSplit {
    pub fn new(contact_id: Participant, percentage: f64) -> Self {
        Self {
            contact_id,
            percentage,
        }
    }
}
