use tracing::trace;

use crate::domain::{ExpenseSplit, Participant};
use crate::errors::LedgerError;

use super::mode::{CustomSplit, SplitType};

const PERCENT_TOLERANCE: f64 = 0.01;

/// Computes the splits for an expense.
///
/// `participants` lists the other people involved; the current user is implicit and is
/// filtered out if present. Output preserves the input order. The function performs no
/// validation: custom mode without `custom_splits` and "owe full" with no participants
/// both yield an empty list. Use [`calculate_splits_checked`] to reject such input.
pub fn calculate_splits(
    split_type: SplitType,
    total_amount: f64,
    participants: &[Participant],
    paid_by: &Participant,
    custom_splits: Option<&[CustomSplit]>,
) -> Vec<ExpenseSplit> {
    let others: Vec<&Participant> = participants
        .iter()
        .filter(|participant| !participant.is_current_user())
        .collect();
    trace!(
        mode = %split_type,
        payer = %paid_by,
        participants = others.len(),
        total_amount,
        "calculating splits"
    );

    match split_type {
        SplitType::PaidByYouSplitEqually => {
            let people = (others.len() + 1) as f64;
            let share = total_amount / people;
            others
                .into_iter()
                .map(|participant| ExpenseSplit::new(participant.clone(), share, 100.0 / people))
                .collect()
        }
        SplitType::PaidByYouTheyOweFull => {
            if others.is_empty() {
                return Vec::new();
            }
            let people = others.len() as f64;
            let share = total_amount / people;
            others
                .into_iter()
                .map(|participant| ExpenseSplit::new(participant.clone(), share, 100.0 / people))
                .collect()
        }
        SplitType::PaidByYouCustomSplit => custom_splits
            .unwrap_or_default()
            .iter()
            .filter(|split| !split.contact_id.is_current_user())
            .map(|split| {
                ExpenseSplit::new(
                    split.contact_id.clone(),
                    total_amount * split.percentage / 100.0,
                    split.percentage,
                )
            })
            .collect(),
        SplitType::PaidByThemSplitEqually => {
            let people = (others.len() + 1) as f64;
            vec![ExpenseSplit::new(
                Participant::CurrentUser,
                total_amount / people,
                100.0 / people,
            )]
        }
        SplitType::PaidByThemYouOweFull => {
            vec![ExpenseSplit::new(Participant::CurrentUser, total_amount, 100.0)]
        }
    }
}

/// Validating variant of [`calculate_splits`].
///
/// Rejects non-positive or non-finite amounts, empty participant lists, a payer that
/// contradicts the mode, and custom percentages that are out of range, miss a
/// participant, or do not add up to 100.
pub fn calculate_splits_checked(
    split_type: SplitType,
    total_amount: f64,
    participants: &[Participant],
    paid_by: &Participant,
    custom_splits: Option<&[CustomSplit]>,
) -> Result<Vec<ExpenseSplit>, LedgerError> {
    if !total_amount.is_finite() || total_amount <= 0.0 {
        return Err(LedgerError::validation(format!(
            "total amount must be a positive number, got {total_amount}"
        )));
    }

    let others: Vec<&Participant> = participants
        .iter()
        .filter(|participant| !participant.is_current_user())
        .collect();
    if others.is_empty() {
        return Err(LedgerError::validation(
            "at least one other participant is required",
        ));
    }

    if split_type.paid_by_current_user() != paid_by.is_current_user() {
        return Err(LedgerError::validation(format!(
            "payer `{paid_by}` does not match split type `{split_type}`"
        )));
    }
    if let Some(payer_id) = paid_by.contact_id() {
        if !others.iter().any(|participant| participant.is_contact(payer_id)) {
            return Err(LedgerError::validation(format!(
                "payer `{payer_id}` is not among the participants"
            )));
        }
    }

    if split_type.requires_custom_splits() {
        let custom = custom_splits
            .filter(|entries| !entries.is_empty())
            .ok_or_else(|| LedgerError::validation("custom split percentages are required"))?;
        validate_custom_splits(custom, &others)?;
    }

    Ok(calculate_splits(
        split_type,
        total_amount,
        participants,
        paid_by,
        custom_splits,
    ))
}

fn validate_custom_splits(
    custom: &[CustomSplit],
    participants: &[&Participant],
) -> Result<(), LedgerError> {
    for entry in custom {
        if !entry.percentage.is_finite() || !(0.0..=100.0).contains(&entry.percentage) {
            return Err(LedgerError::validation(format!(
                "percentage for `{}` must be between 0 and 100, got {}",
                entry.contact_id, entry.percentage
            )));
        }
    }
    for participant in participants {
        if !custom.iter().any(|entry| &entry.contact_id == *participant) {
            return Err(LedgerError::validation(format!(
                "missing custom percentage for `{participant}`"
            )));
        }
    }
    let total: f64 = custom.iter().map(|entry| entry.percentage).sum();
    if (total - 100.0).abs() > PERCENT_TOLERANCE {
        return Err(LedgerError::validation(format!(
            "custom split percentages must add up to 100%, current total: {total}%"
        )));
    }
    Ok(())
}

/// Initial custom percentages: an equal integer share each, with the rounding remainder
/// given to the first participant.
pub fn default_custom_percentages(participants: &[Participant]) -> Vec<CustomSplit> {
    let others: Vec<&Participant> = participants
        .iter()
        .filter(|participant| !participant.is_current_user())
        .collect();
    if others.is_empty() {
        return Vec::new();
    }
    let equal = 100 / others.len() as u32;
    let remainder = 100 - equal * others.len() as u32;
    others
        .into_iter()
        .enumerate()
        .map(|(index, participant)| {
            let share = if index == 0 { equal + remainder } else { equal };
            CustomSplit::new(participant.clone(), f64::from(share))
        })
        .collect()
}
