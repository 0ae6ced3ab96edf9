mod common;

use chrono::Duration;
use common::{approx, reopen, setup_test_env};
use shared_expenses_core::{
    core::Clock,
    domain::{BalanceDirection, ExpenseSplit, ExpenseUpdate, NewExpense, Participant},
    split::{CustomSplit, SplitType},
};

fn alice() -> Participant {
    Participant::contact("alice")
}

fn bob() -> Participant {
    Participant::contact("bob")
}

#[test]
fn settling_everything_hides_the_contact() {
    let mut env = setup_test_env();
    env.manager
        .add_split_expense("Dinner", 100.0, SplitType::PaidByYouSplitEqually, &[alice()], None)
        .unwrap()
        .expect("recorded");
    let balance = env.manager.get_contact_balance("alice").unwrap();
    assert!(approx(balance.net_balance, 50.0));
    assert_eq!(balance.direction(0.01), BalanceDirection::OwedToYou);

    env.manager.settle_all_with_contact("alice");
    assert!(env.manager.get_contact_balance("alice").is_none());
    assert!(env.manager.get_contact_balances().is_empty());
}

#[test]
fn settled_contact_is_hidden_while_others_still_owe() {
    let mut env = setup_test_env();
    env.manager
        .add_split_expense(
            "Dinner",
            90.0,
            SplitType::PaidByYouSplitEqually,
            &[alice(), bob()],
            None,
        )
        .unwrap()
        .expect("recorded");

    env.manager.settle_all_with_contact("alice");
    assert!(env.manager.get_contact_balance("alice").is_none());

    let bob_balance = env.manager.get_contact_balance("bob").unwrap();
    assert!(approx(bob_balance.net_balance, 30.0));
    let visible: Vec<String> = env
        .manager
        .get_contact_balances()
        .into_iter()
        .map(|balance| balance.contact_id)
        .collect();
    assert_eq!(visible, vec!["bob".to_string()]);
}

#[test]
fn settle_expense_flags_split_and_expense_on_last_split() {
    let mut env = setup_test_env();
    let id = env
        .manager
        .add_split_expense(
            "Cabin",
            300.0,
            SplitType::PaidByYouSplitEqually,
            &[alice(), bob()],
            None,
        )
        .unwrap()
        .unwrap();

    assert!(env.manager.settle_expense(&id, &alice()));
    let expense = env.manager.expense(&id).unwrap();
    let split = expense.split_for(&alice()).unwrap();
    assert!(split.is_settled);
    assert_eq!(split.settled_at, Some(env.clock.now()));
    assert!(!expense.is_settled);

    env.clock.advance(Duration::minutes(5));
    assert!(env.manager.settle_expense(&id, &bob()));
    assert!(env.manager.expense(&id).unwrap().is_settled);

    assert!(!env.manager.settle_expense("missing", &alice()));
    assert!(!env.manager.settle_expense(&id, &Participant::contact("carol")));
}

#[test]
fn identical_adds_inside_window_record_once() {
    let mut env = setup_test_env();
    let expense = || {
        NewExpense::new(
            "Tickets",
            80.0,
            Participant::CurrentUser,
            vec![ExpenseSplit::new(alice(), 40.0, 50.0)],
        )
    };
    assert!(env.manager.add_expense(expense()).is_some());
    env.clock.advance(Duration::seconds(4));
    assert!(env.manager.add_expense(expense()).is_none());
    assert_eq!(env.manager.expenses().len(), 1);

    env.clock.advance(Duration::seconds(2));
    assert!(env.manager.add_expense(expense()).is_some());
    assert_eq!(env.manager.expenses().len(), 2);
}

#[test]
fn newest_expense_comes_first() {
    let mut env = setup_test_env();
    let first = env
        .manager
        .add_split_expense("Coffee", 6.0, SplitType::PaidByYouTheyOweFull, &[bob()], None)
        .unwrap()
        .unwrap();
    env.clock.advance(Duration::minutes(1));
    let second = env
        .manager
        .add_split_expense("Bagels", 9.0, SplitType::PaidByThemYouOweFull, &[bob()], None)
        .unwrap()
        .unwrap();
    let ids: Vec<&str> = env.manager.expenses().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let balance = env.manager.get_contact_balance("bob").unwrap();
    assert!(approx(balance.total_owed_to_you, 6.0));
    assert!(approx(balance.total_owed, 9.0));
    assert!(approx(balance.net_balance, -3.0));
    assert!(approx(env.manager.total_you_owe(), 3.0));
    assert!(approx(env.manager.total_owed_to_you(), 0.0));
    assert_eq!(env.manager.get_expenses_by_contact("bob").len(), 2);
}

#[test]
fn custom_split_requires_complete_percentages() {
    let mut env = setup_test_env();
    let custom = vec![CustomSplit::new(alice(), 70.0)];
    let err = env
        .manager
        .add_split_expense(
            "Groceries",
            50.0,
            SplitType::PaidByYouCustomSplit,
            &[alice(), bob()],
            Some(custom.as_slice()),
        )
        .unwrap_err();
    assert!(err.is_validation());
    assert!(env.manager.expenses().is_empty());

    let custom = vec![CustomSplit::new(alice(), 70.0), CustomSplit::new(bob(), 30.0)];
    let id = env
        .manager
        .add_split_expense(
            "Groceries",
            50.0,
            SplitType::PaidByYouCustomSplit,
            &[alice(), bob()],
            Some(custom.as_slice()),
        )
        .unwrap()
        .unwrap();
    let expense = env.manager.expense(&id).unwrap();
    assert!(approx(expense.split_for(&alice()).unwrap().amount, 35.0));
    assert!(approx(expense.split_for(&bob()).unwrap().amount, 15.0));
}

#[test]
fn unknown_contacts_are_rejected_by_checked_add() {
    let mut env = setup_test_env();
    let result = env.manager.add_split_expense(
        "Mystery",
        20.0,
        SplitType::PaidByYouSplitEqually,
        &[Participant::contact("zed")],
        None,
    );
    assert!(result.unwrap_err().to_string().contains("zed"));
}

#[test]
fn update_and_delete_persist_across_reopen() {
    let mut env = setup_test_env();
    let id = env
        .manager
        .add_split_expense("Taxi", 24.0, SplitType::PaidByYouSplitEqually, &[alice()], None)
        .unwrap()
        .unwrap();
    let keep = env
        .manager
        .add_split_expense("Museum", 30.0, SplitType::PaidByYouSplitEqually, &[bob()], None)
        .unwrap()
        .unwrap();

    assert!(env.manager.update_expense(
        &id,
        ExpenseUpdate {
            title: Some("Airport taxi".into()),
            ..ExpenseUpdate::default()
        }
    ));
    assert!(env.manager.delete_expense(&keep).is_some());
    env.manager.send_reminder("alice");

    let reopened = reopen(&env.base, env.clock.clone());
    assert_eq!(reopened.expenses().len(), 1);
    assert_eq!(reopened.expense(&id).unwrap().title, "Airport taxi");
    assert_eq!(reopened.last_reminder_date("alice"), Some(env.clock.now()));
    assert_eq!(reopened.contacts().display_name("alice"), "Alice");
    assert!(reopened.last_reminder_date("bob").is_none());
}
