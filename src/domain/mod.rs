pub mod balance;
pub mod common;
pub mod contact;
pub mod expense;
pub mod participant;

pub use balance::{BalanceDirection, ContactBalance};
pub use common::{Displayable, Identifiable, NamedEntity};
pub use contact::Contact;
pub use expense::{ExpenseSplit, ExpenseUpdate, NewExpense, SharedExpense};
pub use participant::{Participant, CURRENT_USER_ID};
