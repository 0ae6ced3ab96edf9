use crate::{
    config::{Config, ConfigManager},
    core::{
        services::SettlementReceipt, ContactDirectory, ExpenseManager, InMemoryContacts,
        InMemoryWallet, SystemClock, Wallet,
    },
    currency::format_amount,
    domain::{
        BalanceDirection, Contact, Displayable, Identifiable, NamedEntity, NewExpense,
        Participant, SharedExpense,
    },
    errors::LedgerError,
    split::{calculate_splits_checked, CustomSplit, SplitType},
    storage::{JsonStorage, StorageBackend},
    utils::build_info,
};

use super::{
    args::{parse_number, Args},
    output, usage, CliError,
};

struct Session {
    manager: ExpenseManager,
    config: Config,
}

impl Session {
    fn open() -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let storage = JsonStorage::new_default()?;
        let manager = ExpenseManager::open(
            Box::new(storage),
            Box::new(SystemClock),
            config.policy(),
        )?;
        Ok(Self { manager, config })
    }

    fn money(&self, amount: f64) -> String {
        format_amount(
            amount,
            &self.config.currency_code(),
            &self.config.locale_config(),
        )
    }

    fn name(&self, participant: &Participant) -> String {
        match participant.contact_id() {
            Some(id) => self.manager.contacts().display_name(id),
            None => self.config.current_user_name.clone(),
        }
    }
}

pub(super) fn dispatch(command: &str, args: &Args) -> Result<(), CliError> {
    match command {
        "help" | "--help" | "-h" => {
            output::info(usage());
            Ok(())
        }
        "version" | "--version" | "-V" => {
            output::info(build_info::current().summary());
            Ok(())
        }
        "add-contact" => add_contact(args),
        "contacts" => list_contacts(),
        "add-expense" => add_expense(&mut Session::open()?, args),
        "expenses" => list_expenses(&Session::open()?, args),
        "balances" => balances(&Session::open()?),
        "settle" => settle(&mut Session::open()?, args),
        "settle-all" => settle_all(&mut Session::open()?, args),
        "settle-up" => settle_up(&mut Session::open()?, args),
        "settle-expense" => settle_single(&mut Session::open()?, args),
        "delete" => delete(&mut Session::open()?, args),
        "remind" => remind(&mut Session::open()?, args),
        other => Err(CliError::Usage(format!(
            "unknown command `{other}`\n\n{}",
            usage()
        ))),
    }
}

fn add_contact(args: &Args) -> Result<(), CliError> {
    let name = args.positional(0, "name")?;
    let mut contact = match args.flag("id") {
        Some(id) => Contact::new(id, name),
        None => Contact::with_generated_id(name),
    };
    if contact.participant().is_current_user() {
        return Err(CliError::Usage(format!("`{}` is reserved", contact.id())));
    }
    if let Some(email) = args.flag("email") {
        contact = contact.with_email(email);
    }
    contact.phone = args.flag("phone").map(str::to_string);

    let storage = JsonStorage::new_default()?;
    let mut directory = InMemoryContacts::new(storage.load_contacts()?);
    let label = format!("{} ({})", contact.name(), contact.id());
    directory.upsert(contact);
    storage.save_contacts(&directory.contacts())?;
    output::success(format!("Contact {label} saved"));
    Ok(())
}

fn list_contacts() -> Result<(), CliError> {
    let contacts = JsonStorage::new_default()?.load_contacts()?;
    output::section("Contacts");
    if contacts.is_empty() {
        output::info("No contacts yet.");
    }
    for contact in contacts {
        output::info(format!("{}  {}", contact.id(), contact.display_label()));
    }
    Ok(())
}

fn parse_participants(raw: &str) -> Vec<Participant> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token {
            "me" | "you" => Participant::CurrentUser,
            other => Participant::from(other),
        })
        .collect()
}

fn parse_custom_splits(raw: &str) -> Result<Vec<CustomSplit>, CliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (id, pct) = token.split_once('=').ok_or_else(|| {
                CliError::Usage(format!("custom split `{token}` must look like id=percent"))
            })?;
            let participant = parse_participants(id)
                .pop()
                .ok_or_else(|| CliError::Usage(format!("custom split `{token}` has no id")))?;
            Ok(CustomSplit::new(participant, parse_number(pct, "percent")?))
        })
        .collect()
}

fn add_expense(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let title = args.positional(0, "title")?;
    let total = args.number(1, "amount")?;
    let split_type: SplitType = args.positional(2, "split-type")?.parse()?;
    let participants = parse_participants(args.positional(3, "participants")?);
    let custom = args.flag("split").map(parse_custom_splits).transpose()?;

    let paid_by = split_type.default_payer(&participants);
    let splits = calculate_splits_checked(
        split_type,
        total,
        &participants,
        &paid_by,
        custom.as_deref(),
    )?;
    let mut expense = NewExpense::new(title, total, paid_by, splits);
    if let Some(category) = args.flag("category") {
        expense = expense.with_category(category);
    }
    if let Some(note) = args.flag("note") {
        expense = expense.with_description(note);
    }

    match session.manager.add_expense_checked(expense)? {
        Some(id) => output::success(format!(
            "Expense {id} recorded: {title} for {}",
            session.money(total)
        )),
        None => output::warning(format!("Duplicate expense \"{title}\" ignored")),
    }
    Ok(())
}

fn describe_expense(session: &Session, expense: &SharedExpense) -> String {
    let status = if expense.is_settled {
        "settled"
    } else {
        "open"
    };
    format!(
        "{}  {}  {}  {}  paid by {}  [{}]",
        expense.id,
        expense.created_at.format("%Y-%m-%d"),
        expense.title,
        session.money(expense.total_amount),
        session.name(&expense.paid_by),
        status
    )
}

fn list_expenses(session: &Session, args: &Args) -> Result<(), CliError> {
    let expenses: Vec<&SharedExpense> = match args.flag("contact") {
        Some(contact) => session.manager.get_expenses_by_contact(contact),
        None => session.manager.expenses().iter().collect(),
    };
    output::section("Expenses");
    if expenses.is_empty() {
        output::info("No expenses recorded.");
    }
    for expense in expenses {
        output::info(describe_expense(session, expense));
        for split in &expense.splits {
            let marker = if split.is_settled { "✓" } else { " " };
            output::info(format!(
                "    [{marker}] {} owes {} ({:.1}%)",
                session.name(&split.contact_id),
                session.money(split.amount),
                split.percentage
            ));
        }
    }
    Ok(())
}

fn balances(session: &Session) -> Result<(), CliError> {
    let balances = session.manager.get_contact_balances();
    let epsilon = session.manager.policy().balance_epsilon;
    output::section("Balances");
    if balances.is_empty() {
        output::info("All settled up.");
    }
    for balance in &balances {
        let name = session.manager.contacts().display_name(&balance.contact_id);
        let amount = session.money(balance.net_balance.abs());
        let line = match balance.direction(epsilon) {
            BalanceDirection::OwedToYou => format!("{name} owes you {amount}"),
            BalanceDirection::YouOwe => format!("You owe {name} {amount}"),
            BalanceDirection::Even => format!("{name}: even, unsettled expenses remain"),
        };
        output::info(output::signed(line, balance.net_balance));
    }
    output::info(format!(
        "Owed to you: {}  |  You owe: {}",
        session.money(session.manager.total_owed_to_you()),
        session.money(session.manager.total_you_owe())
    ));
    Ok(())
}

fn settle(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let expense_id = args.positional(0, "expense-id")?;
    let participant = parse_participants(args.positional(1, "participant")?)
        .pop()
        .ok_or_else(|| CliError::Usage("missing <participant>".into()))?;
    if session.manager.expense(expense_id).is_none() {
        return Err(LedgerError::ExpenseNotFound(expense_id.to_string()).into());
    }
    if session.manager.settle_expense(expense_id, &participant) {
        output::success(format!(
            "Split for {} settled",
            session.name(&participant)
        ));
    } else {
        output::warning("Nothing changed");
    }
    Ok(())
}

fn settle_all(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let contact = args.positional(0, "contact-id")?;
    let changed = session.manager.settle_all_with_contact(contact);
    output::success(format!(
        "Settled {changed} split(s) with {}",
        session.manager.contacts().display_name(contact)
    ));
    Ok(())
}

fn wallet_from(args: &Args) -> Result<InMemoryWallet, CliError> {
    let raw = args
        .flag("wallet")
        .ok_or_else(|| CliError::Usage("--wallet <balance> is required".into()))?;
    Ok(InMemoryWallet::new(parse_number(raw, "balance")?))
}

fn report_receipt(session: &Session, receipt: &SettlementReceipt, wallet: &InMemoryWallet) {
    let amount = session.money(receipt.amount);
    let subject = match &receipt.expense_title {
        Some(title) => format!(" for \"{title}\""),
        None => String::new(),
    };
    let line = match receipt.direction {
        BalanceDirection::OwedToYou => {
            format!("Received {amount} from {}{subject}", receipt.contact_name)
        }
        BalanceDirection::YouOwe => format!("Paid {amount} to {}{subject}", receipt.contact_name),
        BalanceDirection::Even => format!("Settled up with {}", receipt.contact_name),
    };
    output::success(line);
    output::info(format!("Wallet balance: {}", session.money(wallet.balance())));
}

fn settle_up(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let contact = args.positional(0, "contact-id")?;
    let mut wallet = wallet_from(args)?;
    let receipt = session
        .manager
        .settle_up_with_contact(contact, &mut wallet)?;
    report_receipt(session, &receipt, &wallet);
    Ok(())
}

fn settle_single(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let expense_id = args.positional(0, "expense-id")?;
    let contact = args.positional(1, "contact-id")?;
    let mut wallet = wallet_from(args)?;
    let receipt = session
        .manager
        .settle_single_expense(expense_id, contact, &mut wallet)?;
    report_receipt(session, &receipt, &wallet);
    Ok(())
}

fn delete(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let expense_id = args.positional(0, "expense-id")?;
    let removed = session
        .manager
        .delete_expense(expense_id)
        .ok_or_else(|| LedgerError::ExpenseNotFound(expense_id.to_string()))?;
    output::success(format!("Deleted {}", removed.display_label()));
    Ok(())
}

fn remind(session: &mut Session, args: &Args) -> Result<(), CliError> {
    let contact = args.positional(0, "contact-id")?;
    let name = session.manager.contacts().display_name(contact);
    if let Some(previous) = session.manager.last_reminder_date(contact) {
        output::info(format!(
            "Last reminder to {name}: {}",
            previous.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    let sent = session.manager.send_reminder(contact);
    output::success(format!(
        "Reminder sent to {name} at {}",
        sent.format("%Y-%m-%d %H:%M UTC")
    ));
    Ok(())
}
