use chrono::Utc;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{
    parse_amount, parse_category, parse_date, parse_kind, short_id, split_options, CommandError,
    CommandResult, ShellContext,
};
use crate::cli::io::{self, Confirmation};
use crate::cli::output::{self, section as output_section};
use crate::core::services::{Period, SummaryService};
use crate::core::utils::export_dir_in;
use crate::core::{Notifier, TransactionDraft};
use crate::errors::BudgetError;
use crate::ledger::TransactionKind;
use crate::utils::persistence;

const DEFAULT_RECENT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "list",
            "List transactions, newest first",
            "list [all|year|month]",
            cmd_list,
        ),
        CommandDefinition::new(
            "recent",
            "Show the most recent transactions",
            "recent [count]",
            cmd_recent,
        ),
        CommandDefinition::new(
            "add",
            "Record a new income or expense",
            "add <income|expense> <amount> <description> [--category <key>] [--date YYYY-MM-DD]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Start editing a transaction",
            "edit <position|id>",
            cmd_edit,
        ),
        CommandDefinition::new(
            "update",
            "Save changes to the transaction being edited",
            "update [--amount <n>] [--description <text>] [--type <income|expense>] [--category <key>] [--date YYYY-MM-DD]",
            cmd_update,
        ),
        CommandDefinition::new("cancel", "Discard the current edit", "cancel", cmd_cancel),
        CommandDefinition::new(
            "remove",
            "Delete a transaction",
            "remove <position|id>",
            cmd_remove,
        ),
        CommandDefinition::new("clear", "Delete every transaction", "clear", cmd_clear),
        CommandDefinition::new(
            "demo",
            "Replace all transactions with generated demo data",
            "demo",
            cmd_demo,
        ),
        CommandDefinition::new(
            "export",
            "Write a JSON snapshot of all transactions",
            "export [directory]",
            cmd_export,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = match args.first() {
        Some(value) => SummaryService::parse_period(value)?,
        None => Period::All,
    };
    let policy = context.preferences.preferences().period_policy;
    let now = Utc::now();

    output_section(format!("Transactions ({period})"));
    let mut shown = 0;
    for (index, txn) in context.store.sorted_by_date().into_iter().enumerate() {
        if !period.contains(txn.date, policy, now) {
            continue;
        }
        output::line(context.describe_row(index + 1, txn));
        shown += 1;
    }
    if shown == 0 {
        io::print_info("No transactions found.");
    } else {
        io::print_info(format!("{shown} of {} transaction(s).", context.store.len()));
    }
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(value) => value.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{value}` is not a valid count"))
        })?,
        None => DEFAULT_RECENT,
    };
    output_section("Recent transactions");
    let recent = context.store.recent(limit);
    if recent.is_empty() {
        io::print_info("No transactions found.");
    }
    for (index, txn) in recent.into_iter().enumerate() {
        output::line(context.describe_row(index + 1, txn));
    }
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args)?;
    let [kind, amount, description @ ..] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: add <income|expense> <amount> <description> [--category <key>] [--date YYYY-MM-DD]".into(),
        ));
    };
    if context.session.is_editing() {
        return Err(CommandError::InvalidArguments(
            "an edit is in progress; use `update` to save it or `cancel` to discard it".into(),
        ));
    }

    let mut draft = TransactionDraft {
        description: description.join(" "),
        amount: Some(parse_amount(amount)?),
        kind: parse_kind(kind)?,
        ..TransactionDraft::default()
    };
    if let Some(category) = options.get("category") {
        draft.category = parse_category(category)?;
    }
    if let Some(date) = options.get("date") {
        draft.date = parse_date(date)?;
    }

    let id = draft.submit(&mut context.store, &mut context.session)?;
    let label = match draft.kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expense",
    };
    io::print_success(format!(
        "{label} `{}` added ({}, id {}).",
        draft.description.trim(),
        context.money(draft.amount.unwrap_or_default()),
        short_id(&id)
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: edit <position|id>".into()))?;
    let id = context.resolve_transaction(token)?;
    let txn = context
        .store
        .get(id)
        .cloned()
        .ok_or(BudgetError::TransactionNotFound(id))?;
    context.session.start_edit(&txn);
    io::print_info(format!(
        "Editing `{}` ({} {}, {}).",
        txn.description,
        txn.kind.as_str(),
        context.money(txn.amount),
        txn.date.format("%Y-%m-%d")
    ));
    io::print_hint("Use `update --amount <n> ...` to save or `cancel` to discard.");
    Ok(())
}

fn cmd_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !context.session.is_editing() {
        return Err(CommandError::InvalidArguments(
            "nothing is being edited; use `edit <position|id>` first".into(),
        ));
    }
    let (positional, options) = split_options(args)?;
    if let Some(extra) = positional.first() {
        return Err(CommandError::InvalidArguments(format!(
            "unexpected argument `{extra}`; use --amount, --description, --type, --category, or --date"
        )));
    }

    let mut draft = TransactionDraft::from_session(&context.session);
    if let Some(amount) = options.get("amount") {
        draft.amount = Some(parse_amount(amount)?);
    }
    if let Some(description) = options.get("description") {
        draft.description = description.to_string();
    }
    if let Some(kind) = options.get("type") {
        draft.kind = parse_kind(kind)?;
    }
    if let Some(category) = options.get("category") {
        draft.category = parse_category(category)?;
    }
    if let Some(date) = options.get("date") {
        draft.date = parse_date(date)?;
    }

    let id = draft.submit(&mut context.store, &mut context.session)?;
    io::print_success(format!("Transaction {} updated.", short_id(&id)));
    Ok(())
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.is_editing() {
        context.session.cancel_edit();
        io::print_info("Edit cancelled.");
    } else {
        io::print_info("Nothing to cancel.");
    }
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: remove <position|id>".into()))?;
    let id = context.resolve_transaction(token)?;
    let Some(description) = context.store.get(id).map(|txn| txn.description.clone()) else {
        io::print_info("Transaction already removed.");
        return Ok(());
    };
    if !context.confirm(Confirmation::Remove {
        description: &description,
    })? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    if context.store.remove(id).is_some() {
        if context.session.current().map(|txn| txn.id) == Some(id) {
            context.session.cancel_edit();
        }
        io::print_success(format!("Removed `{description}`."));
    }
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm(Confirmation::ClearAll {
        count: context.store.len(),
    })? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.store.clear_all();
    context.session.cancel_edit();
    context.notifications.warning("All transactions deleted.");
    Ok(())
}

fn cmd_demo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.store.is_empty()
        && !context.confirm(Confirmation::ReplaceWithDemo {
            count: context.store.len(),
        })?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.store.generate_demo();
    context.session.cancel_edit();
    context.notifications.info(&format!(
        "Demo data loaded ({} transactions).",
        context.store.len()
    ));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args.first() {
        Some(path) => std::path::PathBuf::from(path),
        None => export_dir_in(&context.data_dir),
    };
    let path = persistence::export_to_dir(
        context.store.transactions(),
        &dir,
        Utc::now().date_naive(),
    )?;
    io::print_success(format!("Exported to {}", path.display()));
    Ok(())
}
