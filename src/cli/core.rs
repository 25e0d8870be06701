//! Core CLI dispatch, error types, and shell context helpers.

use std::{collections::HashMap, io, time::Instant};

use chrono::{DateTime, Utc};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use uuid::Uuid;

use crate::{
    config::Language,
    core::{edit_session::FormError, profile::ProfileError, services::ServiceError},
    errors::BudgetError,
    ledger::{parse_timestamp, CategoryKey, Transaction, TransactionKind},
};

use super::io::{self as cli_io, Confirmation};
use super::output::{self, MessageKind};
pub use super::shell_context::{short_id, CliMode, ShellContext, SHORT_ID_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Budget(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// Failures that end the shell itself rather than a single command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let outcome = handler(self, args);
        self.announce_notifications();
        match outcome {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Script mode answers yes so piped sessions never block.
    pub(crate) fn confirm(&self, confirmation: Confirmation<'_>) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, confirmation)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                tracing::debug!(command = ?self.last_command, error = %other, "command failed");
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    /// Prints toasts raised since the last command and drops expired ones.
    pub(crate) fn announce_notifications(&mut self) {
        for toast in self.notifications.active() {
            if self.announced.insert(toast.id) {
                output::print(MessageKind::from(toast.severity), &toast.message);
            }
        }
        self.notifications.prune_expired(Instant::now());
        let live: Vec<Uuid> = self
            .notifications
            .active()
            .into_iter()
            .map(|toast| toast.id)
            .collect();
        self.announced.retain(|id| live.contains(id));
    }

    pub(crate) fn language(&self) -> Language {
        self.preferences.language()
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        self.preferences.currency().format(amount)
    }

    /// Resolves `#N` or a short number as a 1-based listing position, otherwise
    /// a full id or a unique id prefix.
    ///
    /// Tokens as long as a listed short id are never read as positions, so an
    /// all-digit id copied from `list` selects that record.
    pub(crate) fn resolve_transaction(&self, token: &str) -> Result<Uuid, CommandError> {
        let token = token.trim();
        let position = match token.strip_prefix('#') {
            Some(number) => Some(number.parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{token}` is not a list position"))
            })?),
            None if token.len() < SHORT_ID_LEN => token.parse::<usize>().ok(),
            None => None,
        };
        if let Some(index) = position {
            return self
                .store
                .sorted_by_date()
                .get(index.wrapping_sub(1))
                .map(|txn| txn.id)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "no transaction at position {index} (see `list`)"
                    ))
                });
        }
        if let Ok(id) = Uuid::parse_str(token) {
            return Ok(id);
        }
        let prefix = token.to_ascii_lowercase().replace('-', "");
        if prefix.len() < 4 {
            return Err(CommandError::InvalidArguments(format!(
                "`{token}` is neither a list position nor an id"
            )));
        }
        let mut matches = self
            .store
            .transactions()
            .iter()
            .filter(|txn| txn.id.simple().to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn.id),
            (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
                "id prefix `{token}` is ambiguous"
            ))),
            (None, _) => Err(CommandError::Core(BudgetError::InvalidInput(format!(
                "no transaction matches `{token}`"
            )))),
        }
    }

    pub(crate) fn describe_row(&self, position: usize, txn: &Transaction) -> String {
        let appearance = self.classifier.classify_transaction(txn, self.language());
        let sign = if txn.is_income() { "+" } else { "-" };
        format!(
            "{:>3}. {}  {}  {:<7} {:<28} {} {:<14} {}{}",
            position,
            short_id(&txn.id),
            txn.date.format("%Y-%m-%d"),
            txn.kind.as_str(),
            truncate(&txn.description, 28),
            appearance.icon,
            appearance.name,
            sign,
            self.money(txn.amount)
        )
    }
}

/// Splits `--key value` pairs from positional arguments.
pub(crate) fn split_options<'a>(
    args: &[&'a str],
) -> Result<(Vec<&'a str>, HashMap<String, &'a str>), CommandError> {
    let mut positional = Vec::new();
    let mut options = HashMap::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(key) = arg.strip_prefix("--") {
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("option `--{key}` needs a value"))
            })?;
            options.insert(key.to_ascii_lowercase(), *value);
        } else {
            positional.push(*arg);
        }
    }
    Ok((positional, options))
}

pub(crate) fn parse_amount(value: &str) -> Result<f64, CommandError> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{value}` is not a valid amount")))
}

pub(crate) fn parse_kind(value: &str) -> Result<TransactionKind, CommandError> {
    TransactionKind::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown type `{value}` (expected income or expense)"
        ))
    })
}

pub(crate) fn parse_category(value: &str) -> Result<CategoryKey, CommandError> {
    CategoryKey::parse(value).ok_or_else(|| {
        let known: Vec<&str> = CategoryKey::ALL.iter().map(|key| key.as_str()).collect();
        CommandError::InvalidArguments(format!(
            "unknown category `{value}` (expected one of: {})",
            known.join(", ")
        ))
    })
}

pub(crate) fn parse_date(value: &str) -> Result<DateTime<Utc>, CommandError> {
    parse_timestamp(value).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
        shortened.push('…');
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction_store::TRANSACTIONS_KEY;
    use crate::storage::{KeyValueStore, MemoryStore};
    use serde_json::json;
    use std::{path::Path, sync::Arc};

    fn context_with_fixed_ids() -> ShellContext {
        let storage = Arc::new(MemoryStore::new());
        let record = |id: &str, description: &str, date: &str| {
            json!({"id": id, "description": description, "amount": 10,
                   "type": "expense", "date": date})
        };
        storage
            .set(
                TRANSACTIONS_KEY,
                &json!([
                    record("00000001-0000-4000-8000-000000000000", "Newest", "2024-03-01T00:00:00Z"),
                    record("00000003-0000-4000-8000-000000000000", "Middle", "2024-02-01T00:00:00Z"),
                    record("00000002-0000-4000-8000-000000000000", "Oldest", "2024-01-01T00:00:00Z"),
                ]),
            )
            .unwrap();
        ShellContext::with_storage(CliMode::Script, storage, Path::new("budget-test"))
    }

    fn description_of(context: &ShellContext, token: &str) -> String {
        let id = context.resolve_transaction(token).unwrap();
        context.store.get(id).unwrap().description.clone()
    }

    #[test]
    fn listed_short_ids_resolve_to_their_own_record() {
        let context = context_with_fixed_ids();
        let oldest = context.store.sorted_by_date()[2].id;
        assert_eq!(short_id(&oldest), "00000002");
        assert_eq!(description_of(&context, "00000002"), "Oldest");
        assert_eq!(description_of(&context, "2"), "Middle");
        assert_eq!(description_of(&context, "#3"), "Oldest");
        assert!(context.resolve_transaction("#x").is_err());
        assert!(context.resolve_transaction("#9").is_err());
    }

    #[test]
    fn options_are_split_from_positionals() {
        let (positional, options) =
            split_options(&["expense", "250", "Market", "--category", "food"]).unwrap();
        assert_eq!(positional, vec!["expense", "250", "Market"]);
        assert_eq!(options.get("category"), Some(&"food"));
        assert!(split_options(&["--date"]).is_err());
    }

    #[test]
    fn amounts_accept_decimal_commas() {
        assert_eq!(parse_amount("12,50").unwrap(), 12.5);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn long_descriptions_are_truncated() {
        assert_eq!(truncate("Market", 10), "Market");
        assert_eq!(truncate("Kıyafet alışverişi", 8), "Kıyafet…");
    }
}
