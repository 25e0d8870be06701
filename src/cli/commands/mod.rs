use std::{collections::HashMap, fmt};

pub mod report;
pub mod settings;
pub mod system;
pub mod transaction;

use crate::cli::core::{CommandResult, ShellContext};
use crate::config::{Currency, Language, PeriodPolicy, Theme};
use crate::ledger::CategoryKey;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    [
        (CommandGroup::Transactions, transaction::definitions()),
        (CommandGroup::Reports, report::definitions()),
        (CommandGroup::Settings, settings::definitions()),
        (CommandGroup::System, system::definitions()),
    ]
    .into_iter()
    .flat_map(|(group, definitions)| {
        definitions
            .into_iter()
            .map(move |definition| definition.in_group(group))
    })
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Transactions,
    Reports,
    Settings,
    System,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 4] = [
        CommandGroup::Transactions,
        CommandGroup::Reports,
        CommandGroup::Settings,
        CommandGroup::System,
    ];
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandGroup::Transactions => "Transactions",
            CommandGroup::Reports => "Reports",
            CommandGroup::Settings => "Settings",
            CommandGroup::System => "System",
        })
    }
}

/// Literal values a command accepts as its first argument, for completion and help.
pub(crate) fn argument_values(command: &str) -> Vec<String> {
    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    match command {
        "list" | "categories" | "report" => owned(&["all", "year", "month"]),
        "add" => owned(&["income", "expense"]),
        "lang" => [Language::Tr, Language::En]
            .iter()
            .map(|language| language.code().to_string())
            .collect(),
        "currency" => [Currency::Try, Currency::Usd, Currency::Eur, Currency::Gbp]
            .iter()
            .map(|currency| currency.code().to_string())
            .collect(),
        "theme" => vec![
            Theme::Light.to_string(),
            Theme::Dark.to_string(),
            "toggle".to_string(),
        ],
        "policy" => vec![
            PeriodPolicy::Calendar.to_string(),
            PeriodPolicy::Rolling.to_string(),
            "months".to_string(),
        ],
        "profile" => owned(&["set"]),
        "toasts" => owned(&["clear"]),
        _ => Vec::new(),
    }
}

/// Values completed after `--category`.
pub(crate) fn category_values() -> Vec<String> {
    CategoryKey::ALL
        .iter()
        .map(|key| key.as_str().to_string())
        .collect()
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub group: CommandGroup,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            group: CommandGroup::System,
            handler,
        }
    }

    pub(crate) fn in_group(mut self, group: CommandGroup) -> Self {
        self.group = group;
        self
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn in_group(&self, group: CommandGroup) -> impl Iterator<Item = &CommandDefinition> {
        self.iter().filter(move |definition| definition.group == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shell_command_is_registered_once() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        for expected in [
            "help", "version", "list", "recent", "add", "edit", "cancel", "update", "remove",
            "totals", "report", "categories", "history", "dashboard", "demo", "clear", "export",
            "profile", "lang", "currency", "theme", "policy", "toasts", "exit",
        ] {
            assert!(registry.get(expected).is_some(), "missing `{expected}`");
        }
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn commands_are_grouped_by_concern() {
        let registry = CommandRegistry::new(all_definitions());
        assert_eq!(registry.get("add").map(|c| c.group), Some(CommandGroup::Transactions));
        assert_eq!(registry.get("history").map(|c| c.group), Some(CommandGroup::Reports));
        assert_eq!(registry.get("currency").map(|c| c.group), Some(CommandGroup::Settings));
        assert_eq!(registry.get("exit").map(|c| c.group), Some(CommandGroup::System));
        let grouped: usize = CommandGroup::ALL
            .iter()
            .map(|group| registry.in_group(*group).count())
            .sum();
        assert_eq!(grouped, registry.iter().count());
    }

    #[test]
    fn argument_values_follow_setting_enums() {
        assert_eq!(argument_values("lang"), vec!["tr", "en"]);
        assert!(argument_values("currency").contains(&"EUR".to_string()));
        assert!(argument_values("policy").contains(&"rolling".to_string()));
        assert!(argument_values("dashboard").is_empty());
        assert!(category_values().contains(&"entertainment".to_string()));
    }
}
