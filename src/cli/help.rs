use crate::cli::commands::{
    argument_values, category_values, CommandDefinition, CommandGroup, CommandRegistry,
};
use crate::cli::output::{self, section as output_section};

pub fn print_overview(registry: &CommandRegistry) {
    let width = registry
        .iter()
        .map(|command| command.name.len())
        .max()
        .unwrap_or(0);
    for group in CommandGroup::ALL {
        output_section(group);
        for command in registry.in_group(group) {
            output::line(format!(
                "  {:<width$}  {}",
                command.name, command.description
            ));
        }
    }
    output::hint("Use `help <command>` for usage and accepted values.");
}

pub fn print_command(command: &CommandDefinition) {
    output_section(format!("{} ({})", command.name, command.group));
    output::line(format!("  {}", command.description));
    output::line(format!("  Usage : {}", command.usage));
    let values = argument_values(command.name);
    if !values.is_empty() {
        output::line(format!("  Values: {}", values.join(", ")));
    }
    if command.usage.contains("--category") {
        output::line(format!("  Categories: {}", category_values().join(", ")));
    }
}
