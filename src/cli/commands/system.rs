use crate::cli::commands::{CommandDefinition, CommandGroup};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::core::utils::store_dir_in;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "Show commands, one section, or one command in detail",
            "help [command|transactions|reports|settings|system]",
            cmd_help,
        ),
        CommandDefinition::new(
            "version",
            "Show build metadata and where data is stored",
            "version",
            cmd_version,
        ),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(topic) = args.first() else {
        help::print_overview(&context.registry);
        return Ok(());
    };
    let topic = topic.to_lowercase();

    if let Some(command) = context.registry.get(&topic) {
        help::print_command(command);
    } else if let Some(group) = CommandGroup::ALL
        .into_iter()
        .find(|group| group.to_string().eq_ignore_ascii_case(&topic))
    {
        output_section(group);
        for command in context.registry.in_group(group) {
            output::line(format!("  {:<40} {}", command.usage, command.description));
        }
    } else {
        context.suggest_command(&topic);
    }
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Budget Tracker {}", meta.version));
    io::print_info(format!("  Build        : {} ({})", meta.git_hash, meta.git_status));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {} / {}", meta.target, meta.profile));
    io::print_info(format!("  Compiler     : {}", meta.rustc));
    io::print_info(format!(
        "  Store        : {}",
        store_dir_in(&context.data_dir).display()
    ));
    io::print_info(format!(
        "  Transactions : {} (revision {})",
        context.store.len(),
        context.store.revision()
    ));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
