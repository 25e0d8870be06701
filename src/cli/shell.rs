use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::commands::{argument_values, category_values, CommandRegistry};
use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io::Confirmation;
use crate::cli::output;

/// Environment variable that switches the shell to line-per-command stdin mode.
pub const SCRIPT_ENV: &str = "BUDGET_TRACKER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    tracing::info!(?mode, transactions = context.store.len(), "shell started");
    context.announce_notifications();

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ShellHelper::new(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::hint("Type `help` for commands, Tab or `?` to complete.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                if run_line(context, &line)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                let leave = context
                    .confirm(Confirmation::Exit)
                    .map_err(|err| CliError::Command(err.to_string()))?;
                if leave {
                    break;
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    output::info("Goodbye.");
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if run_line(context, &line?)? == LoopControl::Exit || !context.running {
            break;
        }
    }
    Ok(())
}

/// Runs one input line; blank lines and `#` comments are skipped.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.report_error(CommandError::InvalidArguments(format!(
                "could not parse `{line}`: {err}"
            )))?;
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    match context.dispatch(&raw.to_lowercase(), raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        Ok(LoopControl::Continue) => Ok(LoopControl::Continue),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

/// Completes command names, first arguments, `--` options, and category keys.
struct ShellHelper {
    commands: Vec<(&'static str, &'static str)>,
}

impl ShellHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<_> = registry
            .iter()
            .map(|command| (command.name, command.usage))
            .collect();
        commands.sort_unstable();
        Self { commands }
    }

    fn usage_of(&self, command: &str) -> Option<&'static str> {
        self.commands
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(command))
            .map(|(_, usage)| *usage)
    }

    fn options_of(&self, command: &str) -> Vec<String> {
        let Some(usage) = self.usage_of(command) else {
            return Vec::new();
        };
        let mut options: Vec<String> = usage
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .filter(|token| token.starts_with("--"))
            .map(str::to_string)
            .collect();
        options.dedup();
        options
    }

    fn candidates(&self, previous: &[&str], word: &str) -> Vec<String> {
        match previous {
            [] => self
                .commands
                .iter()
                .map(|(name, _)| name.to_string())
                .collect(),
            [.., "--category"] => category_values(),
            [command, ..] if word.starts_with("--") => self.options_of(command),
            [command] => argument_values(&command.to_ascii_lowercase()),
            _ => Vec::new(),
        }
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.completions(&line[..pos]);
        Ok((start, matches))
    }
}

impl ShellHelper {
    fn completions(&self, before: &str) -> (usize, Vec<Pair>) {
        let start = word_start(before);
        let word = &before[start..];
        let previous: Vec<&str> = before[..start].split_whitespace().collect();

        let matches = self
            .candidates(&previous, word)
            .into_iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        (start, matches)
    }
}

/// Byte offset where the last word of `text` begins.
fn word_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(0)
}

impl Hinter for ShellHelper {
    type Hint = String;

    /// After `<command> ` shows the rest of its usage line.
    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() || !line.ends_with(' ') {
            return None;
        }
        let mut words = line.split_whitespace();
        let command = words.next()?;
        if words.next().is_some() {
            return None;
        }
        let usage = self.usage_of(command)?;
        let rest = usage.split_once(' ')?.1;
        Some(rest.to_string())
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ShellHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::all_definitions;

    fn helper() -> ShellHelper {
        ShellHelper::new(&CommandRegistry::new(all_definitions()))
    }

    #[test]
    fn first_word_completes_command_names() {
        let names = helper().candidates(&[], "re");
        assert!(names.contains(&"recent".to_string()));
        assert!(names.contains(&"report".to_string()));
    }

    #[test]
    fn later_words_complete_values_and_options() {
        let helper = helper();
        assert_eq!(
            helper.candidates(&["report"], ""),
            vec!["all", "year", "month"]
        );
        assert!(helper
            .candidates(&["add", "expense", "12"], "--c")
            .contains(&"--category".to_string()));
        assert!(helper
            .candidates(&["add", "expense", "12", "Kira", "--category"], "")
            .contains(&"rent".to_string()));
        assert!(helper.candidates(&["add", "expense"], "").is_empty());
    }

    #[test]
    fn multibyte_whitespace_splits_words_on_char_boundaries() {
        let line = "report\u{3000}ye";
        assert_eq!(word_start(line), "report\u{3000}".len());
        let (start, matches) = helper().completions(line);
        assert_eq!(&line[start..], "ye");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].replacement, "year");
        assert_eq!(word_start("lang"), 0);
    }

    #[test]
    fn update_options_come_from_its_usage() {
        let options = helper().options_of("update");
        for expected in ["--amount", "--description", "--type", "--category", "--date"] {
            assert!(options.contains(&expected.to_string()), "missing {expected}");
        }
    }
}
