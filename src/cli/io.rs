use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;

pub use crate::cli::output::{
    error as print_error, hint as print_hint, info as print_info, success as print_success,
    warning as print_warning,
};

/// Actions that ask before they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation<'a> {
    Remove { description: &'a str },
    ClearAll { count: usize },
    ReplaceWithDemo { count: usize },
    Exit,
}

impl Confirmation<'_> {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::Remove { description } => format!("Delete `{description}`?"),
            Confirmation::ClearAll { count } => {
                format!("Delete all {count} transaction(s)? This cannot be undone.")
            }
            Confirmation::ReplaceWithDemo { count } => {
                format!("Replace {count} transaction(s) with demo data?")
            }
            Confirmation::Exit => "Exit shell?".to_string(),
        }
    }

    /// Leaving is the only action that defaults to yes.
    pub fn default_answer(&self) -> bool {
        matches!(self, Confirmation::Exit)
    }
}

pub fn confirm_action(
    theme: &ColorfulTheme,
    confirmation: Confirmation<'_>,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(confirmation.prompt())
        .default(confirmation.default_answer())
        .interact()
        .map_err(CommandError::from)
}
