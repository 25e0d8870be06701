use std::time::Instant;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, section as output_section};
use crate::config::{Currency, Language, PeriodPolicy, Theme};
use crate::core::profile::UserProfile;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "profile",
            "Show or update the user profile",
            "profile [set <first> <last> <email> [role]]",
            cmd_profile,
        ),
        CommandDefinition::new(
            "lang",
            "Show or change the display language",
            "lang [tr|en]",
            cmd_lang,
        ),
        CommandDefinition::new(
            "currency",
            "Show or change the display currency",
            "currency [TRY|USD|EUR|GBP]",
            cmd_currency,
        ),
        CommandDefinition::new(
            "theme",
            "Show, set, or toggle the theme",
            "theme [light|dark|toggle]",
            cmd_theme,
        ),
        CommandDefinition::new(
            "policy",
            "Show or change how report periods are bounded",
            "policy [calendar|rolling] | policy months <n>",
            cmd_policy,
        ),
        CommandDefinition::new(
            "toasts",
            "List or dismiss pending notifications",
            "toasts [clear]",
            cmd_toasts,
        ),
    ]
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => {
            let profile = context.profile.profile();
            output_section("Profile");
            io::print_info(format!("  Name   : {}", profile.full_name()));
            io::print_info(format!("  Email  : {}", profile.email));
            io::print_info(format!("  Role   : {}", profile.role));
            io::print_info(format!("  Avatar : {}", profile.avatar_text));
            Ok(())
        }
        Some((action, rest)) if action.eq_ignore_ascii_case("set") => {
            let [first, last, email, role @ ..] = rest else {
                return Err(CommandError::InvalidArguments(
                    "usage: profile set <first> <last> <email> [role]".into(),
                ));
            };
            let role = if role.is_empty() {
                context.profile.profile().role.clone()
            } else {
                role.join(" ")
            };
            let data = UserProfile {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                role,
                avatar_text: String::new(),
            };
            context.profile.update(data)?;
            Ok(())
        }
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown profile action `{other}`"
        ))),
    }
}

fn cmd_lang(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(value) = args.first() else {
        io::print_info(format!("Language: {}", context.preferences.language()));
        return Ok(());
    };
    let language = Language::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!("unknown language `{value}` (expected tr or en)"))
    })?;
    context.preferences.set_language(language);
    Ok(())
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(value) = args.first() else {
        io::print_info(format!(
            "Currency: {} ({})",
            context.preferences.currency(),
            context.preferences.currency_symbol()
        ));
        return Ok(());
    };
    let currency = Currency::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown currency `{value}` (expected TRY, USD, EUR, or GBP)"
        ))
    })?;
    context.preferences.set_currency(currency);
    Ok(())
}

fn cmd_theme(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let theme = match args.first() {
        None => {
            io::print_info(format!("Theme: {}", context.preferences.preferences().theme));
            return Ok(());
        }
        Some(value) if value.eq_ignore_ascii_case("toggle") => context.preferences.toggle_theme(),
        Some(value) => {
            let theme = Theme::parse(value).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown theme `{value}` (expected light, dark, or toggle)"
                ))
            })?;
            context.preferences.set_theme(theme);
            theme
        }
    };
    io::print_success(format!("Theme set to {theme}."));
    Ok(())
}

fn cmd_policy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let prefs = context.preferences.preferences();
            io::print_info(format!("Period policy : {}", prefs.period_policy));
            io::print_info(format!("History months: {}", prefs.history_months));
            Ok(())
        }
        [action, months] if action.eq_ignore_ascii_case("months") => {
            let months = months.parse::<u32>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{months}` is not a valid month count"))
            })?;
            context.preferences.set_history_months(months);
            io::print_success(format!(
                "History length set to {} month(s).",
                context.preferences.preferences().history_months
            ));
            Ok(())
        }
        [value] => {
            let policy = PeriodPolicy::parse(value).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown policy `{value}` (expected calendar or rolling)"
                ))
            })?;
            context.preferences.set_period_policy(policy);
            io::print_success(format!("Period policy set to {policy}."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: policy [calendar|rolling] | policy months <n>".into(),
        )),
    }
}

fn cmd_toasts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args
        .first()
        .is_some_and(|action| action.eq_ignore_ascii_case("clear"))
    {
        let dismissed = context.notifications.drain().len();
        context.announced.clear();
        io::print_info(format!("Dismissed {dismissed} notification(s)."));
        return Ok(());
    }

    context.notifications.prune_expired(Instant::now());
    let toasts = context.notifications.active();
    output_section("Notifications");
    if toasts.is_empty() {
        io::print_info("No pending notifications.");
    }
    let now = Instant::now();
    for toast in toasts {
        let remaining = toast
            .expires_at()
            .map(|deadline| format!("{:.1}s left", deadline.saturating_duration_since(now).as_secs_f64()))
            .unwrap_or_else(|| "sticky".to_string());
        output::line(format!("  [{}] {} ({remaining})", toast.severity, toast.message));
    }
    Ok(())
}
