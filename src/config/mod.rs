//! User preferences persisted through the key-value store.

use serde::{de::Deserializer, Deserialize, Serialize};
use std::{fmt, sync::Arc};

use crate::core::notifications::Notifier;
use crate::storage::{load_item, save_item, KeyValueStore};

pub const LANGUAGE_KEY: &str = "app_lang";
pub const CURRENCY_KEY: &str = "app_currency";
pub const THEME_KEY: &str = "theme";
pub const PREFERENCES_KEY: &str = "app_prefs";

const DEFAULT_HISTORY_MONTHS: u32 = 6;
/// Upper bound for the monthly history length.
pub const MAX_HISTORY_MONTHS: u32 = 36;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Tr,
    En,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tr" | "turkish" | "türkçe" => Some(Language::Tr),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    /// Chooses between a Turkish and an English literal.
    pub fn pick(self, tr: &'static str, en: &'static str) -> &'static str {
        match self {
            Language::Tr => tr,
            Language::En => en,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Tr
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| Language::parse(&v))
            .unwrap_or_default())
    }
}

/// Display currency. Only the symbol changes; amounts are never converted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Try,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRY" => Some(Currency::Try),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Try => "₺",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    /// Formats `amount` with the symbol, thousands separators, and two decimals.
    pub fn format(self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = (cents / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (idx, ch) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{sign}{}{grouped}.{:02}", self.symbol(), cents % 100)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Try
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| Currency::parse(&v))
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// How `year`/`month` report periods are bounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPolicy {
    /// Same calendar year or calendar month as today.
    #[default]
    Calendar,
    /// Trailing 365 or 30 days ending today.
    Rolling,
}

impl PeriodPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calendar" => Some(PeriodPolicy::Calendar),
            "rolling" => Some(PeriodPolicy::Rolling),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PeriodPolicy::Calendar => "calendar",
            PeriodPolicy::Rolling => "rolling",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct ReportSettings {
    #[serde(default)]
    period_policy: PeriodPolicy,
    #[serde(default = "Preferences::default_history_months")]
    history_months: u32,
}

/// Stores user-configurable display and reporting preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
    pub currency: Currency,
    pub theme: Theme,
    pub period_policy: PeriodPolicy,
    pub history_months: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::default(),
            currency: Currency::default(),
            theme: Theme::default(),
            period_policy: PeriodPolicy::default(),
            history_months: Self::default_history_months(),
        }
    }
}

impl Preferences {
    pub fn default_history_months() -> u32 {
        DEFAULT_HISTORY_MONTHS
    }

    /// Reads each preference from its own key, defaulting anything missing or unreadable.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let report: Option<ReportSettings> = load_item(storage, PREFERENCES_KEY);
        Self {
            language: load_item(storage, LANGUAGE_KEY).unwrap_or(defaults.language),
            currency: load_item(storage, CURRENCY_KEY).unwrap_or(defaults.currency),
            theme: load_item(storage, THEME_KEY).unwrap_or(defaults.theme),
            period_policy: report
                .as_ref()
                .map(|settings| settings.period_policy)
                .unwrap_or(defaults.period_policy),
            history_months: report
                .map(|settings| settings.history_months.clamp(1, MAX_HISTORY_MONTHS))
                .unwrap_or(defaults.history_months),
        }
    }
}

/// Owns the active [`Preferences`] and persists every change.
pub struct PreferencesService {
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    current: Preferences,
}

impl PreferencesService {
    pub fn load(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let current = Preferences::load(storage.as_ref());
        Self {
            storage,
            notifier,
            current,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.current
    }

    pub fn language(&self) -> Language {
        self.current.language
    }

    pub fn currency(&self) -> Currency {
        self.current.currency
    }

    pub fn currency_symbol(&self) -> &'static str {
        self.current.currency.symbol()
    }

    pub fn set_language(&mut self, language: Language) {
        self.current.language = language;
        if self.persist(LANGUAGE_KEY, &language) {
            self.notifier.success(
                language.pick("Dil başarıyla değiştirildi.", "Language changed successfully."),
            );
        }
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.current.currency = currency;
        if self.persist(CURRENCY_KEY, &currency) {
            self.notifier.success(
                self.current
                    .language
                    .pick("Para birimi güncellendi.", "Currency updated."),
            );
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.current.theme = theme;
        self.persist(THEME_KEY, &theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.current.theme.toggled();
        self.set_theme(next);
        next
    }

    pub fn set_period_policy(&mut self, policy: PeriodPolicy) {
        self.current.period_policy = policy;
        self.persist_report_settings();
    }

    pub fn set_history_months(&mut self, months: u32) {
        self.current.history_months = months.clamp(1, MAX_HISTORY_MONTHS);
        self.persist_report_settings();
    }

    fn persist_report_settings(&self) {
        let settings = ReportSettings {
            period_policy: self.current.period_policy,
            history_months: self.current.history_months,
        };
        self.persist(PREFERENCES_KEY, &settings);
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match save_item(self.storage.as_ref(), key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to persist preference");
                self.notifier.error(&format!(
                    "{} {err}",
                    self.current
                        .language
                        .pick("Ayar kaydedilemedi:", "Could not save setting:")
                ));
                false
            }
        }
    }
}
