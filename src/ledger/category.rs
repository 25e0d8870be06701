use serde::{de::Deserializer, Deserialize, Serialize};
use std::fmt;

use crate::config::Language;

/// Fixed set of categories a transaction can be tagged with.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Food,
    Transport,
    Shopping,
    Bills,
    Rent,
    Entertainment,
    Health,
    Education,
    Salary,
    Freelance,
    Investment,
    Other,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 12] = [
        CategoryKey::Food,
        CategoryKey::Transport,
        CategoryKey::Shopping,
        CategoryKey::Bills,
        CategoryKey::Rent,
        CategoryKey::Entertainment,
        CategoryKey::Health,
        CategoryKey::Education,
        CategoryKey::Salary,
        CategoryKey::Freelance,
        CategoryKey::Investment,
        CategoryKey::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Food => "food",
            CategoryKey::Transport => "transport",
            CategoryKey::Shopping => "shopping",
            CategoryKey::Bills => "bills",
            CategoryKey::Rent => "rent",
            CategoryKey::Entertainment => "entertainment",
            CategoryKey::Health => "health",
            CategoryKey::Education => "education",
            CategoryKey::Salary => "salary",
            CategoryKey::Freelance => "freelance",
            CategoryKey::Investment => "investment",
            CategoryKey::Other => "other",
        }
    }

    /// Parses a category key; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
    }

    pub fn icon(self) -> &'static str {
        match self {
            CategoryKey::Food => "🍔",
            CategoryKey::Transport => "🚗",
            CategoryKey::Shopping => "🛍",
            CategoryKey::Bills => "💡",
            CategoryKey::Rent => "🏠",
            CategoryKey::Entertainment => "🎬",
            CategoryKey::Health => "💊",
            CategoryKey::Education => "📚",
            CategoryKey::Salary => "💼",
            CategoryKey::Freelance => "💻",
            CategoryKey::Investment => "📈",
            CategoryKey::Other => "📦",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            CategoryKey::Food => "#f97316",
            CategoryKey::Transport => "#3b82f6",
            CategoryKey::Shopping => "#ec4899",
            CategoryKey::Bills => "#eab308",
            CategoryKey::Rent => "#8b5cf6",
            CategoryKey::Entertainment => "#14b8a6",
            CategoryKey::Health => "#ef4444",
            CategoryKey::Education => "#6366f1",
            CategoryKey::Salary => "#22c55e",
            CategoryKey::Freelance => "#10b981",
            CategoryKey::Investment => "#0ea5e9",
            CategoryKey::Other => "#64748b",
        }
    }

    pub fn name(self, language: Language) -> &'static str {
        match language {
            Language::Tr => match self {
                CategoryKey::Food => "Yemek & Market",
                CategoryKey::Transport => "Ulaşım",
                CategoryKey::Shopping => "Alışveriş",
                CategoryKey::Bills => "Faturalar",
                CategoryKey::Rent => "Kira",
                CategoryKey::Entertainment => "Eğlence",
                CategoryKey::Health => "Sağlık",
                CategoryKey::Education => "Eğitim",
                CategoryKey::Salary => "Maaş",
                CategoryKey::Freelance => "Serbest Çalışma",
                CategoryKey::Investment => "Yatırım",
                CategoryKey::Other => "Diğer",
            },
            Language::En => match self {
                CategoryKey::Food => "Food & Groceries",
                CategoryKey::Transport => "Transport",
                CategoryKey::Shopping => "Shopping",
                CategoryKey::Bills => "Bills",
                CategoryKey::Rent => "Rent",
                CategoryKey::Entertainment => "Entertainment",
                CategoryKey::Health => "Health",
                CategoryKey::Education => "Education",
                CategoryKey::Salary => "Salary",
                CategoryKey::Freelance => "Freelance",
                CategoryKey::Investment => "Investment",
                CategoryKey::Other => "Other",
            },
        }
    }
}

impl Default for CategoryKey {
    fn default() -> Self {
        CategoryKey::Other
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(CategoryKey::parse(&value).unwrap_or_default())
    }
}
