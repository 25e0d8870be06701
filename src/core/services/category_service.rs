//! Resolves the display category of a transaction.
//!
//! An explicit category always wins unless it is `other`. Otherwise the
//! description is matched against an ordered keyword table where the first
//! matching substring decides; nothing matching falls back to `other`.

use once_cell::sync::Lazy;

use crate::config::Language;
use crate::ledger::{CategoryKey, Transaction};

/// Icon, color, and localized name used to render a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryAppearance {
    pub key: CategoryKey,
    pub icon: &'static str,
    pub color: &'static str,
    pub name: &'static str,
}

impl CategoryAppearance {
    pub fn of(key: CategoryKey, language: Language) -> Self {
        Self {
            key,
            icon: key.icon(),
            color: key.color(),
            name: key.name(language),
        }
    }
}

const TURKISH_KEYWORDS: &[(&str, CategoryKey)] = &[
    ("maaş", CategoryKey::Salary),
    ("ikramiye", CategoryKey::Salary),
    ("serbest", CategoryKey::Freelance),
    ("proje ödemesi", CategoryKey::Freelance),
    ("yatırım", CategoryKey::Investment),
    ("temettü", CategoryKey::Investment),
    ("hisse", CategoryKey::Investment),
    ("faiz", CategoryKey::Investment),
    ("araç kiralama", CategoryKey::Transport),
    ("kira", CategoryKey::Rent),
    ("aidat", CategoryKey::Rent),
    ("fatura", CategoryKey::Bills),
    ("elektrik", CategoryKey::Bills),
    ("doğalgaz", CategoryKey::Bills),
    ("internet", CategoryKey::Bills),
    ("telefon", CategoryKey::Bills),
    ("süpermarket", CategoryKey::Food),
    ("market", CategoryKey::Food),
    ("restoran", CategoryKey::Food),
    ("yemek", CategoryKey::Food),
    ("kahve", CategoryKey::Food),
    ("manav", CategoryKey::Food),
    ("fırın", CategoryKey::Food),
    ("benzin", CategoryKey::Transport),
    ("akaryakıt", CategoryKey::Transport),
    ("otobüs", CategoryKey::Transport),
    ("metro", CategoryKey::Transport),
    ("taksi", CategoryKey::Transport),
    ("ulaşım", CategoryKey::Transport),
    ("sinema", CategoryKey::Entertainment),
    ("konser", CategoryKey::Entertainment),
    ("tiyatro", CategoryKey::Entertainment),
    ("eğlence", CategoryKey::Entertainment),
    ("eczane", CategoryKey::Health),
    ("hastane", CategoryKey::Health),
    ("doktor", CategoryKey::Health),
    ("ilaç", CategoryKey::Health),
    ("kurs", CategoryKey::Education),
    ("okul", CategoryKey::Education),
    ("kitap", CategoryKey::Education),
    ("eğitim", CategoryKey::Education),
    ("alışveriş", CategoryKey::Shopping),
    ("giyim", CategoryKey::Shopping),
    ("kıyafet", CategoryKey::Shopping),
];

const ENGLISH_KEYWORDS: &[(&str, CategoryKey)] = &[
    ("salary", CategoryKey::Salary),
    ("payroll", CategoryKey::Salary),
    ("bonus", CategoryKey::Salary),
    ("freelance", CategoryKey::Freelance),
    ("invoice", CategoryKey::Freelance),
    ("consulting", CategoryKey::Freelance),
    ("dividend", CategoryKey::Investment),
    ("investment", CategoryKey::Investment),
    ("stock", CategoryKey::Investment),
    ("car rental", CategoryKey::Transport),
    ("electricity", CategoryKey::Bills),
    ("utility", CategoryKey::Bills),
    ("phone", CategoryKey::Bills),
    ("bill", CategoryKey::Bills),
    ("rent", CategoryKey::Rent),
    ("mortgage", CategoryKey::Rent),
    ("grocer", CategoryKey::Food),
    ("restaurant", CategoryKey::Food),
    ("coffee", CategoryKey::Food),
    ("lunch", CategoryKey::Food),
    ("dinner", CategoryKey::Food),
    ("training", CategoryKey::Education),
    ("tuition", CategoryKey::Education),
    ("course", CategoryKey::Education),
    ("school", CategoryKey::Education),
    ("book", CategoryKey::Education),
    ("fuel", CategoryKey::Transport),
    ("taxi", CategoryKey::Transport),
    ("uber", CategoryKey::Transport),
    ("train", CategoryKey::Transport),
    ("parking", CategoryKey::Transport),
    ("cinema", CategoryKey::Entertainment),
    ("movie", CategoryKey::Entertainment),
    ("concert", CategoryKey::Entertainment),
    ("netflix", CategoryKey::Entertainment),
    ("spotify", CategoryKey::Entertainment),
    ("pharmacy", CategoryKey::Health),
    ("doctor", CategoryKey::Health),
    ("hospital", CategoryKey::Health),
    ("medicine", CategoryKey::Health),
    ("shopping", CategoryKey::Shopping),
    ("clothes", CategoryKey::Shopping),
    ("amazon", CategoryKey::Shopping),
];

/// Ordered `(prefix, category)` pairs evaluated first-match-wins.
///
/// A keyword matches where a word starts, so `rent` hits "rental" but not "parent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<(String, CategoryKey)>,
}

impl KeywordTable {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, CategoryKey)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(keyword, key)| (normalize(keyword), key))
                .filter(|(keyword, _)| !keyword.is_empty())
                .collect(),
        }
    }

    pub fn turkish() -> Self {
        Self::new(TURKISH_KEYWORDS.iter().copied())
    }

    pub fn english() -> Self {
        Self::new(ENGLISH_KEYWORDS.iter().copied())
    }

    /// Appends `other` after this table, so this table's entries take precedence.
    pub fn chain(mut self, other: KeywordTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First category whose keyword starts a word of the already-normalized `text`.
    pub fn lookup(&self, text: &str) -> Option<CategoryKey> {
        self.entries
            .iter()
            .find(|(keyword, _)| starts_a_word(text, keyword))
            .map(|(_, key)| *key)
    }
}

fn starts_a_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(idx, _)| {
        text[..idx]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClassifier {
    keywords: KeywordTable,
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(KeywordTable::turkish().chain(KeywordTable::english()))
    }
}

static DEFAULT_CLASSIFIER: Lazy<CategoryClassifier> = Lazy::new(CategoryClassifier::default);

impl CategoryClassifier {
    pub fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    /// Shared classifier using the built-in Turkish then English keyword tables.
    pub fn shared() -> &'static CategoryClassifier {
        &DEFAULT_CLASSIFIER
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn resolve(&self, category: Option<CategoryKey>, description: &str) -> CategoryKey {
        match category {
            Some(key) if key != CategoryKey::Other => key,
            _ => self
                .keywords
                .lookup(&normalize(description))
                .unwrap_or(CategoryKey::Other),
        }
    }

    pub fn classify(
        &self,
        category: Option<CategoryKey>,
        description: &str,
        language: Language,
    ) -> CategoryAppearance {
        CategoryAppearance::of(self.resolve(category, description), language)
    }

    pub fn classify_transaction(
        &self,
        transaction: &Transaction,
        language: Language,
    ) -> CategoryAppearance {
        self.classify(transaction.category, &transaction.description, language)
    }
}

/// Lower-cases text, mapping the Turkish dotted capital `İ` to a plain `i`.
fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(|ch| match ch {
            'İ' => 'i'.to_lowercase(),
            other => other.to_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> &'static CategoryClassifier {
        CategoryClassifier::shared()
    }

    #[test]
    fn explicit_category_wins_over_keywords() {
        let appearance = classifier().classify(Some(CategoryKey::Health), "Kira", Language::En);
        assert_eq!(appearance.key, CategoryKey::Health);
        assert_eq!(appearance.name, "Health");
        assert_eq!(appearance.icon, CategoryKey::Health.icon());
    }

    #[test]
    fn other_category_falls_through_to_keywords() {
        let appearance = classifier().classify(Some(CategoryKey::Other), "Ekim Kirası", Language::Tr);
        assert_eq!(appearance.key, CategoryKey::Rent);
        assert_eq!(appearance.name, "Kira");
    }

    #[test]
    fn keywords_match_case_insensitively() {
        assert_eq!(classifier().resolve(None, "MAAŞ ÖDEMESİ"), CategoryKey::Salary);
        assert_eq!(classifier().resolve(None, "KİRA"), CategoryKey::Rent);
        assert_eq!(classifier().resolve(None, "Weekly GROCERIES"), CategoryKey::Food);
    }

    #[test]
    fn earlier_entries_take_precedence_on_overlap() {
        assert_eq!(classifier().resolve(None, "Araç kiralama"), CategoryKey::Transport);
        assert_eq!(classifier().resolve(None, "Team training"), CategoryKey::Education);

        let table = KeywordTable::new([("kira", CategoryKey::Rent)])
            .chain(KeywordTable::new([("araç kiralama", CategoryKey::Transport)]));
        let custom = CategoryClassifier::new(table);
        assert_eq!(custom.resolve(None, "Araç kiralama"), CategoryKey::Rent);
    }

    #[test]
    fn keywords_only_match_at_word_starts() {
        assert_eq!(classifier().resolve(None, "Current bill"), CategoryKey::Bills);
        assert_eq!(classifier().resolve(None, "Gift for parent"), CategoryKey::Other);
        assert_eq!(classifier().resolve(None, "Monthly rent"), CategoryKey::Rent);
        assert_eq!(classifier().resolve(None, "Apartment (rent)"), CategoryKey::Rent);
        assert_eq!(classifier().resolve(None, "Süpermarket"), CategoryKey::Food);

        let table = KeywordTable::english();
        assert_eq!(table.lookup("phone and electricity bill"), Some(CategoryKey::Bills));
        assert_eq!(table.lookup("headphones"), None);
    }

    #[test]
    fn unmatched_description_is_other() {
        let appearance = classifier().classify(None, "zzz", Language::En);
        assert_eq!(appearance, CategoryAppearance::of(CategoryKey::Other, Language::En));
    }

    #[test]
    fn classification_is_deterministic() {
        let first = classifier().classify(None, "Elektrik faturası", Language::Tr);
        for _ in 0..5 {
            assert_eq!(classifier().classify(None, "Elektrik faturası", Language::Tr), first);
        }
        assert_eq!(first.key, CategoryKey::Bills);
    }

    #[test]
    fn swapping_tables_changes_results_without_code_changes() {
        let english_only = CategoryClassifier::new(KeywordTable::english());
        assert_eq!(english_only.resolve(None, "Market"), CategoryKey::Other);
        assert_eq!(english_only.resolve(None, "Monthly rent"), CategoryKey::Rent);
        assert!(!english_only.keywords().is_empty());
    }
}
