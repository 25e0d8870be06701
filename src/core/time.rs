use chrono::NaiveDate;

use crate::config::Language;

const MONTHS_TR: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Moves a `(year, month)` pair by `delta` calendar months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| chrono::Datelike::day(&last))
        .unwrap_or(28)
}

/// Short localized label such as `Mar 2024` or `Ağu 2024`.
pub fn month_label(year: i32, month: u32, language: Language) -> String {
    let names = match language {
        Language::Tr => &MONTHS_TR,
        Language::En => &MONTHS_EN,
    };
    let index = (month.clamp(1, 12) - 1) as usize;
    format!("{} {}", names[index], year)
}
