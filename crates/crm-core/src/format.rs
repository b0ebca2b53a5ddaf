// File: crm-core/src/format.rs
// Purpose: Display helpers shared by every page

use chrono::NaiveDate;

/// `2024-06-01` -> `01/06/2024`
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Avatar initials: first letter of the first and last word, upper-cased.
///
/// A single word gives one letter; a blank name gives `?`.
pub fn avatar_initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let first_letter = |word: &str| word.chars().next().into_iter().flat_map(char::to_uppercase);

    match words.as_slice() {
        [] => "?".to_string(),
        [only] => first_letter(*only).collect(),
        [first, .., last] => first_letter(*first).chain(first_letter(*last)).collect(),
    }
}

/// Brazilian currency formatting: `R$ 1.234.567,89`
pub fn format_price_brl(price: f64) -> String {
    let cents = (price * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{sign}R$ {grouped},{fraction:02}")
}
