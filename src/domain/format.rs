// src/domain/format.rs

use crate::domain::filter::{FilterCriteria, RoomSelection};
use crate::domain::listing::{is_truthy_number, number_to_string};
use crate::domain::normalize::NOT_AVAILABLE;

/// fr-FR digit group separator (narrow no-break space).
const GROUP_SEPARATOR: char = '\u{202F}';

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Whole euros with fr-FR grouping, e.g. `250 000 €`.
pub fn format_currency(amount: f64) -> String {
    if !is_truthy_number(amount) {
        return NOT_AVAILABLE.to_string();
    }
    format!("{} €", group_thousands(amount.round() as i64))
}

pub fn format_area(value: f64) -> String {
    if !is_truthy_number(value) {
        return NOT_AVAILABLE.to_string();
    }
    format!("{} m²", number_to_string(value))
}

pub fn format_price_per_area(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2} €/m²"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Signed whole-euro amount, e.g. the rent minus the loan payment.
pub fn format_difference(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let rounded = v.round() as i64;
            let sign = if rounded > 0 { "+" } else { "" };
            format!("{sign}{} €", group_thousands(rounded))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Human-readable size on 1024 steps, at most two decimals.
pub fn format_byte_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0usize;
    while exponent + 1 < BYTE_UNITS.len() && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }

    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{} {}", number_to_string(rounded), BYTE_UNITS[exponent])
}

/// Caption of the room dropdown for the current selection.
pub fn rooms_selection_label(criteria: &FilterCriteria) -> String {
    let mut selected = criteria.rooms.iter();
    match (selected.next(), criteria.rooms.len()) {
        (None, _) => "Nombre de pièces".to_string(),
        (Some(RoomSelection::FiveOrMore), 1) => "5+ pièces".to_string(),
        (Some(RoomSelection::Exactly(n)), 1) => {
            format!("{n} pièce{}", if *n > 1 { "s" } else { "" })
        }
        (Some(_), count) => format!("{count} sélections"),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}
