use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{FinanceError, Result};

/// Date formats accepted on input, tried in order. Storage always uses the first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Parse a calendar date in `YYYY-MM-DD`, `DD/MM/YYYY` or `DD-MM-YYYY` form.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| FinanceError::validation(format!("invalid date: '{s}'")))
}

/// Validate a `YYYY-MM` month and return it in canonical form.
pub(crate) fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    let well_formed = s.len() == 7
        && s.as_bytes()[4] == b'-'
        && s.bytes()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    if !well_formed || NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").is_err() {
        return Err(FinanceError::validation(format!(
            "invalid month: '{s}' (expected YYYY-MM)"
        )));
    }
    Ok(s.to_string())
}

/// Parse a user-typed amount, tolerating a leading `$` and thousands separators.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().replace(['$', ','], "");
    Decimal::from_str(cleaned.trim())
        .map_err(|_| FinanceError::validation(format!("invalid amount: '{}'", s.trim())))
}

/// Trim a required string field, rejecting it if nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_positive(field: &str, value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(FinanceError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(value)
}

/// Sum amounts, failing instead of panicking when the total overflows.
pub(crate) fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or(FinanceError::Overflow)
}

/// Round to cents, halves away from zero.
pub(crate) fn round_cents(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let val = round_cents(val);
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
