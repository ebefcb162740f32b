#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FinanceError;
use crate::util::*;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_iso() {
    assert_eq!(parse_date("2024-03-01").unwrap(), ymd(2024, 3, 1));
}

#[test]
fn test_parse_date_day_first_slashes() {
    assert_eq!(parse_date("15/04/2024").unwrap(), ymd(2024, 4, 15));
}

#[test]
fn test_parse_date_day_first_dashes() {
    assert_eq!(parse_date("15-04-2024").unwrap(), ymd(2024, 4, 15));
}

#[test]
fn test_parse_date_trims_whitespace() {
    assert_eq!(parse_date("  2024-12-31\n").unwrap(), ymd(2024, 12, 31));
}

#[test]
fn test_parse_date_rejects_garbage() {
    assert!(parse_date("yesterday").unwrap_err().is_validation());
    assert!(parse_date("").unwrap_err().is_validation());
}

#[test]
fn test_parse_date_rejects_impossible_day() {
    assert!(parse_date("2023-02-29").is_err());
    assert!(parse_date("2024-02-29").is_ok());
}

// ── parse_month ───────────────────────────────────────────────

#[test]
fn test_parse_month_valid() {
    assert_eq!(parse_month("2024-03").unwrap(), "2024-03");
    assert_eq!(parse_month(" 2024-12 ").unwrap(), "2024-12");
}

#[test]
fn test_parse_month_rejects_out_of_range() {
    assert!(parse_month("2024-13").is_err());
    assert!(parse_month("2024-00").is_err());
}

#[test]
fn test_parse_month_rejects_wrong_shape() {
    assert!(parse_month("2024-3").is_err());
    assert!(parse_month("2024/03").is_err());
    assert!(parse_month("2024-03-01").is_err());
    assert!(parse_month("+024-03").is_err());
    assert!(parse_month("").is_err());
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_plain() {
    assert_eq!(parse_amount("10.50").unwrap(), dec!(10.50));
}

#[test]
fn test_parse_amount_with_symbol_and_commas() {
    assert_eq!(parse_amount("$1,234.56").unwrap(), dec!(1234.56));
}

#[test]
fn test_parse_amount_rejects_text() {
    assert!(parse_amount("ten").unwrap_err().is_validation());
}

// ── require_text / require_positive ───────────────────────────

#[test]
fn test_require_text_trims() {
    assert_eq!(require_text("title", "  Lunch  ").unwrap(), "Lunch");
}

#[test]
fn test_require_text_rejects_blank() {
    let err = require_text("title", "   ").unwrap_err();
    assert_eq!(err.to_string(), "Validation error: title cannot be empty");
}

#[test]
fn test_require_positive() {
    assert_eq!(require_positive("amount", dec!(0.01)).unwrap(), dec!(0.01));
    assert!(require_positive("amount", dec!(0)).is_err());
    assert!(require_positive("amount", dec!(-5)).is_err());
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "1,234.56");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-5.50)), "-5.50");
}

#[test]
fn test_format_amount_pads_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "1.50");
    assert_eq!(format_amount(dec!(5)), "5.00");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
}

#[test]
fn test_format_amount_rounds_half_away_from_zero() {
    assert_eq!(format_amount(dec!(1.239)), "1.24");
    assert_eq!(format_amount(dec!(10.005)), "10.01");
    assert_eq!(format_amount(dec!(-10.005)), "-10.01");
    assert_eq!(format_amount(dec!(999.995)), "1,000.00");
}

#[test]
fn test_format_amount_sub_cent_negative_is_zero() {
    assert_eq!(format_amount(dec!(-0.001)), "0.00");
}

#[test]
fn test_checked_sum() {
    assert_eq!(checked_sum([dec!(10.00), dec!(5.50)]).unwrap(), dec!(15.50));
    assert_eq!(checked_sum(Vec::<Decimal>::new()).unwrap(), Decimal::ZERO);
    assert!(matches!(
        checked_sum([Decimal::MAX, dec!(1)]).unwrap_err(),
        FinanceError::Overflow
    ));
}
