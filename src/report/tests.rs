#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Categories Food and Transport with three expenses across March and April 2024.
fn setup_scenario() -> (Database, i64, i64) {
    let mut db = Database::open_in_memory_unseeded().unwrap();
    let food = db.add_category("Food").unwrap().id;
    let transport = db.add_category("Transport").unwrap().id;
    db.add_expense("Groceries", dec!(10.00), ymd(2024, 3, 1), food)
        .unwrap();
    db.add_expense("Train", dec!(5.50), ymd(2024, 3, 2), transport)
        .unwrap();
    db.add_expense("Dinner", dec!(20.00), ymd(2024, 4, 1), food)
        .unwrap();
    (db, food, transport)
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_total_spending_for_month() {
    let (db, _, _) = setup_scenario();
    assert_eq!(total_spending(&db, Some("2024-03")).unwrap(), dec!(15.50));
    assert_eq!(total_spending(&db, Some("2024-04")).unwrap(), dec!(20.00));
}

#[test]
fn test_total_spending_all_time() {
    let (db, _, _) = setup_scenario();
    assert_eq!(total_spending(&db, None).unwrap(), dec!(35.50));
}

#[test]
fn test_total_spending_empty_is_zero() {
    let (db, _, _) = setup_scenario();
    assert_eq!(total_spending(&db, Some("2023-01")).unwrap(), Decimal::ZERO);

    let empty = Database::open_in_memory().unwrap();
    assert_eq!(total_spending(&empty, None).unwrap(), Decimal::ZERO);
}

#[test]
fn test_total_spending_rejects_bad_month() {
    let (db, _, _) = setup_scenario();
    assert!(total_spending(&db, Some("2024-3"))
        .unwrap_err()
        .is_validation());
}

// ── Category totals ───────────────────────────────────────────

#[test]
fn test_category_totals_for_month() {
    let (db, _, _) = setup_scenario();
    let totals = category_totals(&db, Some("2024-03")).unwrap();
    assert_eq!(
        totals,
        vec![
            CategoryTotal::new("Food", dec!(10.00)),
            CategoryTotal::new("Transport", dec!(5.50)),
        ]
    );
}

#[test]
fn test_category_totals_all_time() {
    let (db, _, _) = setup_scenario();
    let totals = category_totals(&db, None).unwrap();
    assert_eq!(
        totals,
        vec![
            CategoryTotal::new("Food", dec!(30.00)),
            CategoryTotal::new("Transport", dec!(5.50)),
        ]
    );
}

#[test]
fn test_category_totals_omits_unused_categories() {
    let (mut db, _, _) = setup_scenario();
    db.add_category("Health").unwrap();
    let totals = category_totals(&db, None).unwrap();
    assert!(totals.iter().all(|t| t.name != "Health"));

    let april = category_totals(&db, Some("2024-04")).unwrap();
    assert_eq!(april, vec![CategoryTotal::new("Food", dec!(20.00))]);
}

#[test]
fn test_category_totals_ties_ordered_by_name() {
    let mut db = Database::open_in_memory().unwrap();
    let cats = db.list_categories().unwrap();
    let id = |name: &str| crate::models::Category::find_by_name(&cats, name).unwrap().id;
    db.add_expense("x", dec!(7), ymd(2024, 5, 1), id("Utilities"))
        .unwrap();
    db.add_expense("y", dec!(7), ymd(2024, 5, 2), id("Health"))
        .unwrap();
    db.add_expense("z", dec!(3.5), ymd(2024, 5, 3), id("Entertainment"))
        .unwrap();
    db.add_expense("w", dec!(3.5), ymd(2024, 5, 3), id("Entertainment"))
        .unwrap();

    let names: Vec<String> = category_totals(&db, Some("2024-05"))
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Entertainment", "Health", "Utilities"]);
}

#[test]
fn test_category_totals_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(category_totals(&db, None).unwrap().is_empty());
}

// ── Search ────────────────────────────────────────────────────

#[test]
fn test_search_by_date() {
    let (mut db, food, _) = setup_scenario();
    let second = db
        .add_expense("Snack", dec!(2.25), ymd(2024, 3, 1), food)
        .unwrap();
    let rows = search_by_date(&db, ymd(2024, 3, 1)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title, "Groceries");
    assert_eq!(rows[1].id, second.id);
    assert!(rows.iter().all(|r| r.category == "Food"));
}

#[test]
fn test_search_by_date_no_match() {
    let (db, _, _) = setup_scenario();
    assert!(search_by_date(&db, ymd(2020, 1, 1)).unwrap().is_empty());
}

#[test]
fn test_search_by_date_range_inclusive() {
    let (db, _, _) = setup_scenario();
    let rows = search_by_date_range(&db, ymd(2024, 3, 2), ymd(2024, 4, 1)).unwrap();
    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Train", "Dinner"]);
    assert_eq!(rows[0].category, "Transport");
}

#[test]
fn test_search_by_date_range_single_day() {
    let (db, _, _) = setup_scenario();
    let rows = search_by_date_range(&db, ymd(2024, 4, 1), ymd(2024, 4, 1)).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_search_by_date_range_reversed_fails() {
    let (db, _, _) = setup_scenario();
    let err = search_by_date_range(&db, ymd(2024, 4, 1), ymd(2024, 3, 1)).unwrap_err();
    assert!(err.is_validation());
}

// ── Monthly summary ───────────────────────────────────────────

#[test]
fn test_monthly_summary() {
    let (mut db, _, _) = setup_scenario();
    db.set_budget("2024-03", dec!(100)).unwrap();
    let summary = monthly_summary(&db, "2024-03").unwrap();
    assert_eq!(summary.month, "2024-03");
    assert_eq!(summary.total, dec!(15.50));
    assert_eq!(summary.expense_count, 2);
    assert_eq!(summary.by_category.len(), 2);
    assert_eq!(summary.budget.remaining, Some(dec!(84.50)));
    assert!(!summary.budget.exceeded);
}

// ── Overflow ──────────────────────────────────────────────────

fn setup_huge_amounts() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    let cats = db.list_categories().unwrap();
    let food = crate::models::Category::find_by_name(&cats, "Food").unwrap().id;
    for title in ["Big", "Bigger"] {
        db.add_expense(
            title,
            dec!(50000000000000000000000000000),
            ymd(2024, 3, 1),
            food,
        )
        .unwrap();
    }
    db
}

#[test]
fn test_total_spending_overflow_is_error() {
    let db = setup_huge_amounts();
    let err = total_spending(&db, None).unwrap_err();
    assert!(matches!(err, FinanceError::Overflow));
    assert!(matches!(
        total_spending(&db, Some("2024-03")).unwrap_err(),
        FinanceError::Overflow
    ));
}

#[test]
fn test_category_totals_overflow_is_error() {
    let db = setup_huge_amounts();
    assert!(matches!(
        category_totals(&db, Some("2024-03")).unwrap_err(),
        FinanceError::Overflow
    ));
    assert!(matches!(
        monthly_summary(&db, "2024-03").unwrap_err(),
        FinanceError::Overflow
    ));
}
