//! Spending aggregates computed over expense rows.
//!
//! Sums are done in `Decimal` here rather than with SQL `SUM`, which would go
//! through floating point for amounts stored as text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::budget::check_budget_alert;
use crate::db::Database;
use crate::error::{FinanceError, Result};
use crate::models::{CategoryTotal, ExpenseRow, MonthlySummary};
use crate::util::{checked_sum, parse_month};

fn scoped_rows(db: &Database, month: Option<&str>) -> Result<Vec<ExpenseRow>> {
    let month = month.map(parse_month).transpose()?;
    db.expense_rows(month.as_deref())
}

/// Sum of all expenses, or of one `YYYY-MM` month. Zero when nothing matches.
pub(crate) fn total_spending(db: &Database, month: Option<&str>) -> Result<Decimal> {
    checked_sum(scoped_rows(db, month)?.iter().map(|r| r.amount))
}

/// Per-category sums, largest first; equal totals are ordered by category name.
/// Categories without expenses in scope are left out.
pub(crate) fn category_totals(db: &Database, month: Option<&str>) -> Result<Vec<CategoryTotal>> {
    group_by_category(&scoped_rows(db, month)?)
}

pub(crate) fn group_by_category(rows: &[ExpenseRow]) -> Result<Vec<CategoryTotal>> {
    let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in rows {
        let sum = sums.entry(row.category.as_str()).or_default();
        *sum = sum.checked_add(row.amount).ok_or(FinanceError::Overflow)?;
    }

    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(name, total)| CategoryTotal::new(name, total))
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    Ok(totals)
}

/// Expenses on exactly `date`, by id.
pub(crate) fn search_by_date(db: &Database, date: NaiveDate) -> Result<Vec<ExpenseRow>> {
    db.expenses_on(date)
}

/// Expenses in the inclusive range `start..=end`, by date then id.
pub(crate) fn search_by_date_range(
    db: &Database,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ExpenseRow>> {
    if start > end {
        return Err(FinanceError::validation(format!(
            "start date {start} is after end date {end}"
        )));
    }
    db.expenses_between(start, end)
}

pub(crate) fn monthly_summary(db: &Database, month: &str) -> Result<MonthlySummary> {
    let month = parse_month(month)?;
    let rows = db.expense_rows(Some(&month))?;
    let total = checked_sum(rows.iter().map(|r| r.amount))?;
    let by_category = group_by_category(&rows)?;
    let budget = check_budget_alert(db, &month)?;
    Ok(MonthlySummary {
        month,
        total,
        by_category,
        budget,
        expense_count: rows.len(),
    })
}

#[cfg(test)]
mod tests;
