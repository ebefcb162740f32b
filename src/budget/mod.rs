use tracing::warn;

use crate::db::Database;
use crate::error::Result;
use crate::models::BudgetAlert;
use crate::report::total_spending;
use crate::util::parse_month;

/// Compare a month's total spending against its budget, if one is set.
///
/// Spending exactly equal to the limit is within budget.
pub(crate) fn check_budget_alert(db: &Database, month: &str) -> Result<BudgetAlert> {
    let month = parse_month(month)?;
    let spent = total_spending(db, Some(&month))?;

    let alert = match db.get_budget(&month)? {
        Some(budget) => BudgetAlert::against(&budget, spent),
        None => BudgetAlert::unbudgeted(&month, spent),
    };
    if alert.exceeded {
        warn!(%month, %spent, "monthly budget exceeded");
    }
    Ok(alert)
}
