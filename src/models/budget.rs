use rust_decimal::Decimal;

use crate::util::round_cents;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    pub id: i64,
    /// Format: "YYYY-MM"
    pub month: String,
    pub limit: Decimal,
}

/// Outcome of comparing one month's spending against its budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub month: String,
    pub limit: Option<Decimal>,
    pub spent: Decimal,
    /// `limit - spent`; negative once the budget is exceeded.
    pub remaining: Option<Decimal>,
    pub exceeded: bool,
    pub message: String,
}

impl BudgetAlert {
    pub(crate) fn unbudgeted(month: &str, spent: Decimal) -> Self {
        Self {
            month: month.to_string(),
            limit: None,
            spent,
            remaining: None,
            exceeded: false,
            message: format!(
                "No budget set for {month}. Total spent: {:.2}",
                round_cents(spent)
            ),
        }
    }

    pub(crate) fn against(budget: &Budget, spent: Decimal) -> Self {
        let month = &budget.month;
        let limit = budget.limit;
        let remaining = limit - spent;
        let exceeded = spent > limit;
        let (shown_limit, shown_spent) = (round_cents(limit), round_cents(spent));
        let message = if exceeded {
            // Report at least one cent so a sub-cent overage never reads "Over by 0.00".
            let over = round_cents(-remaining).max(Decimal::new(1, 2));
            format!(
                "ALERT: Budget exceeded for {month}! Limit: {shown_limit:.2}, Spent: {shown_spent:.2} (Over by {over:.2})"
            )
        } else {
            format!(
                "Within budget for {month}. Spent: {shown_spent:.2} / {shown_limit:.2}, Remaining: {:.2}",
                round_cents(remaining)
            )
        };
        Self {
            month: month.clone(),
            limit: Some(limit),
            spent,
            remaining: Some(remaining),
            exceeded,
            message,
        }
    }
}
