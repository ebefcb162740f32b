use rust_decimal::Decimal;

use super::BudgetAlert;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
}

impl CategoryTotal {
    pub fn new(name: impl Into<String>, total: Decimal) -> Self {
        Self {
            name: name.into(),
            total,
        }
    }
}

/// Everything the `summary` command prints for one month.
#[derive(Debug, Clone)]
pub struct MonthlySummary {
    pub month: String,
    pub total: Decimal,
    pub by_category: Vec<CategoryTotal>,
    pub budget: BudgetAlert,
    pub expense_count: usize,
}
