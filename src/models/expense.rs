use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::util::{require_positive, require_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: i64,
}

/// Fields to overwrite on an existing expense. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<i64>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
    }

    /// Check the supplied fields and return a copy with strings trimmed.
    pub(crate) fn validated(&self) -> Result<Self> {
        let title = self
            .title
            .as_deref()
            .map(|t| require_text("title", t))
            .transpose()?;
        if let Some(amount) = self.amount {
            require_positive("amount", amount)?;
        }
        Ok(Self {
            title,
            ..self.clone()
        })
    }

    pub(crate) fn apply_to(&self, expense: &mut Expense) {
        if let Some(title) = &self.title {
            expense.title = title.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(category_id) = self.category_id {
            expense.category_id = category_id;
        }
    }
}

/// An expense joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
}
