use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::util::{require_positive, require_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub next_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub next_date: Option<NaiveDate>,
}

impl SubscriptionUpdate {
    pub(crate) fn validated(&self) -> Result<Self> {
        let name = self
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?;
        if let Some(amount) = self.amount {
            require_positive("amount", amount)?;
        }
        Ok(Self {
            name,
            ..self.clone()
        })
    }

    pub(crate) fn apply_to(&self, sub: &mut Subscription) {
        if let Some(name) = &self.name {
            sub.name = name.clone();
        }
        if let Some(amount) = self.amount {
            sub.amount = amount;
        }
        if let Some(next_date) = self.next_date {
            sub.next_date = next_date;
        }
    }
}
