mod budget;
mod category;
mod expense;
mod report;
mod subscription;

pub use budget::{Budget, BudgetAlert};
pub use category::{Category, DEFAULT_CATEGORIES};
pub use expense::{Expense, ExpenseRow, ExpenseUpdate};
pub use report::{CategoryTotal, MonthlySummary};
pub use subscription::{Subscription, SubscriptionUpdate};
