mod schema;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{FinanceError, Result};
use crate::models::*;
use crate::util::{parse_month, require_positive, require_text};

const STORED_DATE_FORMAT: &str = "%Y-%m-%d";

const EXPENSE_COLUMNS: &str = "id, title, amount, date, category_id";
const EXPENSE_ROW_SELECT: &str = "SELECT e.id, e.title, e.amount, e.date, c.name
     FROM expenses e
     JOIN categories c ON e.category_id = c.id";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    /// An in-memory database with the schema applied but no categories.
    #[cfg(test)]
    pub(crate) fn open_in_memory_unseeded() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        let tx = self.conn.transaction()?;

        if !has_version_table {
            // Fresh database - apply full schema
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = tx
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tx.execute_batch(sql)?;
                info!(from_version, "applied schema migration");
            }
        }

        if current < schema::CURRENT_VERSION {
            tx.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Inserts the default categories, but only into an empty table.
    fn seed_default_categories(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        for name in DEFAULT_CATEGORIES {
            tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        }
        tx.commit()?;
        info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))?)
    }

    #[cfg(test)]
    pub(crate) fn rerun_migrations(&mut self) -> Result<()> {
        self.migrate()?;
        self.seed_default_categories()
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?)
    }

    pub(crate) fn add_category(&mut self, name: &str) -> Result<Category> {
        let name = require_text("category name", name)?;

        let tx = self.conn.transaction()?;
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        if taken {
            return Err(FinanceError::validation(format!(
                "category '{name}' already exists"
            )));
        }
        tx.execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, %name, "category added");
        Ok(Category { id, name })
    }

    /// Deletes a category together with every expense filed under it.
    pub(crate) fn delete_category(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let cascaded: i64 = tx.query_row(
            "SELECT COUNT(*) FROM expenses WHERE category_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        let removed = tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!(id, cascaded, "category deleted");
        Ok(true)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn add_expense(
        &mut self,
        title: &str,
        amount: Decimal,
        date: NaiveDate,
        category_id: i64,
    ) -> Result<Expense> {
        let title = require_text("title", title)?;
        let amount = require_positive("amount", amount)?;

        let tx = self.conn.transaction()?;
        ensure_category(&tx, category_id)?;
        tx.execute(
            "INSERT INTO expenses (title, amount, date, category_id) VALUES (?1, ?2, ?3, ?4)",
            params![title, amount.to_string(), date_to_sql(date), category_id],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, %amount, %date, category_id, "expense added");
        Ok(Expense {
            id,
            title,
            amount,
            date,
            category_id,
        })
    }

    /// Overwrites the supplied fields of an expense. Returns `None` if `id` does not exist.
    pub(crate) fn update_expense(
        &mut self,
        id: i64,
        update: &ExpenseUpdate,
    ) -> Result<Option<Expense>> {
        let update = update.validated()?;

        let tx = self.conn.transaction()?;
        let Some(mut expense) = query_expense(&tx, id)? else {
            return Ok(None);
        };
        if let Some(category_id) = update.category_id {
            ensure_category(&tx, category_id)?;
        }
        update.apply_to(&mut expense);
        tx.execute(
            "UPDATE expenses SET title = ?1, amount = ?2, date = ?3, category_id = ?4 WHERE id = ?5",
            params![
                expense.title,
                expense.amount.to_string(),
                date_to_sql(expense.date),
                expense.category_id,
                id,
            ],
        )?;
        tx.commit()?;

        debug!(id, "expense updated");
        Ok(Some(expense))
    }

    pub(crate) fn delete_expense(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!(id, "expense deleted");
        Ok(true)
    }

    pub(crate) fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        query_expense(&self.conn, id)
    }

    /// Most recent expenses first (date descending, then id descending).
    pub(crate) fn list_recent_expenses(&self, limit: u32) -> Result<Vec<ExpenseRow>> {
        let sql = format!("{EXPENSE_ROW_SELECT} ORDER BY e.date DESC, e.id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit], expense_row_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// All expenses, optionally restricted to a `YYYY-MM` month, oldest first.
    pub(crate) fn expense_rows(&self, month: Option<&str>) -> Result<Vec<ExpenseRow>> {
        let sql = format!(
            "{EXPENSE_ROW_SELECT} WHERE (?1 IS NULL OR e.date LIKE ?1) ORDER BY e.date, e.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let pattern = month.map(|m| format!("{m}-%"));
        let rows = stmt.query_map(params![pattern], expense_row_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn expenses_on(&self, date: NaiveDate) -> Result<Vec<ExpenseRow>> {
        let sql = format!("{EXPENSE_ROW_SELECT} WHERE e.date = ?1 ORDER BY e.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![date_to_sql(date)], expense_row_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Expenses dated within `start..=end`, ordered by date then id.
    pub(crate) fn expenses_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ExpenseRow>> {
        let sql =
            format!("{EXPENSE_ROW_SELECT} WHERE e.date BETWEEN ?1 AND ?2 ORDER BY e.date, e.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![date_to_sql(start), date_to_sql(end)],
            expense_row_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    #[cfg(test)]
    pub(crate) fn expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    // ── Subscriptions ─────────────────────────────────────────

    pub(crate) fn add_subscription(
        &mut self,
        name: &str,
        amount: Decimal,
        next_date: NaiveDate,
    ) -> Result<Subscription> {
        let name = require_text("name", name)?;
        let amount = require_positive("amount", amount)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO subscriptions (name, amount, next_date) VALUES (?1, ?2, ?3)",
            params![name, amount.to_string(), date_to_sql(next_date)],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, %name, %amount, "subscription added");
        Ok(Subscription {
            id,
            name,
            amount,
            next_date,
        })
    }

    pub(crate) fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        query_subscription(&self.conn, id)
    }

    pub(crate) fn update_subscription(
        &mut self,
        id: i64,
        update: &SubscriptionUpdate,
    ) -> Result<Option<Subscription>> {
        let update = update.validated()?;

        let tx = self.conn.transaction()?;
        let Some(mut sub) = query_subscription(&tx, id)? else {
            return Ok(None);
        };
        update.apply_to(&mut sub);
        tx.execute(
            "UPDATE subscriptions SET name = ?1, amount = ?2, next_date = ?3 WHERE id = ?4",
            params![
                sub.name,
                sub.amount.to_string(),
                date_to_sql(sub.next_date),
                id
            ],
        )?;
        tx.commit()?;

        debug!(id, "subscription updated");
        Ok(Some(sub))
    }

    pub(crate) fn delete_subscription(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM subscriptions WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!(id, "subscription deleted");
        Ok(true)
    }

    /// Subscriptions soonest-due first.
    pub(crate) fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, amount, next_date FROM subscriptions ORDER BY next_date, id",
        )?;
        let rows = stmt.query_map([], subscription_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Creates the budget for `month`, or replaces the limit of the existing one in place.
    pub(crate) fn set_budget(&mut self, month: &str, limit: Decimal) -> Result<Budget> {
        let month = parse_month(month)?;
        let limit = require_positive("budget limit", limit)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO budgets (month, limit_amount)
             VALUES (?1, ?2)
             ON CONFLICT(month) DO UPDATE SET limit_amount = excluded.limit_amount",
            params![month, limit.to_string()],
        )?;
        let budget = query_budget(&tx, &month)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;

        debug!(id = budget.id, %month, %limit, "budget set");
        Ok(budget)
    }

    pub(crate) fn get_budget(&self, month: &str) -> Result<Option<Budget>> {
        let month = parse_month(month)?;
        query_budget(&self.conn, &month)
    }

    pub(crate) fn delete_budget(&mut self, month: &str) -> Result<bool> {
        let month = parse_month(month)?;

        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM budgets WHERE month = ?1", params![month])?;
        if removed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!(%month, "budget deleted");
        Ok(true)
    }

    /// Every budget, latest month first.
    pub(crate) fn list_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, month, limit_amount FROM budgets ORDER BY month DESC")?;
        let rows = stmt.query_map([], budget_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn date_to_sql(date: NaiveDate) -> String {
    date.format(STORED_DATE_FORMAT).to_string()
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, STORED_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: decimal_at(row, 2)?,
        date: date_at(row, 3)?,
        category_id: row.get(4)?,
    })
}

fn expense_row_from_row(row: &Row<'_>) -> rusqlite::Result<ExpenseRow> {
    Ok(ExpenseRow {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: decimal_at(row, 2)?,
        date: date_at(row, 3)?,
        category: row.get(4)?,
    })
}

fn subscription_from_row(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: decimal_at(row, 2)?,
        next_date: date_at(row, 3)?,
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        month: row.get(1)?,
        limit: decimal_at(row, 2)?,
    })
}

// ── Shared queries (usable inside a transaction) ──────────────

fn ensure_category(conn: &Connection, id: i64) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(FinanceError::Reference {
            entity: "category",
            id,
        });
    }
    Ok(())
}

fn query_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], expense_from_row)
        .optional()?)
}

fn query_subscription(conn: &Connection, id: i64) -> Result<Option<Subscription>> {
    Ok(conn
        .query_row(
            "SELECT id, name, amount, next_date FROM subscriptions WHERE id = ?1",
            params![id],
            subscription_from_row,
        )
        .optional()?)
}

fn query_budget(conn: &Connection, month: &str) -> Result<Option<Budget>> {
    Ok(conn
        .query_row(
            "SELECT id, month, limit_amount FROM budgets WHERE month = ?1",
            params![month],
            budget_from_row,
        )
        .optional()?)
}
