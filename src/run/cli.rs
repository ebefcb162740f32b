use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::budget::check_budget_alert;
use crate::db::Database;
use crate::export::export_expenses;
use crate::models::{BudgetAlert, Category, ExpenseRow, ExpenseUpdate, SubscriptionUpdate};
use crate::report;
use crate::util::{checked_sum, format_amount, parse_amount, parse_date, truncate};

const DEFAULT_RECENT_LIMIT: u32 = 20;

// ── Categories ────────────────────────────────────────────────

pub(super) fn categories(db: &Database) -> Result<()> {
    let cats = db.list_categories()?;
    if cats.is_empty() {
        println!("No categories");
        return Ok(());
    }
    println!("{:<4} Name", "ID");
    println!("{}", "─".repeat(30));
    for cat in &cats {
        println!("{}", category_line(cat));
    }
    Ok(())
}

fn category_line(cat: &Category) -> String {
    format!("{:<4} {cat}", cat.id)
}

pub(super) fn category_add(args: &[String], db: &mut Database) -> Result<()> {
    let name = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: fintrack category-add <name>"))?;
    let cat = db.add_category(name)?;
    println!("Added category {} ({})", cat.name, cat.id);
    Ok(())
}

pub(super) fn category_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = required_id(args, "Usage: fintrack category-delete <id>")?;
    if db.delete_category(id)? {
        println!("Deleted category {id} and its expenses");
    } else {
        println!("Category {id} not found");
    }
    Ok(())
}

// ── Expenses ──────────────────────────────────────────────────

pub(super) fn add_expense(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let [title, amount, category] = pos.as_slice() else {
        anyhow::bail!("Usage: fintrack add <title> <amount> <category> [--date <date>]");
    };
    let amount = parse_amount(amount)?;
    let category_id = resolve_category(db, category)?;
    let date = match flag(args, "--date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };

    let exp = db.add_expense(title, amount, date, category_id)?;
    println!(
        "Added expense #{}: {} - {} on {}",
        exp.id,
        exp.title,
        format_amount(exp.amount),
        exp.date
    );
    Ok(())
}

pub(super) fn update_expense(args: &[String], db: &mut Database) -> Result<()> {
    let id = required_id(
        args,
        "Usage: fintrack update <id> [--title T] [--amount A] [--date D] [--category C]",
    )?;
    let update = ExpenseUpdate {
        title: flag(args, "--title").map(str::to_string),
        amount: flag(args, "--amount").map(parse_amount).transpose()?,
        date: flag(args, "--date").map(parse_date).transpose()?,
        category_id: flag(args, "--category")
            .map(|c| resolve_category(db, c))
            .transpose()?,
    };
    if update.is_empty() {
        println!("Nothing to update");
        return Ok(());
    }

    match db.update_expense(id, &update)? {
        Some(exp) => println!(
            "Updated #{}: {} - {} on {}",
            exp.id,
            exp.title,
            format_amount(exp.amount),
            exp.date
        ),
        None => println!("Expense {id} not found"),
    }
    Ok(())
}

pub(super) fn delete_expense(args: &[String], db: &mut Database) -> Result<()> {
    let id = required_id(args, "Usage: fintrack delete <id>")?;
    if db.delete_expense(id)? {
        println!("Deleted expense {id}");
    } else {
        println!("Expense {id} not found");
    }
    Ok(())
}

pub(super) fn show_expense(args: &[String], db: &Database) -> Result<()> {
    let id = required_id(args, "Usage: fintrack show <id>")?;
    let Some(exp) = db.get_expense(id)? else {
        println!("Expense {id} not found");
        return Ok(());
    };
    let category = db
        .get_category(exp.category_id)?
        .map(|c| c.name)
        .unwrap_or_else(|| "?".into());
    println!("Expense #{}", exp.id);
    println!("  Title:    {}", exp.title);
    println!("  Amount:   {}", format_amount(exp.amount));
    println!("  Date:     {}", exp.date);
    println!("  Category: {category}");
    Ok(())
}

pub(super) fn recent(args: &[String], db: &Database) -> Result<()> {
    let limit = match args.first() {
        Some(n) => n
            .parse::<u32>()
            .with_context(|| format!("Invalid count: {n}"))?,
        None => DEFAULT_RECENT_LIMIT,
    };
    let rows = db.list_recent_expenses(limit)?;
    print_expense_rows(&rows);
    Ok(())
}

// ── Subscriptions ─────────────────────────────────────────────

pub(super) fn subscriptions(db: &Database) -> Result<()> {
    let subs = db.list_subscriptions()?;
    if subs.is_empty() {
        println!("No subscriptions");
        return Ok(());
    }
    println!("{:<4} {:<24} {:>12}  Next due", "ID", "Name", "Amount");
    println!("{}", "─".repeat(55));
    for sub in &subs {
        println!(
            "{:<4} {:<24} {:>12}  {}",
            sub.id,
            truncate(&sub.name, 24),
            format_amount(sub.amount),
            sub.next_date
        );
    }
    let total_due = checked_sum(subs.iter().map(|s| s.amount))?;
    println!("{}", "─".repeat(55));
    println!("{:<29} {:>12}", "Total", format_amount(total_due));
    Ok(())
}

pub(super) fn subscription_add(args: &[String], db: &mut Database) -> Result<()> {
    let pos = positional(args);
    let [name, amount, next_date] = pos.as_slice() else {
        anyhow::bail!("Usage: fintrack sub-add <name> <amount> <next-date>");
    };
    let sub = db.add_subscription(name, parse_amount(amount)?, parse_date(next_date)?)?;
    println!(
        "Added subscription #{}: {} - {} next due {}",
        sub.id,
        sub.name,
        format_amount(sub.amount),
        sub.next_date
    );
    Ok(())
}

pub(super) fn subscription_update(args: &[String], db: &mut Database) -> Result<()> {
    let id = required_id(
        args,
        "Usage: fintrack sub-update <id> [--name N] [--amount A] [--next-date D]",
    )?;
    let update = SubscriptionUpdate {
        name: flag(args, "--name").map(str::to_string),
        amount: flag(args, "--amount").map(parse_amount).transpose()?,
        next_date: flag(args, "--next-date").map(parse_date).transpose()?,
    };
    match db.update_subscription(id, &update)? {
        Some(sub) => println!(
            "Updated #{}: {} - {} next due {}",
            sub.id,
            sub.name,
            format_amount(sub.amount),
            sub.next_date
        ),
        None => println!("Subscription {id} not found"),
    }
    Ok(())
}

pub(super) fn subscription_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = required_id(args, "Usage: fintrack sub-delete <id>")?;
    let Some(sub) = db.get_subscription(id)? else {
        println!("Subscription {id} not found");
        return Ok(());
    };
    if db.delete_subscription(id)? {
        println!("Deleted subscription {}", sub.name);
    }
    Ok(())
}

// ── Budgets ───────────────────────────────────────────────────

pub(super) fn budget(args: &[String], db: &mut Database) -> Result<()> {
    let usage = "Usage: fintrack budget set <YYYY-MM> <limit> | check [YYYY-MM] | delete <YYYY-MM>";
    let pos = positional(args);
    match pos.as_slice() {
        ["set", month, limit] => {
            let budget = db.set_budget(month, parse_amount(limit)?)?;
            println!(
                "Budget for {} set to {}",
                budget.month,
                format_amount(budget.limit)
            );
        }
        ["check"] => print_alert(&check_budget_alert(db, &current_month())?),
        ["check", month] => print_alert(&check_budget_alert(db, month)?),
        ["delete", month] => {
            if db.delete_budget(month)? {
                println!("Deleted budget for {month}");
            } else {
                println!("No budget set for {month}");
            }
        }
        _ => anyhow::bail!(usage),
    }
    Ok(())
}

pub(super) fn budgets(db: &Database) -> Result<()> {
    let budgets = db.list_budgets()?;
    if budgets.is_empty() {
        println!("No budgets");
        return Ok(());
    }
    println!("{:<8} {:>12}", "Month", "Limit");
    println!("{}", "─".repeat(21));
    for b in &budgets {
        println!("{:<8} {:>12}", b.month, format_amount(b.limit));
    }
    Ok(())
}

// ── Reports ───────────────────────────────────────────────────

pub(super) fn total(args: &[String], db: &Database) -> Result<()> {
    let month = args.first().map(String::as_str);
    let total = report::total_spending(db, month)?;
    match month {
        Some(m) => println!("Total spending for {m}: {}", format_amount(total)),
        None => println!("Total spending: {}", format_amount(total)),
    }
    Ok(())
}

pub(super) fn category_report(args: &[String], db: &Database) -> Result<()> {
    let month = args.first().map(String::as_str);
    let totals = report::category_totals(db, month)?;
    if totals.is_empty() {
        println!("No spending recorded");
        return Ok(());
    }
    println!("Spending by Category:");
    for t in &totals {
        println!("  {:<24} {:>12}", t.name, format_amount(t.total));
    }
    Ok(())
}

pub(super) fn summary(args: &[String], db: &Database) -> Result<()> {
    let month = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .cloned()
        .unwrap_or_else(current_month);

    let summary = report::monthly_summary(db, &month)?;

    println!("FinTrack — {}", summary.month);
    println!("{}", "─".repeat(40));
    println!("  Spent:      {}", format_amount(summary.total));
    if let Some(limit) = summary.budget.limit {
        println!("  Budget:     {}", format_amount(limit));
    }
    if let Some(remaining) = summary.budget.remaining {
        println!("  Remaining:  {}", format_amount(remaining));
    }
    println!("  Expenses:   {}", summary.expense_count);

    if !summary.by_category.is_empty() {
        println!();
        println!("Spending by Category:");
        for t in &summary.by_category {
            println!("  {:<24} {:>12}", t.name, format_amount(t.total));
        }
    }
    println!();
    print_alert(&summary.budget);
    Ok(())
}

pub(super) fn search(args: &[String], db: &Database) -> Result<()> {
    let rows = match positional(args).as_slice() {
        [date] => report::search_by_date(db, parse_date(date)?)?,
        [start, end] => report::search_by_date_range(db, parse_date(start)?, parse_date(end)?)?,
        _ => anyhow::bail!("Usage: fintrack search <date> [end-date]"),
    };
    print_expense_rows(&rows);
    Ok(())
}

pub(super) fn export(args: &[String], db: &Database) -> Result<()> {
    let month = flag(args, "--month");
    let path = positional(args)
        .first()
        .map(|p| shellexpand(p))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let suffix = month.unwrap_or("all");
            PathBuf::from(format!("{home}/fintrack-export-{suffix}.csv"))
        });

    let count = export_expenses(db, &path, month)?;
    if count == 0 {
        println!("No expenses to export");
    } else {
        println!("Exported {count} expenses to {}", path.display());
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────

fn print_alert(alert: &BudgetAlert) {
    if alert.exceeded {
        eprintln!("{}", alert.message);
    } else {
        println!("{}", alert.message);
    }
}

fn print_expense_rows(rows: &[ExpenseRow]) {
    if rows.is_empty() {
        println!("No expenses");
        return;
    }
    println!(
        "{:<5} {:<10}  {:<28} {:>12}  Category",
        "ID", "Date", "Title", "Amount"
    );
    println!("{}", "─".repeat(75));
    for r in rows {
        println!(
            "{:<5} {:<10}  {:<28} {:>12}  {}",
            r.id,
            r.date,
            truncate(&r.title, 28),
            format_amount(r.amount),
            r.category
        );
    }
}

fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// Value following `name` in the argument list, e.g. `--date 2024-03-01`.
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither `--flags` nor flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn required_id(args: &[String], usage: &str) -> Result<i64> {
    let raw = args.first().ok_or_else(|| anyhow::anyhow!("{usage}"))?;
    raw.parse::<i64>()
        .with_context(|| format!("Invalid id: {raw}"))
}

/// Accepts a category id or its exact name.
fn resolve_category(db: &Database, raw: &str) -> Result<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }
    let cats = db.list_categories()?;
    Category::find_by_name(&cats, raw.trim())
        .map(|c| c.id)
        .ok_or_else(|| anyhow::anyhow!("Category '{raw}' not found"))
}

fn shellexpand(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(format!("{home}/{rest}"))
    } else {
        PathBuf::from(path)
    }
}
