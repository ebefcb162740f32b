mod cli;

use anyhow::Result;

use crate::db::Database;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli::summary(&[], db);
    };
    let rest = &args[2..];

    match command.as_str() {
        "categories" | "cats" => cli::categories(db),
        "category-add" => cli::category_add(rest, db),
        "category-delete" => cli::category_delete(rest, db),
        "add" | "a" => cli::add_expense(rest, db),
        "update" => cli::update_expense(rest, db),
        "delete" | "rm" => cli::delete_expense(rest, db),
        "show" => cli::show_expense(rest, db),
        "recent" | "ls" => cli::recent(rest, db),
        "subs" => cli::subscriptions(db),
        "sub-add" => cli::subscription_add(rest, db),
        "sub-update" => cli::subscription_update(rest, db),
        "sub-delete" => cli::subscription_delete(rest, db),
        "budget" => cli::budget(rest, db),
        "budgets" => cli::budgets(db),
        "total" => cli::total(rest, db),
        "report" => cli::category_report(rest, db),
        "summary" | "s" => cli::summary(rest, db),
        "search" => cli::search(rest, db),
        "export" => cli::export(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("fintrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("FinTrack - local personal finance tracker");
    println!();
    println!("Usage: fintrack [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Summary for the current month");
    println!("  categories                          List categories");
    println!("  category-add <name>                 Add a category");
    println!("  category-delete <id>                Delete a category and all its expenses");
    println!("  add <title> <amount> <category>     Record an expense (category name or id)");
    println!("    --date <date>                     Expense date (default: today)");
    println!("  update <id>                         Change an expense");
    println!("    --title, --amount, --date, --category <value>");
    println!("  delete <id>                         Delete an expense");
    println!("  show <id>                           Show one expense");
    println!("  recent [n]                          List the n most recent expenses (default: 20)");
    println!("  subs                                List subscriptions by next due date");
    println!("  sub-add <name> <amount> <next-date> Add a subscription");
    println!("  sub-update <id>                     Change a subscription");
    println!("    --name, --amount, --next-date <value>");
    println!("  sub-delete <id>                     Delete a subscription");
    println!("  budget set <YYYY-MM> <limit>        Set the budget for a month");
    println!("  budget check [YYYY-MM]              Compare a month's spending to its budget");
    println!("  budget delete <YYYY-MM>             Remove a month's budget");
    println!("  budgets                             List all budgets");
    println!("  total [YYYY-MM]                     Total spending (all time or one month)");
    println!("  report [YYYY-MM]                    Spending by category");
    println!("  summary [YYYY-MM]                   Monthly summary");
    println!("  search <date> [end-date]            Expenses on a date or within a range");
    println!("  export [path]                       Export expenses to CSV");
    println!("    --month <YYYY-MM>                 Only export one month");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Dates: YYYY-MM-DD, DD/MM/YYYY or DD-MM-YYYY.");
    println!(
        "Database: ${} or the platform data directory.",
        crate::config::DB_PATH_ENV
    );
}
