use std::path::Path;
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::util::parse_month;

const HEADER: [&str; 5] = ["id", "date", "title", "amount", "category"];

/// Write expenses (all, or one `YYYY-MM` month) to a CSV file, oldest first.
/// Returns the number of expense rows written.
pub(crate) fn export_expenses(db: &Database, path: &Path, month: Option<&str>) -> Result<usize> {
    let month = month.map(parse_month).transpose()?;
    let rows = db.expense_rows(month.as_deref())?;

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADER)?;
    for row in &rows {
        wtr.write_record([
            row.id.to_string(),
            row.date.to_string(),
            row.title.clone(),
            row.amount.to_string(),
            row.category.clone(),
        ])?;
    }
    wtr.flush()?;

    debug!(count = rows.len(), path = %path.display(), "expenses exported");
    Ok(rows.len())
}
