mod budget;
mod config;
mod db;
mod error;
mod export;
mod models;
mod report;
mod run;
mod util;

#[cfg(test)]
#[path = "util_tests.rs"]
mod util_tests;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();
    let db_path = config::db_path()?;
    let mut db = db::Database::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    run::as_cli(&args, &mut db)
}

/// Log to stderr; `RUST_LOG` overrides the default `fintrack=warn`.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fintrack=warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
