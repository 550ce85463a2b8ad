//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise `querypath_core` end to end against an in-memory SQLite context.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Set `QUERYPATH_LOG_DIR` (and optionally `QUERYPATH_LOG_LEVEL`) to write logs.

use querypath_core::{
    core_version, init_logging, open_db_in_memory, ContextRepository, LoggingConfig, Repository,
    SqlCommand, SqlQuery, SqlScalar,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("querypath error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Some(config) = LoggingConfig::from_env() {
        init_logging(&config)?;
    }
    log::info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let conn = open_db_in_memory()?;
    let repo = ContextRepository::new(&conn);

    repo.execute(&SqlCommand::new(
        "CREATE TABLE routes (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
    )?)?;
    for (id, name) in [(1_i64, "north"), (2, "east"), (3, "south")] {
        repo.execute(
            &SqlCommand::new("INSERT INTO routes (id, name) VALUES (?1, ?2);")?
                .bind(id)
                .bind(name.to_string()),
        )?;
    }

    let count = repo.get(&SqlScalar::<i64>::new("SELECT COUNT(*) FROM routes;")?)?;
    let names = SqlQuery::new("SELECT name FROM routes ORDER BY id;", |row| {
        row.get::<_, String>(0)
    })?;

    println!("querypath_core version={}", core_version());
    println!("routes count={count}");
    for name in repo.find(&names)? {
        println!("route name={name}");
    }

    Ok(())
}
