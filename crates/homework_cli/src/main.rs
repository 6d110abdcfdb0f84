//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `homework_core` linkage and database bootstrap end to end.
//! - Seed the catalog on first run and print a deterministic summary.

use clap::Parser;
use homework_core::db::open_db;
use homework_core::{
    default_log_level, init_logging, CatalogConfig, CatalogInitializer, Collection,
    HierarchyService, RecordStore, SqliteRecordStore,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "homework_cli")]
#[command(about = "Open a homework log database, seed it when empty and print the catalog", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(default_value = "homework.sqlite3")]
    db_path: PathBuf,

    /// Absolute directory for rolling log files; logging stays off when unset
    #[arg(long, env = "HOMEWORK_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "HOMEWORK_LOG_LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("homework_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    println!("homework_core ping={}", homework_core::ping());
    println!("homework_core version={}", homework_core::core_version());

    let conn = open_db(&cli.db_path)?;
    let store = SqliteRecordStore::try_new(&conn)?;

    if store.count(Collection::Classes)? == 0 {
        let initializer = CatalogInitializer::new(store, CatalogConfig::default())?;
        let summary = initializer.initialize()?;
        info!(
            "event=cli_seed module=cli status=ok classes={} sections={}",
            summary.classes, summary.sections
        );
        println!(
            "seeded classes={} sections={} (expected sections={})",
            summary.classes,
            summary.sections,
            initializer.config().expected_sections()
        );
    }

    let hierarchy = HierarchyService::new(store);
    for class in hierarchy.get_classes()? {
        let sections = hierarchy.get_sections(class.id)?;
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        println!("class {} sections=[{}]", class.name, names.join(", "));
    }
    println!("assignments={}", store.count(Collection::Assignments)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn db_path_defaults_when_omitted() {
        let cli = Cli::try_parse_from(["homework_cli"]).unwrap();
        assert_eq!(cli.db_path, PathBuf::from("homework.sqlite3"));
    }

    #[test]
    fn help_flag_is_not_taken_as_db_path() {
        let err = Cli::try_parse_from(["homework_cli", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Cli::try_parse_from(["homework_cli", "--reset"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn log_options_parse_alongside_positional_path() {
        let cli = Cli::try_parse_from([
            "homework_cli",
            "school.sqlite3",
            "--log-dir",
            "/tmp/homework-logs",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(cli.db_path, PathBuf::from("school.sqlite3"));
        assert_eq!(cli.log_dir.as_deref(), Some("/tmp/homework-logs"));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
    }
}
