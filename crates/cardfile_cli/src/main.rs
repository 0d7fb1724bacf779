//! Database task runner for Cardfile.
//!
//! # Responsibility
//! - Expose the bootstrap tasks (create, migrate, seed, drop) against the
//!   YAML-configured database, one environment at a time.
//! - Provide `show`, a headless probe that runs the same startup data path
//!   the GUI composer runs.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;

use cardfile_core::config::{self, ConnectionConfig, Environments};
use cardfile_core::db::migrations::latest_version;
use cardfile_core::db::open_existing_db;
use cardfile_core::db::tasks::{
    create_database, current_schema_version, drop_database, migrate_database, seed_database,
    CreateOutcome, DropOutcome, SeedOutcome,
};
use cardfile_core::{ContactField, FormSession, SqliteContactRepository};

#[derive(Parser)]
#[command(version, about = "Cardfile database tasks", long_about = None)]
struct Args {
    /// Path to the environment-sectioned database config. Falls back to the
    /// CARDFILE_CONFIG environment variable, then to config/database.yml.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Environment section to operate on. Falls back to the CARDFILE_ENV
    /// environment variable, then to development.
    #[arg(short, long, value_name = "NAME")]
    environment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the configured database file.
    Create,
    /// Apply pending schema migrations, creating the file if needed.
    Migrate,
    /// Load the seed contact into an empty database.
    Seed,
    /// Delete the configured database file.
    Drop,
    /// Print the database schema version.
    Version,
    /// Open the contact session and print it, as the GUI would see it.
    Show,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = args
        .config
        .or_else(config_path_from_env)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let environment = args
        .environment
        .unwrap_or_else(config::environment_from_env);
    debug!(
        "resolved config={} environment={environment}",
        config_path.display()
    );

    let environments = Environments::load(&config_path)
        .with_context(|| format!("loading database config `{}`", config_path.display()))?;
    let connection = environments
        .connection(&environment)
        .with_context(|| format!("resolving environment `{environment}`"))?;

    match args.command {
        Command::Create => match create_database(&connection)? {
            CreateOutcome::Created => {
                println!("Created database {}", connection.database.display());
            }
            CreateOutcome::AlreadyExists => {
                println!("Database {} already exists", connection.database.display());
            }
        },
        Command::Migrate => {
            let outcome = migrate_database(&connection)?;
            if outcome.is_noop() {
                println!("Schema already at version {}", outcome.to_version);
            } else {
                println!(
                    "Migrated {} from version {} to {}",
                    connection.database.display(),
                    outcome.from_version,
                    outcome.to_version
                );
            }
        }
        Command::Seed => match seed_database(&connection)? {
            SeedOutcome::Seeded(id) => println!("Seeded contact {id}"),
            SeedOutcome::SkippedExisting => println!("Contacts already present; seed skipped"),
        },
        Command::Drop => match drop_database(&connection)? {
            DropOutcome::Dropped => {
                println!("Dropped database {}", connection.database.display());
            }
            DropOutcome::NotFound => {
                println!("Database {} does not exist", connection.database.display());
            }
        },
        Command::Version => {
            let version = current_schema_version(&connection)?;
            println!("Schema version {version} (latest {})", latest_version());
        }
        Command::Show => show_contact(&connection)?,
    }

    Ok(())
}

fn show_contact(connection: &ConnectionConfig) -> anyhow::Result<()> {
    let conn = open_existing_db(&connection.database)
        .context("opening database (run the create and migrate tasks first)")?;
    let repo = SqliteContactRepository::try_new(&conn)?;
    let session = FormSession::open(repo)?;

    if session.bootstrapped() {
        println!("(store was empty; created a blank contact)");
    }
    for field in ContactField::ALL {
        println!("{}: {}", field.label(), session.contact().get(field));
    }
    Ok(())
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(config::CONFIG_PATH_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
