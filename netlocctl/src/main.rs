//! This is a command-line tool to move network locations into their dedicated
//! database via [libnetloc]
use crate::{cli::*, config::DatabasePaths};
use anyhow::Result;
use clap::Parser;
use libnetloc::{Database, LocationMigrator, MigrationState, RecordStore, StoreError};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;

mod cli;
mod config;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("NETLOC_LOG"))
        .init();
    let args = Cli::parse();
    let paths = config::resolve_databases(
        args.config,
        args.default_database,
        args.network_location_database,
    )
    .await?;
    debug!(?paths, "resolved databases");

    let default_db = Database::connect(&paths.default).await?;
    let res = match args.command {
        Commands::Migrate => migrate(&default_db, &paths).await,
        Commands::Status => status(&default_db, &paths).await,
        Commands::List { source } => list(&default_db, &paths, source).await,
    };
    default_db.close().await;
    res
}

/// The only command that creates the network location database
async fn migrate(default_db: &Database, paths: &DatabasePaths) -> Result<()> {
    let netloc_db = Database::open_network_location(&paths.network_location).await?;
    let migrator = LocationMigrator::new(default_db, default_db, &netloc_db);
    let res = async {
        let pending = migrator.pending_count().await?;
        migrator.migrate().await?;
        if pending > 0 {
            println!(
                "Moved {pending} network locations to '{}'",
                paths.network_location.display()
            );
        } else {
            println!("No network locations to migrate");
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;
    netloc_db.close().await;
    res
}

async fn status(default_db: &Database, paths: &DatabasePaths) -> Result<()> {
    match libnetloc::migration_state(default_db).await? {
        MigrationState::Pending => println!(
            "Pending: {} network locations in '{}' have not been migrated",
            libnetloc::pending_count(default_db, default_db).await?,
            paths.default.display()
        ),
        MigrationState::Done => println!("Done: network locations have been migrated"),
    }
    Ok(())
}

async fn list(default_db: &Database, paths: &DatabasePaths, source: Source) -> Result<()> {
    match source {
        Source::Default => print_locations(default_db, source).await,
        Source::NetworkLocation => {
            let Some(netloc_db) = connect_existing(&paths.network_location).await? else {
                println!(
                    "No network location database at '{}'",
                    paths.network_location.display()
                );
                return Ok(());
            };
            let res = print_locations(&netloc_db, source).await;
            netloc_db.close().await;
            res
        }
    }
}

async fn print_locations(store: &dyn RecordStore, source: Source) -> Result<()> {
    match store.read_all().await {
        Ok(locations) => {
            println!("{}\n", output::location_table(&locations));
            println!("{} records found", locations.len());
            Ok(())
        }
        Err(StoreError::TableNotFound(table)) => {
            println!("No '{table}' table in the {source:?} database");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Connect to a database only if the file is already there
async fn connect_existing(path: &Path) -> Result<Option<Database>> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(None);
    }
    Ok(Some(Database::connect(path).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    async fn legacy_default_db(dir: &Path) -> Database {
        let db = Database::open_network_location(dir.join("default.sqlite3"))
            .await
            .expect("failed to create default database");
        let location = libnetloc::LocationRecord::new("example.com")
            .expect("failed to create location");
        db.bulk_write(&[location])
            .await
            .expect("failed to write location");
        db
    }

    fn paths(dir: &Path) -> DatabasePaths {
        DatabasePaths {
            default: dir.join("default.sqlite3"),
            network_location: dir.join("networklocation.sqlite3"),
        }
    }

    #[test(tokio::test)]
    async fn test_read_only_commands_leave_target_alone() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let paths = paths(dir.path());
        let default_db = legacy_default_db(dir.path()).await;

        status(&default_db, &paths).await.expect("status failed");
        list(&default_db, &paths, Source::NetworkLocation)
            .await
            .expect("list failed");
        list(&default_db, &paths, Source::Default)
            .await
            .expect("list failed");
        assert!(!paths.network_location.exists());
        assert!(
            connect_existing(&paths.network_location)
                .await
                .expect("failed to check database")
                .is_none()
        );

        migrate(&default_db, &paths).await.expect("migrate failed");
        assert!(paths.network_location.exists());
        let netloc_db = connect_existing(&paths.network_location)
            .await
            .expect("failed to check database")
            .expect("database wasn't created");
        assert_eq!(netloc_db.count().await.expect("failed to count"), 1);
        list(&default_db, &paths, Source::Default)
            .await
            .expect("list failed after migration");
        status(&default_db, &paths)
            .await
            .expect("status failed after migration");
    }
}
