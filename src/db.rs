use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement,
};

use crate::{config::Config, error::AppResult};

const SQLITE_PRAGMAS: &[&str] =
    &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA foreign_keys=ON"];

pub async fn connect_and_migrate(config: &Config) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    if config.database_url.starts_with("postgres") {
        opts.set_schema_search_path(config.content_schema.clone());
    }
    if config.database_url.contains(":memory:") {
        // Each pooled connection would otherwise open its own empty database.
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts).await?;

    match db.get_database_backend() {
        DbBackend::Sqlite => {
            for pragma in SQLITE_PRAGMAS {
                db.execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string())).await?;
            }
        }
        DbBackend::Postgres => {
            // Identifier already validated by Config.
            db.execute(Statement::from_string(
                DbBackend::Postgres,
                format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", config.content_schema),
            ))
            .await?;
        }
        _ => {}
    }

    Migrator::up(&db, None).await?;
    tracing::debug!(backend = ?db.get_database_backend(), "database migrated");
    Ok(db)
}
