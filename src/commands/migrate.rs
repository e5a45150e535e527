//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let result = match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await
        }
        MigrateAction::Status => db.migration_status().await.map(|status| {
            for (name, applied) in status {
                let state = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, state);
            }
        }),
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.fresh_migrations().await
        }
    };

    result.map_err(|e| AppError::internal(e.to_string()))?;
    tracing::info!(action = ?args.action, "Migration command finished");
    Ok(())
}
