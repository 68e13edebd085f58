//! Schema for the `drugs` table and database bootstrap.
//! Every statement is idempotent so startup can run them unconditionally.

use crate::error::{AppError, ConfigError};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// DDL in execution order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (btrim(name) <> ''),
    category TEXT NOT NULL CHECK (btrim(category) <> ''),
    description TEXT NOT NULL,
    active_ingredients JSONB NOT NULL DEFAULT '[]'::jsonb,
    dosage_forms JSONB NOT NULL DEFAULT '[]'::jsonb,
    side_effects JSONB NOT NULL DEFAULT '[]'::jsonb,
    contraindications JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (updated_at >= created_at)
)"#,
    "CREATE INDEX IF NOT EXISTS ix_drugs_name ON drugs (name)",
    "CREATE INDEX IF NOT EXISTS ix_drugs_category ON drugs (category)",
];

/// The schema as one SQL script.
pub fn schema_sql() -> String {
    let mut out = String::new();
    for stmt in SCHEMA_STATEMENTS {
        out.push_str(stmt);
        out.push_str(";\n");
    }
    out
}

/// Create the `drugs` table and its indexes if missing.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for stmt in SCHEMA_STATEMENTS {
        sqlx::query(stmt).execute(pool).await?;
    }
    tracing::info!("schema ready");
    Ok(())
}

/// Connection options for the `postgres` maintenance database, plus the target database
/// name when it needs bootstrapping (`None` for no name or `postgres` itself).
fn bootstrap_target(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| {
        AppError::Config(ConfigError::Invalid {
            var: "DATABASE_URL",
            reason: e.to_string(),
        })
    })?;
    let target = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "postgres")
        .map(String::from);
    Ok((opts.database("postgres"), target))
}

/// A concurrent CREATE DATABASE got there first.
fn is_duplicate_database(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|d| d.code())
        .is_some_and(|code| code == "42P04")
}

/// Create the database named in `database_url` when missing, via the `postgres`
/// maintenance database. Run before building the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, Some(name)) = bootstrap_target(database_url)? else {
        return Ok(());
    };
    let mut conn = admin.connect().await?;
    let (present,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&name)
        .fetch_one(&mut conn)
        .await?;
    if present {
        return Ok(());
    }
    tracing::info!(database = %name, "creating database");
    match sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&name)))
        .execute(&mut conn)
        .await
    {
        Err(e) if is_duplicate_database(&e) => {
            tracing::debug!(database = %name, "database created concurrently");
            Ok(())
        }
        other => other.map(|_| ()).map_err(AppError::from),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
