use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub mod models;
pub mod patch;

/// Embedded migrations from the migrations/ directory
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Open a pool against the given SQLite URL and bring the schema up to date.
/// Foreign keys are enforced per connection; the file is created on first run.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}
