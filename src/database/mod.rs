use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DatabaseSettings;

/// Connects a pool using the configured host list and credentials. Handlers
/// that issue more than one statement open a transaction on this pool, which
/// keeps commit/rollback scoped to the request.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let uri = settings.connection_uri();
    tracing::debug!("PostgreSQL connection URI: {uri}");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&uri)
        .await?;

    tracing::debug!("Connected to database \"{}\"", settings.database_name);
    Ok(pool)
}

/// Applies the embedded migrations in `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
