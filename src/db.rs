use sqlx::{migrate::MigrateError, sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let mut options = SqlitePoolOptions::new().max_connections(max_connections);
    if database_url.contains(":memory:") {
        // an in-memory database lives only as long as its connection
        options = options.idle_timeout(None).max_lifetime(None);
    }

    let db_pool = options.connect(database_url).await?;
    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(db_pool).await?;
    info!("database schema up to date");
    Ok(())
}
