//! Table metadata and DDL generation.
use tokio_postgres::Client;

/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str` so DDL can be assembled at compile
/// time from the table name constants. The trait describes structure
/// only; execution happens in [`provision`].
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Creates one entity's table and indexes. Idempotent.
pub async fn provision<S>(client: &Client) -> Result<(), super::PgErr>
where
    S: Schema,
{
    log::info!("provisioning table ({})", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await?;
    Ok(())
}
