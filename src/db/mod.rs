pub mod attendance;
pub mod event;
pub mod invitation;
pub mod user;

use crate::PGPool;
use log::info;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn init_db_pool(db_url: &str) -> Result<PGPool, sqlx::Error> {
    let pool: PGPool = PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;
    MIGRATOR.run(&pool).await?;
    info!("connected to postgresql, schema is up to date");
    Ok(pool)
}
