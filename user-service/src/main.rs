use user_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = database::create_pool(&config.database).await?;
            if config.database.run_migrations {
                database::run_migrations(&pool).await?;
            }

            let served = run(config, PgUserRepository::new(pool.clone())).await;
            pool.close().await;
            served
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; data is lost on exit");
            run(config, MemoryUserRepository::new()).await
        }
    }
}
