//! # Kanban Seed Tool
//!
//! Resets the board to the default three columns and sample tasks.
//!
//! ⚠️  Deletes every existing column and task.
//!
//! ```bash
//! cargo run -p kanban-api --bin kanban-seed
//! ```

use kanban_api::config::Config;
use kanban_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool},
    seed::seed,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanban_shared=info,kanban_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;
    let pool = create_pool(config.database).await?;
    run_migrations(&pool).await?;

    let result = seed(&pool).await;
    close_pool(pool).await;

    let report = result?;
    tracing::info!(
        columns = report.columns.len(),
        tasks = report.tasks.len(),
        "Database seeded successfully"
    );

    Ok(())
}
