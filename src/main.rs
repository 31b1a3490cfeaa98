use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;

use chirp_api::application::ports::user_repository::UserRepository;
use chirp_api::bootstrap::app_context::{AppContext, AppServices};
use chirp_api::bootstrap::config::Config;
use chirp_api::bootstrap::server;
use chirp_api::infrastructure;
use chirp_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use chirp_api::infrastructure::queue::QueueBoard;
use chirp_api::infrastructure::realtime::RealtimeHub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "chirp_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(environment = %cfg.environment, port = cfg.server_port, "Starting chirp backend");

    // Database before application composition; a failure here aborts startup
    let pool = infrastructure::db::connect_pool(&cfg.database_url).await?;
    infrastructure::db::migrate(&pool).await?;

    let user_repo: Arc<dyn UserRepository> = Arc::new(SqlxUserRepository::new(pool.clone()));
    let queue_board = QueueBoard::from_url(&cfg.redis_url)?;
    let realtime = RealtimeHub::new();
    let services = AppServices::new(pool, user_repo, queue_board, realtime);
    let ctx = AppContext::new(cfg, services);

    server::serve(ctx).await
}
