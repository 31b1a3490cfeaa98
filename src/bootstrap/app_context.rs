use std::sync::Arc;

use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::queue::QueueBoard;
use crate::infrastructure::realtime::RealtimeHub;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    pool: PgPool,
    user_repo: Arc<dyn UserRepository>,
    queue_board: QueueBoard,
    realtime: RealtimeHub,
}

impl AppServices {
    pub fn new(
        pool: PgPool,
        user_repo: Arc<dyn UserRepository>,
        queue_board: QueueBoard,
        realtime: RealtimeHub,
    ) -> Self {
        Self {
            pool,
            user_repo,
            queue_board,
            realtime,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn pool(&self) -> PgPool {
        self.services.pool.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn queue_board(&self) -> QueueBoard {
        self.services.queue_board.clone()
    }

    pub fn realtime(&self) -> &RealtimeHub {
        &self.services.realtime
    }
}
