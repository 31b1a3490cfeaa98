use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::errors::AppError;
use crate::bootstrap::app_context::AppContext;
use crate::infrastructure::queue::{QueueBoard, QueueCounts};

#[derive(Debug, Serialize, ToSchema)]
pub struct QueueStatsResponse {
    pub name: String,
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
}

impl QueueStatsResponse {
    fn new(name: &str, counts: QueueCounts) -> Self {
        Self {
            name: name.to_string(),
            waiting: counts.waiting,
            active: counts.active,
            completed: counts.completed,
            failed: counts.failed,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(list_queues))
        .route("/:name", get(queue_detail))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/queues", tag = "Queues", responses(
    (status = 200, body = Vec<QueueStatsResponse>),
    (status = 503, description = "Queue storage unreachable")
))]
pub async fn list_queues(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<QueueStatsResponse>>, AppError> {
    let snapshot = ctx.queue_board().snapshot().await.map_err(unavailable)?;
    Ok(Json(
        snapshot
            .into_iter()
            .map(|(name, counts)| QueueStatsResponse::new(name, counts))
            .collect(),
    ))
}

#[utoipa::path(get, path = "/queues/{name}", tag = "Queues", params(
    ("name" = String, Path, description = "Queue name")
), responses(
    (status = 200, body = QueueStatsResponse),
    (status = 404, description = "Unknown queue"),
    (status = 503, description = "Queue storage unreachable")
))]
pub async fn queue_detail(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<QueueStatsResponse>, AppError> {
    if !QueueBoard::contains(&name) {
        return Err(AppError::NotFound(format!("queue {name} not found")));
    }
    let counts = ctx.queue_board().counts(&name).await.map_err(unavailable)?;
    Ok(Json(QueueStatsResponse::new(&name, counts)))
}

fn unavailable(e: anyhow::Error) -> AppError {
    tracing::warn!(error = ?e, "queue_board_unreachable");
    AppError::DependencyUnavailable("Job queue storage is unreachable".into())
}
