use axum::Router;

use crate::bootstrap::app_context::AppContext;

pub mod auth;
pub mod current_user;
pub mod health;
pub mod middleware;
pub mod queues;
pub mod session;

pub const BASE_PATH: &str = "/api/v1";

/// Route table. Registration order is fixed: the queue dashboard first, then
/// the auth surface, then the session-gated current-user route.
pub fn mount(app: Router, ctx: AppContext) -> Router {
    app.nest("/queues", queues::routes(ctx.clone()))
        .nest(BASE_PATH, auth::routes(ctx.clone()))
        .nest(BASE_PATH, current_user::routes(ctx.clone()))
        .nest(BASE_PATH, health::routes(ctx.pool()))
}
