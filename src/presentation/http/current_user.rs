use axum::{Extension, Json, Router, extract::State, middleware, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::errors::AppError;
use crate::application::use_cases::auth::me::GetMe;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::UserResponse;
use crate::presentation::http::session::{AuthUser, require_session};

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    #[serde(rename = "isUser")]
    pub is_user: bool,
    pub user: Option<UserResponse>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/currentuser", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            ctx.clone(),
            require_session,
        ))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/v1/currentuser", tag = "Auth", responses(
    (status = 200, body = CurrentUserResponse),
    (status = 401, description = "Missing or invalid session")
))]
pub async fn current_user(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<CurrentUserResponse>, AppError> {
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let response = match uc.execute(auth.id).await? {
        Some(user) => CurrentUserResponse {
            is_user: true,
            user: Some(UserResponse {
                id: user.id,
                username: user.username,
                email: user.email,
            }),
        },
        // Session outlived the account
        None => CurrentUserResponse {
            is_user: false,
            user: None,
        },
    };
    Ok(Json(response))
}
