use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header::SET_COOKIE},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::errors::AppError;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::session;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", get(signout))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/v1/signup", tag = "Auth", request_body = SignupRequest, responses(
    (status = 201, body = AuthResponse),
    (status = 409, description = "Email already registered")
))]
pub async fn signup(
    State(ctx): State<AppContext>,
    Json(req): Json<SignupRequest>,
) -> Result<(axum::http::StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "username, email and password are required".into(),
        ));
    }
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        username: req.username.clone(),
        email: req.email.clone(),
        password: req.password.clone(),
    };
    let user = uc
        .execute(&dto)
        .await?
        .ok_or_else(|| AppError::Conflict("User with that email already exists".into()))?;

    let headers = session_headers(&ctx, user.id)?;
    Ok((
        axum::http::StatusCode::CREATED,
        headers,
        Json(AuthResponse {
            message: "User created successfully".into(),
            user: UserResponse {
                id: user.id,
                username: user.username,
                email: user.email,
            },
        }),
    ))
}

#[utoipa::path(post, path = "/api/v1/signin", tag = "Auth", request_body = SigninRequest, responses(
    (status = 200, body = AuthResponse),
    (status = 400, description = "Invalid credentials")
))]
pub async fn signin(
    State(ctx): State<AppContext>,
    Json(req): Json<SigninRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email.clone(),
        password: req.password.clone(),
    };
    let user = uc
        .execute(&dto)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".into()))?;

    let headers = session_headers(&ctx, user.id)?;
    Ok((
        headers,
        Json(AuthResponse {
            message: "User login successfully".into(),
            user: UserResponse {
                id: user.id,
                username: user.username,
                email: user.email,
            },
        }),
    ))
}

#[utoipa::path(get, path = "/api/v1/signout", tag = "Auth", responses(
    (status = 200, body = MessageResponse)
))]
pub async fn signout(State(ctx): State<AppContext>) -> (HeaderMap, Json<MessageResponse>) {
    let cookie = session::clear_session_cookie(ctx.cfg.cookie_secure());
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(SET_COOKIE, value);
    }
    (
        headers,
        Json(MessageResponse {
            message: "Logout successful".into(),
        }),
    )
}

fn session_headers(ctx: &AppContext, user_id: Uuid) -> Result<HeaderMap, AppError> {
    let token = session::issue_session(&ctx.cfg, user_id)?;
    let cookie = session::session_cookie(&token, ctx.cfg.cookie_secure());
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
    );
    Ok(headers)
}
