use std::net::SocketAddr;

use axum::extract::{DefaultBodyLimit, MatchedPath, OriginalUri};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{Json, Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::infrastructure::realtime::{RedisFanout, handlers};
use crate::presentation;
use crate::presentation::http::middleware::{scrub_duplicate_params, security_headers};

const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::auth::signup,
        crate::presentation::http::auth::signin,
        crate::presentation::http::auth::signout,
        crate::presentation::http::current_user::current_user,
        crate::presentation::http::queues::list_queues,
        crate::presentation::http::queues::queue_detail,
        crate::presentation::http::health::health,
        crate::presentation::ws::socket_entry,
    ),
    components(schemas(
        crate::presentation::http::auth::SignupRequest,
        crate::presentation::http::auth::SigninRequest,
        crate::presentation::http::auth::UserResponse,
        crate::presentation::http::auth::AuthResponse,
        crate::presentation::http::auth::MessageResponse,
        crate::presentation::http::current_user::CurrentUserResponse,
        crate::presentation::http::queues::QueueStatsResponse,
        crate::presentation::http::health::HealthResp,
    )),
    tags(
        (name = "Auth", description = "Authentication"),
        (name = "Queues", description = "Job queue dashboard"),
        (name = "Realtime", description = "Realtime events"),
        (name = "Health", description = "System health checks")
    )
)]
struct ApiDoc;

/// Composition pipeline: routes, fallback, then the middleware stack in a
/// fixed order. Pure function of the context, so tests can drive the exact
/// router the process serves.
pub fn build_app(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.cfg);
    let app = Router::new();
    let app = presentation::http::mount(app, ctx.clone());
    let app = app.merge(presentation::ws::routes(ctx.clone()));
    let app = app.merge(
        SwaggerUi::new("/api/v1/docs").url("/api/v1/openapi.json", ApiDoc::openapi()),
    );
    app.fallback(not_found)
        .layer(middleware::from_fn(scrub_duplicate_params))
        .layer(middleware::from_fn_with_state(ctx, security_headers))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}

pub async fn serve(ctx: AppContext) -> anyhow::Result<()> {
    let app = build_app(ctx.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], ctx.cfg.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, pid = std::process::id(), "http_listening");

    // The listener is already accepting; fan-out attaches when the broker
    // answers. On failure the hub stays local-only and HTTP stays up.
    let hub = ctx.realtime().clone();
    let redis_url = ctx.cfg.redis_url.clone();
    tokio::spawn(async move {
        match RedisFanout::connect(&redis_url, hub.clone()).await {
            Ok(adapter) => {
                hub.attach_fanout(adapter).await;
                info!("realtime_fanout_attached");
            }
            Err(e) => {
                warn!(error = ?e, "realtime_fanout_unavailable, continuing local-only");
            }
        }
    });
    handlers::attach_handlers(ctx.realtime());

    axum::serve(listener, app).await?;
    Ok(())
}

async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<serde_json::Value>) {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": format!("{path} not found") })),
    )
}

fn cors_layer(cfg: &Config) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [
        axum::http::header::CONTENT_TYPE,
        axum::http::header::AUTHORIZATION,
    ];
    match HeaderValue::from_str(&cfg.client_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        Err(_) => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    }
}
