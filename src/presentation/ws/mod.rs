use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::bootstrap::app_context::AppContext;
use crate::infrastructure::realtime::{ClientEvent, RealtimeHub};

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/socket", get(socket_entry)).with_state(ctx)
}

#[utoipa::path(
    get,
    path = "/socket",
    tag = "Realtime",
    responses((status = 101, description = "Switching Protocols (WebSocket upgrade)"))
)]
pub async fn socket_entry(
    ws: WebSocketUpgrade,
    State(ctx): State<AppContext>,
) -> impl IntoResponse {
    let hub = ctx.realtime().clone();
    ws.on_upgrade(move |socket| client_connection(socket, hub))
}

/// Bridges one WebSocket client and the hub: outbound events become JSON
/// text frames, inbound frames become client events for the domain handlers.
async fn client_connection(socket: WebSocket, hub: RealtimeHub) {
    let (mut sink, mut stream) = socket.split();
    let mut events = hub.subscribe();

    let mut send_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ev) => {
                    let frame = match serde_json::to_string(&ev) {
                        Ok(f) => f,
                        Err(_) => continue,
                    };
                    if sink.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "ws_client_lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let ingest_hub = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = stream.next().await {
            if let Message::Text(text) = msg {
                match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(ev) => ingest_hub.ingest(ev),
                    Err(e) => tracing::debug!(error = ?e, "ws_frame_undecodable"),
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}
