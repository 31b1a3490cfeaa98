use std::collections::BTreeSet;
use std::sync::Mutex;

use tokio::sync::broadcast::error::RecvError;

use crate::infrastructure::realtime::hub::RealtimeHub;

/// Tracks which users announced themselves on this process and broadcasts
/// presence plus block/unblock signals.
pub struct UserHandler {
    hub: RealtimeHub,
    connected: Mutex<BTreeSet<String>>,
}

impl UserHandler {
    pub fn new(hub: RealtimeHub) -> Self {
        Self {
            hub,
            connected: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn listen(self) {
        let mut inbound = self.hub.subscribe_inbound();
        tokio::spawn(async move {
            loop {
                match inbound.recv().await {
                    Ok(ev) => match ev.event.as_str() {
                        "setup" => {
                            if let Some(username) = username_of(&ev.data) {
                                let online = {
                                    let mut users = self.connected.lock().unwrap();
                                    users.insert(username);
                                    users.iter().cloned().collect::<Vec<_>>()
                                };
                                self.hub.emit("user online", serde_json::json!(online)).await;
                            }
                        }
                        "block user" => self.hub.emit("blocked user id", ev.data).await,
                        "unblock user" => self.hub.emit("unblocked user id", ev.data).await,
                        _ => {}
                    },
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "user_handler_lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

// Clients send either a bare username or an object carrying one.
fn username_of(data: &serde_json::Value) -> Option<String> {
    match data {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("username")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        _ => None,
    }
}
