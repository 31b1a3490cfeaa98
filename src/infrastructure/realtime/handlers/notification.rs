use crate::infrastructure::realtime::hub::RealtimeHub;

/// Server-emitted notification events. Notifications are produced by the
/// worker fleet, never by clients, so `listen` wires nothing inbound.
pub struct NotificationHandler {
    hub: RealtimeHub,
}

impl NotificationHandler {
    pub fn new(hub: RealtimeHub) -> Self {
        Self { hub }
    }

    pub fn listen(self) {}

    pub async fn inserted(&self, data: serde_json::Value) {
        self.hub.emit("insert notification", data).await;
    }

    pub async fn updated(&self, data: serde_json::Value) {
        self.hub.emit("update notification", data).await;
    }

    pub async fn deleted(&self, data: serde_json::Value) {
        self.hub.emit("delete notification", data).await;
    }
}
