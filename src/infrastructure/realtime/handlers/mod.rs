mod follower;
mod notification;
mod post;
mod user;

pub use follower::FollowerHandler;
pub use notification::NotificationHandler;
pub use post::PostHandler;
pub use user::UserHandler;

use crate::infrastructure::realtime::hub::RealtimeHub;

/// Wires the four domain handlers to the shared hub.
pub fn attach_handlers(hub: &RealtimeHub) {
    PostHandler::new(hub.clone()).listen();
    FollowerHandler::new(hub.clone()).listen();
    UserHandler::new(hub.clone()).listen();
    NotificationHandler::new(hub.clone()).listen();
}
