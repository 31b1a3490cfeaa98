pub mod handlers;
mod hub;
mod redis_fanout;

pub use hub::{ClientEvent, RealtimeHub, ServerEvent};
pub use redis_fanout::RedisFanout;
