// Module layout (Clean Architecture style)
// - bootstrap: configuration, context and server composition
// - application: error surface, ports, auth use cases
// - infrastructure: DB/broker adapters and the realtime hub
// - presentation: HTTP/WS handlers and routing

pub mod application;
pub mod bootstrap;
pub mod infrastructure;
pub mod presentation;
