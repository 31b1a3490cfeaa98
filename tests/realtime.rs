mod common;

use axum::http::{Method, StatusCode};

use chirp_api::bootstrap::server::build_app;
use chirp_api::infrastructure::realtime::{ClientEvent, RedisFanout, handlers};
use common::{DEAD_BROKER_URL, request, test_config, test_ctx};

#[tokio::test]
async fn http_keeps_serving_when_both_broker_connections_fail() {
    let ctx = test_ctx(test_config("development"));
    let hub = ctx.realtime().clone();

    let attach = RedisFanout::connect(DEAD_BROKER_URL, hub.clone()).await;
    assert!(attach.is_err(), "dead broker must fail fan-out construction");
    handlers::attach_handlers(&hub);

    let app = build_app(ctx);
    let res = request(&app, Method::GET, "/api/v1/signout", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn domain_handlers_translate_client_events_locally() {
    let ctx = test_ctx(test_config("development"));
    let hub = ctx.realtime().clone();
    handlers::attach_handlers(&hub);
    let mut rx = hub.subscribe();

    hub.ingest(ClientEvent {
        event: "reaction".into(),
        data: serde_json::json!({"postId": "p1", "type": "wow"}),
    });
    assert_eq!(rx.recv().await.unwrap().event, "update reaction");

    hub.ingest(ClientEvent {
        event: "follow user".into(),
        data: serde_json::json!({"followerId": "f1"}),
    });
    assert_eq!(rx.recv().await.unwrap().event, "add follower");

    hub.ingest(ClientEvent {
        event: "setup".into(),
        data: serde_json::json!({"username": "amber"}),
    });
    let ev = rx.recv().await.unwrap();
    assert_eq!(ev.event, "user online");
    assert_eq!(ev.data, serde_json::json!(["amber"]));
}

#[tokio::test]
async fn every_connected_listener_sees_each_event() {
    let ctx = test_ctx(test_config("development"));
    let hub = ctx.realtime().clone();
    handlers::attach_handlers(&hub);
    let mut a = hub.subscribe();
    let mut b = hub.subscribe();

    hub.ingest(ClientEvent {
        event: "comment".into(),
        data: serde_json::json!({"postId": "p2"}),
    });
    for rx in [&mut a, &mut b] {
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.event, "update comment");
        assert_eq!(ev.data["postId"], "p2");
    }
}
