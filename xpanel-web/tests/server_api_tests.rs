//! Integration tests for /server/status and /health

mod helpers;

use axum::http::StatusCode;
use helpers::*;
use std::io;
use std::sync::Arc;
use xpanel_common::sys::ProcNet;
use xpanel_web::entity::User;

fn admin() -> User {
    User {
        id: 1,
        username: "admin".to_string(),
        password: "admin".to_string(),
    }
}

#[tokio::test]
async fn test_health_endpoint_no_login_required() {
    let test = setup_app().await;

    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "xpanel");
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_status_requires_login() {
    let test = setup_app().await;

    let (status, _) = send(&test.app, post_json("/server/status", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_reports_connection_counts() {
    let test = setup_app_with_counter(Arc::new(FakeCounter {
        tcp: Ok(12),
        udp: Ok(3),
    }))
    .await;
    let cookie = login_as(&test.state, admin()).await;

    let (_, body) = send(&test.app, post_json("/server/status", Some(&cookie), None)).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["msg"], "server_status");
    assert_eq!(body["data"]["tcpCount"], 12);
    assert_eq!(body["data"]["udpCount"], 3);
}

#[tokio::test]
async fn test_status_propagates_exact_os_error() {
    let test = setup_app_with_counter(Arc::new(FakeCounter {
        tcp: Ok(12),
        udp: Err((io::ErrorKind::PermissionDenied, "udp table: permission denied")),
    }))
    .await;
    let cookie = login_as(&test.state, admin()).await;

    let (_, body) = send(&test.app, post_json("/server/status", Some(&cookie), None)).await;

    assert_eq!(body["success"], false);
    assert_eq!(body["msg"], "server_status");
    assert_eq!(body["error"], "udp table: permission denied");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_status_from_proc_net_tables() {
    let dir = tempfile::tempdir().unwrap();
    let header = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";
    let entry = "   0: 0100007F:0035 00000000:0000 07 00000000:00000000 00:00000000 00000000   101        0 1 2 0000000000000000 0\n";
    std::fs::write(dir.path().join("tcp"), format!("{header}{entry}{entry}")).unwrap();
    std::fs::write(dir.path().join("tcp6"), format!("{header}{entry}")).unwrap();
    std::fs::write(dir.path().join("udp"), format!("{header}{entry}")).unwrap();
    std::fs::write(dir.path().join("udp6"), header).unwrap();

    let test = setup_app_with_counter(Arc::new(ProcNet::with_root(dir.path()))).await;
    let cookie = login_as(&test.state, admin()).await;

    let (_, body) = send(&test.app, post_json("/server/status", Some(&cookie), None)).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tcpCount"], 3);
    assert_eq!(body["data"]["udpCount"], 1);
}
