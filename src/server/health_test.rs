//! Tests for the health endpoint

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::test_support::spawn_server;
use std::time::Duration;

/// Test that /healthz returns 200 with body "ok"
#[tokio::test]
async fn test_healthz_returns_200_ok() {
    // ARRANGE: Start server in background
    let (addr, _handle, server_task) = spawn_server().await;
    let client = reqwest::Client::new();

    // ACT: Make request to /healthz
    let response = client
        .get(format!("http://{}/healthz", addr))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to connect to health server");

    // ASSERT: Should return 200 OK with fixed body
    assert_eq!(response.status(), 200, "Liveness probe should return 200");
    assert_eq!(response.text().await.unwrap(), "ok");

    server_task.abort();
}

/// Test that the request contents are ignored
#[tokio::test]
async fn test_healthz_ignores_query_headers_and_body() {
    // ARRANGE: Start server in background
    let (addr, _handle, server_task) = spawn_server().await;
    let client = reqwest::Client::new();

    // ACT: Send a request with query, extra headers, and a body
    let response = client
        .get(format!("http://{}/healthz?verbose=true&probe=liveness", addr))
        .header("X-Probe", "kubelet")
        .header("Authorization", "Bearer not-checked")
        .body("unexpected payload")
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to connect to health server");

    // ASSERT: Same fixed response as a bare request
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    server_task.abort();
}

/// Test that repeated probes on one connection all succeed
#[tokio::test]
async fn test_healthz_repeated_probes() {
    // ARRANGE: Start server in background, one client reuses its connection
    let (addr, _handle, server_task) = spawn_server().await;
    let client = reqwest::Client::new();

    for _ in 0..5 {
        // ACT: Probe again
        let response = client
            .get(format!("http://{}/healthz", addr))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .expect("Failed to connect to health server");

        // ASSERT: Every probe succeeds
        assert_eq!(response.status(), 200);
    }

    server_task.abort();
}

/// Test that no other route is registered
#[tokio::test]
async fn test_unknown_path_returns_404() {
    // ARRANGE: Start server in background
    let (addr, _handle, server_task) = spawn_server().await;
    let client = reqwest::Client::new();

    // ACT: Request a path that is not routed
    let response = client
        .get(format!("http://{}/readyz", addr))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to connect to health server");

    // ASSERT: Should return 404 Not Found
    assert_eq!(response.status(), 404);

    server_task.abort();
}
