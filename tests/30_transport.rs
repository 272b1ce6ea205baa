mod common;

use anyhow::{Context, Result};
use backoffice_api::envelope::{NETWORK_FAILURE_MESSAGE, SERVER_PROBLEM_MESSAGE};
use backoffice_api::ApiEnvelope;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Raw server that announces more body bytes than it sends, then hangs up
async fn spawn_truncating_server() -> Result<u16> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n";
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(br#"{"success":tr"#).await;
            let _ = socket.flush().await;
            let _ = socket.shutdown().await;
        }
    });

    Ok(port)
}

#[tokio::test]
async fn body_cut_short_is_a_network_failure() -> Result<()> {
    let port = spawn_truncating_server().await?;
    let h = common::harness(&format!("http://127.0.0.1:{}/api/", port), Some("abc"))?;

    let env = h.client.get("users").await;

    assert_eq!(env, ApiEnvelope::failure(NETWORK_FAILURE_MESSAGE));
    assert_eq!(h.session.clears(), 0);
    assert!(h.navigator.visited().is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_yields_network_envelope() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let h = common::harness(&format!("http://127.0.0.1:{}/api/", port), Some("abc"))?;

    let env = h.client.get("users").await;

    assert_eq!(env, ApiEnvelope::failure(NETWORK_FAILURE_MESSAGE));
    assert_eq!(h.session.clears(), 0);
    assert!(h.navigator.visited().is_empty());
    Ok(())
}

#[tokio::test]
async fn non_json_error_status_is_server_problem() -> Result<()> {
    let backend = common::MockBackend::spawn().await?;
    let h = common::harness(&backend.base_url, None)?;

    let env = h.client.get("crash").await;

    assert_eq!(env, ApiEnvelope::failure(SERVER_PROBLEM_MESSAGE));
    Ok(())
}

#[tokio::test]
async fn bearer_and_json_headers_are_sent() -> Result<()> {
    let backend = common::MockBackend::spawn().await?;
    let h = common::harness(&backend.base_url, Some("abc123"))?;

    let env = h.client.get("whoami").await;
    let data = env.data.expect("echoed headers");

    assert_eq!(data["authorization"], "Bearer abc123");
    assert_eq!(data["content_type"], "application/json");
    assert!(data["request_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn preformatted_token_is_not_prefixed_twice() -> Result<()> {
    let backend = common::MockBackend::spawn().await?;
    let h = common::harness(&backend.base_url, Some("Bearer abc123"))?;

    let env = h.client.get("whoami").await;

    assert_eq!(env.data.expect("echoed headers")["authorization"], "Bearer abc123");
    Ok(())
}

#[tokio::test]
async fn absolute_urls_bypass_the_base() -> Result<()> {
    let backend = common::MockBackend::spawn().await?;
    let h = common::harness("http://127.0.0.1:1/unused/", None)?;

    let env = h
        .client
        .get(&format!("http://127.0.0.1:{}/api/ok", backend.port))
        .await;

    assert!(env.success);
    Ok(())
}
