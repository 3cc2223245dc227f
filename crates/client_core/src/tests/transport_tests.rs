use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{collections::HashMap, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn handle_store(
    State(seen): State<Seen>,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let accepted = query.get("value").map(String::as_str) != Some("reject");
    seen.lock().await.push((resource, query));
    Json(json!(accepted))
}

async fn spawn_store_server() -> anyhow::Result<(String, Seen)> {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/store/*resource", get(handle_store))
        .route("/empty", get(|| async { "" }))
        .route("/garbage", get(|| async { "<html>" }))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/selector/*path", get(|| async { "<ul></ul>" }))
        .with_state(Arc::clone(&seen));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), seen))
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn store_write_sends_key_value_as_query() {
    let (server_url, seen) = spawn_store_server().await.expect("server");
    let transport = HttpTransport::new(&server_url).expect("transport");

    let response = transport
        .fetch_json(
            "/store/asset/chars/bob",
            &params(&[("key", "owner"), ("value", "alice")]),
        )
        .await
        .expect("request");
    assert_eq!(response, Some(json!(true)));

    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "asset/chars/bob");
    assert_eq!(seen[0].1.get("key").map(String::as_str), Some("owner"));
    assert_eq!(seen[0].1.get("value").map(String::as_str), Some("alice"));
}

#[tokio::test]
async fn falsy_json_is_returned_not_raised() {
    let (server_url, _seen) = spawn_store_server().await.expect("server");
    let transport = HttpTransport::new(&server_url).expect("transport");
    let response = transport
        .fetch_json("/store/project", &params(&[("key", "fps"), ("value", "reject")]))
        .await
        .expect("request");
    assert_eq!(response, Some(json!(false)));
}

#[tokio::test]
async fn empty_body_maps_to_none() {
    let (server_url, _seen) = spawn_store_server().await.expect("server");
    let transport = HttpTransport::new(&server_url).expect("transport");
    assert_eq!(transport.fetch_json("/empty", &[]).await.expect("request"), None);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (server_url, _seen) = spawn_store_server().await.expect("server");
    let transport = HttpTransport::new(&server_url).expect("transport");
    let err = transport
        .fetch_json("/garbage", &[])
        .await
        .expect_err("not json");
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn server_errors_are_transport_errors() {
    let (server_url, _seen) = spawn_store_server().await.expect("server");
    let transport = HttpTransport::new(&format!("{server_url}/")).expect("transport");
    let err = transport
        .fetch_json("/broken", &[])
        .await
        .expect_err("status 500");
    assert!(matches!(err, ClientError::Transport { ref path, .. } if path == "/broken"));
}

#[tokio::test]
async fn raw_fetch_returns_body_text() {
    let (server_url, _seen) = spawn_store_server().await.expect("server");
    let transport = HttpTransport::new(&server_url).expect("transport");
    let body = transport
        .fetch_raw("/selector/shots", &params(&[("show_all", "false")]))
        .await
        .expect("request");
    assert_eq!(body, "<ul></ul>");
}

#[test]
fn rejects_unparseable_server_urls() {
    assert!(matches!(
        HttpTransport::new("not a url"),
        Err(ClientError::InvalidUrl { .. })
    ));
    let transport = HttpTransport::new("http://farm.local:8080").expect("transport");
    assert_eq!(transport.base_url().as_str(), "http://farm.local:8080/");
}
