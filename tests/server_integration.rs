#![cfg(feature = "server")]

//! Live HTTP checks against a server bound to an ephemeral port

use curiosity::server::{DashboardServer, ServerHandle};
use curiosity::DashboardConfig;
use reqwest::blocking::Client;
use reqwest::StatusCode;

fn start() -> ServerHandle {
    let config = DashboardConfig {
        addr: "127.0.0.1:0".to_string(),
        workers: 2,
        ..Default::default()
    };
    DashboardServer::bind(config).expect("bind").spawn()
}

#[test]
fn serves_dashboard_and_assets() {
    let handle = start();
    let base = handle.url();
    let client = Client::new();

    let res = client.get(format!("{}/?theme=Dark&ranges=on", base)).send().expect("GET /");
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    let body = res.text().unwrap();
    assert!(body.contains("background-color: #111; color: white;"));
    assert!(body.contains("id=\"reference-ranges\""));

    let dot = client.get(format!("{}/pedigree.dot", base)).send().unwrap().text().unwrap();
    assert_eq!(dot.matches("->").count(), 6);

    let svg = client.get(format!("{}/pedigree.svg", base)).send().unwrap();
    assert_eq!(svg.headers()["content-type"], "image/svg+xml");

    let missing = client.get(format!("{}/nope", base)).send().unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    handle.shutdown();
}

#[test]
fn record_json_and_etag() {
    let handle = start();
    let base = handle.url();
    let client = Client::new();

    let res = client.get(format!("{}/api/record", base)).send().unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let etag = res.headers()["etag"].to_str().unwrap().to_string();
    let json: serde_json::Value = serde_json::from_str(&res.text().unwrap()).unwrap();
    assert_eq!(json["patient"]["name"], "John Doe");
    assert_eq!(json["biochemical"].as_array().unwrap().len(), 6);

    let cached = client
        .get(format!("{}/api/record", base))
        .header("If-None-Match", etag)
        .send()
        .unwrap();
    assert_eq!(cached.status(), StatusCode::NOT_MODIFIED);

    handle.shutdown();
}

#[test]
fn non_get_is_rejected() {
    let handle = start();
    let res = Client::new().post(handle.url()).send().unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    handle.shutdown();
}
