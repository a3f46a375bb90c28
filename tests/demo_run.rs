//! Runs the demo sequence against a local users/posts stand-in

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use api_probe::{ApiClient, Console, Marker, Recorder, demo};

fn users_posts_server() -> MockServer {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/users/1");
        then.status(200).json_body(json!({
            "id": 1,
            "name": "Leanne Graham",
            "address": {"city": "Gwenborough", "geo": {"lat": "-37.3159", "lng": "81.1496"}}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/users/1/posts");
        then.status(200)
            .json_body(json!([{"id": 1, "userId": 1, "title": "first", "body": "hello"}]));
    });
    server.mock(|when, then| {
        when.method(POST).path("/posts");
        then.status(201).json_body(json!({"id": 101}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/posts/1");
        then.status(200).json_body(json!({"id": 101}));
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/posts/1");
        then.status(200).json_body(json!({"id": 1}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/posts/1")
            .header("x-source", "api-probe-demo");
        then.status(200).json_body(json!({"id": 1}));
    });
    server.mock(|when, then| {
        when.method(OPTIONS).path("/posts/1");
        then.status(204).header("Allow", "GET,HEAD,PUT,PATCH,DELETE");
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/posts/101");
        then.status(200).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/posts/101");
        then.status(404).json_body(json!({}));
    });

    server
}

#[test]
fn test_demo_passes_against_stand_in() {
    let server = users_posts_server();
    let api = ApiClient::new()
        .expect("Failed to build HTTP client")
        .timeout(Duration::from_secs(5));
    let mut recorder = Recorder::new(Console::new(Vec::new(), false));

    let summary = demo::run(&api, &mut recorder, &server.base_url(), None).expect("summary");

    let failed: Vec<_> = summary
        .entries
        .iter()
        .filter(|e| e.marker == Marker::Failure)
        .map(|e| e.description.clone())
        .collect();
    assert!(failed.is_empty(), "failed steps: {:?}", failed);
    assert_eq!(summary.total, 11);
    assert!(recorder.is_empty());

    let printed = String::from_utf8(recorder.into_console().into_inner()).unwrap();
    assert!(printed.contains("Gwenborough"));
    assert!(printed.contains("-37.3159"));
    assert!(!printed.contains("Warning:"));
}

#[test]
fn test_demo_against_unreachable_service() {
    let api = ApiClient::new()
        .expect("Failed to build HTTP client")
        .timeout(Duration::from_secs(2));
    let mut recorder = Recorder::new(Console::new(Vec::new(), false));

    let summary = demo::run(&api, &mut recorder, "http://127.0.0.1:1", None).expect("summary");

    // Only the expected-404 step passes: a transport error is also "not found"
    assert_eq!(summary.total, 11);
    assert_eq!(summary.passed, 1);
    assert!(
        summary
            .entries
            .iter()
            .any(|e| e.description.starts_with("10.") && e.marker == Marker::Success)
    );

    let printed = String::from_utf8(recorder.into_console().into_inner()).unwrap();
    assert!(printed.contains("HTTP 999"));
    assert!(printed.contains("Could not extract 'id' from response."));
}
