//! API Gateway event translation.

mod common;

use std::sync::{Arc, Mutex};

use common::*;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::Method;
use lambda_api::{AwsAdapter, Dispatch, ParsedRequest, Response};
use serde_json::{json, Value};

/// Records every dispatched request and answers with a fixed response.
#[derive(Default)]
struct RecordingApp {
    seen: Mutex<Vec<ParsedRequest>>,
    reply: Option<Response>,
}

impl RecordingApp {
    fn replying(reply: Response) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            reply: Some(reply),
        }
    }

    fn seen(&self) -> Vec<ParsedRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Dispatch for RecordingApp {
    fn dispatch<'a>(&'a self, request: &'a ParsedRequest) -> BoxFuture<'a, Response> {
        self.seen.lock().unwrap().push(request.clone());
        let reply = self
            .reply
            .clone()
            .unwrap_or_else(|| Response::new(200, json!({"ok": true})));
        async move { reply }.boxed()
    }
}

fn event(method: &str, proxy: &str) -> Value {
    json!({
        "httpMethod": method,
        "pathParameters": {"proxy": proxy},
        "queryStringParameters": {"name": "test name"},
        "headers": {"X-Custom-Header": "test header", "Content-Type": "application/json"},
        "body": "{\"hello\": \"world\"}",
        "isBase64Encoded": false,
    })
}

#[tokio::test]
async fn test_run_dispatches_the_parsed_request() {
    let app = Arc::new(RecordingApp::default());
    let adapter = AwsAdapter::new(Arc::clone(&app));
    let input = event("POST", "/example3");

    let expected = adapter.parse_request(&input).unwrap();
    let output = adapter.run(input.clone()).await;

    let seen = app.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], expected);
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/example3");
    assert_eq!(seen[0].header("x_custom_header"), Some("test header"));
    assert_eq!(seen[0].header("content_type"), Some("application/json"));
    assert_eq!(seen[0].params["name"], "test name");
    assert_eq!(seen[0].body.as_ref().unwrap()["hello"], "world");
    assert_eq!(seen[0].provider_data, input);

    assert_eq!(output["statusCode"], 200);
    assert_eq!(output["body"], "{\"ok\":true}");
    assert_eq!(output["headers"]["Content-Type"], "application/json");
}

#[test]
fn test_root_and_empty_paths_stay_distinct() {
    let adapter = AwsAdapter::new(RecordingApp::default());
    let root = adapter.parse_request(&event("GET", "/")).unwrap();
    let empty = adapter.parse_request(&event("GET", "")).unwrap();
    assert_eq!(root.path, "/");
    assert_eq!(empty.path, "");

    let missing = adapter
        .parse_request(&json!({"httpMethod": "GET"}))
        .unwrap();
    assert_eq!(missing.path, "");
    assert!(missing.params.is_empty());
    assert!(missing.headers.is_empty());
    assert!(missing.body.is_none());
}

#[test]
fn test_base64_body() {
    use base64::Engine;

    let adapter = AwsAdapter::new(RecordingApp::default());
    let mut input = event("POST", "/x");
    input["body"] = json!(base64::engine::general_purpose::STANDARD.encode("{\"n\": 2}"));
    input["isBase64Encoded"] = json!(true);
    let request = adapter.parse_request(&input).unwrap();
    assert_eq!(request.body.unwrap()["n"], 2);
}

#[tokio::test]
async fn test_invalid_json_body_is_400_without_dispatch() {
    let app = Arc::new(RecordingApp::default());
    let adapter = AwsAdapter::new(Arc::clone(&app));
    let mut input = event("POST", "/x");
    input["body"] = json!("{\"hello\": }");

    let output = adapter.run(input).await;
    assert_eq!(output["statusCode"], 400);
    let body: Value = serde_json::from_str(output["body"].as_str().unwrap()).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    assert!(app.seen().is_empty());
}

#[tokio::test]
async fn test_non_object_body_is_400() {
    let adapter = AwsAdapter::new(RecordingApp::default());
    let mut input = event("POST", "/x");
    input["body"] = json!("[1, 2]");
    let output = adapter.run(input).await;
    assert_eq!(output["statusCode"], 400);
}

#[tokio::test]
async fn test_raw_bodies_and_headers_are_passed_through() {
    let mut headers = std::collections::HashMap::new();
    headers.insert("Access-Control-Max-Age".to_string(), "3000".to_string());
    let reply = Response::raw(400, "{\"error\": []}".to_string()).with_headers(headers);
    let adapter = AwsAdapter::new(RecordingApp::replying(reply));

    let output = adapter.run(event("GET", "/x")).await;
    assert_eq!(output["statusCode"], 400);
    assert_eq!(output["body"], "{\"error\": []}");
    assert_eq!(output["headers"]["Access-Control-Max-Age"], "3000");
    assert_eq!(output["headers"]["Content-Type"], "application/json");
}

#[tokio::test]
async fn test_lambda_handler_end_to_end() {
    let adapter = AwsAdapter::new(example_app());

    let output = adapter
        .lambda_handler(event("GET", "/example3"), json!({}))
        .await;
    assert_eq!(output["statusCode"], 200);
    assert_eq!(output["body"], "\"test header\"");

    let output = adapter
        .lambda_handler(event("PATCH", "/example2"), json!({}))
        .await;
    assert_eq!(output["statusCode"], 200);
    let body: Value = serde_json::from_str(output["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, json!({"message": "test name"}));

    let mut input = event("GET", "/example");
    input["queryStringParameters"] = json!({});
    let output = adapter.lambda_handler(input, json!({})).await;
    assert_eq!(output["statusCode"], 400);
    let body: Value = serde_json::from_str(output["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["error"][0]["loc"], json!(["params", "name"]));
}
