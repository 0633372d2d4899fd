#![allow(dead_code)]

//! Shared models, handlers and application fixtures for integration tests.

use std::collections::HashMap;

use http::Method;
use lambda_api::typed::{BearerAuthRequest, Body, Coerce, Json, Params, Req, Request};
use lambda_api::{ApiError, App, ParsedRequest, RouteConfig, Routes};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExampleSchema {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExampleResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MyHeaders {
    pub x_custom_header: String,
}

pub type MyRequest = Request<MyHeaders>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Address {
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Customer {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Paging {
    pub page: u32,
    pub size: Option<u32>,
}

pub async fn get_example(Params(params): Params<ExampleSchema>) -> anyhow::Result<String> {
    Ok(params.name)
}

pub async fn get_example2(
    Params(params): Params<ExampleSchema>,
    Req(_request): Req<BearerAuthRequest>,
) -> anyhow::Result<Json<ExampleResponse>> {
    Ok(Json(ExampleResponse {
        message: params.name,
    }))
}

pub async fn get_example3(Req(request): Req<MyRequest>) -> anyhow::Result<String> {
    Ok(request.headers.x_custom_header)
}

pub async fn post_example3(Req(request): Req<MyRequest>) -> anyhow::Result<String> {
    Ok(request.headers.x_custom_header)
}

pub async fn create_customer(Body(customer): Body<Customer>) -> anyhow::Result<Json<Customer>> {
    Ok(Json(customer))
}

pub async fn list_customers(Params(paging): Params<Paging>) -> anyhow::Result<Vec<Customer>> {
    Ok((0..paging.size.unwrap_or(1))
        .map(|i| Customer {
            name: format!("customer-{}-{i}", paging.page),
            address: Address {
                city: "Lisbon".into(),
            },
        })
        .collect())
}

pub async fn delete_customer() -> anyhow::Result<()> {
    Ok(())
}

pub async fn teapot() -> anyhow::Result<String> {
    Err(ApiError::new(418, "I'm a teapot").into())
}

/// Declares `params: {name}` and then fails with a lookup error.
pub async fn explode(Params(params): Params<ExampleSchema>) -> anyhow::Result<String> {
    let map: HashMap<String, String> = HashMap::new();
    let value = map
        .get("missing")
        .ok_or_else(|| anyhow::anyhow!("key 'missing' not found for {}", params.name))?;
    Ok(value.clone())
}

pub async fn panics() -> anyhow::Result<String> {
    panic!("handler bug");
}

pub async fn broken_contract() -> anyhow::Result<Coerce<ExampleResponse>> {
    Ok(Coerce::new(json!({"msg": "wrong field"})))
}

pub async fn coerced() -> anyhow::Result<Coerce<ExampleResponse>> {
    Ok(Coerce::new(json!({"message": "fine"})))
}

/// The application used across dispatcher and document tests.
pub fn example_app() -> App {
    let mut app = App::builder()
        .prefix("/api")
        .schema_id("example")
        .tags(["example", "test"])
        .build();

    app.get(
        "/example",
        RouteConfig::new().status(200).description("@example"),
        get_example,
    )
    .unwrap();
    app.patch(
        "/example2",
        RouteConfig::new()
            .status(200)
            .no_tags()
            .description("Some test description. @example2"),
        get_example2,
    )
    .unwrap();
    app.get(
        "/example3",
        RouteConfig::new().status(200).description("@example3-get"),
        get_example3,
    )
    .unwrap();
    app.post(
        "/example3",
        RouteConfig::new().status(200).description("@example3-post"),
        post_example3,
    )
    .unwrap();
    app
}

pub fn request(method: Method, path: &str) -> ParsedRequest {
    ParsedRequest::new(method, path).with_provider_data(json!({}))
}

pub fn body_json(value: &Value) -> Value {
    match value {
        Value::String(encoded) => serde_json::from_str(encoded).unwrap(),
        other => other.clone(),
    }
}
