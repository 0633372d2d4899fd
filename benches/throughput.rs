use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use futures::executor::block_on;
use http::Method;
use lambda_api::typed::{Body, Json, Params};
use lambda_api::{App, AwsAdapter, ParsedRequest, RouteConfig, Routes};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, JsonSchema)]
struct Lookup {
    id: u64,
    verbose: Option<bool>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct Animal {
    id: u64,
    name: String,
    tags: Vec<String>,
}

async fn get_animal(Params(q): Params<Lookup>) -> anyhow::Result<Json<Animal>> {
    Ok(Json(Animal {
        id: q.id,
        name: "zebra".into(),
        tags: vec!["striped".into()],
    }))
}

async fn create_animal(Body(animal): Body<Animal>) -> anyhow::Result<Json<Animal>> {
    Ok(Json(animal))
}

async fn health() -> anyhow::Result<String> {
    Ok("ok".into())
}

fn zoo_app() -> App {
    let mut app = App::builder().prefix("/zoo").tags(["zoo"]).build();
    app.get("/animals", RouteConfig::new(), get_animal)
        .unwrap_or_else(|e| panic!("register get_animal: {e}"));
    app.post("/animals", RouteConfig::new().status(201), create_animal)
        .unwrap_or_else(|e| panic!("register create_animal: {e}"));
    app.get("/health", RouteConfig::new(), health)
        .unwrap_or_else(|e| panic!("register health: {e}"));
    app
}

fn bench_dispatch_throughput(c: &mut Criterion) {
    let app = zoo_app();
    let requests = [
        ParsedRequest::new(Method::GET, "/health"),
        ParsedRequest::new(Method::GET, "/animals")
            .with_param("id", "123")
            .with_param("verbose", "true"),
        ParsedRequest::new(Method::POST, "/animals")
            .with_body(json!({"id": 7, "name": "okapi", "tags": ["shy"]})),
        ParsedRequest::new(Method::GET, "/missing"),
        ParsedRequest::new(Method::GET, "/animals"),
    ];

    c.bench_function("app_run", |b| {
        b.iter(|| {
            for request in requests.iter() {
                let res = block_on(app.run(request));
                black_box(&res);
            }
        })
    });
}

fn bench_adapter_round_trip(c: &mut Criterion) {
    let adapter = AwsAdapter::new(zoo_app());
    let event = json!({
        "httpMethod": "POST",
        "pathParameters": {"proxy": "/animals"},
        "headers": {"Content-Type": "application/json"},
        "body": "{\"id\": 7, \"name\": \"okapi\", \"tags\": [\"shy\"]}",
    });

    c.bench_function("aws_adapter_run", |b| {
        b.iter(|| black_box(block_on(adapter.run(event.clone()))))
    });
}

fn bench_schema_generation(c: &mut Criterion) {
    let app = zoo_app();
    c.bench_function("get_schema", |b| b.iter(|| black_box(app.get_schema())));
}

criterion_group!(
    benches,
    bench_dispatch_throughput,
    bench_adapter_round_trip,
    bench_schema_generation
);
criterion_main!(benches);
