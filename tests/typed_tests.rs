//! Handler signatures: what they declare and how their outputs are shaped.

mod common;

use common::*;
use http::Method;
use lambda_api::typed::{Argument, ArgKind, Handler, HandlerRef, Json, Params, Plain, Reply};
use lambda_api::{App, RouteConfig, Routes};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct Flags {
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    ids: Vec<i64>,
    ratio: Option<f64>,
}

async fn echo_flags(Params(flags): Params<Flags>) -> anyhow::Result<Json<Flags>> {
    Ok(Json(flags))
}

async fn maybe(Params(flags): Params<Flags>) -> anyhow::Result<Option<Customer>> {
    Ok(flags.verbose.then(|| Customer {
        name: "v".into(),
        address: Address { city: "Oslo".into() },
    }))
}

async fn count() -> anyhow::Result<Plain<u64>> {
    Ok(Plain(3))
}

fn declare<H: Handler<Args>, Args>(_handler: H) -> lambda_api::typed::Declaration {
    H::declare().unwrap()
}

#[test]
fn test_declarations_follow_signatures() {
    let decl = declare(get_example2);
    assert_eq!(decl.params.as_ref().unwrap().name(), "ExampleSchema");
    let request = decl.request.as_ref().unwrap();
    assert_eq!(request.auth, Some("bearerAuth"));
    assert_eq!(request.headers.name(), "BearerAuthHeaders");
    assert!(decl.body.is_none());
    assert_eq!(decl.response.as_ref().unwrap().name(), "ExampleResponse");

    let decl = declare(delete_customer);
    assert!(decl.params.is_none() && decl.body.is_none() && decl.request.is_none());
    assert!(decl.response.is_none());

    assert_eq!(declare(count).response.unwrap().name(), "Root_uint64");
    assert_eq!(declare(list_customers).response.unwrap().name(), "Root_Array_of_Customer");
}

#[test]
fn test_handler_identity_is_per_function() {
    assert_eq!(HandlerRef::new(get_example), HandlerRef::new(get_example));
    assert_ne!(HandlerRef::new(get_example), HandlerRef::new(get_example3));
    assert!(HandlerRef::new(get_example).name().ends_with("get_example"));
}

#[test]
fn test_argument_kinds() {
    assert_eq!(<Params<ExampleSchema> as Argument>::KIND, ArgKind::Params);
    assert_eq!(ArgKind::Body.as_str(), "body");
    assert_eq!(ArgKind::Request.to_string(), "request");
}

#[test]
fn test_string_reply_declares_root_model() {
    let schema = <String as Reply>::declare().unwrap().unwrap();
    assert_eq!(schema.name(), "Root_String");
    assert!(schema.validate("response", &json!("x")).is_ok());
    assert!(schema.validate("response", &json!(1)).is_err());
}

#[tokio::test]
async fn test_query_values_are_typed_before_binding() {
    let mut app = App::new();
    app.get("/flags", RouteConfig::new(), echo_flags).unwrap();

    let res = app
        .run(
            &request(Method::GET, "/flags")
                .with_param("verbose", "true")
                .with_param("ids", "1,2,3")
                .with_param("ratio", "0.5"),
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"verbose": true, "ids": [1, 2, 3], "ratio": 0.5}));

    let res = app
        .run(&request(Method::GET, "/flags").with_param("verbose", "maybe"))
        .await;
    assert_eq!(res.status, 400);
    let body = body_json(&res.body);
    assert_eq!(body["error"][0]["loc"], json!(["params", "verbose"]));
    assert_eq!(body["error"][0]["type"], "type_error");
}

#[tokio::test]
async fn test_optional_and_plain_replies() {
    let mut app = App::new();
    app.get("/maybe", RouteConfig::new(), maybe).unwrap();
    app.get("/count", RouteConfig::new(), count).unwrap();

    let none = app.run(&request(Method::GET, "/maybe")).await;
    assert_eq!(none.status, 200);
    assert_eq!(none.body, Value::Null);

    let some = app
        .run(&request(Method::GET, "/maybe").with_param("verbose", "true"))
        .await;
    assert_eq!(some.body["address"]["city"], "Oslo");

    let count = app.run(&request(Method::GET, "/count")).await;
    assert_eq!(count.body, json!(3));
}
