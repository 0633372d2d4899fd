use serde_json::{json, Map, Value};

use crate::dispatcher::{App, Route};
use crate::error::Error;
use crate::validator::ModelSchema;

const DEFINITIONS_REF: &str = "#/definitions/";
const COMPONENTS_REF: &str = "#/components/schemas/";

/// Builds an OpenAPI document from an application's route table.
///
/// The document has the shape
/// `{id?, paths: {path: {method: operation}}, components: {schemas: {..}}}`.
/// Routes are visited in registration order and models are registered as
/// components under their schema names, so when two different models share
/// a name the one from the latest registration wins.
pub struct OpenApiGenerator<'a> {
    app: &'a App,
}

impl<'a> OpenApiGenerator<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    pub fn get_schema(&self) -> Result<Value, Error> {
        let mut paths = Map::new();
        let mut components = Map::new();

        for (path, method, route) in self.app.routes() {
            let full_path = format!("{}{}", self.app.prefix(), path);
            let operation = operation(route, &mut components);
            let entry = paths
                .entry(full_path)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(methods) = entry {
                methods.insert(method.as_str().to_lowercase(), Value::Object(operation));
            }
        }

        let mut document = Map::new();
        if let Some(id) = self.app.schema_id() {
            document.insert("id".into(), json!(id));
        }
        document.insert("paths".into(), Value::Object(paths));
        document.insert("components".into(), json!({ "schemas": components }));

        let text = serde_json::to_string(&Value::Object(document))?;
        Ok(serde_json::from_str(&text.replace(DEFINITIONS_REF, COMPONENTS_REF))?)
    }
}

fn operation(route: &Route, components: &mut Map<String, Value>) -> Map<String, Value> {
    let template = &route.template;
    let mut op = Map::new();
    let mut parameters = Vec::new();

    if let Some(description) = &template.description {
        op.insert("description".into(), json!(description));
    }

    if let Some(request) = &template.request {
        let headers = &request.headers;
        merge_definitions(headers.document(), components);
        for (name, schema) in properties(headers) {
            parameters.push(parameter("header", &header_name(name), schema, headers.is_required(name)));
        }
        if let Some(auth) = request.auth {
            op.insert("security".into(), json!([{ auth: [] }]));
        }
    }

    if let Some(params) = &template.params {
        merge_definitions(params.document(), components);
        for (name, schema) in properties(params) {
            parameters.push(parameter("query", name, schema, params.is_required(name)));
        }
    }

    if !parameters.is_empty() {
        op.insert("parameters".into(), Value::Array(parameters));
    }

    if let Some(body) = &template.body {
        let name = register_component(body, components);
        op.insert(
            "requestBody".into(),
            json!({
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("{COMPONENTS_REF}{name}") }
                    }
                }
            }),
        );
    }

    if let Some(response) = &template.response {
        let name = register_component(response, components);
        op.insert(
            "responses".into(),
            json!({
                template.status.to_string(): {
                    "content": {
                        "application/json": {
                            "schema": { "$ref": format!("{COMPONENTS_REF}{name}") }
                        }
                    }
                }
            }),
        );
    }

    if !template.tags.is_empty() {
        op.insert("tags".into(), json!(template.tags));
    }

    op
}

fn properties(schema: &ModelSchema) -> impl Iterator<Item = (&String, &Value)> {
    schema
        .document()
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

fn parameter(location: &str, name: &str, schema: &Value, required: bool) -> Value {
    let mut param = json!({ "in": location, "name": name, "schema": schema });
    if required {
        param["required"] = Value::Bool(true);
    }
    param
}

/// Register a model and its definitions; returns the component name.
fn register_component(schema: &ModelSchema, components: &mut Map<String, Value>) -> String {
    let mut document = schema.document().clone();
    if let Value::Object(doc) = &mut document {
        doc.remove("$schema");
        if let Some(Value::Object(definitions)) = doc.remove("definitions") {
            components.extend(definitions);
        }
    }
    let name = schema.name().to_string();
    components.insert(name.clone(), document);
    name
}

fn merge_definitions(document: &Value, components: &mut Map<String, Value>) {
    if let Some(definitions) = document.get("definitions").and_then(Value::as_object) {
        components.extend(definitions.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// `x_custom_header` -> `X-Custom-Header`
fn header_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut word_start = true;
    for c in field.chars() {
        let c = if c == '_' { '-' } else { c };
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}
