//! Small builders for the OpenAPI fragments the modules contribute.

use serde_json::{json, Value};

pub fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

pub fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

pub fn error_response(description: &str) -> Value {
    json_response(description, schema_ref("ErrorResponse"))
}

pub fn empty_response(description: &str) -> Value {
    json!({ "description": description })
}

pub fn query_param(name: &str, kind: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "schema": { "type": kind },
        "description": description
    })
}

pub fn id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

pub fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema_ref(schema) } }
    })
}

/// Page envelope around `item` schemas.
pub fn page_schema(item: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "count": { "type": "integer" },
            "next": { "type": "string", "nullable": true },
            "previous": { "type": "string", "nullable": true },
            "results": { "type": "array", "items": schema_ref(item) }
        },
        "required": ["count", "next", "previous", "results"]
    })
}

/// Security requirement for token-protected operations.
pub fn token_security() -> Value {
    json!([{ "token": [] }])
}

/// Standard write-operation error responses.
pub fn write_errors() -> Value {
    json!({
        "401": error_response("Invalid credentials"),
        "403": error_response("Authentication required"),
        "422": error_response("Validation error")
    })
}
