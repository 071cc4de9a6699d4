//! OpenAPI document describing the HTTP surface.

use crate::state::AppState;
use crate::{SERVICE_DESCRIPTION, SERVICE_VERSION};
use axum::Json;
use axum::extract::State;
use jobapply_common::config::Config;
use serde_json::{Value, json};

pub async fn openapi_json(State(state): State<AppState>) -> Json<Value> {
    Json(document(&state.config))
}

fn json_response(description: &str, schema: &str) -> Value {
    json!({
        "200": {
            "description": description,
            "content": {
                "application/json": {
                    "schema": { "$ref": format!("#/components/schemas/{}", schema) }
                }
            }
        }
    })
}

fn string_property() -> Value {
    json!({ "type": "string" })
}

/// Build the OpenAPI 3.1 document for this configuration
pub fn document(config: &Config) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": config.project_name,
            "description": SERVICE_DESCRIPTION,
            "version": SERVICE_VERSION,
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Landing page",
                    "operationId": "landing_page",
                    "responses": {
                        "200": {
                            "description": "Rendered landing page",
                            "content": { "text/html": { "schema": { "type": "string" } } }
                        }
                    }
                }
            },
            "/api": {
                "get": {
                    "summary": "API root information",
                    "operationId": "api_root",
                    "responses": json_response("Service information", "ApiInfo"),
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness probe",
                    "description": "Reports that the process is serving requests. Dependencies such as the database are not checked.",
                    "operationId": "health_check",
                    "responses": json_response("The process is alive", "Health"),
                }
            },
            config.openapi_url(): {
                "get": {
                    "summary": "OpenAPI document",
                    "operationId": "openapi",
                    "responses": {
                        "200": {
                            "description": "This document",
                            "content": { "application/json": { "schema": { "type": "object" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "ApiInfo": {
                    "type": "object",
                    "required": ["message", "version", "status", "docs", "openapi"],
                    "properties": {
                        "message": string_property(),
                        "version": string_property(),
                        "status": string_property(),
                        "docs": string_property(),
                        "openapi": string_property(),
                    }
                },
                "Health": {
                    "type": "object",
                    "required": ["status", "service", "version"],
                    "properties": {
                        "status": string_property(),
                        "service": string_property(),
                        "version": string_property(),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobapply_common::testenv::EnvSnapshot;

    #[test]
    fn documents_the_configured_prefix() {
        let config =
            Config::from_provider(EnvSnapshot::from_vars([("API_V1_STR", "/api/v2")])).unwrap();

        let doc = document(&config);

        assert_eq!(doc["info"]["version"], SERVICE_VERSION);
        assert!(doc["paths"]["/api/v2/openapi.json"].is_object());
        assert!(doc["paths"]["/health"]["get"].is_object());
    }
}
