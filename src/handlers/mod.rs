use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::AppState;

pub mod auth;
pub mod tasks;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "todo-api",
        "version": version,
        "description": "Multi-user to-do list REST API",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "docs": "/api-docs (public)",
            "register": "POST /api/auth/register (public)",
            "login": "POST /api/auth/login (basic auth)",
            "check": "GET /api/auth/check (basic auth)",
            "tasks": "/api/tasks[/:id] (basic auth)",
        }
    }))
}

/// GET /api-docs - OpenAPI description of the HTTP surface. Public, like
/// registration, so clients can discover the API before authenticating.
pub async fn api_docs() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "openapi": "3.0.3",
        "info": { "title": "Todo API", "version": version },
        "components": {
            "securitySchemes": {
                "basicAuth": { "type": "http", "scheme": "basic" }
            },
            "schemas": {
                "Credentials": {
                    "type": "object",
                    "required": ["username", "password"],
                    "properties": {
                        "username": { "type": "string" },
                        "password": { "type": "string" }
                    }
                },
                "TaskInput": {
                    "type": "object",
                    "required": ["title"],
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string", "nullable": true },
                        "completed": { "type": "boolean", "default": false },
                        "dueDate": { "type": "string", "format": "date", "nullable": true }
                    }
                },
                "Task": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "description": { "type": "string", "nullable": true },
                        "completed": { "type": "boolean" },
                        "dueDate": { "type": "string", "format": "date", "nullable": true }
                    }
                }
            }
        },
        "security": [ { "basicAuth": [] } ],
        "paths": {
            "/api/auth/register": {
                "post": {
                    "summary": "Register a new user",
                    "security": [],
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/Credentials" }
                    } } },
                    "responses": {
                        "200": { "description": "Created user (id and username only)" },
                        "400": { "description": "Missing fields or username already taken" }
                    }
                }
            },
            "/api/auth/login": {
                "post": {
                    "summary": "Exchange credentials for a JWT",
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/Credentials" }
                    } } },
                    "responses": {
                        "200": { "description": "Token and expiry" },
                        "401": { "description": "Invalid username or password" }
                    }
                }
            },
            "/api/auth/check": {
                "get": {
                    "summary": "Echo the authenticated principal",
                    "responses": {
                        "200": { "description": "Authenticated username" },
                        "401": { "description": "Missing or invalid credentials" }
                    }
                }
            },
            "/api/tasks": {
                "get": {
                    "summary": "List the caller's tasks",
                    "parameters": [
                        { "name": "page", "in": "query", "schema": { "type": "integer" } },
                        { "name": "size", "in": "query", "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "200": { "description": "Task array, or a page envelope when page/size are present" }
                    }
                },
                "post": {
                    "summary": "Create a task owned by the caller",
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/TaskInput" }
                    } } },
                    "responses": {
                        "201": { "description": "Created task, Location header set" },
                        "400": { "description": "Missing title" }
                    }
                }
            },
            "/api/tasks/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "required": true,
                      "schema": { "type": "integer", "format": "int64" } }
                ],
                "get": {
                    "summary": "Fetch one of the caller's tasks",
                    "responses": {
                        "200": { "description": "Task" },
                        "404": { "description": "No such task for this user" }
                    }
                },
                "put": {
                    "summary": "Overwrite a task's mutable fields",
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/TaskInput" }
                    } } },
                    "responses": {
                        "200": { "description": "Updated task" },
                        "400": { "description": "Missing title" },
                        "404": { "description": "No such task for this user" }
                    }
                },
                "delete": {
                    "summary": "Delete one of the caller's tasks",
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": { "description": "No such task for this user" }
                    }
                }
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
