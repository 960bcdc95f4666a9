/*
 * Responsibility
 * - GET /health (疎通用, 認証なし)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::context::Context;
use crate::router::{HandlerResult, Request};

pub async fn health(_ctx: Context, _req: Request) -> HandlerResult {
    Ok((StatusCode::OK, Json(json!({"status": "ok"}))).into_response())
}
