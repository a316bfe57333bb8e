use axum::{routing::post, Json, Router};
use log::error;
use serde_json::{json, Value};

use crate::data::{ConflictCheckRequest, ConstraintRequest, GenerateRequest, GenerateResponse};
use crate::{conflicts, engine};

async fn generate_handler(
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (axum::http::StatusCode, String)> {
    // the engine is synchronous; hand it off so a long run cannot
    // stall the runtime worker
    let result = tokio::task::spawn_blocking(move || engine::generate(&request)).await;
    match result {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(e)) => Err((e.status(), e.to_string())),
        Err(e) => {
            error!("generation task failed: {e}");
            Err((
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "timetable generation failed".to_string(),
            ))
        }
    }
}

async fn conflicts_handler(Json(request): Json<ConflictCheckRequest>) -> Json<Value> {
    let report = conflicts::detect(&request.assignments);
    Json(json!({ "ok": true, "conflictReport": report }))
}

async fn constraints_handler(
    Json(request): Json<ConstraintRequest>,
) -> Result<Json<Value>, (axum::http::StatusCode, String)> {
    match engine::check_constraints(&request) {
        Ok((validation, violations)) => Ok(Json(json!({
            "ok": true,
            "validation": validation,
            "violations": violations,
        }))),
        Err(e) => Err((e.status(), e.to_string())),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/conflicts", post(conflicts_handler))
        .route("/v1/constraints/validate", post(constraints_handler))
}

pub async fn run_server() {
    let app = router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .expect("failed to bind 127.0.0.1:8080");

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.expect("server error");
}
