//! HTTP surface: the localized exercise list of a course and the supported languages.

use crate::error::RenderError;
use crate::i18n::{Language, LanguageRegistry};
use crate::renderer::ExerciseRenderer;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
struct AppState {
    renderer: Arc<ExerciseRenderer>,
}

#[derive(Debug, Deserialize)]
struct ExercisesQuery {
    lang: Option<String>,
}

/// Build the application router.
pub fn router(renderer: Arc<ExerciseRenderer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/courses/:course_id/exercises", get(course_exercises))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { renderer })
}

async fn health() -> &'static str {
    "ok"
}

async fn languages() -> Json<Value> {
    Json(json!({ "languages": LanguageRegistry::get().list_all() }))
}

async fn course_exercises(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    Query(query): Query<ExercisesQuery>,
) -> Result<Response, RenderError> {
    let language = Language::coerce(query.lang.as_deref());
    let course = state.renderer.render(course_id, language.code()).await?;
    Ok(Json(json!({ "course": course })).into_response())
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        let status = match &self {
            RenderError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            RenderError::InvalidSlug(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RenderError::DataAccess(e) => {
                error!("Render failed: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
