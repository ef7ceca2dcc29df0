use super::server::AppState;
use crate::utils::error::RecommenderError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub const RUN_SCRIPT_PLACEHOLDER: &str = "Replace this with your Python script output";

/// 所有錯誤一律回 500
#[derive(Debug)]
pub struct ApiError(pub RecommenderError);

impl From<RecommenderError> for ApiError {
    fn from(err: RecommenderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("❌ Request failed: {} (Category: {:?})", self.0, self.0.category());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub async fn run_script() -> Json<Value> {
    Json(json!({ "result": RUN_SCRIPT_PLACEHOLDER }))
}

pub async fn recommendations(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, ApiError> {
    // 重複的 query 只取第一個
    let query = params
        .iter()
        .find(|(key, _)| key == "query")
        .map(|(_, value)| value.as_str());

    let results = state
        .search
        .find_ksimilar(query, state.k, &state.lookup_field)
        .await?;
    Ok(Json(results))
}
