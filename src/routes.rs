use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::article::{Article, Category};
use crate::fetcher::Fetcher;

const DEFAULT_LIMIT: usize = 20;

pub struct AppState {
    pub fetcher: Arc<Fetcher>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/news/:category", get(news))
        .route("/api/categories", get(categories))
        .route("/health", get(health))
        .with_state(state)
}

// Custom error type
pub enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}

#[derive(Deserialize)]
pub struct NewsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
}

// Route handlers
pub async fn news(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<Article>>, AppError> {
    if query.limit == 0 {
        return Err(AppError::BadRequest("limit must be positive".to_string()));
    }
    // provider failures end in fallback content, so only a bad name gets here
    let articles = state
        .fetcher
        .fetch_by_name(&category, query.limit)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(articles))
}

pub async fn categories() -> Json<Vec<CategoryInfo>> {
    Json(
        Category::ALL
            .iter()
            .map(|c| CategoryInfo {
                id: c.as_str().to_string(),
                name: c.display_name().to_string(),
            })
            .collect(),
    )
}

pub async fn health() -> impl IntoResponse {
    "OK"
}
