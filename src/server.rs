//! HTTP routes over [`Scraper`].
//!
//! Every failure is answered with `{"error": message}`. The status comes from
//! [`Error::is_client_error`]: 400 for rejected input, 500 otherwise.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::extract::Scraper;
use crate::options::ServiceConfig;
use crate::result::{ArticleRecord, CommentsPayload, DetailPayload, ListPostRecord, ResponsePayload};

#[derive(Debug, Default, Deserialize)]
struct UrlQuery {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

/// JSON error body with a derived status.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Build the application router.
pub fn router(scraper: Arc<Scraper>) -> Router {
    Router::new()
        .route("/articles", get(articles))
        .route("/list", get(list))
        .route("/detail", post(detail))
        .route("/comments", get(comments))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(scraper)
}

/// Bind `config.bind` and serve until the listener fails.
///
/// # Errors
///
/// Returns [`Error::Config`] for an invalid configuration or an address that
/// cannot be bound, and [`Error::Network`] if serving stops with an I/O error.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let addr = config.bind.clone();
    let scraper = Arc::new(Scraper::new(config)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Config(format!("failed to bind to {addr}: {e}")))?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, router(scraper))
        .await
        .map_err(|e| Error::Network(format!("server error: {e}")))
}

async fn articles(
    State(scraper): State<Arc<Scraper>>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<ResponsePayload<ArticleRecord>> {
    Ok(Json(scraper.articles(query.url.as_deref()).await?))
}

async fn list(
    State(scraper): State<Arc<Scraper>>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<ResponsePayload<ListPostRecord>> {
    Ok(Json(scraper.list(query.url.as_deref()).await?))
}

async fn detail(
    State(scraper): State<Arc<Scraper>>,
    Query(query): Query<UrlQuery>,
    body: Bytes,
) -> ApiResult<DetailPayload> {
    let id = detail_id(&body)?;
    Ok(Json(
        scraper
            .detail(id.as_deref(), query.url.as_deref())
            .await?,
    ))
}

async fn comments(
    State(scraper): State<Arc<Scraper>>,
    Query(query): Query<IdQuery>,
) -> ApiResult<CommentsPayload> {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return Err(ApiError::bad_request("id is required"));
    };
    Ok(Json(scraper.comments(&id).await?))
}

async fn health() -> &'static str {
    "ok"
}

/// Pull the topic id out of a `{"data": id}` body. Strings and numbers are
/// accepted; anything else counts as absent.
fn detail_id(body: &[u8]) -> Result<Option<String>> {
    let body: Value =
        serde_json::from_slice(body).map_err(|e| Error::ParseError(format!("request body: {e}")))?;

    Ok(match body.get("data") {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}
