use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{
        header::{ETAG, IF_NONE_MATCH},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::cache::StructureCache;
use crate::config::Config;
use crate::content::{read_doc, ContentError};
use crate::error::AppError;
use docs_common::docs_api::{DocContentResponse, HealthResponse, RenderedDocResponse};
use docs_common::html::render_html;
use docs_common::markdown::render_markdown;

pub struct AppState {
    pub docs_root: PathBuf,
    pub structure: StructureCache,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            docs_root: config.docs_root.clone(),
            structure: StructureCache::new(config.docs_root.clone(), config.cache_ttl),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DocPathQuery {
    path: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/docs/structure", get(get_structure))
        .route("/api/docs/content", get(get_content))
        .route("/api/docs/render", get(get_rendered))
        .route("/api/docs/html", get(get_html))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Read-only CORS policy for a separately hosted documentation viewer.
pub fn cors_layer(config: &Config) -> Result<CorsLayer, AppError> {
    let origin = match &config.cors_origin {
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| AppError::Config(format!("invalid CORS_ALLOW_ORIGIN: {e}")))?;
            AllowOrigin::exact(value)
        }
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers([ETAG]))
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_structure(State(state): State<Arc<AppState>>) -> Response {
    let structure = state.structure.get().await;
    Json(structure.as_ref()).into_response()
}

async fn get_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocPathQuery>,
    headers: HeaderMap,
) -> Result<Response, ContentError> {
    let doc = load_doc(&state, query.path).await?;

    let etag = etag_for(&doc.content);
    let Ok(etag_value) = HeaderValue::from_str(&etag) else {
        return Ok(Json(doc).into_response());
    };

    if etag_matches(&headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, etag_value)]).into_response());
    }
    Ok((StatusCode::OK, [(ETAG, etag_value)], Json(doc)).into_response())
}

async fn get_rendered(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocPathQuery>,
) -> Result<Json<RenderedDocResponse>, ContentError> {
    let doc = load_doc(&state, query.path).await?;
    Ok(Json(RenderedDocResponse {
        blocks: render_markdown(&doc.content),
        path: doc.path,
    }))
}

async fn get_html(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocPathQuery>,
) -> Result<Html<String>, ContentError> {
    let doc = load_doc(&state, query.path).await?;
    Ok(Html(render_html(&render_markdown(&doc.content))))
}

async fn load_doc(
    state: &AppState,
    path: Option<String>,
) -> Result<DocContentResponse, ContentError> {
    let path = path.ok_or(ContentError::MissingPath)?;
    let root = state.docs_root.clone();
    tokio::task::spawn_blocking(move || read_doc(&root, &path))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "content read task failed");
            Err(ContentError::Unreadable)
        })
}

fn etag_for(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = hasher.finalize();
    format!("\"{:x}\"", hash)
}

fn etag_matches(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|tag| tag.trim().trim_start_matches("W/"))
        .any(|tag| tag == "*" || tag == etag)
}
