/// Safe retrieval of a single documentation file.
///
/// The client-supplied path is untrusted. It is joined onto the documentation
/// root and lexically normalized, and the result must have the normalized root
/// as a component prefix before any filesystem access happens. A second check
/// on canonical paths then rejects symlinks that lead out of the root.
/// Hidden and system entries are reported as not found, matching the scanner.
///
/// Errors carry generic messages only; resolved paths appear in operator logs
/// and never in responses.
use std::io::ErrorKind;
use std::path::Path;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use crate::paths;
use docs_common::docs_api::{DocContentResponse, ErrorResponse};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("path query parameter is required")]
    MissingPath,

    #[error("access denied")]
    AccessDenied,

    #[error("file not found")]
    NotFound,

    #[error("failed to read file")]
    Unreadable,
}

impl ContentError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContentError::MissingPath => StatusCode::BAD_REQUEST,
            ContentError::AccessDenied => StatusCode::FORBIDDEN,
            ContentError::NotFound => StatusCode::NOT_FOUND,
            ContentError::Unreadable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Read the markdown file at `relative` inside `root`.
pub fn read_doc(root: &Path, relative: &str) -> Result<DocContentResponse, ContentError> {
    if relative.trim().is_empty() {
        return Err(ContentError::MissingPath);
    }

    let Some(candidate) = paths::resolve_within(root, relative) else {
        warn!(path = relative, "content request escapes documentation root");
        return Err(ContentError::AccessDenied);
    };

    if !paths::is_markdown(&candidate)
        || paths::has_hidden_component(&paths::normalize(root), &candidate)
    {
        return Err(ContentError::NotFound);
    }

    let canonical_root = std::fs::canonicalize(root).map_err(|e| {
        warn!(root = %root.display(), error = %e, "documentation root unavailable");
        ContentError::NotFound
    })?;
    let canonical = std::fs::canonicalize(&candidate).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ContentError::Unreadable,
        _ => ContentError::NotFound,
    })?;
    if !canonical.starts_with(&canonical_root) {
        warn!(path = relative, "content request resolves through a link outside documentation root");
        return Err(ContentError::AccessDenied);
    }
    if !canonical.is_file() {
        return Err(ContentError::NotFound);
    }

    let content = std::fs::read_to_string(&canonical).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ContentError::NotFound,
        _ => {
            warn!(path = %canonical.display(), error = %e, "failed to read documentation file");
            ContentError::Unreadable
        }
    })?;

    Ok(DocContentResponse {
        content,
        path: relative.to_string(),
    })
}
