//! Static file handler.

use std::path::{Path, PathBuf};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Every request is answered by [`serve_file`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(serve_file)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Content type for a request path, by extension.
pub fn mime_type(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        _ => PLAIN_TEXT,
    }
}

/// Request path relative to a root. `None` if it tries to leave the roots.
fn relative_path(url_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in url_path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == ".." {
            return None;
        }
        relative.push(segment);
    }
    Some(relative)
}

/// First root containing `relative` as a file.
async fn resolve(roots: &[PathBuf], relative: &Path) -> Option<PathBuf> {
    for root in roots {
        let candidate = root.join(relative);
        if tokio::fs::metadata(&candidate)
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            return Some(candidate);
        }
    }
    None
}

async fn serve_file(State(state): State<AppState>, uri: Uri) -> Response {
    let url_path = match uri.path() {
        "/" => "/index.html",
        path => path,
    };
    let resolved = match relative_path(url_path) {
        Some(relative) if relative.as_os_str().is_empty() => None,
        Some(relative) => resolve(&state.roots, &relative).await,
        None => None,
    };
    let Some(file_path) = resolved else {
        state.error("File missing", json!({ "url_path": url_path }));
        return text(StatusCode::NOT_FOUND, "File not found.");
    };

    match tokio::fs::read(&file_path).await {
        Ok(data) => {
            state.debug(
                "File served",
                json!({ "file_path": file_path.display().to_string() }),
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime_type(url_path))],
                data,
            )
                .into_response()
        }
        Err(err) => {
            state.error(
                "Read error",
                json!({ "file_path": file_path.display().to_string(), "message": err.to_string() }),
            );
            text(StatusCode::INTERNAL_SERVER_ERROR, "Error loading file.")
        }
    }
}

fn text(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, PLAIN_TEXT)], body).into_response()
}
