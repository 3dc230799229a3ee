//! Static route serving built icon modules from the output root.

use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::metrics::{ICON_BYTES_SERVED, ICON_REQUESTS_TOTAL};
use crate::state::AppState;

/// Content type of every served module.
pub const MODULE_CONTENT_TYPE: &str = "application/javascript";

#[derive(Debug, Serialize)]
pub struct IconErrorResponse {
    pub error: String,
}

/// Why a requested icon path was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IconPathError {
    #[error("Invalid path: empty")]
    Empty,

    #[error("Invalid path: parent directory segment")]
    ParentSegment,

    #[error("Invalid path: must be relative")]
    NotRelative,
}

/// Resolves a requested path against `root`.
///
/// Purely lexical: the filesystem is not consulted, so a rejected request
/// never touches it.
pub fn resolve_icon_path(root: &FsPath, requested: &str) -> Result<PathBuf, IconPathError> {
    if requested.is_empty() {
        return Err(IconPathError::Empty);
    }

    if requested.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(IconPathError::ParentSegment);
    }

    let relative = FsPath::new(requested);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(IconPathError::ParentSegment),
            Component::RootDir | Component::Prefix(_) => return Err(IconPathError::NotRelative),
        }
    }

    Ok(root.join(relative))
}

/// `GET /icons` and `GET /icons/`: the wildcard route never sees an empty path.
pub async fn empty_icon_path() -> Response {
    rejected("", IconPathError::Empty)
}

/// `GET /icons/{*path}`
pub async fn serve_icon(
    State(state): State<Arc<AppState>>,
    Path(requested): Path<String>,
) -> Response {
    let file_path = match resolve_icon_path(state.icons_root(), &requested) {
        Ok(path) => path,
        Err(e) => return rejected(&requested, e),
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            ICON_REQUESTS_TOTAL.with_label_values(&["served"]).inc();
            ICON_BYTES_SERVED.inc_by(content.len() as u64);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, MODULE_CONTENT_TYPE),
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                ],
                content,
            )
                .into_response()
        }
        Err(e) => {
            ICON_REQUESTS_TOTAL.with_label_values(&["not_found"]).inc();
            debug!(path = %file_path.display(), error = %e, "Icon not readable");
            (
                StatusCode::NOT_FOUND,
                Json(IconErrorResponse {
                    error: format!("Icon not found: {}", requested),
                }),
            )
                .into_response()
        }
    }
}

fn rejected(requested: &str, e: IconPathError) -> Response {
    ICON_REQUESTS_TOTAL.with_label_values(&["rejected"]).inc();
    debug!(path = %requested, error = %e, "Rejected icon request");
    (
        StatusCode::BAD_REQUEST,
        Json(IconErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/srv/dist")
    }

    #[test]
    fn test_resolves_nested_path() {
        assert_eq!(
            resolve_icon_path(&root(), "regular/faHouse.js").unwrap(),
            PathBuf::from("/srv/dist/regular/faHouse.js")
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(resolve_icon_path(&root(), ""), Err(IconPathError::Empty));
    }

    #[test]
    fn test_rejects_parent_segments() {
        for requested in [
            "..",
            "../secret.txt",
            "regular/../../etc/passwd",
            "regular/..",
            "regular\\..\\..\\secret",
        ] {
            assert_eq!(
                resolve_icon_path(&root(), requested),
                Err(IconPathError::ParentSegment),
                "{} should be rejected",
                requested
            );
        }
    }

    #[test]
    fn test_dots_inside_names_are_allowed() {
        assert!(resolve_icon_path(&root(), "regular/fa..House.js").is_ok());
        assert!(resolve_icon_path(&root(), "./regular/faHouse.js").is_ok());
    }

    #[test]
    fn test_rejects_absolute_paths() {
        assert_eq!(
            resolve_icon_path(&root(), "/etc/passwd"),
            Err(IconPathError::NotRelative)
        );
    }
}
