//! Static file serving with directory listings.
//!
//! Files come straight from `ServeDir`, which handles content types, index
//! files, and path sanitization. The fallback kicks in when no file matched:
//! a request that maps to a directory without an index file gets a generated
//! HTML listing, anything else gets a 404.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;

/// State for the listing fallback handler.
#[derive(Clone)]
struct ListingState {
    root: Arc<PathBuf>,
}

/// Creates the static file service for the document root.
///
/// `ServeDir` serves existing files (and `index.html` for directories that
/// have one); the fallback renders directory listings and 404s.
pub fn create_static_service(root: &Path) -> ServeDir<MethodRouter> {
    let state = ListingState {
        root: Arc::new(root.to_path_buf()),
    };
    ServeDir::new(root).fallback(any(serve_fallback).with_state(state))
}

/// Fallback for requests `ServeDir` could not satisfy.
async fn serve_fallback(State(state): State<ListingState>, uri: Uri) -> Response {
    let Some(path) = resolve_path(&state.root, uri.path()) else {
        return not_found();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_dir() => match render_directory_listing(uri.path(), &path).await {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to list directory");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to list directory").into_response()
            }
        },
        _ => not_found(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "File not found").into_response()
}

/// Maps a request path to a filesystem path under `root`, rejecting any
/// parent-directory components.
fn resolve_path(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path).decode_utf8().ok()?;
    let mut path = root.to_path_buf();
    for component in decoded.trim_start_matches('/').split('/') {
        match component {
            "" | "." => continue,
            ".." => return None,
            component => path.push(component),
        }
    }
    Some(path)
}

struct ListingItem {
    name: String,
    is_dir: bool,
}

/// Renders an HTML index of `dir` for the request path `request_path`.
async fn render_directory_listing(
    request_path: &str,
    dir: &Path,
) -> Result<String, std::io::Error> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut items: Vec<ListingItem> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        let name = entry.file_name().to_string_lossy().into_owned();
        items.push(ListingItem {
            name,
            is_dir: file_type.is_dir(),
        });
    }

    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let base = if request_path.ends_with('/') {
        request_path.to_string()
    } else {
        format!("{}/", request_path)
    };

    let title = encode_text(request_path).into_owned();
    let mut body = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Directory listing for {title}</title>\
         <style>body{{font-family:system-ui;margin:2rem;}}li{{padding:0.15rem 0;}}</style></head>\
         <body><h1>Directory listing for {title}</h1><hr><ul>"
    );

    if request_path != "/" {
        body.push_str("<li><a href=\"..\">..</a></li>");
    }

    for item in items {
        let suffix = if item.is_dir { "/" } else { "" };
        let href = encode_double_quoted_attribute(&format!("{}{}{}", base, item.name, suffix))
            .into_owned();
        let display = encode_text(&item.name).into_owned();
        body.push_str(&format!(
            "<li><a href=\"{href}\">{display}{suffix}</a></li>"
        ));
    }

    body.push_str("</ul><hr></body></html>");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_joins_under_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/assets/app.js"),
            Some(PathBuf::from("/srv/site/assets/app.js"))
        );
        assert_eq!(resolve_path(root, "/"), Some(PathBuf::from("/srv/site")));
    }

    #[test]
    fn resolve_path_decodes_percent_escapes() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_path(root, "/my%20photos"),
            Some(PathBuf::from("/srv/site/my photos"))
        );
    }

    #[test]
    fn resolve_path_rejects_traversal() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_path(root, "/../etc/passwd"), None);
        assert_eq!(resolve_path(root, "/a/%2e%2e/%2e%2e/etc"), None);
    }

    #[tokio::test]
    async fn listing_names_entries_and_escapes_html() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("camera.html"), "hi").unwrap();
        std::fs::write(dir.path().join("<script>.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();

        let html = render_directory_listing("/media", dir.path()).await.unwrap();
        assert!(html.contains("Directory listing for /media"));
        assert!(html.contains("camera.html"));
        assert!(html.contains("href=\"/media/assets/\""));
        assert!(html.contains("&lt;script&gt;.txt"));
    }

    #[tokio::test]
    async fn root_listing_has_no_parent_link() {
        let dir = tempfile::tempdir().unwrap();
        let html = render_directory_listing("/", dir.path()).await.unwrap();
        assert!(!html.contains("href=\"..\""));
    }
}
