//! Entry pages and the comparison error page

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::path::Path;
use tracing::debug;

/// Landing page
pub const INDEX_PAGE: &str = "index.html";
/// Single-dataset viewer
pub const ATLAS_PAGE: &str = "atlas.html";
/// Two-dataset comparison viewer
pub const COMPARE_PAGE: &str = "compare.html";
/// Template rendered when the comparison view is rejected
pub const ERROR_TEMPLATE: &str = "error.html";
/// Marker in the error template replaced by the escaped message
pub const ERROR_PLACEHOLDER: &str = "{{ error }}";

/// Escape text for inclusion in HTML element content or attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the error page body from an optional template
#[must_use]
pub fn render_error(template: Option<&str>, message: &str) -> String {
    let escaped = escape_html(message);
    template.map_or_else(
        || {
            format!(
                "<!DOCTYPE html>\n<html>\n<head><title>Comparison unavailable</title></head>\n\
                 <body>\n<h1>Comparison unavailable</h1>\n<p>{escaped}</p>\n</body>\n</html>\n"
            )
        },
        |template| template.replace(ERROR_PLACEHOLDER, &escaped),
    )
}

/// 400 response carrying the rendered error page
pub async fn error_page(root: &Path, message: &str) -> Response {
    let template = tokio::fs::read_to_string(root.join(ERROR_TEMPLATE)).await.ok();
    if template.is_none() {
        debug!("{} not found, using inline error page", ERROR_TEMPLATE);
    }
    (
        StatusCode::BAD_REQUEST,
        Html(render_error(template.as_deref(), message)),
    )
        .into_response()
}
