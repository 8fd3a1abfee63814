use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::info;

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %redact_query(&uri.to_string()),
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}

// Search keywords end up in the query string; keep them out of the logs.
fn redact_query(url: &str) -> String {
    match url.split_once('?') {
        Some((path, query)) if query.contains("keywords=") => format!("{}?…", path),
        _ => url.to_string(),
    }
}

/// Cache hints for our own responses. Pages and views are per-visitor state;
/// JSON API replies mirror the upstream revalidation window.
pub async fn cache_control(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;

    if response.headers().contains_key(header::CACHE_CONTROL) {
        return response;
    }

    let value = if path.starts_with("/api/views/") || path.starts_with("/views/") {
        "no-store"
    } else if path.starts_with("/api/") && response.status().is_success() {
        "public, max-age=60"
    } else if path == "/movies" || path.starts_with("/movies/") {
        "no-store"
    } else {
        return response;
    };
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(value));

    response
}
