//! Fault boundary: every error response leaves the server as a rendered page.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::Response,
};
use bookcase_kernel::ViewRenderer;
use serde_json::json;

use crate::error::Fault;

/// Template used for every error page.
pub const ERROR_TEMPLATE: &str = "error";

/// Replace the body of any 4xx/5xx response with the rendered error page.
///
/// Responses produced by [`crate::error::AppError`] carry a [`Fault`]; other
/// error responses (unknown routes, form rejections, timeouts) are described
/// from their status. Error responses that are already HTML pass through.
pub async fn render_fault(
    State(renderer): State<Arc<dyn ViewRenderer>>,
    response: Response,
) -> Response {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let fault = match response.extensions().get::<Fault>().cloned() {
        Some(fault) => fault,
        None if is_html(&response) => return response,
        None => Fault::from_status(status),
    };

    let data = json!({
        "title": format!("{} {}", fault.status, status.canonical_reason().unwrap_or("Error")),
        "error": fault,
    });

    match renderer.render(ERROR_TEMPLATE, &data) {
        Ok(html) => {
            let (mut parts, _) = response.into_parts();
            parts.headers.remove(header::CONTENT_LENGTH);
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            Response::from_parts(parts, Body::from(html))
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                status = %status.as_u16(),
                "failed to render error page"
            );
            response
        }
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"))
}
