//! # HTTP Transport
//!
//! The axum adapter over the protocol core. Nothing in here makes protocol
//! decisions: handlers unpack exactly the request pieces the service wants,
//! enforce a per-request deadline, and translate typed responses and typed
//! errors back into HTTP.
//!
//! ## Endpoints
//!
//! | Method | Path      | Description                 |
//! |--------|-----------|-----------------------------|
//! | GET    | `/`       | Index, answers `hello`      |
//! | GET    | `/{key}`  | Fetch the key's board       |
//! | PUT    | `/{key}`  | Submit a new board for key  |
//!
//! Responses are labeled `text/html;charset=utf-8` — boards are HTML-ish
//! fragments and the reference servers serve them that way.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use vernal_protocol::error::{ServerError, ServiceError};
use vernal_protocol::service::{BoardService, ServiceResponse};

use crate::metrics::NodeMetrics;

/// Deadline for a single request, store I/O included. Expiry maps to 504.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard cap on request body reads, set well above the board size limit so
/// that modestly oversize boards still reach the protocol's own 413 with
/// its stable message, while unbounded floods die at the framework layer.
const BODY_READ_LIMIT: usize = 64 * 1024;

/// Content type attached to every response.
const CONTENT_TYPE_HTML: &str = "text/html;charset=utf-8";

/// Shared application state. Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BoardService>,
    pub metrics: Arc<NodeMetrics>,
}

/// Builds the board API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS, Method::PUT])
        .allow_origin(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::IF_MODIFIED_SINCE,
            HeaderName::from_static("spring-signature"),
            HeaderName::from_static("spring-version"),
        ])
        .expose_headers([
            header::CONTENT_TYPE,
            header::LAST_MODIFIED,
            HeaderName::from_static("spring-signature"),
            HeaderName::from_static("spring-version"),
        ]);

    Router::new()
        .route("/", get(index_handler))
        .route("/{key}", get(get_board_handler).put(put_board_handler))
        .layer(DefaultBodyLimit::max(BODY_READ_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Response {
    state.metrics.requests_total.inc();
    render(state.service.handle_index())
}

async fn get_board_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    state.metrics.requests_total.inc();

    let if_modified_since = header_string(&headers, header::IF_MODIFIED_SINCE);
    let result = tokio::time::timeout(
        REQUEST_TIMEOUT,
        state.service.handle_get(&key, if_modified_since.as_deref()),
    )
    .await;

    if matches!(result, Ok(Ok(_))) {
        state.metrics.boards_served_total.inc();
    }
    finish(&state.metrics, started, result)
}

async fn put_board_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    state.metrics.requests_total.inc();

    let signature = header_string(&headers, HeaderName::from_static("spring-signature"));
    let result = tokio::time::timeout(
        REQUEST_TIMEOUT,
        state.service.handle_put(&key, signature.as_deref(), &body),
    )
    .await;

    if matches!(result, Ok(Ok(_))) {
        state.metrics.boards_updated_total.inc();
    }
    finish(&state.metrics, started, result)
}

/// Pulls a header out as a string. Non-UTF-8 bytes come through lossily so
/// the service can reject them with its own parse error instead of the
/// value silently vanishing.
fn header_string(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Records latency and renders whichever of the three shapes the handler
/// produced: a response, a typed error, or a blown deadline.
fn finish(
    metrics: &NodeMetrics,
    started: Instant,
    result: Result<Result<ServiceResponse, ServiceError>, tokio::time::error::Elapsed>,
) -> Response {
    let response = match result {
        Ok(Ok(resp)) => render(resp),
        Ok(Err(err)) => render_error(err),
        Err(_) => render_timeout(started.elapsed()),
    };
    metrics
        .request_latency_seconds
        .observe(started.elapsed().as_secs_f64());
    response
}

fn render(resp: ServiceResponse) -> Response {
    let status =
        StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_HTML);
    for (name, value) in &resp.headers {
        builder = builder.header(*name, value.as_str());
    }

    builder
        .body(Body::from(resp.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn render_error(err: ServiceError) -> Response {
    match err {
        // The user's error: their status, their stable message, info-level.
        ServiceError::Protocol(err) => {
            info!(status = err.status_code(), "user error: {err}");
            plain(err.status_code(), err.to_string())
        }
        // Our error: log the cause, show the generic message.
        ServiceError::Internal(cause) => {
            error!("internal server error: {cause}");
            plain(500, ServerError::InternalError.to_string())
        }
    }
}

fn render_timeout(elapsed: Duration) -> Response {
    warn!(elapsed_ms = elapsed.as_millis() as u64, "request deadline exceeded");
    plain(
        504,
        format!("Request timed out after {:.1}s.", elapsed.as_secs_f64()),
    )
}

fn plain(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, CONTENT_TYPE_HTML)], body).into_response()
}
