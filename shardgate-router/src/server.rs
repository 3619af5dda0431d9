use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

use crate::error::RouteError;
use crate::forward::{filter_headers, routing_key, target_url};
use crate::http::{ForwardRequest, HttpClient};
use crate::table::RoutingState;

pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct ProxyState {
    routing: Arc<RoutingState>,
    client: Arc<dyn HttpClient>,
    max_body_bytes: usize,
}

impl ProxyState {
    pub fn new(routing: Arc<RoutingState>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            routing,
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }
}

/// Every method on every path, `/` included, goes through [`dispatch`].
pub fn router(state: ProxyState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: ProxyState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "router listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn dispatch(State(state): State<ProxyState>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    match forward(&state, req).await {
        Ok(resp) => resp,
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(%method, %path, status = status.as_u16(), error = %err, "request failed");
            } else {
                tracing::debug!(%method, %path, status = status.as_u16(), error = %err, "request rejected");
            }
            err.into_response()
        }
    }
}

async fn forward(state: &ProxyState, req: Request) -> Result<Response, RouteError> {
    let table = state
        .routing
        .get()
        .map_err(|e| RouteError::Config(e.to_string()))?;
    let operation_id = routing_key(req.uri().path()).ok_or(RouteError::MissingKey)?;
    let route = table.route(&operation_id)?;
    let url = target_url(route.base_url, req.uri().path(), req.uri().query());

    let (parts, body) = req.into_parts();
    let limit = state.max_body_bytes;
    if declared_length(&parts.headers).is_some_and(|len| len > limit) {
        return Err(RouteError::BodyTooLarge { limit });
    }
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| body_error(e, limit))?;

    tracing::debug!(%operation_id, batch = route.batch, %url, "forwarding request");
    let downstream = state
        .client
        .send(ForwardRequest {
            method: parts.method,
            url,
            headers: filter_headers(&parts.headers, true),
            body,
        })
        .await?;

    let mut response = Response::new(Body::from(downstream.body));
    *response.status_mut() = downstream.status;
    *response.headers_mut() = filter_headers(&downstream.headers, false);
    Ok(response)
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Chunked bodies carry no length up front; the limit trips while reading.
fn body_error(err: axum::Error, limit: usize) -> RouteError {
    let inner = err.into_inner();
    if inner
        .downcast_ref::<http_body_util::LengthLimitError>()
        .is_some()
    {
        RouteError::BodyTooLarge { limit }
    } else {
        RouteError::Body(inner.to_string())
    }
}
