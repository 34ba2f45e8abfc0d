//! Hyper-based HTTP transport serving the tool endpoints.

use std::convert::Infallible;
use std::net::SocketAddr;

use hyper::header::CONTENT_TYPE;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use mcp_kernel::wire::{ErrorBody, InvokeToolRequest};
use mcp_kernel::{InvokeError, ToolHandler};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::server::ServerError;

/// Handle to a running HTTP listener.
#[derive(Debug)]
pub(crate) struct HttpServerHandle {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<hyper::Result<()>>,
}

impl HttpServerHandle {
    /// Returns the bound address, which matters when port 0 was requested.
    pub(crate) const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signals graceful shutdown and waits for the listener to drain.
    pub(crate) async fn shutdown(self) {
        let _ = self.shutdown.send(());
        match self.task.await {
            Ok(Ok(())) => info!("http listener stopped"),
            Ok(Err(err)) => warn!(%err, "http listener terminated with error"),
            Err(err) => warn!(%err, "http listener task failed"),
        }
    }
}

/// Binds the listener and starts serving the handler.
pub(crate) fn serve(addr: SocketAddr, handler: ToolHandler) -> Result<HttpServerHandle, ServerError> {
    let make_service = make_service_fn(move |_conn| {
        let handler = handler.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let handler = handler.clone();
                async move { Ok::<_, Infallible>(route(&handler, request).await) }
            }))
        }
    });

    let builder = Server::try_bind(&addr).map_err(|err| ServerError::Bind {
        reason: err.to_string(),
    })?;
    let server = builder.serve(make_service);
    let bound = server.local_addr();

    let (shutdown, rx) = oneshot::channel();
    let graceful = server.with_graceful_shutdown(async {
        rx.await.ok();
    });
    let task = tokio::spawn(graceful);

    info!(%bound, "http listener started");
    Ok(HttpServerHandle {
        addr: bound,
        shutdown,
        task,
    })
}

async fn route(handler: &ToolHandler, request: Request<Body>) -> Response<Body> {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match (method, path.as_str()) {
        (Method::GET, "/mcp/tools") => json_response(StatusCode::OK, &handler.list_tools()),
        (Method::GET, "/mcp/info") => json_response(StatusCode::OK, &handler.server_info()),
        (_, "/mcp/tools" | "/mcp/info") => method_not_allowed(),
        (method, path) if path.starts_with("/mcp/tools/") => {
            match parse_invoke_path(path) {
                Some(tool) if method == Method::POST => {
                    invoke(handler, &tool, request).await
                }
                Some(_) => method_not_allowed(),
                None => json_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorBody::new("invalid invoke path", "BAD_REQUEST"),
                ),
            }
        }
        _ => json_response(
            StatusCode::NOT_FOUND,
            &ErrorBody::new("no such endpoint", "NOT_FOUND"),
        ),
    }
}

/// Extracts the tool name from `/mcp/tools/{name}/invoke`.
fn parse_invoke_path(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/mcp/tools/")?;
    let mut parts = rest.split('/');
    let name = parts.next().filter(|name| !name.is_empty())?;
    match (parts.next(), parts.next()) {
        (Some("invoke"), None) => Some(name.to_owned()),
        _ => None,
    }
}

async fn invoke(handler: &ToolHandler, tool: &str, request: Request<Body>) -> Response<Body> {
    let bytes = match hyper::body::to_bytes(request.into_body()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                &ErrorBody::new(format!("cannot read body: {err}"), "BAD_REQUEST"),
            );
        }
    };

    // An empty body invokes with an empty argument bag.
    let invoke_request: InvokeToolRequest = if bytes.is_empty() {
        InvokeToolRequest::default()
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(request) => request,
            Err(err) => {
                return json_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorBody::new(format!("invalid JSON: {err}"), "BAD_REQUEST"),
                );
            }
        }
    };

    match handler.invoke_tool(tool, &invoke_request.arguments) {
        Ok(response) => json_response(StatusCode::OK, &response),
        Err(err) => json_response(error_status(&err), &ErrorBody::from(&err)),
    }
}

const fn error_status(err: &InvokeError) -> StatusCode {
    match err {
        InvokeError::ToolNotFound { .. } => StatusCode::NOT_FOUND,
        InvokeError::ArgumentConversion { .. } => StatusCode::BAD_REQUEST,
        InvokeError::Handler { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn method_not_allowed() -> Response<Body> {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorBody::new("method not allowed", "METHOD_NOT_ALLOWED"),
    )
}

fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Response<Body> {
    let body = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_owned());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_default()
}
