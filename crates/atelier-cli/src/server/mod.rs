//! HTTP server
//!
//! A pool of blocking worker threads pulls requests off a `tiny_http`
//! listener and drives the async [`Router`] on the Tokio runtime.

mod routes;

pub use routes::{ApiResponse, AppState, Router};

use std::io::Read;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tiny_http::{Header, Request, Response, Server};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use atelier_core::constants;

/// Serve until Ctrl-C
pub async fn serve(bind: &str, workers: usize, router: Router) -> Result<()> {
    let server = Arc::new(
        Server::http(bind).map_err(|e| anyhow!("Failed to bind {}: {}", bind, e))?,
    );
    let router = Arc::new(router);
    let handle = Handle::current();
    let workers = workers.max(1);
    info!("Listening on http://{} ({} workers)", bind, workers);

    let mut tasks = Vec::with_capacity(workers);
    for worker in 0..workers {
        let server = Arc::clone(&server);
        let router = Arc::clone(&router);
        let handle = handle.clone();
        tasks.push(tokio::task::spawn_blocking(move || {
            worker_loop(worker, &server, &router, &handle)
        }));
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    // Each call releases one thread blocked in recv()
    for _ in 0..workers {
        server.unblock();
    }
    for task in tasks {
        if let Err(e) = task.await {
            warn!("Worker exited abnormally: {}", e);
        }
    }
    Ok(())
}

fn worker_loop(worker: usize, server: &Server, router: &Router, handle: &Handle) {
    debug!("Worker {} started", worker);
    loop {
        match server.recv() {
            Ok(request) => handle_request(request, router, handle),
            Err(e) => {
                debug!("Worker {} stopping: {}", worker, e);
                break;
            }
        }
    }
}

fn handle_request(mut request: Request, router: &Router, handle: &Handle) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();

    let response = match read_body(&mut request) {
        Ok(body) => handle.block_on(router.handle(&method, &url, &body)),
        Err(response) => response,
    };

    info!(
        "{} {} -> {} ({} ms)",
        method,
        url,
        response.status,
        started.elapsed().as_millis()
    );

    if let Err(e) = request.respond(to_http(&response)) {
        error!("Failed to write response: {}", e);
    }
}

/// Read the request body, refusing anything over the size limit
fn read_body(request: &mut Request) -> Result<Vec<u8>, ApiResponse> {
    let limit = constants::server::MAX_BODY_BYTES;
    if request.body_length().is_some_and(|len| len as u64 > limit) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    if let Err(e) = request.as_reader().take(limit + 1).read_to_end(&mut body) {
        warn!("Failed to read request body: {}", e);
        return Err(ApiResponse::new(
            400,
            serde_json::json!({ "error": "Could not read request body" }),
        ));
    }
    if body.len() as u64 > limit {
        return Err(too_large());
    }
    Ok(body)
}

fn too_large() -> ApiResponse {
    ApiResponse::new(413, serde_json::json!({ "error": "Request body too large" }))
}

fn to_http(response: &ApiResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut http =
        Response::from_string(response.body.to_string()).with_status_code(response.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        http.add_header(header);
    }
    http
}
