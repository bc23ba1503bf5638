//! HTTP modulation server.
//!
//! Serves a single endpoint for the browser frontend:
//!
//! - `POST /modulate` with a JSON body
//!   ```json
//!   {"type": "FSK", "amplitude": 1, "frequency": 5, "bitstream": "00111001"}
//!   ```
//!   returns `{"time": [...], "digital": [...], "carrier": [...], "modulated": [...]}`.
//! - `OPTIONS /modulate` answers CORS preflight requests.
//!
//! Failures return `{"success": false, "errors": [{"code", "message", "field"?}]}`
//! with a 4xx or 5xx status.

mod handler;
mod types;


use std::future::Future;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use crate::config::ServerConfig;
use crate::http::{linger_close, read_request_within, HttpError, Status};

pub use handler::{error_response, modulate_json, route, Reply, MODULATE_PATH};
pub use types::{error_codes, ErrorResponse, JsonError};

/// Run the HTTP server until Ctrl+C.
///
/// # Returns
/// Exit code: 0 on clean shutdown
pub fn run(config: ServerConfig) -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move { run_server(config).await })
}

/// Bind the configured address and serve until Ctrl+C.
async fn run_server(config: ServerConfig) -> Result<ExitCode> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "modulation server listening on http://{}{}", addr, MODULATE_PATH);
    tracing::info!(origins = ?config.cors.origins(), "CORS allowed origins");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        wait_for_signal(tokio::signal::ctrl_c()).await;
        let _ = shutdown_tx.send(());
    });

    serve(listener, Arc::new(config), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    tracing::info!("server shutdown complete");
    Ok(ExitCode::SUCCESS)
}

/// Resolves once `signal` fires.
///
/// If the signal handler cannot be installed the error is logged and the
/// future never resolves, so the server keeps running.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for Ctrl+C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

/// Accept connections on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: Arc<ServerConfig>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        tracing::debug!(%peer_addr, "new connection");
                        tokio::spawn(handle_connection(stream, peer_addr, Arc::clone(&config)));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept error");
                    }
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    Ok(())
}

/// Handle a single connection: read one request, answer it, close.
async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, config: Arc<ServerConfig>) {
    let mut stream = BufReader::new(stream);

    let read = read_request_within(&mut stream, config.max_body_bytes, config.read_timeout).await;
    let (reply, unread_input) = match read {
        Ok(request) => {
            tracing::debug!(
                %peer_addr,
                method = request.method.as_str(),
                path = %request.path,
                body_bytes = request.body.len(),
                "request"
            );
            let worker_config = Arc::clone(&config);
            let reply = match tokio::task::spawn_blocking(move || route(&request, &worker_config)).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(%peer_addr, error = %e, "request worker failed");
                    error_response(
                        Status::InternalServerError,
                        ErrorResponse::new(error_codes::INTERNAL, "Request worker failed"),
                    )
                }
            };
            (reply, false)
        }
        Err(e) => match e.status() {
            Some(status) => (malformed_response(status, &e), true),
            None => {
                tracing::debug!(%peer_addr, error = %e, "connection dropped");
                return;
            }
        },
    };

    log_reply(peer_addr, &reply);

    if let Err(e) = reply.response.write_to(stream.get_mut()).await {
        tracing::error!(%peer_addr, error = %e, "failed to write response");
        return;
    }
    if unread_input {
        linger_close(&mut stream).await;
    }
}

fn malformed_response(status: Status, err: &HttpError) -> Reply {
    error_response(
        status,
        ErrorResponse::new(error_codes::MALFORMED_REQUEST, err.to_string()),
    )
}

fn log_reply(peer_addr: SocketAddr, reply: &Reply) {
    let status = reply.response.status.code();
    if status >= 500 {
        tracing::error!(%peer_addr, status, "request failed");
    } else if status >= 400 {
        match &reply.error {
            Some(e) => tracing::warn!(%peer_addr, status, code = %e.code, "rejected request: {}", e.message),
            None => tracing::warn!(%peer_addr, status, "rejected request"),
        }
    } else {
        tracing::debug!(%peer_addr, status, body_bytes = reply.response.body.len(), "response");
    }
}
