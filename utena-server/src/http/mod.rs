//! HTTP API for the plugin and for clients
//!
//! A plain hyper HTTP/1 server. Each connection is served on its own task;
//! the accept loop stops when the shutdown broadcast fires.

mod response;
mod router;

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{info, warn};
use utena_utils::{Result, UtenaError};

use crate::app::AppState;

pub use router::handle_request;

/// Bind the configured listen address
pub async fn bind(addr: &str) -> Result<TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| UtenaError::config(format!("invalid listen address '{addr}': {e}")))?;

    let listener = TcpListener::bind(socket_addr).await?;
    Ok(listener)
}

/// Serve requests until shutdown is signalled
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let local_addr = listener.local_addr()?;
    info!("HTTP API listening on http://{}", local_addr);

    let mut shutdown_rx = state.subscribe_shutdown();
    if state.is_shutting_down() {
        return Ok(());
    }

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                let (stream, remote_addr) = match accept_result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("HTTP accept error: {}", e);
                        continue;
                    }
                };

                let io = TokioIo::new(stream);
                let state_clone = Arc::clone(&state);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state_clone);
                        async move { handle_request(req, state).await }
                    });

                    if let Err(e) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        // Connection errors are expected when clients disconnect
                        if !e.is_incomplete_message() {
                            warn!("HTTP connection error from {}: {}", remote_addr, e);
                        }
                    }
                });
            }

            _ = shutdown_rx.recv() => {
                info!("HTTP API shutting down");
                break;
            }
        }
    }

    Ok(())
}
