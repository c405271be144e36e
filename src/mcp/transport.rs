//! MCP transport layer for stdio and streamable HTTP.
//!
//! Every entry point takes the shared capability and builds servers from a
//! factory closure that captured it; nothing about the client crosses the
//! transport except tool text.

use std::net::SocketAddr;
use std::sync::Arc;

use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::server::TavilyMcpServer;
use crate::tools::ToolsCapability;

/// Path the HTTP transport serves MCP on.
pub const MCP_PATH: &str = "/mcp";

/// Starts the MCP server with stdio transport.
///
/// The server reads JSON-RPC messages from stdin and writes responses to stdout.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a runtime error.
pub async fn serve_stdio(capability: Arc<ToolsCapability>) -> anyhow::Result<()> {
    let service = TavilyMcpServer::new(capability).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

fn router(capability: Arc<ToolsCapability>, ct: &CancellationToken) -> axum::Router {
    let service = StreamableHttpService::new(
        move || Ok::<_, std::io::Error>(TavilyMcpServer::new(Arc::clone(&capability))),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            cancellation_token: ct.child_token(),
            ..Default::default()
        },
    );
    axum::Router::new().nest_service(MCP_PATH, service)
}

/// Starts the MCP server with streamable HTTP transport at `/mcp`.
///
/// Runs until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails to bind or encounters a runtime error.
pub async fn serve_http(
    capability: Arc<ToolsCapability>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let ct = CancellationToken::new();
    let router = router(capability, &ct);
    let addr = format!("{host}:{port}");
    let tcp_listener = TcpListener::bind(&addr).await?;

    // stdout is left to command output; the subscriber writes to stderr
    info!("tavily-tools MCP server listening on http://{addr}{MCP_PATH}");

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            ct.cancel();
        })
        .await?;

    Ok(())
}

/// A server running in-process on a loopback port.
#[derive(Debug)]
pub struct LocalEndpoint {
    addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl LocalEndpoint {
    /// Full MCP URL, e.g. `http://127.0.0.1:49152/mcp`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}{MCP_PATH}", self.addr)
    }

    /// Bound socket address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops the server and waits for it to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "local MCP server task ended abnormally");
        }
    }
}

/// Starts the HTTP transport on an ephemeral `127.0.0.1` port.
///
/// # Errors
///
/// Returns an error if no loopback port can be bound.
pub async fn spawn_local(capability: Arc<ToolsCapability>) -> anyhow::Result<LocalEndpoint> {
    let cancel = CancellationToken::new();
    let router = router(capability, &cancel);
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;
    debug!(%addr, "local MCP server started");

    let shutdown = cancel.clone();
    let task = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;
        if let Err(e) = result {
            warn!(error = %e, "local MCP server failed");
        }
    });

    Ok(LocalEndpoint { addr, cancel, task })
}
