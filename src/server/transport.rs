//! Server lifecycle.
//!
//! State is built before the listener binds; once the cancellation token
//! fires the server drains in-flight requests and closes the `PokéAPI`
//! client.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::handlers::router;
use super::state::AppState;
use crate::error::Result;

/// Binds `host:port` and serves until ctrl-c.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                trigger.cancel();
            }
            Err(e) => warn!(error = %e, "unable to listen for ctrl-c"),
        }
    });

    serve_until(state, listener, token).await
}

/// Serves on `listener` until `token` is cancelled, then closes the client.
///
/// # Errors
///
/// Returns an I/O error if the server fails.
pub async fn serve_until(
    state: AppState,
    listener: TcpListener,
    token: CancellationToken,
) -> Result<()> {
    let client = Arc::clone(&state.client);
    let addr = listener.local_addr()?;
    info!(%addr, "Pokémon multi-agent API listening");

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(token.cancelled_owned())
        .await;

    client.close();
    info!("server stopped");
    result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, PromptSet};
    use crate::testing::{ScriptedProvider, pokedex_client};

    #[tokio::test]
    async fn test_serves_until_cancelled_then_closes_client() {
        let config = AgentConfig::builder()
            .api_key("test")
            .model("test-model")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let client = pokedex_client();
        let state = AppState::from_parts(
            Arc::new(ScriptedProvider::new()),
            Arc::clone(&client),
            config,
            PromptSet::defaults(),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        let addr = listener.local_addr().unwrap_or_else(|e| unreachable!("{e}"));
        let token = CancellationToken::new();
        let server = tokio::spawn(serve_until(state, listener, token.clone()));

        let welcome: serde_json::Value = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap_or_else(|e| unreachable!("{e}"))
            .json()
            .await
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(
            welcome["message"],
            "Welcome to the Pokémon Multi-Agent System API"
        );

        token.cancel();
        let result = server.await.unwrap_or_else(|e| unreachable!("{e}"));
        assert!(result.is_ok());
        assert!(client.is_closed());
    }
}
