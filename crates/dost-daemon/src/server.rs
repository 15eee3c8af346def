//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use tokio::net::TcpListener;

/// Dost daemon server
pub struct Server {
    config: DaemonConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        config.validate()?;
        let state = AppState::from_config(&config)?;
        Ok(Self { config, state })
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        // Create router
        let app = create_router(self.state.clone(), self.config.server.enable_cors);

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Dost daemon listening on {}", addr);
        tracing::info!(
            provider = self.state.orchestrator.provider_name(),
            base_url = self.state.orchestrator.base_url(),
            "Judge0 provider selected"
        );
        if !deadline_covers_poll_budget(&self.state) {
            tracing::warn!(
                deadline_secs = self.state.execution_deadline.as_secs(),
                poll_budget_secs = self.state.orchestrator.policy().ceiling().as_secs(),
                "Execution deadline is shorter than the Judge0 poll budget"
            );
        }
        if !self.state.assistant.is_configured() {
            tracing::warn!("OPENAI_API_KEY is not set; /api/ai/* will return 503");
        }
        if !self.state.collab.is_configured() {
            tracing::warn!(
                "LIVEBLOCKS_SECRET_KEY is not set; /api/liveblocks/auth will return 503"
            );
        }

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Dost daemon shutting down");

        Ok(())
    }
}

/// Whether the handler deadline leaves room for every poll the judge may need
fn deadline_covers_poll_budget(state: &AppState) -> bool {
    state.execution_deadline >= state.orchestrator.policy().ceiling()
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_requires_secret() {
        let err = Server::new(DaemonConfig::default()).err().unwrap();
        assert!(matches!(err, DaemonError::Config(_)));
    }

    #[test]
    fn test_server_builds_from_development_config() {
        assert!(Server::new(DaemonConfig::development()).is_ok());
    }

    #[test]
    fn test_default_deadline_covers_poll_budget() {
        let mut config = DaemonConfig::development();
        let state = AppState::from_config(&config).unwrap();
        assert!(deadline_covers_poll_budget(&state));

        config.execution.deadline_secs = 10;
        let state = AppState::from_config(&config).unwrap();
        assert!(!deadline_covers_poll_budget(&state));
    }
}
