use crate::db::{self, Database};
use crate::lifecycle::{CloseDatabase, Lifecycle};
use crate::signals::shutdown_signal;
use crate::state::AppState;
use crate::web::create_router;
use crate::web::templates::load_templates;
use anyhow::Context;
use axum::Router;
use jobapply_common::config::Config;
use std::future::IntoFuture;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Arc<Config>,
    state: AppState,
    lifecycle: Lifecycle,
}

impl App {
    /// Create an App backed by the database described in `config`
    ///
    /// No connection is made here; reachability is checked during startup.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let database = db::from_config(&config);
        Self::with_database(config, database)
    }

    /// Create an App with an explicit database implementation
    pub fn with_database(
        config: Config,
        database: Arc<dyn Database>,
    ) -> Result<Self, anyhow::Error> {
        let config = Arc::new(config);

        let templates = load_templates(&config.template_dir).with_context(|| {
            format!(
                "failed to load templates from {}",
                config.template_dir.display()
            )
        })?;
        let state = AppState::new(config.clone(), templates);

        let mut lifecycle = Lifecycle::new(config.clone(), database.clone());
        lifecycle.add_teardown(CloseDatabase(database));

        Ok(App {
            config,
            state,
            lifecycle,
        })
    }

    /// The full router, including the versioned API
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), crate::api::router())
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Run the application: startup sequence, Axum server, graceful shutdown, shutdown sequence
    pub async fn run(self) -> ExitCode {
        let started = Instant::now();

        if let Err(e) = self.lifecycle.on_start().await {
            error!(error = %e, "startup sequence failed");
            return ExitCode::FAILURE;
        }

        let exit = self.serve(started).await;
        self.lifecycle.on_stop().await;
        exit
    }

    async fn serve(&self, started: Instant) -> ExitCode {
        let addr = (self.config.host.as_str(), self.config.port);
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(error) => {
                error!(
                    error = ?error,
                    host = %self.config.host,
                    port = self.config.port,
                    "failed to bind TCP listener"
                );
                return ExitCode::FAILURE;
            }
        };

        match listener.local_addr() {
            Ok(address) => info!(address = %address, "starting axum web server"),
            Err(_) => info!(
                host = %self.config.host,
                port = self.config.port,
                "starting axum web server"
            ),
        }

        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            shutdown_signal(started).await;
            let _ = signalled_tx.send(());
        });

        tokio::select! {
            result = server.into_future() => match result {
                Ok(()) => {
                    info!("axum server stopped");
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    error!(error = ?error, "axum server error");
                    ExitCode::FAILURE
                }
            },
            _ = drain_deadline(signalled_rx, self.config.shutdown_timeout) => {
                warn!(
                    timeout = ?self.config.shutdown_timeout,
                    "graceful shutdown timed out, dropping open connections"
                );
                ExitCode::SUCCESS
            }
        }
    }
}

/// Resolves `timeout` after the shutdown signal fires; never resolves without one
async fn drain_deadline(signalled: oneshot::Receiver<()>, timeout: Duration) {
    match signalled.await {
        Ok(()) => tokio::time::sleep(timeout).await,
        Err(_) => std::future::pending::<()>().await,
    }
}
