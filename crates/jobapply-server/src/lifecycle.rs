//! Startup and shutdown sequencing around the serving period.
//!
//! [`Lifecycle::on_start`] runs before the listener accepts traffic and
//! [`Lifecycle::on_stop`] after it has stopped. Logging must already be
//! initialized when `on_start` is called.

use crate::db::Database;
use async_trait::async_trait;
use jobapply_common::config::Config;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `on_start` not yet called
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Outcome of the startup database gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    /// Reachable and initialized
    Ready,
    /// Not reachable; the server runs without it
    Unreachable,
    /// The check or initialization failed with an error
    Failed(String),
}

impl DatabaseStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, DatabaseStatus::Ready)
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("cannot start from phase {0:?}")]
    InvalidPhase(Phase),
}

/// Resource release performed during shutdown
#[async_trait]
pub trait TeardownHook: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> anyhow::Result<()>;
}

/// Closes the database pool
pub struct CloseDatabase(pub Arc<dyn Database>);

#[async_trait]
impl TeardownHook for CloseDatabase {
    fn name(&self) -> &str {
        "close database"
    }

    async fn run(&self) -> anyhow::Result<()> {
        self.0.close().await;
        Ok(())
    }
}

pub struct Lifecycle {
    config: Arc<Config>,
    database: Arc<dyn Database>,
    teardown: Mutex<Vec<Box<dyn TeardownHook>>>,
    phase: watch::Sender<Phase>,
}

impl Lifecycle {
    pub fn new(config: Arc<Config>, database: Arc<dyn Database>) -> Self {
        Self {
            config,
            database,
            teardown: Mutex::new(Vec::new()),
            phase: watch::Sender::new(Phase::Created),
        }
    }

    /// Register a hook to run during [`Lifecycle::on_stop`], after those already registered
    pub fn add_teardown(&mut self, hook: impl TeardownHook + 'static) {
        self.teardown.get_mut().push(Box::new(hook));
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Subscribe to phase transitions
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Run the startup sequence
    ///
    /// Database problems are logged and reported through the returned status;
    /// they never make startup fail. Only the first call runs; any later or
    /// concurrent call gets [`LifecycleError::InvalidPhase`].
    pub async fn on_start(&self) -> Result<DatabaseStatus, LifecycleError> {
        let mut rejected = None;
        self.phase.send_if_modified(|phase| {
            if *phase != Phase::Created {
                rejected = Some(*phase);
                return false;
            }
            *phase = Phase::Starting;
            true
        });
        if let Some(phase) = rejected {
            return Err(LifecycleError::InvalidPhase(phase));
        }

        let started = Instant::now();
        info!(
            project = %self.config.project_name,
            "job application system starting up"
        );
        info!(environment = %self.config.environment, "environment");
        info!(debug = self.config.debug, "debug mode");

        let status = self.database_gate().await;

        // on_stop may have begun while the gate was running
        self.phase.send_if_modified(|phase| {
            if *phase != Phase::Starting {
                return false;
            }
            *phase = Phase::Running;
            true
        });
        info!(
            database = ?status,
            elapsed = format!("{:.2?}", started.elapsed()),
            "startup complete"
        );
        Ok(status)
    }

    async fn database_gate(&self) -> DatabaseStatus {
        match self.database.check_connection().await {
            Ok(true) => match self.database.initialize().await {
                Ok(()) => {
                    info!("database initialized successfully");
                    DatabaseStatus::Ready
                }
                Err(e) => {
                    error!(error = ?e, "database initialization error");
                    DatabaseStatus::Failed(format!("{:#}", e))
                }
            },
            Ok(false) => {
                warn!("database connection failed - some features may not work");
                DatabaseStatus::Unreachable
            }
            Err(e) => {
                error!(error = ?e, "database initialization error");
                DatabaseStatus::Failed(format!("{:#}", e))
            }
        }
    }

    /// Run the shutdown sequence once; later calls do nothing
    ///
    /// Teardown hooks run in registration order. A failing hook is logged and
    /// the remaining hooks still run.
    pub async fn on_stop(&self) {
        let mut first = false;
        self.phase.send_if_modified(|phase| {
            if matches!(phase, Phase::Stopping | Phase::Stopped) {
                return false;
            }
            *phase = Phase::Stopping;
            first = true;
            true
        });
        if !first {
            return;
        }

        info!("job application system shutting down");

        let hooks = std::mem::take(&mut *self.teardown.lock().await);
        for hook in hooks {
            let started = Instant::now();
            match hook.run().await {
                Ok(()) => info!(
                    hook = hook.name(),
                    elapsed = format!("{:.2?}", started.elapsed()),
                    "teardown complete"
                ),
                Err(e) => error!(hook = hook.name(), error = ?e, "teardown failed"),
            }
        }

        self.phase.send_replace(Phase::Stopped);
    }
}
