//! Registration lifecycle: publish with retry, withdraw on shutdown.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::backend::{DiscoveryError, DiscoveryResult, RegistryBackend};
use crate::snapshot::ServerSnapshot;

/// Configuration for catalog registration attempts.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationConfig {
    initial_retry_delay: Duration,
    max_retry_delay: Duration,
    max_attempts: NonZeroUsize,
}

impl RegistrationConfig {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(
        initial_retry_delay: Duration,
        max_retry_delay: Duration,
        max_attempts: NonZeroUsize,
    ) -> Self {
        Self {
            initial_retry_delay,
            max_retry_delay,
            max_attempts,
        }
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn initial_retry_delay(self) -> Duration {
        self.initial_retry_delay
    }

    /// Returns the ceiling applied to the backoff delay.
    #[must_use]
    pub const fn max_retry_delay(self) -> Duration {
        self.max_retry_delay
    }

    /// Returns the maximum number of registration attempts.
    #[must_use]
    pub const fn max_attempts(self) -> NonZeroUsize {
        self.max_attempts
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidConfig`] when any delay is zero or
    /// the delay bounds are inconsistent.
    pub fn validate(self) -> DiscoveryResult<()> {
        if self.initial_retry_delay.is_zero() {
            return Err(DiscoveryError::InvalidConfig(
                "initial retry delay must be greater than zero",
            ));
        }
        if self.max_retry_delay.is_zero() {
            return Err(DiscoveryError::InvalidConfig(
                "max retry delay must be greater than zero",
            ));
        }
        if self.initial_retry_delay > self.max_retry_delay {
            return Err(DiscoveryError::InvalidConfig(
                "initial retry delay cannot exceed max retry delay",
            ));
        }
        Ok(())
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            initial_retry_delay: Duration::from_secs(1),
            max_retry_delay: Duration::from_secs(30),
            max_attempts: NonZeroUsize::new(5).expect("non-zero"),
        }
    }
}

/// Drives catalog registration for one server.
///
/// `start` spawns a worker that registers with exponential backoff until it
/// succeeds or runs out of attempts; `shutdown` aborts a still-retrying
/// worker and withdraws a successful registration.
pub struct RegistrationController {
    backend: Arc<dyn RegistryBackend>,
    snapshot: Arc<ServerSnapshot>,
    config: RegistrationConfig,
    server_id: Arc<Mutex<Option<String>>>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RegistrationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationController")
            .field("backend", &"dyn RegistryBackend")
            .field("service", &self.snapshot.identity().name())
            .field("config", &self.config)
            .field("worker", &self.worker.is_some())
            .finish()
    }
}

impl RegistrationController {
    /// Creates a controller for the given backend and snapshot.
    #[must_use]
    pub fn new(
        backend: Arc<dyn RegistryBackend>,
        snapshot: ServerSnapshot,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            backend,
            snapshot: Arc::new(snapshot),
            config,
            server_id: Arc::new(Mutex::new(None)),
            worker: None,
        }
    }

    /// Returns the catalog-assigned server id once registration succeeded.
    pub async fn server_id(&self) -> Option<String> {
        self.server_id.lock().await.clone()
    }

    /// Spawns the registration worker. Calling `start` twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidConfig`] when the configuration does
    /// not validate.
    pub fn start(&mut self) -> DiscoveryResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.config.validate()?;

        let backend = Arc::clone(&self.backend);
        let snapshot = Arc::clone(&self.snapshot);
        let server_id = Arc::clone(&self.server_id);
        let config = self.config;

        self.worker = Some(tokio::spawn(async move {
            run_registration(backend, &snapshot, &server_id, config).await;
        }));

        Ok(())
    }

    /// Stops the worker and withdraws the registration, if one succeeded.
    pub async fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }

        let server_id = self.server_id.lock().await.take();
        if let Some(server_id) = server_id {
            match self.backend.deregister(&server_id).await {
                Ok(()) => info!(%server_id, "server deregistered from catalog"),
                Err(err) => warn!(%server_id, %err, "catalog deregistration failed"),
            }
        }
    }
}

async fn run_registration(
    backend: Arc<dyn RegistryBackend>,
    snapshot: &ServerSnapshot,
    server_id: &Mutex<Option<String>>,
    config: RegistrationConfig,
) {
    let mut retry_delay = config.initial_retry_delay();

    for attempt in 1..=config.max_attempts().get() {
        match backend.register(snapshot).await {
            Ok(id) => {
                info!(
                    service = %snapshot.identity().name(),
                    server_id = %id,
                    "server registered with catalog"
                );
                *server_id.lock().await = Some(id);
                return;
            }
            Err(err) => {
                warn!(attempt, %err, "catalog registration failed; retrying");
                if attempt < config.max_attempts().get() {
                    sleep(retry_delay).await;
                    retry_delay = (retry_delay * 2).min(config.max_retry_delay());
                }
            }
        }
    }

    warn!(
        attempts = config.max_attempts().get(),
        "catalog registration abandoned"
    );
}
