//! Lifecycle state machine for hosted servers.

use thiserror::Error;
use tracing::debug;

/// States a hosted server can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Constructed; tools may still be registered.
    Init,
    /// Serving requests; the registry is read-only.
    Serving,
    /// Shut down; no further transitions except repeated shutdowns.
    Stopped,
}

impl ServerState {
    /// Returns `true` while the server accepts tool registrations.
    #[must_use]
    pub const fn accepts_registrations(self) -> bool {
        matches!(self, Self::Init)
    }

    /// Returns `true` when the server is serving requests.
    #[must_use]
    pub const fn is_serving(self) -> bool {
        matches!(self, Self::Serving)
    }
}

/// Events that drive lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerEvent {
    /// Begin serving; closes the registration phase.
    Start,
    /// Stop serving. Stopping an already stopped or never-started server is
    /// permitted and idempotent.
    Shutdown,
}

/// Lifecycle state manager for one server.
#[derive(Debug, Clone)]
pub struct ServerLifecycle {
    service: String,
    state: ServerState,
}

impl ServerLifecycle {
    /// Creates a lifecycle controller for the named service.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            state: ServerState::Init,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Applies an event, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] when the event is not
    /// allowed from the current state — notably starting twice.
    pub fn transition(&mut self, event: ServerEvent) -> Result<ServerState, LifecycleError> {
        let next = match (self.state, event) {
            (ServerState::Init, ServerEvent::Start) => Some(ServerState::Serving),
            (_, ServerEvent::Shutdown) => Some(ServerState::Stopped),
            _ => None,
        };

        let Some(next_state) = next else {
            return Err(LifecycleError::InvalidTransition {
                service: self.service.clone(),
                from: self.state,
                event,
            });
        };

        if next_state != self.state {
            debug!(
                service = %self.service,
                ?self.state,
                ?next_state,
                ?event,
                "server lifecycle transition"
            );
            self.state = next_state;
        }

        Ok(self.state)
    }
}

/// Errors emitted by the lifecycle controller.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Transition was not permitted from the current state.
    #[error("invalid lifecycle transition from {from:?} via {event:?} for service `{service}`")]
    InvalidTransition {
        /// Name of the service whose transition failed.
        service: String,
        /// State prior to the attempted transition.
        from: ServerState,
        /// Event that triggered the failure.
        event: ServerEvent,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_then_shutdown() {
        let mut lifecycle = ServerLifecycle::new("svc");
        assert!(lifecycle.state().accepts_registrations());

        lifecycle.transition(ServerEvent::Start).unwrap();
        assert!(lifecycle.state().is_serving());

        lifecycle.transition(ServerEvent::Shutdown).unwrap();
        assert_eq!(lifecycle.state(), ServerState::Stopped);
    }

    #[test]
    fn double_start_errors() {
        let mut lifecycle = ServerLifecycle::new("svc");
        lifecycle.transition(ServerEvent::Start).unwrap();

        let err = lifecycle
            .transition(ServerEvent::Start)
            .expect_err("second start should fail");
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut lifecycle = ServerLifecycle::new("svc");
        lifecycle.transition(ServerEvent::Shutdown).unwrap();
        lifecycle.transition(ServerEvent::Shutdown).unwrap();
        assert_eq!(lifecycle.state(), ServerState::Stopped);
    }

    #[test]
    fn start_after_stop_errors() {
        let mut lifecycle = ServerLifecycle::new("svc");
        lifecycle.transition(ServerEvent::Shutdown).unwrap();
        assert!(lifecycle.transition(ServerEvent::Start).is_err());
    }
}
