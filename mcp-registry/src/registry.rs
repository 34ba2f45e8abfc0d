//! Runtime registry for tool descriptors.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use mcp_scanner::{ExtractError, IntoCallable, Scanner, ToolDescriptor, ToolService};
use thiserror::Error;
use tracing::{debug, warn};

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors produced by tool registration and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Tool name collided with an existing registration. Duplicates are
    /// rejected outright rather than shadowed.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },

    /// Descriptor extraction failed for the registration target.
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Default)]
struct Inner {
    order: Vec<Arc<ToolDescriptor>>,
    index: HashMap<String, usize>,
}

/// Registry that stores tool descriptors keyed by name, preserving
/// registration order for listings.
///
/// Writes happen during startup registration; once serving begins the
/// registry is only read, so the shared lock sees no write contention in the
/// steady state.
#[derive(Default)]
pub struct ToolRegistry {
    scanner: Scanner,
    inner: RwLock<Inner>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().expect("tool registry poisoned");
        let names: Vec<_> = inner
            .order
            .iter()
            .map(|descriptor| descriptor.name().to_owned())
            .collect();
        f.debug_struct("ToolRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry with a default scanner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry using the supplied scanner, letting callers
    /// customize the schema vocabulary flowing into descriptors.
    #[must_use]
    pub fn with_scanner(scanner: Scanner) -> Self {
        Self {
            scanner,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Registers a single bare callable as a tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Extract`] when no descriptor can be derived,
    /// or [`RegistryError::DuplicateTool`] when the derived name is taken.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register_callable<F, Args>(&self, callable: F) -> RegistryResult<()>
    where
        F: IntoCallable<Args>,
    {
        let descriptor = self.scanner.scan_callable(callable)?;
        self.insert(Arc::new(descriptor))
    }

    /// Registers every exposed tool of a tagged service, returning how many
    /// descriptors were added.
    ///
    /// A member whose name collides with an existing registration is skipped
    /// with a warning; the rest of the batch still registers.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register_service<S>(&self, service: &S) -> usize
    where
        S: ToolService + ?Sized,
    {
        let mut registered = 0;
        for descriptor in self.scanner.scan_service(service) {
            let name = descriptor.name().to_owned();
            match self.insert(Arc::new(descriptor)) {
                Ok(()) => registered += 1,
                Err(err) => warn!(tool = %name, %err, "skipping service tool"),
            }
        }
        registered
    }

    /// Registers an already extracted descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] when the name is taken.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn insert(&self, descriptor: Arc<ToolDescriptor>) -> RegistryResult<()> {
        let mut inner = self.inner.write().expect("tool registry poisoned");
        let name = descriptor.name().to_owned();
        if inner.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool { name });
        }

        debug!(tool = %name, "tool registered");
        let position = inner.order.len();
        inner.order.push(descriptor);
        inner.index.insert(name, position);
        Ok(())
    }

    /// Looks up a descriptor by exact name.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<ToolDescriptor>> {
        let inner = self.inner.read().expect("tool registry poisoned");
        let position = *inner.index.get(name)?;
        Some(Arc::clone(&inner.order[position]))
    }

    /// Returns every descriptor in registration order.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<ToolDescriptor>> {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner.order.clone()
    }

    /// Returns the number of registered tools.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("tool registry poisoned").order.len()
    }

    /// Returns `true` when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_scanner::{ServiceMember, ServiceMethod};

    fn echo(message: String) -> String {
        format!("Echo: {message}")
    }

    fn get_time() -> String {
        "12:00".to_owned()
    }

    #[test]
    fn register_and_find() {
        let registry = ToolRegistry::new();
        registry.register_callable(echo).unwrap();

        let descriptor = registry.find("echo").expect("registered");
        assert_eq!(descriptor.name(), "echo");
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn listing_preserves_registration_order() {
        let registry = ToolRegistry::new();
        registry.register_callable(get_time).unwrap();
        registry.register_callable(echo).unwrap();

        let names: Vec<_> = registry
            .list()
            .iter()
            .map(|descriptor| descriptor.name().to_owned())
            .collect();
        assert_eq!(names, ["get_time", "echo"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_errors() {
        let registry = ToolRegistry::new();
        registry.register_callable(echo).unwrap();

        let err = registry
            .register_callable(echo)
            .expect_err("duplicate should fail");
        assert!(matches!(err, RegistryError::DuplicateTool { name } if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    struct Clock;

    impl mcp_scanner::ToolService for Clock {
        fn members(&self) -> Vec<ServiceMember> {
            vec![
                ServiceMember::new("Now", get_time).tag("tool;name=get_current_time"),
                ServiceMember::new("Echo", echo).tag("tool"),
            ]
        }

        fn methods(&self) -> Vec<ServiceMethod> {
            vec![ServiceMethod::new("Never", || 0_i64)]
        }
    }

    #[test]
    fn service_registration_appends_all_tagged_members() {
        let registry = ToolRegistry::new();
        let registered = registry.register_service(&Clock);

        assert_eq!(registered, 2);
        assert!(registry.find("get_current_time").is_some());
        assert!(registry.find("echo").is_some());
        assert!(registry.find("never").is_none());
    }

    #[test]
    fn colliding_service_member_is_skipped() {
        let registry = ToolRegistry::new();
        registry.register_callable(echo).unwrap();

        let registered = registry.register_service(&Clock);
        assert_eq!(registered, 1);
        assert_eq!(registry.len(), 2);
    }
}
