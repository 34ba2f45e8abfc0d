//! Declaratively tagged services.

use crate::callable::{Callable, IntoCallable};

/// A callable member of a service, optionally annotated with a tool tag.
///
/// This is the declarative surface: a service lists its members once, and
/// the scanner reads each member's tag to decide whether (and how) it is
/// exposed as a tool.
#[derive(Debug)]
pub struct ServiceMember {
    ident: String,
    tag: Option<String>,
    callable: Callable,
}

impl ServiceMember {
    /// Creates a member from its declared identifier and callable.
    #[must_use]
    pub fn new<F, Args>(ident: impl Into<String>, callable: F) -> Self
    where
        F: IntoCallable<Args>,
    {
        Self {
            ident: ident.into(),
            tag: None,
            callable: callable.into_callable(),
        }
    }

    /// Attaches the tool tag string.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns the member identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Returns the raw tag string, if any.
    #[must_use]
    pub fn raw_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub(crate) fn into_parts(self) -> (String, Option<String>, Callable) {
        (self.ident, self.tag, self.callable)
    }
}

/// A plain method of a service, used by the backward-compatible fallback
/// when no member carries a tool tag.
///
/// Method entries are bound closures: the receiver is captured when the
/// entry is built, so no receiver-detection heuristic exists anywhere in the
/// extraction path.
#[derive(Debug)]
pub struct ServiceMethod {
    ident: String,
    callable: Callable,
}

impl ServiceMethod {
    /// Creates a method entry from its declared identifier and bound callable.
    #[must_use]
    pub fn new<F, Args>(ident: impl Into<String>, callable: F) -> Self
    where
        F: IntoCallable<Args>,
    {
        Self {
            ident: ident.into(),
            callable: callable.into_callable(),
        }
    }

    /// Returns the method identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub(crate) fn into_parts(self) -> (String, Callable) {
        (self.ident, self.callable)
    }
}

/// A composite value whose members can be exposed as tools.
///
/// `members()` yields the tagged callable members; `methods()` yields the
/// plain method set the scanner falls back to when no member is tagged.
/// Either may be empty.
pub trait ToolService {
    /// Returns the tagged callable members.
    fn members(&self) -> Vec<ServiceMember> {
        Vec::new()
    }

    /// Returns the plain methods used by the fallback scan.
    fn methods(&self) -> Vec<ServiceMethod> {
        Vec::new()
    }
}
