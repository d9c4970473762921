use std::collections::HashSet;
use std::fmt;

use crate::error::{FacebookError, Result};

/// A permission grant an access token may carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    ReadStream,
    PublishStream,
    Other(String),
}

impl Scope {
    pub fn as_str(&self) -> &str {
        match self {
            Scope::ReadStream => "read_stream",
            Scope::PublishStream => "publish_stream",
            Scope::Other(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "read_stream" => Scope::ReadStream,
            "publish_stream" => Scope::PublishStream,
            other => Scope::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access token supplied by the embedding application.
///
/// `granted` is `None` when the caller does not know which scopes the token
/// carries; permission checks are then left to the remote service.
#[derive(Clone, Default)]
pub struct Credentials {
    access_token: Option<String>,
    granted: Option<HashSet<Scope>>,
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            granted: None,
        }
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.granted = Some(scopes.into_iter().collect());
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn granted_scopes(&self) -> Option<&HashSet<Scope>> {
        self.granted.as_ref()
    }

    /// Check the credentials against what `operation` needs, before any
    /// request is built.
    pub fn check(&self, operation: &str, access: &Access) -> Result<()> {
        match access {
            Access::Public => Ok(()),
            Access::Authenticated => self.require_token(operation),
            Access::Scoped(scope) => {
                self.require_token(operation)?;
                match &self.granted {
                    Some(granted) if !granted.contains(scope) => {
                        Err(FacebookError::InsufficientPermission {
                            scope: scope.to_string(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    fn require_token(&self, operation: &str) -> Result<()> {
        if self.is_authorized() {
            Ok(())
        } else {
            Err(FacebookError::MissingCredentials {
                operation: operation.to_string(),
            })
        }
    }
}

// Never print the token itself.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("authorized", &self.is_authorized())
            .field("granted", &self.granted)
            .finish()
    }
}

/// What an operation requires of the caller's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Scoped(Scope),
}

impl Access {
    pub fn required_scope(&self) -> Option<&Scope> {
        match self {
            Access::Scoped(scope) => Some(scope),
            _ => None,
        }
    }
}
