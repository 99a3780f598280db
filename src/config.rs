//! Backend connection configuration and tenant namespacing.
//!
//! All three knobs arrive from the embedding environment at process start:
//! the backend connection descriptor, the application identifier used to
//! namespace the task collection, and an optional pre-issued session token
//! for non-anonymous bootstrap. A missing connection descriptor disables the
//! board feature; it is reported through the sync controller's status
//! message, never as a panic.

use crate::board::domain::CollectionPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Configuration errors surfaced at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No backend connection descriptor was supplied.
    #[error("backend connection not configured")]
    MissingConnection,

    /// The application identifier is empty or contains a path separator.
    #[error("invalid application id: {0:?}")]
    InvalidAppId(String),
}

/// Endpoint and project credentials of the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    endpoint: String,
    project: String,
}

impl ConnectionDescriptor {
    /// Creates a descriptor from endpoint and project credentials.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            project: project.into(),
        }
    }

    /// Returns the backend endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }
}

/// Validated application/tenant identifier.
///
/// Namespaces the task collection; must be non-empty and free of `/` so the
/// derived collection path stays well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    /// Creates a validated application identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAppId`] when the value is empty after
    /// trimming or contains a path separator.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(ConfigError::InvalidAppId(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(value: AppId) -> Self {
        value.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Startup configuration for the board feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    connection: Option<ConnectionDescriptor>,
    app_id: AppId,
    session_token: Option<String>,
}

impl BoardConfig {
    /// Creates a configuration with no connection descriptor or token.
    #[must_use]
    pub const fn new(app_id: AppId) -> Self {
        Self {
            connection: None,
            app_id,
            session_token: None,
        }
    }

    /// Sets the backend connection descriptor.
    #[must_use]
    pub fn with_connection(mut self, connection: ConnectionDescriptor) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Sets the pre-issued session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Returns the connection descriptor, or the fatal-to-feature error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConnection`] when no descriptor was
    /// supplied.
    pub fn connection(&self) -> Result<&ConnectionDescriptor, ConfigError> {
        self.connection
            .as_ref()
            .ok_or(ConfigError::MissingConnection)
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// Returns the pre-issued session token, if one was supplied.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Returns the namespaced task collection path.
    #[must_use]
    pub fn collection_path(&self) -> CollectionPath {
        CollectionPath::new(format!(
            "artifacts/{}/public/data/study_tasks",
            self.app_id
        ))
    }
}
