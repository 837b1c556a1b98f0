//! Error types for xmlschema-proxy
//!
//! Lookups through the schema proxy report a miss as `None`; the error types
//! here cover the operations that can genuinely fail: instance checks against
//! undeclared types, schema loading and lexical validation.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema and proxy operations
#[derive(Error, Debug)]
pub enum Error {
    /// Value does not conform to a schema type
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Schema document could not be turned into components
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Type error in schema or data
    #[error("type error: {0}")]
    Type(String),

    /// Value error (invalid value for a facet or setting)
    #[error("value error: {0}")]
    Value(String),

    /// Key error (a required schema component is not declared)
    #[error("key error: {0}")]
    Key(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Operation whose contract is not defined yet
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl Error {
    /// Check if this is a lookup failure for an undeclared component
    pub fn is_key_error(&self) -> bool {
        matches!(self, Error::Key(_))
    }
}

/// Validation error with context about the offending value
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error message
    pub message: String,
    /// Schema component that rejected the value
    pub schema_component: Option<String>,
    /// The rejected value
    pub instance: Option<String>,
    /// Detailed reason
    pub reason: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            schema_component: None,
            instance: None,
            reason: None,
        }
    }

    /// Set the schema component
    pub fn with_schema_component(mut self, component: impl Into<String>) -> Self {
        self.schema_component = Some(component.into());
        self
    }

    /// Set the rejected value
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref reason) = self.reason {
            write!(f, "\n\nReason: {}", reason)?;
        }

        if let Some(ref schema) = self.schema_component {
            write!(f, "\n\nSchema component: {}", schema)?;
        }

        if let Some(ref instance) = self.instance {
            write!(f, "\n\nInstance: {}", instance)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Schema loading error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Declaration being built when the error occurred
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
