//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type SkillifyResult<T> = Result<T, SkillifyError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the Skillify system
#[derive(Error, Debug)]
pub enum SkillifyError {
    /// Non-success response or network failure talking to the hosting API
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// Failure retrieving or decoding a single repository's language breakdown
    #[error("Aggregation error for '{repository}': {message}")]
    Aggregation {
        repository: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// Target document is absent or unusable
    #[error("Document error ({path}): {message}")]
    DocumentState {
        path: String,
        message: String,
        context: ErrorContext,
    },

    #[error("No repositories found for account '{account}'")]
    EmptyResult {
        account: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),
}

impl SkillifyError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            SkillifyError::Transport { context, .. } => Some(context),
            SkillifyError::Aggregation { context, .. } => Some(context),
            SkillifyError::DocumentState { context, .. } => Some(context),
            SkillifyError::EmptyResult { context, .. } => Some(context),
            SkillifyError::Config { context, .. } => Some(context),
            SkillifyError::Validation { context, .. } => Some(context),
            SkillifyError::Io(_) | SkillifyError::Serialization(_) => None,
        }
    }

    /// HTTP status attached to a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SkillifyError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if error is recoverable
    ///
    /// Transport errors without a status (connection reset, timeout) and
    /// server-side or rate-limit statuses are worth another attempt.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SkillifyError::Transport { status: None, .. } => true,
            SkillifyError::Transport {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            SkillifyError::Aggregation { .. } => true,
            _ => false,
        }
    }

    /// This error and every source below it on one line, joined by `": "`
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            SkillifyError::Config { .. } | SkillifyError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self.chain_message(),
                    "Configuration or validation error"
                );
            }
            SkillifyError::Aggregation { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self.chain_message(),
                    "Repository skipped"
                );
            }
            SkillifyError::Transport { .. } if self.is_recoverable() => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self.chain_message(),
                    "Transport error (may be recoverable)"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self.chain_message(),
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! transport_error {
    ($msg:expr, $component:expr) => {
        $crate::SkillifyError::Transport {
            message: $msg.to_string(),
            status: None,
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::SkillifyError::Transport {
            message: $msg.to_string(),
            status: None,
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::SkillifyError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'skillify config --init' to create default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::SkillifyError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}
