use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Misconfiguration with no safe fallback, e.g. a malformed budget id or
    /// an unsupported billing currency. Always fatal for the current run.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Usage samples that can never be valid (negative or non-finite).
    #[error("Usage data error: {metric} - {message}")]
    UsageData { metric: String, message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn usage_data(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UsageData {
            metric: metric.into(),
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
