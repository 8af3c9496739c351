use thiserror::Error;

/// Failures while wiring infrastructure at startup or from CLI commands.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{backend} store could not be prepared: {message}")]
    Store {
        backend: &'static str,
        message: String,
    },
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn store(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Store {
            backend,
            message: message.into(),
        }
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
