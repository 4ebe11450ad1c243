use thiserror::Error;

/// Failures while resolving settings or talking to the server before a run.
#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Could not connect to Postgres after {attempts} attempts: {message}")]
    Connect { attempts: u32, message: String },
    #[error("Pre-flight query failed: {message}")]
    Query { message: String },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}
