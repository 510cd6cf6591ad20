//! Error types for the dashboard

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or serving the dashboard
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The family history could not be turned into a pedigree
    #[error("Pedigree construction failed: {0}")]
    Pedigree(String),

    /// Failed to render a view
    #[error("Rendering failed: {0}")]
    Render(String),

    /// HTTP server error
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_stage() {
        assert_eq!(Error::Config("workers must be at least 1".into()).to_string(), "Invalid configuration: workers must be at least 1");
        assert_eq!(Error::Pedigree("cycle".into()).to_string(), "Pedigree construction failed: cycle");
        assert_eq!(Error::Server("bind".into()).to_string(), "Server error: bind");
        assert!(matches!(Error::from(std::fmt::Error), Error::Render(_)));
    }
}
