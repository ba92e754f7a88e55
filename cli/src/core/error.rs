//! # Folio Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the application-level error types used throughout Folio.
//! The chat assistant itself has exactly one recoverable failure kind (a field
//! that fails validation during scheduling, see `assistant::scheduling::FieldError`);
//! everything here concerns the hosts around it: configuration, knowledge files
//! and the HTTP server.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `FolioError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if kb.name.trim().is_empty() {
//!     return Err(FolioError::Knowledge("name must not be empty".into()))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the Folio application.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = FolioError::Config("Missing setting 'booking.url'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'booking.url'"
        );

        let knowledge_err = FolioError::Knowledge("no projects listed".into());
        assert_eq!(
            knowledge_err.to_string(),
            "Knowledge base error: no projects listed"
        );

        let args_err = FolioError::ArgumentParsing("question is empty".into());
        assert_eq!(
            args_err.to_string(),
            "Argument parsing error: question is empty"
        );
    }
}
