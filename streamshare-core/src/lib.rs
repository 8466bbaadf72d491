//! StreamShare Core - shared state and startup plumbing
//!
//! This crate provides the pieces the HTTP layer builds on: the content
//! registry of shared files, path and MIME resolution, port allocation,
//! LAN address discovery, configuration and tracing setup.

pub mod config;
pub mod mime;
pub mod network;
pub mod port;
pub mod registry;
pub mod resolver;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ServerConfig, StreamShareConfig};
pub use port::{PortError, bind_available_port, find_available_port};
pub use registry::{ContentRegistry, FileDescriptor};
pub use resolver::{ResolveError, resolve};

/// Core errors that can bubble up from startup.
///
/// Everything here is fatal to the process; per-request failures are
/// handled inside the web crate and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum StreamShareError {
    #[error("Validation error: {reason}")]
    Validation { reason: String },

    #[error("Port error: {0}")]
    Port(#[from] PortError),

    #[error("Path error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StreamShareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_messages() {
        let validation = StreamShareError::Validation {
            reason: "no files".to_string(),
        };
        assert_eq!(validation.to_string(), "Validation error: no files");

        let port = StreamShareError::from(PortError::Exhausted {
            start: 3000,
            attempts: 100,
        });
        assert_eq!(
            port.to_string(),
            "Port error: No free port after 100 attempts starting at 3000"
        );
    }
}
