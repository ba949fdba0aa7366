/// Error handling module for the administration library.
///
/// This module defines the error types used throughout the library.
/// Transient failures (a dropped channel right after a restart was triggered, an
/// undefined attribute while a process boots) are absorbed by the lifecycle polling
/// loop; everything that escapes to the caller is one of the variants below.
///
/// # Example
///
/// ```
/// use mgmt_admin::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Operation succeeded"),
///         Err(Error::HostNotFound(host)) => println!("Host '{}' is not part of the domain", host),
///         Err(Error::Timeout(msg)) => println!("Processes never came back: {}", msg),
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use thiserror::Error;

/// Errors that can occur in the administration library.
///
/// Each variant includes context information to help diagnose and handle
/// the error appropriately.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse configuration from a file or string.
    ///
    /// This error occurs when:
    /// - The configuration file cannot be read
    /// - The configuration JSON or YAML is malformed
    /// - Field types are incorrect
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains invalid values.
    ///
    /// This error occurs when:
    /// - A timeout or poll interval is zero
    /// - The poll interval is not shorter than the lifecycle timeout
    /// - The default host is blank
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The management channel failed.
    ///
    /// This is expected right after a restart or shutdown was triggered, since the
    /// remote side tears the channel down before answering. The lifecycle code
    /// reconnects and keeps polling instead of surfacing it.
    #[error("Communication error: {0}")]
    Communication(String),

    /// The remote side answered with a `failed` outcome.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// An attribute read returned no value where one was expected.
    #[error("Undefined value: {0}")]
    UndefinedValue(String),

    /// Processes did not become responsive before the lifecycle timeout.
    ///
    /// The message names the host and server set that was being waited on.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The named host controller is not part of the current domain topology.
    #[error("Host not found: {0}")]
    HostNotFound(String),

    /// The named server is not configured under the given host.
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// Error in serializing or deserializing data.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other error not covered by the above categories.
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for administration operations.
///
/// This is a convenience type alias for `std::result::Result` with the `Error` type
/// from this module.
pub type Result<T> = std::result::Result<T, Error>;
