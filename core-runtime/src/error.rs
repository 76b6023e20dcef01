//! Errors raised while assembling the playback core runtime.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A tunable failed validation (interval out of range, bad log filter).
    #[error("Invalid runtime configuration: {0}")]
    Config(String),

    /// A required host bridge implementation was not supplied.
    #[error("Missing host capability: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    /// Invariant violation inside the runtime itself.
    #[error("Internal runtime error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
