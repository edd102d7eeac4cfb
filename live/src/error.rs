use thiserror::Error;

/// Failure modes surfaced by the liveness service.
///
/// Malformed payloads become [`LiveError::Protocol`], an unknown pid becomes
/// [`LiveError::NotFound`], and everything the host broker's transport
/// or key-value store reports verbatim becomes [`LiveError::Other`].
#[derive(Error, Debug)]
pub enum LiveError {
    /// An event or request payload could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// `cmb.exec.write` (or similar) addressed an untracked pid.
    #[error("not found")]
    NotFound,
    /// Propagated verbatim from a [`crate::Transport`] or
    /// [`crate::ConfigStore`] collaborator.
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LiveError>;
