use thiserror::Error;

/// Failure modes for the idset engine.
///
/// These mirror the `errno` values the historical `libidset` reports
/// (`EINVAL`, `EOVERFLOW`); callers that need the old numeric codes can
/// match on the variant instead of inspecting a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdsetError {
    /// Malformed idset text, illegal flag combination, a null idset
    /// where a value was required, or an out-of-range id on a
    /// non-autogrow set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A fixed-capacity destination couldn't hold the formatted output.
    #[error("destination buffer too small")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, IdsetError>;

pub(crate) fn invalid(msg: impl Into<String>) -> IdsetError {
    IdsetError::InvalidArgument(msg.into())
}
