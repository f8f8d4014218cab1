use std::io;

/// Failure of a substitution run. Input content never fails; only the
/// source or the sink can.
#[derive(Debug, thiserror::Error)]
pub enum InterpolateError {
    #[error("failed to read input")]
    Read(#[source] io::Error),

    #[error("failed to write output")]
    Write(#[source] io::Error),
}

impl InterpolateError {
    /// The underlying I/O error, whichever side it came from.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Read(e) | Self::Write(e) => e,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown undefined-variable policy `{0}` (expected `remove` or `preserve`)")]
pub struct ParsePolicyError(pub String);
