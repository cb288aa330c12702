//! Error types for part framing.

use crate::kind::PartKind;

/// Alias for `Result<T, hdb_proto::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while framing or serializing a part.
///
/// Any variant leaves the stream at an unknown offset; the connection
/// should be torn down.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The part could not size or encode its payload.
    #[error("{kind}: cannot encode payload: {reason}")]
    Encoding {
        /// Kind of the offending part.
        kind: PartKind,
        /// What went wrong.
        reason: String,
    },

    /// The argument count exceeds `bigArgumentCount`'s range.
    #[error("{kind}: {count} arguments exceed the maximum of {max}", max = i32::MAX)]
    TooManyArguments {
        /// Kind of the offending part.
        kind: PartKind,
        /// Requested argument count.
        count: usize,
    },

    /// The payload is larger than `bufferLength` can express.
    #[error("{kind}: payload of {size} bytes exceeds the maximum of {max}", max = i32::MAX)]
    PartTooLarge {
        /// Kind of the offending part.
        kind: PartKind,
        /// Computed payload size.
        size: usize,
    },

    /// An I/O error from the underlying stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::Encoding`].
    pub fn encoding(kind: PartKind, reason: impl Into<String>) -> Self {
        Self::Encoding {
            kind,
            reason: reason.into(),
        }
    }
}
