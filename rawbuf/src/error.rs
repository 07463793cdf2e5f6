//! Errors reported by buffer operations.

use std::io;

use thiserror::Error;

/// Result type for buffer operations
pub type Result<T> = std::result::Result<T, BufferError>;

/// Errors that can occur while moving a cursor or touching buffer memory.
///
/// Every check runs before the operation has any side effect: when one of
/// these is returned, position, limit, mark and the backing bytes are exactly
/// as they were before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// An index or offset lies outside the addressable range
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Length of the addressable range
        len: usize,
    },

    /// A relative get needs more elements than remain before the limit
    #[error("buffer underflow: needed {needed}, remaining {remaining}")]
    Underflow {
        /// Elements the operation needed
        needed: usize,
        /// Elements left before the limit
        remaining: usize,
    },

    /// A relative put needs more room than remains before the limit
    #[error("buffer overflow: needed {needed}, remaining {remaining}")]
    Overflow {
        /// Elements the operation needed
        needed: usize,
        /// Elements left before the limit
        remaining: usize,
    },

    /// `reset` was called without a mark
    #[error("no mark is set")]
    InvalidMark,

    /// Mutation attempted on a read-only buffer
    #[error("buffer is read-only")]
    ReadOnly,

    /// The allocator could not provide the requested block
    #[error("not enough memory to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// The operation is not supported by this buffer kind
    #[error("{0} is not implemented for this buffer")]
    NotImplemented(&'static str),

    /// A cursor or layout parameter is out of its allowed range
    #[error("{name} {value} exceeds {bound}")]
    IllegalArgument {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: usize,
        /// Largest accepted value
        bound: usize,
    },
}

impl BufferError {
    pub(crate) const fn illegal(name: &'static str, value: usize, bound: usize) -> Self {
        Self::IllegalArgument { name, value, bound }
    }
}

impl From<BufferError> for io::Error {
    fn from(err: BufferError) -> Self {
        let kind = match err {
            BufferError::ReadOnly => io::ErrorKind::PermissionDenied,
            BufferError::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            BufferError::NotImplemented(_) => io::ErrorKind::Unsupported,
            BufferError::Underflow { .. } => io::ErrorKind::UnexpectedEof,
            BufferError::Overflow { .. } => io::ErrorKind::WriteZero,
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
