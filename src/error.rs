//! Error types for the LZMA and LZMA2 coder adapters.
//!
//! This module provides the [`Error`] enum which represents every failure
//! an adapter can report, along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Construction returns `Result<DecompressionStream, Error>` directly.
//! Reading goes through [`std::io::Read`], so read failures arrive as
//! [`std::io::Error`] values carrying an [`Error`] inside. Use
//! [`Error::from_io_error`] to get it back:
//!
//! ```rust
//! use sevenz_lzma_coders::{Error, ErrorKind};
//!
//! fn is_misuse(error: &std::io::Error) -> bool {
//!     Error::from_io_error(error).is_some_and(|e| e.kind() == ErrorKind::AlreadyClosed)
//! }
//! ```

use std::fmt;
use std::io;

/// The filter family an error originated from.
///
/// Displayed as the lowercase prefix used in every error message
/// (`lzma` or `lzma2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Raw LZMA with 5-byte properties and a known output size.
    Lzma,
    /// Chunked, self-framing LZMA2 with a 1-byte property.
    Lzma2,
}

impl Filter {
    /// Returns the lowercase name of the filter.
    pub fn name(self) -> &'static str {
        match self {
            Filter::Lzma => "lzma",
            Filter::Lzma2 => "lzma2",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid construction arguments (stream count, property length).
    Argument,
    /// The decoding engine refused to build a decode stream.
    Engine,
    /// The decode stream failed while reading.
    Read,
    /// Closing the underlying input stream failed.
    Close,
    /// `read` or `close` was called after a successful `close`.
    AlreadyClosed,
    /// No coder is registered for a method ID.
    Unsupported,
}

/// The error type for coder construction, reading and closing.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Argument | [`WrongInputCount`][Self::WrongInputCount], [`InsufficientProperties`][Self::InsufficientProperties] | Malformed coder metadata |
/// | Engine | [`Engine`][Self::Engine] | Invalid properties or dictionary limits |
/// | I/O | [`Read`][Self::Read], [`Close`][Self::Close] | Corrupt data, failing input |
/// | Misuse | [`AlreadyClosed`][Self::AlreadyClosed] | Use after close |
/// | Compatibility | [`UnsupportedMethod`][Self::UnsupportedMethod] | Unknown method ID |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The coder was given a number of input streams other than one.
    ///
    /// Both filters are single-input transforms. No supplied stream is
    /// read or closed when this error is returned.
    #[error("{filter}: need exactly one reader (got {count})")]
    WrongInputCount {
        /// The filter that rejected the inputs.
        filter: Filter,
        /// The number of streams that were supplied.
        count: usize,
    },

    /// The coder properties have the wrong length.
    #[error("{filter}: not enough properties (expected {expected} byte, got {actual})")]
    InsufficientProperties {
        /// The filter that rejected the properties.
        filter: Filter,
        /// The required property length.
        expected: usize,
        /// The supplied property length.
        actual: usize,
    },

    /// The decoding engine failed to create a decode stream.
    #[error("{filter}: error creating reader: {source}")]
    Engine {
        /// The filter being constructed.
        filter: Filter,
        /// The engine's error.
        #[source]
        source: io::Error,
    },

    /// Reading from the decode stream failed.
    #[error("{filter}: error reading: {source}")]
    Read {
        /// The filter that was reading.
        filter: Filter,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Closing the input stream failed.
    ///
    /// The stream is closed regardless; a second `close` reports
    /// [`AlreadyClosed`][Self::AlreadyClosed].
    #[error("{filter}: error closing: {source}")]
    Close {
        /// The filter that was closing.
        filter: Filter,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The stream has already been closed.
    #[error("{filter}: already closed")]
    AlreadyClosed {
        /// The filter of the closed stream.
        filter: Filter,
    },

    /// No coder is registered for the method ID.
    #[error("unsupported method: {method_id:#x}")]
    UnsupportedMethod {
        /// The method ID, packed little-endian into a `u64`.
        method_id: u64,
    },
}

impl Error {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::WrongInputCount { .. } | Error::InsufficientProperties { .. } => {
                ErrorKind::Argument
            }
            Error::Engine { .. } => ErrorKind::Engine,
            Error::Read { .. } => ErrorKind::Read,
            Error::Close { .. } => ErrorKind::Close,
            Error::AlreadyClosed { .. } => ErrorKind::AlreadyClosed,
            Error::UnsupportedMethod { .. } => ErrorKind::Unsupported,
        }
    }

    /// Returns the filter family this error originated from, if any.
    pub fn filter(&self) -> Option<Filter> {
        match self {
            Error::WrongInputCount { filter, .. }
            | Error::InsufficientProperties { filter, .. }
            | Error::Engine { filter, .. }
            | Error::Read { filter, .. }
            | Error::Close { filter, .. }
            | Error::AlreadyClosed { filter } => Some(*filter),
            Error::UnsupportedMethod { .. } => None,
        }
    }

    /// Returns `true` if construction was rejected because of its arguments.
    pub fn is_argument_error(&self) -> bool {
        self.kind() == ErrorKind::Argument
    }

    /// Returns `true` if the stream was used after being closed.
    pub fn is_already_closed(&self) -> bool {
        self.kind() == ErrorKind::AlreadyClosed
    }

    /// Extracts an [`Error`] carried inside an [`io::Error`].
    ///
    /// Errors produced by [`DecompressionStream`]'s `Read` implementation
    /// always carry one.
    ///
    /// [`DecompressionStream`]: crate::codec::DecompressionStream
    pub fn from_io_error(error: &io::Error) -> Option<&Error> {
        error.get_ref().and_then(|inner| inner.downcast_ref::<Error>())
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            Error::Engine { source, .. }
            | Error::Read { source, .. }
            | Error::Close { source, .. } => source.kind(),
            Error::WrongInputCount { .. } | Error::InsufficientProperties { .. } => {
                io::ErrorKind::InvalidInput
            }
            Error::UnsupportedMethod { .. } => io::ErrorKind::Unsupported,
            Error::AlreadyClosed { .. } => io::ErrorKind::Other,
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        io::Error::new(error.io_kind(), error)
    }
}

/// A specialized `Result` type for coder operations.
pub type Result<T> = std::result::Result<T, Error>;
