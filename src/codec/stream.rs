//! The stream returned by the LZMA and LZMA2 coders.

use std::io::{self, Read};

use super::engine::DecodeStream;
use super::{Decoder, SharedInput, method};
use crate::error::{Error, Filter, Result};

enum State {
    Open {
        input: SharedInput,
        decode: DecodeStream,
    },
    Closed,
}

/// Decompressed output of a coder, owning both the input and the decode stream.
///
/// The stream starts open. The first `close` closes the input stream and
/// moves the stream to its terminal closed state, even when closing the
/// input fails. Any later `read` or `close` fails with
/// [`Error::AlreadyClosed`] without touching the input again.
///
/// The stream is meant to be driven by a single consumer; `read` and
/// `close` take `&mut self`.
///
/// # Example
///
/// ```rust
/// use std::io::{Cursor, Read};
/// use sevenz_lzma_coders::codec::{InputStream, lzma2};
///
/// // An LZMA2 stream that consists of the end marker only
/// let mut inputs: Vec<Box<dyn InputStream>> = vec![Box::new(Cursor::new(vec![0x00]))];
/// let mut stream = lzma2::new_reader(&[0x10], 0, &mut inputs)?;
///
/// let mut out = Vec::new();
/// stream.read_to_end(&mut out)?;
/// assert!(out.is_empty());
///
/// stream.close()?;
/// assert!(stream.close().unwrap_err().is_already_closed());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DecompressionStream {
    filter: Filter,
    state: State,
}

impl std::fmt::Debug for DecompressionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompressionStream")
            .field("filter", &self.filter)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl DecompressionStream {
    pub(crate) fn new(filter: Filter, input: SharedInput, decode: DecodeStream) -> Self {
        Self {
            filter,
            state: State::Open { input, decode },
        }
    }

    /// Returns the filter family that produced this stream.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Returns `true` once `close` has been called.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Closes the input stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the stream was closed before, or
    /// [`Error::Close`] if the input failed to close. In both cases the
    /// stream ends up closed.
    pub fn close(&mut self) -> Result<()> {
        let State::Open { input, decode } = std::mem::replace(&mut self.state, State::Closed)
        else {
            return Err(Error::AlreadyClosed {
                filter: self.filter,
            });
        };

        // Release the engine's handle on the input before closing it
        drop(decode);

        input.close().map_err(|source| Error::Close {
            filter: self.filter,
            source,
        })?;

        log::debug!("{}: stream closed", self.filter);
        Ok(())
    }
}

impl Read for DecompressionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let filter = self.filter;
        let State::Open { decode, .. } = &mut self.state else {
            return Err(Error::AlreadyClosed { filter }.into());
        };

        decode
            .read(buf)
            .map_err(|source| io::Error::from(Error::Read { filter, source }))
    }
}

impl Decoder for DecompressionStream {
    fn method_id(&self) -> &'static [u8] {
        match self.filter {
            Filter::Lzma => method::LZMA,
            Filter::Lzma2 => method::LZMA2,
        }
    }
}
