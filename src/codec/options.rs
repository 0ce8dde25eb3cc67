//! Configuration shared by the LZMA and LZMA2 coders.

use crate::READ_BUFFER_SIZE;

/// Options controlling how a coder sets up its input.
///
/// # Example
///
/// ```rust
/// use sevenz_lzma_coders::codec::CoderOptions;
///
/// let options = CoderOptions::new().buffer_size(64 * 1024);
/// assert_eq!(options.buffer_size, 64 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoderOptions {
    /// Capacity of the buffered reader placed in front of the input stream.
    ///
    /// Default: 8 KiB.
    pub buffer_size: usize,
}

impl Default for CoderOptions {
    fn default() -> Self {
        Self {
            buffer_size: READ_BUFFER_SIZE,
        }
    }
}

impl CoderOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input buffer capacity (at least 1 byte).
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}
