//! LZMA coder.

use std::io::BufReader;

use super::{
    Coder, CoderOptions, DecompressionStream, Engine, InputStream, SharedInput, method,
    return_input, take_single_input,
};
use crate::error::{Error, Filter, Result};

/// Coder for raw LZMA streams stored with 5-byte properties.
///
/// The property length is not checked here; the engine decides what it
/// accepts. The expected size is forwarded verbatim, so `0` asks for an
/// empty output.
#[derive(Debug, Clone)]
pub struct LzmaCoder<E> {
    engine: E,
    options: CoderOptions,
}

impl<E: Engine> LzmaCoder<E> {
    /// Creates an LZMA coder backed by `engine`.
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, CoderOptions::default())
    }

    /// Creates an LZMA coder with custom options.
    pub fn with_options(engine: E, options: CoderOptions) -> Self {
        Self { engine, options }
    }

    /// Returns the coder options.
    pub fn options(&self) -> &CoderOptions {
        &self.options
    }

    /// Opens a decompressed stream over the single input.
    ///
    /// # Arguments
    ///
    /// * `properties` - LZMA properties (1 byte lc/lp/pb + 4 byte dict size)
    /// * `expected_size` - Declared uncompressed size
    /// * `inputs` - Input streams; exactly one is required. The stream is
    ///   taken out of the vector only when a reader is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongInputCount`] without touching any stream if
    /// `inputs` does not hold exactly one stream, and [`Error::Engine`] if
    /// the engine rejects the properties. On failure the streams are left
    /// in `inputs`, unclosed, for the caller to close. The engine may have
    /// read from the stream before rejecting it.
    pub fn new_reader(
        &self,
        properties: &[u8],
        expected_size: u64,
        inputs: &mut Vec<Box<dyn InputStream>>,
    ) -> Result<DecompressionStream> {
        let input = take_single_input(Filter::Lzma, inputs)?;

        let shared = SharedInput::new(input);
        let buffered = BufReader::with_capacity(self.options.buffer_size, shared.clone());

        let decode = match self.engine.create_lzma_decoder(buffered, properties, expected_size) {
            Ok(decode) => decode,
            Err(source) => {
                log::debug!("lzma: engine rejected stream: {source}");
                return_input(Filter::Lzma, shared, inputs);
                return Err(Error::Engine {
                    filter: Filter::Lzma,
                    source,
                });
            }
        };

        log::debug!(
            "lzma: opened reader ({} property bytes, expected size {expected_size})",
            properties.len()
        );
        Ok(DecompressionStream::new(Filter::Lzma, shared, decode))
    }
}

impl<E: Engine> Coder for LzmaCoder<E> {
    fn method_id(&self) -> &'static [u8] {
        method::LZMA
    }

    fn new_reader(
        &self,
        properties: &[u8],
        expected_size: u64,
        inputs: &mut Vec<Box<dyn InputStream>>,
    ) -> Result<DecompressionStream> {
        LzmaCoder::new_reader(self, properties, expected_size, inputs)
    }
}

/// Opens an LZMA stream using the default engine and options.
///
/// See [`LzmaCoder::new_reader`] for the contract.
#[cfg(feature = "lzma")]
pub fn new_reader(
    properties: &[u8],
    expected_size: u64,
    inputs: &mut Vec<Box<dyn InputStream>>,
) -> Result<DecompressionStream> {
    LzmaCoder::new(super::LzmaRust2Engine::new()).new_reader(properties, expected_size, inputs)
}
