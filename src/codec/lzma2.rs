//! LZMA2 coder.

use std::io::BufReader;

use super::{
    Coder, CoderOptions, DecompressionStream, Engine, InputStream, SharedInput,
    check_input_count, method, return_input, take_single_input,
};
use crate::error::{Error, Filter, Result};

/// Number of property bytes an LZMA2 coder takes: the dictionary-size code.
pub const LZMA2_PROPS_LEN: usize = 1;

/// Coder for chunked LZMA2 streams.
///
/// LZMA2 frames its own chunks and finds its end without help, so the
/// expected size passed to [`new_reader`](Self::new_reader) is ignored.
#[derive(Debug, Clone)]
pub struct Lzma2Coder<E> {
    engine: E,
    options: CoderOptions,
}

impl<E: Engine> Lzma2Coder<E> {
    /// Creates an LZMA2 coder backed by `engine`.
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, CoderOptions::default())
    }

    /// Creates an LZMA2 coder with custom options.
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
    /// * `properties` - LZMA2 properties (1 byte encoding dictionary size)
    /// * `_expected_size` - Unused; LZMA2 is self-terminating
    /// * `inputs` - Input streams; exactly one is required. The stream is
    ///   taken out of the vector only when a reader is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongInputCount`] or
    /// [`Error::InsufficientProperties`] before any stream is touched, and
    /// [`Error::Engine`] if the engine rejects the dictionary code. On
    /// failure the streams are left in `inputs`, unclosed, for the caller
    /// to close.
    pub fn new_reader(
        &self,
        properties: &[u8],
        _expected_size: u64,
        inputs: &mut Vec<Box<dyn InputStream>>,
    ) -> Result<DecompressionStream> {
        check_input_count(Filter::Lzma2, inputs)?;

        if properties.len() != LZMA2_PROPS_LEN {
            log::debug!(
                "lzma2: rejected {} property bytes, expected {LZMA2_PROPS_LEN}",
                properties.len()
            );
            return Err(Error::InsufficientProperties {
                filter: Filter::Lzma2,
                expected: LZMA2_PROPS_LEN,
                actual: properties.len(),
            });
        }

        let shared = SharedInput::new(take_single_input(Filter::Lzma2, inputs)?);
        let buffered = BufReader::with_capacity(self.options.buffer_size, shared.clone());

        let decode = match self.engine.create_lzma2_decoder(buffered, properties) {
            Ok(decode) => decode,
            Err(source) => {
                log::debug!("lzma2: engine rejected stream: {source}");
                return_input(Filter::Lzma2, shared, inputs);
                return Err(Error::Engine {
                    filter: Filter::Lzma2,
                    source,
                });
            }
        };

        log::debug!("lzma2: opened reader (dictionary code {})", properties[0]);
        Ok(DecompressionStream::new(Filter::Lzma2, shared, decode))
    }
}

impl<E: Engine> Coder for Lzma2Coder<E> {
    fn method_id(&self) -> &'static [u8] {
        method::LZMA2
    }

    fn new_reader(
        &self,
        properties: &[u8],
        expected_size: u64,
        inputs: &mut Vec<Box<dyn InputStream>>,
    ) -> Result<DecompressionStream> {
        Lzma2Coder::new_reader(self, properties, expected_size, inputs)
    }
}

/// Opens an LZMA2 stream using the default engine and options.
///
/// See [`Lzma2Coder::new_reader`] for the contract.
#[cfg(feature = "lzma2")]
pub fn new_reader(
    properties: &[u8],
    expected_size: u64,
    inputs: &mut Vec<Box<dyn InputStream>>,
) -> Result<DecompressionStream> {
    Lzma2Coder::new(super::LzmaRust2Engine::new()).new_reader(properties, expected_size, inputs)
}

#[cfg(all(test, feature = "lzma2"))]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{Cursor, Read, Write};

    fn one_input(data: Vec<u8>) -> Vec<Box<dyn InputStream>> {
        vec![Box::new(Cursor::new(data))]
    }

    #[test]
    fn test_two_property_bytes() {
        let err = new_reader(&[0x10, 0x00], 0, &mut one_input(vec![0x00])).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientProperties {
                filter: Filter::Lzma2,
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_missing_properties() {
        let err = new_reader(&[], 0, &mut one_input(vec![0x00])).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_input_count_checked_before_properties() {
        let err = new_reader(&[], 0, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::WrongInputCount { count: 0, .. }));
    }

    #[test]
    fn test_invalid_dictionary_code() {
        let err = new_reader(&[41], 0, &mut one_input(vec![0x00])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Engine);
        assert!(err.to_string().contains("invalid LZMA2 dictionary size property: 41"));
    }

    #[test]
    fn test_roundtrip_ignores_expected_size() {
        let data = b"Hello, World! This is a test of the LZMA2 coder.";

        let options = lzma_rust2::Lzma2Options::with_preset(0);
        let dict_code =
            crate::codec::engine::encode_lzma2_dict_size(options.lzma_options.dict_size);
        let mut compressed = Vec::new();
        let mut writer = lzma_rust2::Lzma2Writer::new(Cursor::new(&mut compressed), options);
        writer.write_all(data).unwrap();
        writer.finish().unwrap();

        // A bogus expected size must not matter
        let mut stream = new_reader(&[dict_code], 1, &mut one_input(compressed)).unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
        stream.close().unwrap();
    }
}
