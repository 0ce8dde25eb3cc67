//! Decoding engine interface and the default `lzma-rust2` implementation.
//!
//! Coders never decode bits themselves. They hand a buffered input to an
//! [`Engine`], which returns a stream of decompressed bytes. Any
//! implementation can be plugged in: an in-process library, a linked
//! codec or a helper process.

use std::io::{self, Read};

use super::BufferedInput;

/// A stream of decompressed bytes produced by an [`Engine`].
pub type DecodeStream = Box<dyn Read + Send>;

/// Builds decode streams for the LZMA family.
///
/// Errors are opaque to the coders; they are wrapped with the filter name
/// and passed to the caller unchanged. On error an engine must not keep
/// `input`, so the coder can hand the stream back to the caller.
pub trait Engine: Send + Sync {
    /// Creates a raw LZMA decode stream.
    ///
    /// # Arguments
    ///
    /// * `input` - Buffered compressed data
    /// * `properties` - Coder properties exactly as stored in the archive
    /// * `expected_size` - Declared uncompressed size
    fn create_lzma_decoder(
        &self,
        input: BufferedInput,
        properties: &[u8],
        expected_size: u64,
    ) -> io::Result<DecodeStream>;

    /// Creates an LZMA2 decode stream.
    ///
    /// # Arguments
    ///
    /// * `input` - Buffered compressed data
    /// * `properties` - Coder properties exactly as stored in the archive
    fn create_lzma2_decoder(
        &self,
        input: BufferedInput,
        properties: &[u8],
    ) -> io::Result<DecodeStream>;
}

impl<E: Engine + ?Sized> Engine for std::sync::Arc<E> {
    fn create_lzma_decoder(
        &self,
        input: BufferedInput,
        properties: &[u8],
        expected_size: u64,
    ) -> io::Result<DecodeStream> {
        (**self).create_lzma_decoder(input, properties, expected_size)
    }

    fn create_lzma2_decoder(
        &self,
        input: BufferedInput,
        properties: &[u8],
    ) -> io::Result<DecodeStream> {
        (**self).create_lzma2_decoder(input, properties)
    }
}

/// Size value telling [`LzmaRust2Engine`] the output length is unknown.
///
/// The stream must then carry an end marker. Any other value, including
/// zero, is taken as the exact number of bytes to produce.
pub const UNKNOWN_SIZE: u64 = u64::MAX;

/// Length of raw LZMA properties: one lc/lp/pb byte and a 32-bit dictionary size.
pub const LZMA_PROPS_LEN: usize = 5;

/// Largest valid LZMA2 dictionary-size code.
pub const LZMA2_MAX_DICT_CODE: u8 = 40;

/// The default engine, backed by the `lzma-rust2` crate.
///
/// # Example
///
/// ```rust
/// use sevenz_lzma_coders::codec::LzmaRust2Engine;
///
/// // Refuse streams that declare a dictionary above 64 MiB
/// let engine = LzmaRust2Engine::new().max_dict_size(64 * 1024 * 1024);
/// assert_eq!(engine.dict_size_limit(), Some(64 * 1024 * 1024));
/// ```
#[cfg(feature = "lzma")]
#[derive(Debug, Clone, Default)]
pub struct LzmaRust2Engine {
    max_dict_size: Option<u32>,
}

#[cfg(feature = "lzma")]
impl LzmaRust2Engine {
    /// Creates an engine without a dictionary limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects streams whose dictionary is larger than `limit` bytes.
    pub fn max_dict_size(mut self, limit: u32) -> Self {
        self.max_dict_size = Some(limit);
        self
    }

    /// Returns the configured dictionary limit.
    pub fn dict_size_limit(&self) -> Option<u32> {
        self.max_dict_size
    }

    fn check_dict_size(&self, dict_size: u32) -> io::Result<()> {
        match self.max_dict_size {
            Some(limit) if dict_size > limit => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("dictionary size {dict_size} exceeds limit {limit}"),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(feature = "lzma")]
impl Engine for LzmaRust2Engine {
    fn create_lzma_decoder(
        &self,
        input: BufferedInput,
        properties: &[u8],
        expected_size: u64,
    ) -> io::Result<DecodeStream> {
        let (props_byte, dict_size) = parse_lzma_properties(properties)?;
        self.check_dict_size(dict_size)?;

        let reader =
            lzma_rust2::LzmaReader::new_with_props(input, expected_size, props_byte, dict_size, None)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        Ok(Box::new(reader))
    }

    fn create_lzma2_decoder(
        &self,
        input: BufferedInput,
        properties: &[u8],
    ) -> io::Result<DecodeStream> {
        let code = properties.first().copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "LZMA2 properties missing")
        })?;
        let dict_size = decode_lzma2_dict_size(code)?;
        self.check_dict_size(dict_size)?;

        Ok(Box::new(lzma_rust2::Lzma2Reader::new(input, dict_size, None)))
    }
}

/// Splits raw LZMA properties into the lc/lp/pb byte and the dictionary size.
pub fn parse_lzma_properties(properties: &[u8]) -> io::Result<(u8, u32)> {
    match properties {
        [props_byte, d0, d1, d2, d3, ..] => {
            Ok((*props_byte, u32::from_le_bytes([*d0, *d1, *d2, *d3])))
        }
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "LZMA properties too short (need {LZMA_PROPS_LEN} bytes, got {})",
                properties.len()
            ),
        )),
    }
}

/// Decodes the LZMA2 dictionary size from the property byte.
///
/// The encoding is:
/// - 0-39: `2^(code/2 + 12)` for even codes, `3 * 2^(code/2 + 11)` for odd ones
/// - 40: 4 GiB - 1
pub fn decode_lzma2_dict_size(code: u8) -> io::Result<u32> {
    if code > LZMA2_MAX_DICT_CODE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid LZMA2 dictionary size property: {code}"),
        ));
    }

    if code == LZMA2_MAX_DICT_CODE {
        return Ok(u32::MAX);
    }

    let base_log = u32::from(code) / 2 + 12;
    let dict_size = if code % 2 == 0 {
        1u32 << base_log
    } else {
        3u32 << (base_log - 1)
    };

    Ok(dict_size)
}

/// Encodes a dictionary size into the LZMA2 property byte.
///
/// Rounds up to the nearest size the code can express.
#[cfg(test)]
pub(crate) fn encode_lzma2_dict_size(dict_size: u32) -> u8 {
    (0..LZMA2_MAX_DICT_CODE)
        .find(|&code| decode_lzma2_dict_size(code).is_ok_and(|size| size >= dict_size))
        .unwrap_or(LZMA2_MAX_DICT_CODE)
}
