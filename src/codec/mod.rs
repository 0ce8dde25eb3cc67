//! Coder infrastructure for the LZMA family.
//!
//! This module provides the coder abstraction used by the extraction
//! pipeline, the LZMA and LZMA2 coders, the decoding engine interface and
//! a registry that maps 7z method IDs to coders.

pub mod engine;
mod input;
pub mod lzma;
pub mod lzma2;
mod options;
mod registry;
mod stream;

use std::io::Read;

use crate::error::{Error, Filter, Result};

pub use engine::{
    DecodeStream, Engine, LZMA_PROPS_LEN, LZMA2_MAX_DICT_CODE, UNKNOWN_SIZE,
    decode_lzma2_dict_size, parse_lzma_properties,
};
#[cfg(feature = "lzma")]
pub use engine::LzmaRust2Engine;
pub use input::{BufferedInput, InputStream, NoClose, SharedInput};
pub use lzma::LzmaCoder;
pub use lzma2::{LZMA2_PROPS_LEN, Lzma2Coder};
pub use options::CoderOptions;
pub use registry::CoderRegistry;
pub use stream::DecompressionStream;

/// A decoder that reads compressed data and produces uncompressed output.
pub trait Decoder: Read + Send {
    /// Returns the method ID for this decoder.
    fn method_id(&self) -> &'static [u8];
}

/// A single-input decompression stage of a folder.
///
/// The pipeline passes properties exactly as stored in the coder record,
/// the declared unpacked size and the already-open input streams. On
/// success the coder takes the only stream out of `inputs`; on failure
/// every stream is left in `inputs`, unclosed.
pub trait Coder: Send + Sync {
    /// Returns the method ID this coder handles.
    fn method_id(&self) -> &'static [u8];

    /// Opens a decompressed stream.
    fn new_reader(
        &self,
        properties: &[u8],
        expected_size: u64,
        inputs: &mut Vec<Box<dyn InputStream>>,
    ) -> Result<DecompressionStream>;
}

/// Method IDs for the supported coders.
pub mod method {
    /// LZMA compression.
    pub const LZMA: &[u8] = &[0x03, 0x01, 0x01];
    /// LZMA2 compression.
    pub const LZMA2: &[u8] = &[0x21];

    /// Returns a human-readable name for a method ID.
    pub fn name(id: &[u8]) -> &'static str {
        match id {
            LZMA => "LZMA",
            LZMA2 => "LZMA2",
            _ => "Unknown",
        }
    }

    /// Packs a method ID into a `u64`, first byte lowest.
    pub fn to_u64(id: &[u8]) -> u64 {
        id.iter()
            .take(8)
            .enumerate()
            .fold(0u64, |acc, (i, &byte)| acc | (u64::from(byte) << (8 * i)))
    }
}

/// Fails unless `inputs` holds exactly one stream. Nothing is read or closed.
fn check_input_count(filter: Filter, inputs: &[Box<dyn InputStream>]) -> Result<()> {
    if inputs.len() == 1 {
        return Ok(());
    }
    log::debug!("{filter}: rejected {} input streams", inputs.len());
    Err(Error::WrongInputCount {
        filter,
        count: inputs.len(),
    })
}

/// Takes the only stream out of `inputs`.
fn take_single_input(
    filter: Filter,
    inputs: &mut Vec<Box<dyn InputStream>>,
) -> Result<Box<dyn InputStream>> {
    check_input_count(filter, inputs)?;
    inputs
        .pop()
        .ok_or(Error::WrongInputCount { filter, count: 0 })
}

/// Puts a stream the engine refused back into the caller's `inputs`.
fn return_input(filter: Filter, shared: SharedInput, inputs: &mut Vec<Box<dyn InputStream>>) {
    match shared.into_inner() {
        Some(input) => inputs.push(input),
        None => log::warn!("{filter}: engine kept a handle to the input stream"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn inputs(n: usize) -> Vec<Box<dyn InputStream>> {
        (0..n)
            .map(|_| Box::new(Cursor::new(Vec::<u8>::new())) as Box<dyn InputStream>)
            .collect()
    }

    #[test]
    fn test_take_single_input() {
        let mut streams = inputs(1);
        assert!(take_single_input(Filter::Lzma, &mut streams).is_ok());
        assert!(streams.is_empty());
    }

    #[test]
    fn test_wrong_count_keeps_streams() {
        for n in [0, 2, 3] {
            let mut streams = inputs(n);
            let Err(err) = take_single_input(Filter::Lzma2, &mut streams) else {
                panic!("{n} inputs were accepted");
            };
            assert!(matches!(
                err,
                Error::WrongInputCount { filter: Filter::Lzma2, count } if count == n
            ));
            assert_eq!(streams.len(), n);
        }
    }

    #[test]
    fn test_return_input() {
        let mut streams = inputs(1);
        let shared = SharedInput::new(take_single_input(Filter::Lzma, &mut streams).unwrap());
        return_input(Filter::Lzma, shared, &mut streams);
        assert_eq!(streams.len(), 1);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(method::name(method::LZMA), "LZMA");
        assert_eq!(method::name(method::LZMA2), "LZMA2");
        assert_eq!(method::name(&[0x04, 0x01, 0x08]), "Unknown");
    }

    #[test]
    fn test_method_to_u64() {
        assert_eq!(method::to_u64(method::LZMA), 0x010103);
        assert_eq!(method::to_u64(method::LZMA2), 0x21);
        assert_eq!(method::to_u64(&[]), 0);
    }
}
