//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sevenz_lzma_coders::codec::{
    BufferedInput, DecodeStream, Engine, InputStream, LZMA2_MAX_DICT_CODE,
    decode_lzma2_dict_size,
};

/// Counters shared between a test and a [`MockInput`].
#[derive(Debug, Default)]
pub struct Counters {
    pub reads: AtomicUsize,
    pub closes: AtomicUsize,
    pub drops: AtomicUsize,
}

impl Counters {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    /// Never read, closed or dropped.
    pub fn untouched(&self) -> bool {
        self.reads() == 0 && self.closes() == 0 && self.drops() == 0
    }
}

/// In-memory input stream that records reads, closes and drops.
pub struct MockInput {
    data: Cursor<Vec<u8>>,
    counters: Arc<Counters>,
    fail_close: bool,
    reads_before_failure: Option<usize>,
}

impl MockInput {
    pub fn new(data: Vec<u8>) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let input = Self {
            data: Cursor::new(data),
            counters: Arc::clone(&counters),
            fail_close: false,
            reads_before_failure: None,
        };
        (input, counters)
    }

    /// Makes `close` fail after counting the call.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Makes every `read` fail with `ConnectionReset`.
    pub fn failing_reads(self) -> Self {
        self.failing_reads_after(0)
    }

    /// Lets the first `reads` calls through, then fails like [`Self::failing_reads`].
    pub fn failing_reads_after(mut self, reads: usize) -> Self {
        self.reads_before_failure = Some(reads);
        self
    }

    pub fn boxed(self) -> Vec<Box<dyn InputStream>> {
        vec![Box::new(self)]
    }
}

impl Read for MockInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let previous = self.counters.reads.fetch_add(1, Ordering::SeqCst);
        if self.reads_before_failure.is_some_and(|limit| previous >= limit) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "input went away",
            ));
        }
        self.data.read(buf)
    }
}

impl InputStream for MockInput {
    fn close(&mut self) -> io::Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            Err(io::Error::other("close refused"))
        } else {
            Ok(())
        }
    }
}

impl Drop for MockInput {
    fn drop(&mut self) {
        self.counters.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Builds `count` mock inputs and returns them with their counters.
pub fn mock_inputs(count: usize) -> (Vec<Box<dyn InputStream>>, Vec<Arc<Counters>>) {
    (0..count)
        .map(|_| {
            let (input, counters) = MockInput::new(vec![0u8; 16]);
            (Box::new(input) as Box<dyn InputStream>, counters)
        })
        .unzip()
}

/// Engine that always fails and counts how often it was asked.
#[derive(Debug, Default)]
pub struct FailingEngine {
    pub calls: AtomicUsize,
}

impl FailingEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Engine for FailingEngine {
    fn create_lzma_decoder(
        &self,
        _input: BufferedInput,
        _properties: &[u8],
        _expected_size: u64,
    ) -> io::Result<DecodeStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::InvalidData, "engine says no"))
    }

    fn create_lzma2_decoder(
        &self,
        _input: BufferedInput,
        _properties: &[u8],
    ) -> io::Result<DecodeStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::InvalidData, "engine says no"))
    }
}

/// Compresses `data` as a raw LZMA stream with an end marker.
///
/// Returns the compressed bytes and the 5-byte coder properties.
pub fn compress_lzma(data: &[u8], preset: u32) -> (Vec<u8>, Vec<u8>) {
    let options = lzma_rust2::LzmaOptions::with_preset(preset);
    let mut props = vec![options.get_props()];
    props.extend_from_slice(&options.dict_size.to_le_bytes());

    let mut compressed = Vec::new();
    let mut writer =
        lzma_rust2::LzmaWriter::new_no_header(Cursor::new(&mut compressed), &options, true)
            .unwrap();
    writer.write_all(data).unwrap();
    writer.finish().unwrap();
    (compressed, props)
}

/// Smallest LZMA2 dictionary code whose size covers `dict_size`.
pub fn lzma2_dict_code(dict_size: u32) -> u8 {
    (0..LZMA2_MAX_DICT_CODE)
        .find(|&code| decode_lzma2_dict_size(code).is_ok_and(|size| size >= dict_size))
        .unwrap_or(LZMA2_MAX_DICT_CODE)
}

/// Compresses `data` as an LZMA2 stream.
///
/// Returns the compressed bytes and the 1-byte coder property.
pub fn compress_lzma2(data: &[u8], preset: u32) -> (Vec<u8>, Vec<u8>) {
    let options = lzma_rust2::Lzma2Options::with_preset(preset);
    let props = vec![lzma2_dict_code(options.lzma_options.dict_size)];

    let mut compressed = Vec::new();
    let mut writer = lzma_rust2::Lzma2Writer::new(Cursor::new(&mut compressed), options);
    writer.write_all(data).unwrap();
    writer.finish().unwrap();
    (compressed, props)
}

/// Reads `reader` to the end using a caller buffer of `buf_size` bytes.
pub fn read_in_chunks<R: Read>(reader: &mut R, buf_size: usize) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; buf_size];
    loop {
        match reader.read(&mut buf)? {
            0 => return Ok(out),
            n => out.extend_from_slice(&buf[..n]),
        }
    }
}

/// Highly compressible text.
pub fn text(size: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .cycle()
        .take(size)
        .copied()
        .collect()
}

/// Incompressible bytes from a seeded generator.
pub fn random(size: usize, seed: u64) -> Vec<u8> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; size];
    rng.fill(&mut data[..]);
    data
}
