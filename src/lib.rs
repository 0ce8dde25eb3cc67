//! # sevenz-lzma-coders
//!
//! LZMA and LZMA2 coders for 7z-style extraction pipelines.
//!
//! A 7z folder is a graph of coders. This crate provides the two coders of
//! the LZMA family: each takes the properties stored in the coder record,
//! the declared unpacked size and the already-open input streams, and
//! returns a [`DecompressionStream`](codec::DecompressionStream) that the
//! pipeline reads like any other coder output and closes once when done.
//!
//! The bit-level decoding is done by an [`Engine`](codec::Engine). The
//! default engine uses the `lzma-rust2` crate; any other implementation
//! can be plugged in through [`LzmaCoder`](codec::LzmaCoder),
//! [`Lzma2Coder`](codec::Lzma2Coder) or
//! [`CoderRegistry::with_engine`](codec::CoderRegistry::with_engine).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::Read;
//! use sevenz_lzma_coders::codec::{InputStream, lzma2};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut inputs: Vec<Box<dyn InputStream>> = vec![Box::new(File::open("packed.lzma2")?)];
//!
//!     // Property byte 0x18: 16 MiB dictionary
//!     let mut stream = lzma2::new_reader(&[0x18], 0, &mut inputs)?;
//!     let mut data = Vec::new();
//!     stream.read_to_end(&mut data)?;
//!     stream.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Stream Lifecycle
//!
//! A stream is open from construction until the first `close`. After that
//! every `read` and `close` fails with
//! [`Error::AlreadyClosed`], and the input stream is never closed twice.
//! Closing happens even when the input reports an error while closing.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `lzma` | Yes | Default engine backed by `lzma-rust2`, LZMA entry points |
//! | `lzma2` | Yes | LZMA2 entry points (includes `lzma`) |
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade at
//! `debug` level on construction and close. Install any logger to see it.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Default capacity of the buffered reader in front of an input stream (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod codec;
pub mod error;

pub use error::{Error, ErrorKind, Filter, Result};

pub use codec::{
    Coder, CoderOptions, CoderRegistry, DecompressionStream, Engine, InputStream, Lzma2Coder,
    LzmaCoder,
};

#[cfg(feature = "lzma")]
pub use codec::LzmaRust2Engine;
