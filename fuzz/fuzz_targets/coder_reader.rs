//! Fuzz target feeding arbitrary properties and packed bytes to both coders.
//!
//! The first byte selects the method, the next five are used as
//! properties and the rest is the packed stream. Neither construction nor
//! reading may panic, and a successful stream must close exactly once.
//!
//! Run with: cargo +nightly fuzz run coder_reader

#![no_main]

use libfuzzer_sys::fuzz_target;
use sevenz_lzma_coders::codec::{CoderRegistry, InputStream, LzmaRust2Engine, NoClose, method};
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    let [selector, p0, p1, p2, p3, p4, rest @ ..] = data else {
        return;
    };

    // Keep dictionaries small so the fuzzer does not spend its time allocating
    let registry = CoderRegistry::with_engine(LzmaRust2Engine::new().max_dict_size(1 << 24));
    let (method_id, props): (&[u8], Vec<u8>) = if selector & 1 == 0 {
        (method::LZMA, vec![*p0, *p1, *p2, *p3, *p4])
    } else {
        (method::LZMA2, vec![*p0])
    };

    let mut inputs: Vec<Box<dyn InputStream>> =
        vec![Box::new(NoClose(Cursor::new(rest.to_vec())))];
    match registry.new_reader(method_id, &props, 1 << 16, &mut inputs) {
        Ok(mut stream) => {
            assert!(inputs.is_empty());
            let mut out = Vec::new();
            let _ = stream.by_ref().take(1 << 20).read_to_end(&mut out);
            assert!(stream.close().is_ok());
            assert!(stream.close().is_err());
        }
        // A refused stream comes back to the caller
        Err(_) => assert_eq!(inputs.len(), 1),
    }
});
