//! Lookup of coders by 7z method ID.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Coder, DecompressionStream, Engine, InputStream, Lzma2Coder, LzmaCoder, method};
use crate::error::{Error, Result};

/// Maps method IDs from coder records to the coders that decode them.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use sevenz_lzma_coders::codec::{CoderRegistry, InputStream, method};
///
/// let registry = CoderRegistry::with_defaults();
/// assert!(registry.contains(method::LZMA2));
///
/// let mut inputs: Vec<Box<dyn InputStream>> = vec![Box::new(Cursor::new(vec![0x00]))];
/// let mut stream = registry.new_reader(method::LZMA2, &[0x10], 0, &mut inputs)?;
/// stream.close()?;
/// # Ok::<(), sevenz_lzma_coders::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct CoderRegistry {
    coders: HashMap<&'static [u8], Arc<dyn Coder>>,
}

impl std::fmt::Debug for CoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.coders.keys().map(|id| method::name(id)).collect();
        names.sort_unstable();
        f.debug_struct("CoderRegistry")
            .field("methods", &names)
            .finish()
    }
}

impl CoderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with LZMA and LZMA2 backed by the default engine.
    #[cfg(feature = "lzma")]
    pub fn with_defaults() -> Self {
        Self::with_engine(super::LzmaRust2Engine::new())
    }

    /// Creates a registry with LZMA and LZMA2 sharing one engine.
    pub fn with_engine<E: Engine + 'static>(engine: E) -> Self {
        let engine = Arc::new(engine);
        let mut registry = Self::new();
        registry.register(Arc::new(LzmaCoder::new(Arc::clone(&engine))));
        registry.register(Arc::new(Lzma2Coder::new(engine)));
        registry
    }

    /// Registers a coder under its method ID, returning the one it replaces.
    pub fn register(&mut self, coder: Arc<dyn Coder>) -> Option<Arc<dyn Coder>> {
        self.coders.insert(coder.method_id(), coder)
    }

    /// Returns the coder for a method ID.
    pub fn get(&self, method_id: &[u8]) -> Option<&Arc<dyn Coder>> {
        self.coders.get(method_id)
    }

    /// Returns `true` if a coder is registered for the method ID.
    pub fn contains(&self, method_id: &[u8]) -> bool {
        self.coders.contains_key(method_id)
    }

    /// Opens a decompressed stream with the coder registered for `method_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMethod`] if no coder is registered, or
    /// whatever the coder's `new_reader` returns. Either way `inputs` keeps
    /// its streams.
    pub fn new_reader(
        &self,
        method_id: &[u8],
        properties: &[u8],
        expected_size: u64,
        inputs: &mut Vec<Box<dyn InputStream>>,
    ) -> Result<DecompressionStream> {
        let coder = self.get(method_id).ok_or_else(|| Error::UnsupportedMethod {
            method_id: method::to_u64(method_id),
        })?;
        coder.new_reader(properties, expected_size, inputs)
    }
}
