//! Input streams handed to coders by the extraction pipeline.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::sync::{Arc, Mutex, MutexGuard};

/// A readable, closable stream supplied to a coder.
///
/// This is the Rust counterpart of the pipeline's packed-stream readers.
/// `close` releases whatever the stream holds; a coder calls it at most
/// once, and only after taking ownership on successful construction.
/// Streams a coder refuses stay with the caller, who closes them.
pub trait InputStream: Read + Send {
    /// Closes the stream.
    fn close(&mut self) -> io::Result<()>;
}

impl InputStream for File {
    /// Files are released on drop; there is nothing to flush for reading.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: AsRef<[u8]> + Send> InputStream for Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: InputStream + ?Sized> InputStream for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts any reader into an [`InputStream`] whose `close` does nothing.
#[derive(Debug)]
pub struct NoClose<R>(pub R);

impl<R: Read> Read for NoClose<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read + Send> InputStream for NoClose<R> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The buffered reader a decoding engine receives.
pub type BufferedInput = BufReader<SharedInput>;

/// Handle to an input stream shared by the engine's reader and the close path.
///
/// The engine reads through one handle while the owning
/// [`DecompressionStream`] keeps another for `close`. Handles are never
/// shared between streams.
///
/// [`DecompressionStream`]: super::DecompressionStream
#[derive(Clone)]
pub struct SharedInput {
    inner: Arc<Mutex<Box<dyn InputStream>>>,
}

impl std::fmt::Debug for SharedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedInput").finish_non_exhaustive()
    }
}

impl SharedInput {
    pub(crate) fn new(stream: Box<dyn InputStream>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stream)),
        }
    }

    /// Recovers the stream once every other handle is gone.
    ///
    /// Returns `None` if a clone is still alive somewhere.
    pub(crate) fn into_inner(self) -> Option<Box<dyn InputStream>> {
        let mutex = Arc::try_unwrap(self.inner).ok()?;
        Some(mutex.into_inner().unwrap_or_else(|poisoned| {
            log::warn!("input stream mutex was poisoned, recovering");
            poisoned.into_inner()
        }))
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn InputStream>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("input stream mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub(crate) fn close(&self) -> io::Result<()> {
        self.lock().close()
    }
}

impl Read for SharedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.lock().read(buf)
    }
}
