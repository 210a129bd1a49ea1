//! Persistent store seam.
//!
//! The processor keeps three named blobs: the device master secret, the
//! attestation certificate and the signature counter. Storage is synchronous
//! and exclusively owned during a command.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The object was never written
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The object is larger than the buffer it is read into
    #[error("Object {name} does not fit: {size} bytes, buffer holds {capacity}")]
    TooLarge {
        /// Logical object name
        name: String,
        /// Stored size
        size: usize,
        /// Buffer size
        capacity: usize,
    },

    /// Underlying I/O failure
    #[error("Store I/O error on {name}: {source}")]
    Io {
        /// Logical object name
        name: String,
        /// Cause
        #[source]
        source: std::io::Error,
    },
}

/// Byte store addressed by logical object name
pub trait Store {
    /// Read an object into `buf`, returning the number of bytes read.
    ///
    /// `buf.len()` is the largest size the caller accepts.
    fn read(&self, name: &str, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Replace an object with `data` as a whole
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn read(&self, name: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        (**self).read(name, buf)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        (**self).write(name, data)
    }
}

/// Read an object whose layout has a fixed size
pub(crate) fn read_exact<S: Store + ?Sized, const N: usize>(
    store: &S,
    name: &'static str,
) -> crate::Result<[u8; N]> {
    let mut buf = [0u8; N];
    let read = store.read(name, &mut buf)?;
    if read != N {
        return Err(crate::Error::CorruptObject {
            name,
            expected: N,
            actual: read,
        });
    }
    Ok(buf)
}
