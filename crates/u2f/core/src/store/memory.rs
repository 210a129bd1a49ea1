use std::collections::HashMap;

use super::{Store, StoreError};

/// In-memory store, lost on drop
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of a stored object
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.objects.get(name).map(Vec::as_slice)
    }

    /// Remove an object, returning whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        self.objects.remove(name).is_some()
    }
}

impl Store for MemoryStore {
    fn read(&self, name: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        let data = self
            .objects
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))?;
        if data.len() > buf.len() {
            return Err(StoreError::TooLarge {
                name: name.to_owned(),
                size: data.len(),
                capacity: buf.len(),
            });
        }
        buf[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        self.objects.insert(name.to_owned(), data.to_vec());
        Ok(())
    }
}
