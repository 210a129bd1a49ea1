use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tracing::trace;

use super::{Store, StoreError};

/// Directory-backed store, one file per object
///
/// Writes go to a temporary sibling that is synced and renamed over the
/// object, so an interrupted write leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory the objects live in
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn io_error(name: &str, source: io::Error) -> StoreError {
    StoreError::Io {
        name: name.to_owned(),
        source,
    }
}

impl Store for FileStore {
    fn read(&self, name: &str, buf: &mut [u8]) -> Result<usize, StoreError> {
        let data = match fs::read(self.path(name)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_owned()));
            }
            Err(e) => return Err(io_error(name, e)),
        };
        if data.len() > buf.len() {
            return Err(StoreError::TooLarge {
                name: name.to_owned(),
                size: data.len(),
                capacity: buf.len(),
            });
        }
        buf[..data.len()].copy_from_slice(&data);
        trace!(name, len = data.len(), "Read object");
        Ok(data.len())
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let target = self.path(name);
        let tmp = self.path(&format!(".{name}.tmp"));

        let mut file = fs::File::create(&tmp).map_err(|e| io_error(name, e))?;
        file.write_all(data).map_err(|e| io_error(name, e))?;
        file.sync_all().map_err(|e| io_error(name, e))?;
        fs::rename(&tmp, &target).map_err(|e| io_error(name, e))?;

        trace!(name, len = data.len(), "Wrote object");
        Ok(())
    }
}
