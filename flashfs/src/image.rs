use std::fs;
use std::path::{Path, PathBuf};

use crate::Error;

/// A flashfs image on disk, read fully into memory. Gets [`ImageSrc`]
/// through its `AsRef<[u8]>` impl.
///
/// [`ImageSrc`]: flashfs_core::ImageSrc
#[derive(Debug)]
pub struct ImageFile {
    path: PathBuf,
    data: Vec<u8>,
}

impl ImageFile {
    pub fn open(path: impl AsRef<Path>) -> Result<ImageFile, Error> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path).map_err(|e| Error::Io {
            reason: "Read image".to_string(),
            file: path.clone(),
            source: e,
        })?;
        Ok(ImageFile { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<[u8]> for ImageFile {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
