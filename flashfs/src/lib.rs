pub use flashfs_core as core;

mod bin;
mod builder;
mod image;

pub use bin::*;
pub use builder::*;
pub use image::*;

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{reason}: {}", .file.display())]
    Io {
        reason: String,
        file: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Core(#[from] flashfs_core::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("File name too long ({len} bytes, limit {}): {}", flashfs_core::NAME_SIZE, .name.display())]
    NameTooLong { name: PathBuf, len: usize },

    #[error("Invalid entry name: {}", .0.display())]
    InvalidName(PathBuf),
}

/// Ensure an entry name is a plain file name: non-empty, free of NULs, and
/// not a path
pub fn check_name(name: &[u8]) -> Result<&Path, Error> {
    let invalid = matches!(name, b"" | b"." | b"..")
        || name.iter().any(|&b| b == b'/' || b == 0);
    if invalid {
        return Err(Error::InvalidName(
            Path::new(OsStr::from_bytes(name)).to_path_buf(),
        ));
    }
    Ok(Path::new(OsStr::from_bytes(name)))
}
