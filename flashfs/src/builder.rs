use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::core::{
    header_checksum, negating_sum, Entry, Error as CoreError, Header, ENTRY_SIZE, HEADER_SIZE,
    MAGIC, NAME_SIZE,
};
use crate::{check_name, Error};

struct BuilderEntry {
    /// Name packed into the fixed-size field, zero-padded
    name: [u8; NAME_SIZE],
    /// Unpadded file size
    size: u32,
    /// Negating sum of the padded contents
    checksum: u32,
    /// Contents zero-padded to a 4-byte boundary
    contents: Vec<u8>,
}

impl BuilderEntry {
    // Validate inputs up front so that no output is written for a bad entry
    fn new(name: &OsStr, mut contents: Vec<u8>) -> Result<BuilderEntry, Error> {
        let name_bytes = name.as_bytes();
        check_name(name_bytes)?;
        if name_bytes.len() > NAME_SIZE {
            return Err(Error::NameTooLong {
                name: PathBuf::from(name),
                len: name_bytes.len(),
            });
        }
        let mut packed = [0; NAME_SIZE];
        packed[..name_bytes.len()].copy_from_slice(name_bytes);

        let size = u32::try_from(contents.len()).map_err(CoreError::TryFromInt)?;

        // Pad up to a 4-byte boundary with zeros
        while contents.len() % 4 != 0 {
            contents.push(0);
        }

        let checksum = negating_sum(&contents)?;

        Ok(BuilderEntry {
            name: packed,
            size,
            checksum,
            contents,
        })
    }
}

impl fmt::Debug for BuilderEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BuilderEntry")
            .field("name", &String::from_utf8_lossy(&self.name))
            .field("size", &self.size)
            .field("checksum", &self.checksum)
            .finish()
    }
}

/// Builder pattern for constructing flashfs images. Holds a list of entries
/// and consumes itself to write an image.
///
/// # Example
/// ```
/// use std::io::Cursor;
///
/// use flashfs::ImageBuilder;
///
/// let mut dest = Cursor::new(Vec::new());
///
/// let mut builder = ImageBuilder::new();
/// builder.data(&b"hello"[..], "a.txt").unwrap();
/// builder.write_image(&mut dest).unwrap();
/// ```
pub struct ImageBuilder {
    entries: Vec<BuilderEntry>,
}

impl ImageBuilder {
    pub fn new() -> ImageBuilder {
        ImageBuilder {
            entries: Vec::new(),
        }
    }

    /// Add a regular file to this builder, stored under `name`.
    pub fn file(
        &mut self,
        source: impl AsRef<Path>,
        name: impl AsRef<OsStr>,
    ) -> Result<&mut ImageBuilder, Error> {
        let source = source.as_ref();

        let metadata = fs::metadata(source).map_err(|e| Error::Io {
            reason: "Stat source file".to_string(),
            file: source.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_file() {
            return Err(Error::NotAFile(source.to_path_buf()));
        }

        let contents = fs::read(source).map_err(|e| Error::Io {
            reason: "Read source file".to_string(),
            file: source.to_path_buf(),
            source: e,
        })?;

        self.entries.push(BuilderEntry::new(name.as_ref(), contents)?);
        Ok(self)
    }

    /// Add in-memory contents to this builder, stored under `name`.
    pub fn data(
        &mut self,
        contents: impl Into<Vec<u8>>,
        name: impl AsRef<OsStr>,
    ) -> Result<&mut ImageBuilder, Error> {
        self.entries
            .push(BuilderEntry::new(name.as_ref(), contents.into())?);
        Ok(self)
    }

    /// Add every regular file in `dir` to this builder. The directory must
    /// be flat; any other kind of entry fails the whole build.
    pub fn dir(&mut self, dir: impl AsRef<Path>) -> Result<&mut ImageBuilder, Error> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::NotADirectory(dir.to_path_buf()));
        }

        // Sort the entries by file name so that the same inputs always
        // produce exactly the same image, regardless of listing order.
        let mut read_dir = Vec::new();
        for entry_res in fs::read_dir(dir).map_err(|e| Error::Io {
            reason: "Read source directory".to_string(),
            file: dir.to_path_buf(),
            source: e,
        })? {
            read_dir.push(entry_res.map_err(|e| Error::Io {
                reason: "Read source directory".to_string(),
                file: dir.to_path_buf(),
                source: e,
            })?);
        }
        read_dir.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        for entry in read_dir {
            self.file(entry.path(), entry.file_name())?;
        }
        Ok(self)
    }

    /// Consume this `ImageBuilder`, writing the header, entry table, and
    /// payload region to `w`. Returns the total image length.
    pub fn write_image<W: Write>(self, w: &mut W) -> Result<u64, Error> {
        let count = u32::try_from(self.entries.len()).map_err(CoreError::TryFromInt)?;

        let header_size = self
            .entries
            .len()
            .checked_mul(ENTRY_SIZE)
            .and_then(|table| table.checked_add(HEADER_SIZE))
            .ok_or(CoreError::Overflow)?;
        let header_size = u32::try_from(header_size).map_err(CoreError::TryFromInt)?;

        // Offsets are absolute from the start of the image, in entry order
        let mut offset = header_size;
        let mut table = Vec::with_capacity(self.entries.len() * ENTRY_SIZE);
        for entry in &self.entries {
            let packed = Entry {
                name: entry.name,
                size: entry.size,
                checksum: entry.checksum,
                offset,
            };
            table.extend_from_slice(bytemuck::bytes_of(&packed));

            let padded = u32::try_from(entry.contents.len()).map_err(CoreError::TryFromInt)?;
            offset = offset.checked_add(padded).ok_or(CoreError::Overflow)?;
        }

        let header = Header {
            magic: MAGIC,
            checksum: header_checksum(count, &table)?,
            count,
        };

        let io_error = |e| Error::Io {
            reason: "Write image".to_string(),
            file: PathBuf::new(),
            source: e,
        };

        w.write_all(bytemuck::bytes_of(&header)).map_err(io_error)?;
        w.write_all(&table).map_err(io_error)?;
        for entry in &self.entries {
            w.write_all(&entry.contents).map_err(io_error)?;
        }

        Ok(offset as u64)
    }
}

impl Default for ImageBuilder {
    fn default() -> ImageBuilder {
        ImageBuilder::new()
    }
}

impl fmt::Debug for ImageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ImageBuilder")
            .field("entries", &self.entries)
            .finish()
    }
}
