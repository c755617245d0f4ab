//! The packed structs represent the on-disk format of flashfs
use core::fmt::Display;

use bytemuck::{Pod, Zeroable};

use crate::{Error, NAME_SIZE};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Entry {
    /// File name, zero-padded; a full 16-byte name has no NUL terminator
    pub name: [u8; NAME_SIZE],
    /// Size in bytes of the file data before padding
    pub size: u32,
    /// Negating sum of the zero-padded file data
    pub checksum: u32,
    /// Offset of the padded file data from the start of the image
    pub offset: u32,
}

impl Display for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (size, checksum, offset) = (self.size, self.checksum, self.offset);
        write!(
            f,
            "name={:?} size={} checksum={:#010x} offset={}",
            alloc::string::String::from_utf8(self.name_bytes().into()).unwrap_or_default(),
            size,
            checksum,
            offset
        )
    }
}

impl Entry {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Size of the file data rounded up to the next 4-byte boundary
    pub fn padded_size(&self) -> Result<u32, Error> {
        let size = self.size;
        Ok(size.checked_add(3).ok_or(Error::Overflow)? & !3)
    }

    /// Retrieve the name, ending at the first NUL
    pub fn name_bytes(&self) -> &[u8] {
        let mut i = 0;
        while i < self.name.len() {
            if self.name[i] == 0 {
                break;
            }
            i += 1;
        }
        &self.name[..i]
    }
}
