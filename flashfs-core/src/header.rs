//! The packed structs represent the on-disk format of flashfs

use bytemuck::{Pod, PodCastError, Zeroable};
use core::mem;

use crate::{header_checksum, Entry, Error, ENTRY_SIZE, HEADER_SIZE, MAGIC};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Header {
    /// Must be [`MAGIC`]
    pub magic: u32,
    /// Negating sum of the count field and the entry table
    pub checksum: u32,
    /// Count of Entry structs, which start immediately after header struct
    pub count: u32,
}

impl Header {
    /// Parse header from raw header data and check the magic number
    pub fn new(data: &[u8]) -> Result<&Header, Error> {
        let header_data = data
            .get(..mem::size_of::<Header>())
            .ok_or(Error::Cast(PodCastError::SizeMismatch))?;

        let header = Header::new_unchecked(header_data)?;

        let magic = header.magic;
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        Ok(header)
    }

    /// Parse header from raw header data without checking the magic
    pub fn new_unchecked(data: &[u8]) -> Result<&Header, Error> {
        Ok(bytemuck::try_from_bytes(data)?)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Retrieve the size of the entry table
    pub fn entries_size(&self) -> Result<usize, Error> {
        (self.count as usize)
            .checked_mul(ENTRY_SIZE)
            .ok_or(Error::Overflow)
    }

    /// Retrieve the size of the Header and its entry table
    pub fn total_size(&self) -> Result<usize, Error> {
        self.entries_size()?
            .checked_add(HEADER_SIZE)
            .ok_or(Error::Overflow)
    }

    /// Parse entries from raw entry table data and verify the header checksum
    pub fn entries<'a>(&self, data: &'a [u8]) -> Result<&'a [Entry], Error> {
        let entries_size = self.entries_size()?;

        let entries_data = data
            .get(..entries_size)
            .ok_or(Error::Cast(PodCastError::SizeMismatch))?;

        if header_checksum(self.count, entries_data)? != self.checksum {
            return Err(Error::InvalidChecksum);
        }

        Self::entries_unchecked(entries_data)
    }

    /// Parse entries from raw entry table data without verification
    pub fn entries_unchecked(data: &[u8]) -> Result<&[Entry], Error> {
        Ok(bytemuck::try_cast_slice(data)?)
    }
}
