use alloc::vec;
use alloc::vec::Vec;
use core::convert::TryFrom;

use crate::{negating_sum, Entry, Error, Header, HEADER_SIZE};

/// Random-access source of image bytes. Implemented for in-memory buffers
/// here and for files in the `flashfs` crate.
pub trait ImageSrc {
    type Err: From<Error>;

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err>;

    /// Fill `buf` from this src at `offset`, failing if the src runs out
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<(), Self::Err> {
        let mut total = 0;
        while total < buf.len() {
            let count = self.read_at(offset + total as u64, &mut buf[total..])?;
            if count == 0 {
                return Err(Error::TooShort.into());
            }
            total += count;
        }
        Ok(())
    }

    fn header(&mut self) -> Result<Header, Self::Err> {
        let mut header_data = [0; HEADER_SIZE];
        self.read_exact_at(0, &mut header_data)?;
        let header = Header::new(&header_data)?;
        Ok(*header)
    }

    /// Read the entry table and verify it against the header checksum
    fn entries(&mut self) -> Result<Vec<Entry>, Self::Err> {
        let header = self.header()?;
        let entries_size = header.entries_size()?;
        let mut entries_data = vec![0; entries_size];
        self.read_exact_at(HEADER_SIZE as u64, &mut entries_data)?;
        let entries = header.entries(&entries_data)?;
        Ok(entries.to_vec())
    }

    /// Look up an entry by its exact name bytes
    fn find(&mut self, name: &[u8]) -> Result<Option<Entry>, Self::Err> {
        Ok(self
            .entries()?
            .into_iter()
            .find(|entry| entry.name_bytes() == name))
    }

    /// Read an entry's padded data, verify its checksum, and return the
    /// unpadded file contents
    fn load_entry(&mut self, entry: &Entry) -> Result<Vec<u8>, Self::Err> {
        let header = self.header()?;
        let total_size = header.total_size()?;

        let offset = entry.offset();
        if offset % 4 != 0 || (offset as usize) < total_size {
            return Err(Error::InvalidOffset {
                offset,
                size: entry.size(),
            }
            .into());
        }

        let padded = usize::try_from(entry.padded_size()?).map_err(Error::TryFromInt)?;
        let mut data = vec![0; padded];
        self.read_exact_at(offset as u64, &mut data)?;

        if negating_sum(&data)? != entry.checksum() {
            return Err(Error::InvalidChecksum.into());
        }

        data.truncate(entry.size() as usize);
        Ok(data)
    }
}

impl<T: AsRef<[u8]>> ImageSrc for T {
    type Err = Error;

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Error> {
        let start = usize::try_from(offset).map_err(Error::TryFromInt)?;
        let data = self.as_ref();
        if start >= data.len() {
            return Ok(0);
        }
        let mut end = start.checked_add(buf.len()).ok_or(Error::Overflow)?;
        if end > data.len() {
            end = data.len();
        }
        let count = end - start;
        buf[..count].copy_from_slice(&data[start..end]);
        Ok(count)
    }
}
