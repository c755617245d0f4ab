//! Negating-sum checksum over little-endian u32 words.
//!
//! The sum of all words of a checksummed region, including the checksum word
//! itself, is congruent to 0 mod 2^32, so a consumer can verify a region by
//! summing it and comparing against the stored word.

use crate::Error;

/// Compute the negating sum of `data`, which must be a multiple of 4 bytes
/// long. Given the padding rules this only fails on an internal logic error.
pub fn negating_sum(data: &[u8]) -> Result<u32, Error> {
    if data.len() % 4 != 0 {
        return Err(Error::UnalignedLength(data.len()));
    }

    let mut acc: u32 = 0;
    for word in data.chunks_exact(4) {
        acc = acc.wrapping_sub(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
    }
    Ok(acc)
}

/// Checksum of the header region: the count word followed by the serialized
/// entry table. The magic and the checksum word itself are not covered.
pub fn header_checksum(count: u32, table: &[u8]) -> Result<u32, Error> {
    Ok(negating_sum(table)?.wrapping_sub(count))
}
