#![no_std]
extern crate alloc;

use core::mem;

pub use crate::checksum::{header_checksum, negating_sum};
pub use crate::entry::Entry;
pub use crate::error::Error;
pub use crate::header::Header;
pub use crate::image::ImageSrc;

mod checksum;
mod entry;
mod error;
mod header;
mod image;

pub const MAGIC: u32 = 0xC0DE_A55A;

pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const ENTRY_SIZE: usize = mem::size_of::<Entry>();

/// Maximum encoded length of an entry name, without NUL termination
pub const NAME_SIZE: usize = 16;
