use alloc::format;
use alloc::string::ToString;
use bytemuck::PodCastError;
use core::error;
use core::fmt::{Display, Formatter, Result};

#[derive(Debug)]
pub enum Error {
    Cast(PodCastError),
    InvalidChecksum,
    InvalidMagic(u32),
    InvalidOffset { offset: u32, size: u32 },
    Overflow,
    TooShort,
    TryFromInt(core::num::TryFromIntError),
    UnalignedLength(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        let msg = match self {
            Cast(err) => format!("Cast: {}", err),
            InvalidChecksum => "Invalid Checksum".to_string(),
            InvalidMagic(magic) => format!("Invalid Magic: {:#010x}", magic),
            InvalidOffset { offset, size } => {
                format!("Invalid Offset: {:#010x} size {:#010x}", offset, size)
            }
            Overflow => "Overflow".to_string(),
            TooShort => "Data Too Short".to_string(),
            TryFromInt(err) => format!("TryFromInt: {}", err),
            UnalignedLength(len) => format!("Length Not a Multiple of 4: {}", len),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::TryFromInt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PodCastError> for Error {
    fn from(err: PodCastError) -> Error {
        Error::Cast(err)
    }
}

impl From<core::num::TryFromIntError> for Error {
    fn from(err: core::num::TryFromIntError) -> Error {
        Error::TryFromInt(err)
    }
}
