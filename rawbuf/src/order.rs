//! Byte order of multi-byte scalars.

use std::fmt;

/// Byte order used to assemble and disassemble multi-byte scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// Byte order of the platform this crate was compiled for.
    #[inline]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// The other order.
    #[inline]
    pub const fn reverse(self) -> Self {
        match self {
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::BigEndian => f.write_str("BIG_ENDIAN"),
            ByteOrder::LittleEndian => f.write_str("LITTLE_ENDIAN"),
        }
    }
}
