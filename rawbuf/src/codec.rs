//! Conversion between scalars and their byte representation.
//!
//! Every multi-byte accessor in the crate goes through [`decode`] and
//! [`encode`], whatever the scalar width. A scalar is carried as the low
//! `WIDTH * 8` bits of a `u64` while its bytes are shifted in or out.

use crate::order::ByteOrder;

#[allow(unreachable_pub)]
mod sealed {
    pub trait Sealed {}
}

/// Fixed-width scalar that a typed view can hold.
///
/// Implemented for `u16` (a UTF-16 code unit, the `char` view), `i16`, `i32`,
/// `i64`, `f32` and `f64`. Floats are carried by bit pattern, so NaN payloads
/// survive a round trip.
pub trait Scalar: Copy + sealed::Sealed + 'static {
    /// Width in bytes; 2, 4 or 8.
    const WIDTH: usize;

    /// Raw bits, zero-extended into a `u64`.
    fn to_bits(self) -> u64;

    /// Rebuild the scalar from the low `WIDTH * 8` bits.
    fn from_bits(bits: u64) -> Self;
}

macro_rules! int_scalar {
    ($($ty: ty => $unsigned: ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn to_bits(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $ty
            }
        }
    )*};
}

int_scalar!(u16 => u16, i16 => u16, i32 => u32, i64 => u64);

macro_rules! float_scalar {
    ($($ty: ty => $unsigned: ty),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn to_bits(self) -> u64 {
                <$ty>::to_bits(self) as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                <$ty>::from_bits(bits as $unsigned)
            }
        }
    )*};
}

float_scalar!(f32 => u32, f64 => u64);

/// Assemble a scalar from `T::WIDTH` bytes in the given order.
///
/// # Panics
/// Panics if `bytes` is not exactly `T::WIDTH` long.
#[inline]
pub fn decode<T: Scalar>(bytes: &[u8], order: ByteOrder) -> T {
    assert_eq!(bytes.len(), T::WIDTH, "scalar width mismatch");
    let shift_in = |bits: u64, byte: &u8| (bits << 8) | u64::from(*byte);
    let bits = match order {
        ByteOrder::BigEndian => bytes.iter().fold(0, shift_in),
        ByteOrder::LittleEndian => bytes.iter().rev().fold(0, shift_in),
    };
    T::from_bits(bits)
}

/// Disassemble a scalar into `T::WIDTH` bytes in the given order.
///
/// # Panics
/// Panics if `out` is not exactly `T::WIDTH` long.
#[inline]
pub fn encode<T: Scalar>(value: T, order: ByteOrder, out: &mut [u8]) {
    assert_eq!(out.len(), T::WIDTH, "scalar width mismatch");
    let mut bits = value.to_bits();
    let mut shift_out = |byte: &mut u8| {
        *byte = bits as u8;
        bits >>= 8;
    };
    match order {
        ByteOrder::BigEndian => out.iter_mut().rev().for_each(&mut shift_out),
        ByteOrder::LittleEndian => out.iter_mut().for_each(&mut shift_out),
    }
}
