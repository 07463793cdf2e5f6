//! The byte-addressed buffer contract shared by direct and mapped buffers.

use std::io;

use crate::{
    buffer::Buffer,
    codec::{self, Scalar},
    error::{BufferError, Result},
    order::ByteOrder,
    view::{CharBuffer, DoubleBuffer, FloatBuffer, IntBuffer, LongBuffer, ShortBuffer, ViewBuffer},
};

#[allow(unreachable_pub)]
pub(crate) mod sealed {
    pub trait Backing {
        /// A handle over the same memory covering the whole capacity, with
        /// its own cursor state, the same read-only flag and order.
        fn alias(&self) -> Self;
    }
}

/// Largest scalar width, in bytes.
pub(crate) const MAX_WIDTH: usize = 8;

macro_rules! scalar_accessors {
    ($($name: literal, $ty: ty: $get: ident, $get_at: ident, $put: ident, $put_at: ident;)*) => {$(
        #[doc = concat!("Relative get of a ", $name, " in the buffer order.")]
        #[inline]
        fn $get(&mut self) -> Result<$ty> {
            self.get_scalar()
        }

        #[doc = concat!("Absolute get of a ", $name, " at byte `index`, in the buffer order.")]
        #[inline]
        fn $get_at(&self, index: usize) -> Result<$ty> {
            self.get_scalar_at(index)
        }

        #[doc = concat!("Relative put of a ", $name, " in the buffer order.")]
        #[inline]
        fn $put(&mut self, value: $ty) -> Result<()> {
            self.put_scalar(value)
        }

        #[doc = concat!("Absolute put of a ", $name, " at byte `index`, in the buffer order.")]
        #[inline]
        fn $put_at(&mut self, index: usize, value: $ty) -> Result<()> {
            self.put_scalar_at(index, value)
        }
    )*};
}

/// A buffer of bytes over raw memory.
///
/// Indices are relative to the start of this buffer (a slice starts at 0) and
/// absolute accessors are checked against the capacity. Multi-byte accessors
/// use the buffer's [`order`](ByteBuffer::order); typed views fix their own
/// order at creation.
///
/// All handles derived from one buffer (duplicates, slices, views) share its
/// memory; writes through one are visible through all of them.
pub trait ByteBuffer: Buffer + Sized + sealed::Backing {
    /// Order used by the multi-byte accessors of this buffer.
    fn order(&self) -> ByteOrder;

    /// Change the order used by the multi-byte accessors of this buffer.
    /// Views created before keep their order.
    fn set_order(&mut self, order: ByteOrder);

    /// Byte at `index`.
    fn get_at(&self, index: usize) -> Result<u8>;

    /// Write the byte at `index`.
    fn put_at(&mut self, index: usize, value: u8) -> Result<()>;

    /// Copy `dst.len()` bytes starting at `index` into `dst`.
    fn get_bytes_at(&self, index: usize, dst: &mut [u8]) -> Result<()>;

    /// Copy `src` into the buffer starting at `index`.
    fn put_bytes_at(&mut self, index: usize, src: &[u8]) -> Result<()>;

    /// Move `[position, limit)` to the start of the buffer, then set
    /// position to the number of bytes moved and limit to capacity.
    fn compact(&mut self) -> Result<()>;

    /// A buffer sharing content, with an independent copy of the cursor.
    fn duplicate(&self) -> Result<Self>;

    /// A buffer over `[position, limit)` of this one, starting at position 0.
    fn slice(&self) -> Result<Self>;

    /// A read-only duplicate.
    fn as_read_only(&self) -> Result<Self>;

    /// Relative get of one byte.
    fn get(&mut self) -> Result<u8> {
        let index = self.state().check_get(1)?;
        let value = self.get_at(index)?;
        self.state_mut().advance(1);
        Ok(value)
    }

    /// Relative put of one byte.
    fn put(&mut self, value: u8) -> Result<()> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        let index = self.state().check_put(1)?;
        self.put_at(index, value)?;
        self.state_mut().advance(1);
        Ok(())
    }

    /// Relative bulk get filling `dst`; nothing is copied unless all of it
    /// fits before the limit.
    fn get_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        let index = self.state().check_get(dst.len())?;
        self.get_bytes_at(index, dst)?;
        self.state_mut().advance(dst.len());
        Ok(())
    }

    /// Relative bulk put of `src`; nothing is written unless all of it fits
    /// before the limit.
    fn put_bytes(&mut self, src: &[u8]) -> Result<()> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        let index = self.state().check_put(src.len())?;
        self.put_bytes_at(index, src)?;
        self.state_mut().advance(src.len());
        Ok(())
    }

    /// Copy the remaining bytes of `src` into this buffer, advancing both.
    fn put_buffer<S: ByteBuffer>(&mut self, src: &mut S) -> Result<()> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        let n = src.remaining();
        let index = self.state().check_put(n)?;
        // Copied out first: `src` may alias this buffer's memory.
        let bytes = src.to_vec()?;
        self.put_bytes_at(index, &bytes)?;
        src.state_mut().advance(n);
        self.state_mut().advance(n);
        Ok(())
    }

    /// Absolute get of any scalar at byte `index`, in the buffer order.
    fn get_scalar_at<T: Scalar>(&self, index: usize) -> Result<T> {
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        self.get_bytes_at(index, raw)?;
        Ok(codec::decode(raw, self.order()))
    }

    /// Absolute put of any scalar at byte `index`, in the buffer order.
    fn put_scalar_at<T: Scalar>(&mut self, index: usize, value: T) -> Result<()> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        codec::encode(value, self.order(), raw);
        self.put_bytes_at(index, raw)
    }

    /// Relative get of any scalar, in the buffer order.
    fn get_scalar<T: Scalar>(&mut self) -> Result<T> {
        let index = self.state().check_get(T::WIDTH)?;
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        self.get_bytes_at(index, raw)?;
        self.state_mut().advance(T::WIDTH);
        Ok(codec::decode(raw, self.order()))
    }

    /// Relative put of any scalar, in the buffer order.
    fn put_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        let index = self.state().check_put(T::WIDTH)?;
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        codec::encode(value, self.order(), raw);
        self.put_bytes_at(index, raw)?;
        self.state_mut().advance(T::WIDTH);
        Ok(())
    }

    scalar_accessors! {
        "UTF-16 code unit", u16: get_char, get_char_at, put_char, put_char_at;
        "`i16`", i16: get_short, get_short_at, put_short, put_short_at;
        "`i32`", i32: get_int, get_int_at, put_int, put_int_at;
        "`i64`", i64: get_long, get_long_at, put_long, put_long_at;
        "`f32`", f32: get_float, get_float_at, put_float, put_float_at;
        "`f64`", f64: get_double, get_double_at, put_double, put_double_at;
    }

    /// A typed view over the remaining bytes, in the current buffer order.
    #[inline]
    fn as_view<T: Scalar>(&self) -> ViewBuffer<T, Self> {
        ViewBuffer::new(self)
    }

    /// `u16` view over the remaining bytes.
    #[inline]
    fn as_char_buffer(&self) -> CharBuffer<Self> {
        self.as_view()
    }

    /// `i16` view over the remaining bytes.
    #[inline]
    fn as_short_buffer(&self) -> ShortBuffer<Self> {
        self.as_view()
    }

    /// `i32` view over the remaining bytes.
    #[inline]
    fn as_int_buffer(&self) -> IntBuffer<Self> {
        self.as_view()
    }

    /// `i64` view over the remaining bytes.
    #[inline]
    fn as_long_buffer(&self) -> LongBuffer<Self> {
        self.as_view()
    }

    /// `f32` view over the remaining bytes.
    #[inline]
    fn as_float_buffer(&self) -> FloatBuffer<Self> {
        self.as_view()
    }

    /// `f64` view over the remaining bytes.
    #[inline]
    fn as_double_buffer(&self) -> DoubleBuffer<Self> {
        self.as_view()
    }

    /// Copy of the remaining bytes. The cursor does not move.
    fn to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0; self.remaining()];
        self.get_bytes_at(self.position(), &mut out)?;
        Ok(out)
    }

    /// Copy of the remaining bytes as [`bytes::Bytes`]. The cursor does not
    /// move.
    #[cfg(feature = "bytes")]
    fn to_bytes(&self) -> Result<::bytes::Bytes> {
        self.to_vec().map(::bytes::Bytes::from)
    }
}

/// `io::Read` for a byte buffer: drain up to `remaining()` bytes.
pub(crate) fn io_read<B: ByteBuffer>(buf: &mut B, dst: &mut [u8]) -> io::Result<usize> {
    let n = dst.len().min(buf.remaining());
    buf.get_bytes(&mut dst[..n])?;
    Ok(n)
}

/// `io::Write` for a byte buffer: fill up to `remaining()` bytes.
pub(crate) fn io_write<B: ByteBuffer>(buf: &mut B, src: &[u8]) -> io::Result<usize> {
    if buf.is_read_only() {
        return Err(BufferError::ReadOnly.into());
    }
    let n = src.len().min(buf.remaining());
    buf.put_bytes(&src[..n])?;
    Ok(n)
}
