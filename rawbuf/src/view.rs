//! Typed views reinterpreting a byte buffer as fixed-width scalars.

use std::{fmt, marker::PhantomData};

use crate::{
    buffer::{sealed::Cursor, Buffer, BufferState},
    byte_buffer::{ByteBuffer, MAX_WIDTH},
    codec::{self, Scalar},
    error::{BufferError, Result},
    order::ByteOrder,
};

/// View of UTF-16 code units.
pub type CharBuffer<B> = ViewBuffer<u16, B>;
/// View of `i16` values.
pub type ShortBuffer<B> = ViewBuffer<i16, B>;
/// View of `i32` values.
pub type IntBuffer<B> = ViewBuffer<i32, B>;
/// View of `i64` values.
pub type LongBuffer<B> = ViewBuffer<i64, B>;
/// View of `f32` values.
pub type FloatBuffer<B> = ViewBuffer<f32, B>;
/// View of `f64` values.
pub type DoubleBuffer<B> = ViewBuffer<f64, B>;

/// Placement of a view inside its backing buffer, in bytes.
///
/// Cursor values are divided by the scalar width to produce the view's own
/// state; `offset` is a byte index into the backing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewLayout {
    /// Byte index of element 0 in the backing buffer.
    pub offset: usize,
    /// Bytes covered by the view.
    pub capacity: usize,
    /// Limit, in bytes.
    pub limit: usize,
    /// Position, in bytes.
    pub position: usize,
    /// Mark, in bytes.
    pub mark: Option<usize>,
}

/// A buffer of `T` stored in the memory of a byte buffer `B`.
///
/// Element `i` occupies bytes `[offset + i * WIDTH, offset + (i + 1) * WIDTH)`
/// of the backing buffer and is encoded in the view's byte order, which is
/// fixed when the view is created and unaffected by later
/// [`set_order`](ByteBuffer::set_order) calls on the backing buffer.
///
/// The view holds an alias of the backing memory, never the memory itself;
/// the memory lives as long as any alias does.
pub struct ViewBuffer<T: Scalar, B: ByteBuffer> {
    state: BufferState,
    backing: B,
    offset: usize,
    order: ByteOrder,
    read_only: bool,
    _scalar: PhantomData<T>,
}

impl<T: Scalar, B: ByteBuffer> ViewBuffer<T, B> {
    /// View over the remaining bytes of `backing`, in its current order.
    ///
    /// Element 0 sits at the backing position; capacity is
    /// `remaining / WIDTH`, a trailing partial element is not addressable.
    pub fn new(backing: &B) -> Self {
        Self::with_order(backing, backing.order())
    }

    /// View over the remaining bytes of `backing` in the given order.
    pub fn with_order(backing: &B, order: ByteOrder) -> Self {
        Self {
            state: BufferState::with_capacity(backing.remaining() / T::WIDTH),
            backing: backing.alias(),
            offset: backing.position(),
            order,
            read_only: backing.is_read_only(),
            _scalar: PhantomData,
        }
    }

    /// View with an explicit byte layout.
    ///
    /// Fails with `IndexOutOfBounds` when the layout reaches past the backing
    /// capacity and `IllegalArgument` when the derived cursor state is
    /// inconsistent. A view over a read-only buffer is read-only.
    pub fn with_layout(
        backing: &B,
        layout: ViewLayout,
        order: ByteOrder,
        read_only: bool,
    ) -> Result<Self> {
        let within = layout
            .offset
            .checked_add(layout.capacity)
            .is_some_and(|end| end <= backing.capacity());
        if !within {
            return Err(BufferError::IndexOutOfBounds {
                index: layout.offset,
                len: backing.capacity(),
            });
        }
        let width = T::WIDTH;
        let state = BufferState::new(
            layout.capacity / width,
            layout.limit / width,
            layout.position / width,
            layout.mark.map(|mark| mark / width),
        )?;
        Ok(Self {
            state,
            backing: backing.alias(),
            offset: layout.offset,
            order,
            read_only: read_only || backing.is_read_only(),
            _scalar: PhantomData,
        })
    }

    /// Order the elements are encoded in.
    #[inline]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Byte index of element 0 in the backing buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn byte_index(&self, index: usize) -> usize {
        self.offset + index * T::WIDTH
    }

    fn read(&self, index: usize) -> Result<T> {
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        self.backing.get_bytes_at(self.byte_index(index), raw)?;
        Ok(codec::decode(raw, self.order))
    }

    fn write(&mut self, index: usize, value: T) -> Result<()> {
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        codec::encode(value, self.order, raw);
        let at = self.byte_index(index);
        self.backing.put_bytes_at(at, raw)
    }

    #[inline]
    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        Ok(())
    }

    /// Relative get.
    pub fn get(&mut self) -> Result<T> {
        let index = self.state.check_get(1)?;
        let value = self.read(index)?;
        self.state.advance(1);
        Ok(value)
    }

    /// Absolute get of element `index`.
    pub fn get_at(&self, index: usize) -> Result<T> {
        self.state.check_index(index, 1)?;
        self.read(index)
    }

    /// Relative put.
    pub fn put(&mut self, value: T) -> Result<()> {
        self.check_writable()?;
        let index = self.state.check_put(1)?;
        self.write(index, value)?;
        self.state.advance(1);
        Ok(())
    }

    /// Absolute put of element `index`.
    pub fn put_at(&mut self, index: usize, value: T) -> Result<()> {
        self.check_writable()?;
        self.state.check_index(index, 1)?;
        self.write(index, value)
    }

    /// Relative bulk get filling `dst`, all or nothing.
    pub fn get_slice(&mut self, dst: &mut [T]) -> Result<()> {
        let start = self.state.check_get(dst.len())?;
        let mut raw = vec![0u8; dst.len() * T::WIDTH];
        self.backing.get_bytes_at(self.byte_index(start), &mut raw)?;
        for (value, chunk) in dst.iter_mut().zip(raw.chunks_exact(T::WIDTH)) {
            *value = codec::decode(chunk, self.order);
        }
        self.state.advance(dst.len());
        Ok(())
    }

    /// Relative bulk put of `src`, all or nothing.
    pub fn put_slice(&mut self, src: &[T]) -> Result<()> {
        self.check_writable()?;
        let start = self.state.check_put(src.len())?;
        let mut raw = vec![0u8; src.len() * T::WIDTH];
        for (value, chunk) in src.iter().zip(raw.chunks_exact_mut(T::WIDTH)) {
            codec::encode(*value, self.order, chunk);
        }
        let at = self.byte_index(start);
        self.backing.put_bytes_at(at, &raw)?;
        self.state.advance(src.len());
        Ok(())
    }

    /// Copy of the remaining elements. The cursor does not move.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        (self.state.position()..self.state.limit())
            .map(|index| self.read(index))
            .collect()
    }

    /// Move elements `[position, limit)` to the start of the view, then set
    /// position to the number moved and limit to capacity.
    ///
    /// Elements are moved one at a time in ascending order, which is safe for
    /// the downward overlap.
    pub fn compact(&mut self) -> Result<()> {
        self.check_writable()?;
        let position = self.state.position();
        let count = self.state.remaining();
        let mut raw = [0u8; MAX_WIDTH];
        let raw = &mut raw[..T::WIDTH];
        if position > 0 {
            for i in 0..count {
                self.backing
                    .get_bytes_at(self.byte_index(position + i), raw)?;
                let at = self.byte_index(i);
                self.backing.put_bytes_at(at, raw)?;
            }
        }
        self.state.compacted(count);
        Ok(())
    }

    /// A view sharing content, with an independent copy of the cursor.
    pub fn duplicate(&self) -> Self {
        Self {
            state: self.state,
            backing: self.backing.alias(),
            offset: self.offset,
            order: self.order,
            read_only: self.read_only,
            _scalar: PhantomData,
        }
    }

    /// A view over `[position, limit)` of this one, starting at position 0.
    pub fn slice(&self) -> Self {
        Self {
            state: BufferState::with_capacity(self.state.remaining()),
            backing: self.backing.alias(),
            offset: self.byte_index(self.state.position()),
            order: self.order,
            read_only: self.read_only,
            _scalar: PhantomData,
        }
    }

    /// A read-only duplicate.
    pub fn as_read_only(&self) -> Self {
        Self {
            read_only: true,
            ..self.duplicate()
        }
    }
}

impl<T: Scalar, B: ByteBuffer> Cursor for ViewBuffer<T, B> {
    #[inline]
    fn state_mut(&mut self) -> &mut BufferState {
        &mut self.state
    }
}

impl<T: Scalar, B: ByteBuffer> Buffer for ViewBuffer<T, B> {
    #[inline]
    fn state(&self) -> &BufferState {
        &self.state
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[inline]
    fn is_direct(&self) -> bool {
        self.backing.is_direct()
    }
}

impl<T: Scalar, B: ByteBuffer> fmt::Debug for ViewBuffer<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewBuffer")
            .field("scalar", &std::any::type_name::<T>())
            .field("pos", &self.state.position())
            .field("lim", &self.state.limit())
            .field("cap", &self.state.capacity())
            .field("offset", &self.offset)
            .field("order", &self.order)
            .field("read_only", &self.read_only)
            .finish()
    }
}
