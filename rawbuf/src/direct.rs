//! Buffers over explicitly allocated memory.

use std::{fmt, io, rc::Rc};

use crate::{
    buffer::{sealed::Cursor, Buffer, BufferState},
    byte_buffer::{self, sealed::Backing, ByteBuffer},
    error::{BufferError, Result},
    memory::{self, DirectBlock},
    order::ByteOrder,
};

/// Options for allocating a [`DirectByteBuffer`].
///
/// # Examples
///
/// ```
/// use rawbuf::{AllocOptions, Buffer, ByteBuffer, ByteOrder};
///
/// let mut buf = AllocOptions::new()
///     .order(ByteOrder::LittleEndian)
///     .alignment(64)
///     .allocate(16)
///     .unwrap();
/// buf.put_int(1).unwrap();
/// assert_eq!(buf.get_at(0).unwrap(), 1);
/// assert_eq!(buf.position(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocOptions {
    order: ByteOrder,
    alignment: usize,
}

impl Default for AllocOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocOptions {
    /// Big-endian, byte aligned.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            order: ByteOrder::BigEndian,
            alignment: 1,
        }
    }

    /// Byte order of the multi-byte accessors.
    #[must_use]
    pub const fn order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Alignment of the first byte; must be a power of two.
    #[must_use]
    pub const fn alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    /// Allocate a zero-filled buffer of `capacity` bytes.
    pub fn allocate(&self, capacity: usize) -> Result<DirectByteBuffer> {
        if !self.alignment.is_power_of_two() {
            return Err(BufferError::illegal(
                "alignment",
                self.alignment,
                self.alignment.next_power_of_two(),
            ));
        }
        let block = DirectBlock::allocate(capacity, self.alignment)?;
        Ok(DirectByteBuffer {
            state: BufferState::with_capacity(capacity),
            block: Rc::new(block),
            offset: 0,
            read_only: false,
            order: self.order,
        })
    }
}

/// A byte buffer over a block of raw memory it allocated.
///
/// Duplicates, slices and views share the block through a reference count;
/// the block is released once, when the last of them is dropped. The handle
/// is neither `Send` nor `Sync`, so every alias of a block stays on the
/// thread that allocated it.
///
/// # Examples
///
/// ```
/// use rawbuf::{Buffer, ByteBuffer, DirectByteBuffer};
///
/// let mut buf = DirectByteBuffer::allocate(8).unwrap();
/// buf.put_bytes(b"hi").unwrap();
/// buf.flip();
/// assert_eq!(buf.to_vec().unwrap(), b"hi");
/// ```
pub struct DirectByteBuffer {
    state: BufferState,
    block: Rc<DirectBlock>,
    offset: usize,
    read_only: bool,
    order: ByteOrder,
}

impl DirectByteBuffer {
    /// Allocate a zero-filled, big-endian buffer of `capacity` bytes.
    pub fn allocate(capacity: usize) -> Result<Self> {
        AllocOptions::new().allocate(capacity)
    }

    /// Byte offset of this buffer inside its block; nonzero for slices.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether `other` shares this buffer's block.
    #[inline]
    pub fn shares_block(&self, other: &DirectByteBuffer) -> bool {
        Rc::ptr_eq(&self.block, &other.block)
    }

    #[inline]
    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        Ok(())
    }

    fn derive(&self, state: BufferState, offset: usize, read_only: bool) -> Self {
        Self {
            state,
            block: self.block.clone(),
            offset,
            read_only,
            order: self.order,
        }
    }
}

impl Backing for DirectByteBuffer {
    fn alias(&self) -> Self {
        self.derive(
            BufferState::with_capacity(self.state.capacity()),
            self.offset,
            self.read_only,
        )
    }
}

impl Cursor for DirectByteBuffer {
    #[inline]
    fn state_mut(&mut self) -> &mut BufferState {
        &mut self.state
    }
}

impl Buffer for DirectByteBuffer {
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
        true
    }
}

impl ByteBuffer for DirectByteBuffer {
    #[inline]
    fn order(&self) -> ByteOrder {
        self.order
    }

    #[inline]
    fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    fn get_at(&self, index: usize) -> Result<u8> {
        self.state.check_index(index, 1)?;
        Ok(memory::read_byte(&*self.block, self.offset + index))
    }

    fn put_at(&mut self, index: usize, value: u8) -> Result<()> {
        self.check_writable()?;
        self.state.check_index(index, 1)?;
        memory::write_byte(&*self.block, self.offset + index, value);
        Ok(())
    }

    fn get_bytes_at(&self, index: usize, dst: &mut [u8]) -> Result<()> {
        self.state.check_index(index, dst.len())?;
        memory::read(&*self.block, self.offset + index, dst);
        Ok(())
    }

    fn put_bytes_at(&mut self, index: usize, src: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.state.check_index(index, src.len())?;
        memory::write(&*self.block, self.offset + index, src);
        Ok(())
    }

    fn compact(&mut self) -> Result<()> {
        self.check_writable()?;
        let count = self.state.remaining();
        let from = self.offset + self.state.position();
        memory::copy_within(&*self.block, from, self.offset, count);
        self.state.compacted(count);
        Ok(())
    }

    fn duplicate(&self) -> Result<Self> {
        Ok(self.derive(self.state, self.offset, self.read_only))
    }

    fn slice(&self) -> Result<Self> {
        Ok(self.derive(
            BufferState::with_capacity(self.state.remaining()),
            self.offset + self.state.position(),
            self.read_only,
        ))
    }

    fn as_read_only(&self) -> Result<Self> {
        Ok(self.derive(self.state, self.offset, true))
    }
}

impl io::Read for DirectByteBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        byte_buffer::io_read(self, buf)
    }
}

impl io::Write for DirectByteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        byte_buffer::io_write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for DirectByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectByteBuffer")
            .field("pos", &self.state.position())
            .field("lim", &self.state.limit())
            .field("cap", &self.state.capacity())
            .field("offset", &self.offset)
            .field("order", &self.order)
            .field("read_only", &self.read_only)
            .finish()
    }
}
