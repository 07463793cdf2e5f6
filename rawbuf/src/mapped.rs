//! Buffers over memory-mapped file regions.

use std::{fmt, io, rc::Rc};

use crate::{
    buffer::{sealed::Cursor, Buffer, BufferState},
    byte_buffer::{self, sealed::Backing, ByteBuffer},
    channel::MapMode,
    codec::Scalar,
    error::{BufferError, Result},
    memory::{self, FileMapping},
    order::ByteOrder,
};

/// A byte buffer over a file region mapped by a [`FileChannel`].
///
/// Capacity is the mapped length. Byte access, bulk access, relative
/// multi-byte accessors, `compact` and typed views behave as for a
/// [`DirectByteBuffer`]. Absolute multi-byte accessors, `slice`, `duplicate`
/// and `as_read_only` are not supported and fail with
/// [`NotImplemented`](BufferError::NotImplemented) without side effects.
///
/// [`FileChannel`]: crate::FileChannel
/// [`DirectByteBuffer`]: crate::DirectByteBuffer
pub struct MappedByteBuffer {
    state: BufferState,
    mapping: Rc<FileMapping>,
    mode: MapMode,
    order: ByteOrder,
}

impl MappedByteBuffer {
    pub(crate) fn new(mapping: Rc<FileMapping>, mode: MapMode) -> Self {
        use memory::Memory;

        Self {
            state: BufferState::with_capacity(mapping.len()),
            mapping,
            mode,
            order: ByteOrder::BigEndian,
        }
    }

    /// Mode the region was mapped with.
    #[inline]
    pub fn mode(&self) -> MapMode {
        self.mode
    }

    /// Write changes made through a shared read-write mapping back to the
    /// file. A no-op for other modes.
    pub fn force(&self) -> io::Result<()> {
        match self.mode {
            MapMode::ReadWrite => self.mapping.flush(),
            MapMode::ReadOnly | MapMode::Private => Ok(()),
        }
    }

    /// Hint the kernel to load the region into physical memory.
    pub fn load(&self) -> io::Result<()> {
        self.mapping.advise_will_need()
    }

    #[inline]
    fn check_writable(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        Ok(())
    }
}

impl Backing for MappedByteBuffer {
    fn alias(&self) -> Self {
        Self {
            state: BufferState::with_capacity(self.state.capacity()),
            mapping: self.mapping.clone(),
            mode: self.mode,
            order: self.order,
        }
    }
}

impl Cursor for MappedByteBuffer {
    #[inline]
    fn state_mut(&mut self) -> &mut BufferState {
        &mut self.state
    }
}

impl Buffer for MappedByteBuffer {
    #[inline]
    fn state(&self) -> &BufferState {
        &self.state
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.mode == MapMode::ReadOnly
    }

    /// A mapping is always addressable memory.
    #[inline]
    fn is_direct(&self) -> bool {
        true
    }
}

impl ByteBuffer for MappedByteBuffer {
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
        Ok(memory::read_byte(&*self.mapping, index))
    }

    fn put_at(&mut self, index: usize, value: u8) -> Result<()> {
        self.check_writable()?;
        self.state.check_index(index, 1)?;
        memory::write_byte(&*self.mapping, index, value);
        Ok(())
    }

    fn get_bytes_at(&self, index: usize, dst: &mut [u8]) -> Result<()> {
        self.state.check_index(index, dst.len())?;
        memory::read(&*self.mapping, index, dst);
        Ok(())
    }

    fn put_bytes_at(&mut self, index: usize, src: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.state.check_index(index, src.len())?;
        memory::write(&*self.mapping, index, src);
        Ok(())
    }

    fn compact(&mut self) -> Result<()> {
        self.check_writable()?;
        let count = self.state.remaining();
        memory::copy_within(&*self.mapping, self.state.position(), 0, count);
        self.state.compacted(count);
        Ok(())
    }

    fn duplicate(&self) -> Result<Self> {
        Err(BufferError::NotImplemented("duplicate"))
    }

    fn slice(&self) -> Result<Self> {
        Err(BufferError::NotImplemented("slice"))
    }

    fn as_read_only(&self) -> Result<Self> {
        Err(BufferError::NotImplemented("as_read_only"))
    }

    fn get_scalar_at<T: Scalar>(&self, _index: usize) -> Result<T> {
        Err(BufferError::NotImplemented("absolute multi-byte get"))
    }

    fn put_scalar_at<T: Scalar>(&mut self, _index: usize, _value: T) -> Result<()> {
        Err(BufferError::NotImplemented("absolute multi-byte put"))
    }
}

impl io::Read for MappedByteBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        byte_buffer::io_read(self, buf)
    }
}

impl io::Write for MappedByteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        byte_buffer::io_write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.force()
    }
}

impl fmt::Debug for MappedByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedByteBuffer")
            .field("pos", &self.state.position())
            .field("lim", &self.state.limit())
            .field("cap", &self.state.capacity())
            .field("mode", &self.mode)
            .field("order", &self.order)
            .finish()
    }
}
