use std::{
    alloc::{self, Layout},
    ptr::NonNull,
};

use super::Memory;
use crate::error::{BufferError, Result};

/// A zero-filled block from the global allocator, released on drop.
///
/// Buffers share a block through an `Rc`; the last handle to go releases it.
pub(crate) struct DirectBlock {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl DirectBlock {
    /// Allocate `size` zeroed bytes aligned to `align` (a power of two).
    pub(crate) fn allocate(size: usize, align: usize) -> Result<Self> {
        let layout =
            Layout::from_size_align(size, align).map_err(|_| BufferError::OutOfMemory { size })?;
        if size == 0 {
            // Nothing to allocate; any non-null aligned address will do.
            let ptr = NonNull::new(layout.align() as *mut u8).ok_or(BufferError::OutOfMemory { size })?;
            return Ok(Self { ptr, layout });
        }
        // Safety: layout has a non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(BufferError::OutOfMemory { size })?;
        tracing!("allocate direct block {:p}, {} bytes", ptr, size);
        Ok(Self { ptr, layout })
    }
}

unsafe impl Memory for DirectBlock {
    #[inline]
    fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    fn len(&self) -> usize {
        self.layout.size()
    }
}

impl Drop for DirectBlock {
    fn drop(&mut self) {
        if self.layout.size() == 0 {
            return;
        }
        tracing!("release direct block {:p}, {} bytes", self.ptr, self.layout.size());
        // Safety: allocated in `allocate` with this very layout, released once.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}
