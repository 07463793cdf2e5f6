use std::{fs::File, io, ptr::NonNull};

use memmap2::{Advice, Mmap, MmapMut, MmapOptions};

use super::Memory;
use crate::channel::MapMode;

enum Region {
    // mmap rejects empty mappings.
    Empty,
    ReadOnly(Mmap),
    Writable(MmapMut),
}

/// A mapped file region, unmapped when dropped.
pub(crate) struct FileMapping {
    region: Region,
    position: u64,
}

impl FileMapping {
    /// Map `len` bytes of `file` starting at file offset `position`.
    ///
    /// `Private` maps copy-on-write, so a read-only file is enough for it.
    pub(crate) fn map(file: &File, mode: MapMode, position: u64, len: usize) -> io::Result<Self> {
        if len == 0 {
            return Ok(Self {
                region: Region::Empty,
                position,
            });
        }
        let mut options = MmapOptions::new();
        options.offset(position).len(len);
        // Safety: the channel refuses to truncate the file below a live
        // mapping, and buffers only touch the region through raw copies.
        let region = unsafe {
            match mode {
                MapMode::ReadOnly => Region::ReadOnly(options.map(file)?),
                MapMode::ReadWrite => Region::Writable(options.map_mut(file)?),
                MapMode::Private => Region::Writable(options.map_copy(file)?),
            }
        };
        let mapping = Self { region, position };
        tracing!(
            "map {} bytes at file offset {} ({:?}) to {:p}",
            len,
            position,
            mode,
            mapping.as_ptr()
        );
        Ok(mapping)
    }

    /// File offset one past the last mapped byte, or 0 for an empty mapping.
    pub(crate) fn end(&self) -> u64 {
        match self.region {
            Region::Empty => 0,
            _ => self.position + self.len() as u64,
        }
    }

    /// Write modified pages back to the file.
    pub(crate) fn flush(&self) -> io::Result<()> {
        match &self.region {
            Region::Writable(map) => map.flush(),
            Region::Empty | Region::ReadOnly(_) => Ok(()),
        }
    }

    /// Ask the kernel to page the region in ahead of access.
    pub(crate) fn advise_will_need(&self) -> io::Result<()> {
        match &self.region {
            Region::Empty => Ok(()),
            Region::ReadOnly(map) => map.advise(Advice::WillNeed),
            Region::Writable(map) => map.advise(Advice::WillNeed),
        }
    }
}

unsafe impl Memory for FileMapping {
    #[inline]
    fn as_ptr(&self) -> *mut u8 {
        match &self.region {
            Region::Empty => NonNull::dangling().as_ptr(),
            // Never written through: read-only buffers reject every put.
            Region::ReadOnly(map) => map.as_ptr() as *mut u8,
            Region::Writable(map) => map.as_ptr() as *mut u8,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        match &self.region {
            Region::Empty => 0,
            Region::ReadOnly(map) => map.len(),
            Region::Writable(map) => map.len(),
        }
    }
}

impl Drop for FileMapping {
    fn drop(&mut self) {
        if !matches!(self.region, Region::Empty) {
            tracing!("unmap {:p} ({} bytes)", self.as_ptr(), self.len());
        }
    }
}
