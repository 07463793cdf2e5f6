//! File channels: the owners of memory mappings.

use std::{
    cell::RefCell,
    fmt,
    fs::{File, OpenOptions},
    io,
    os::fd::{AsRawFd, RawFd},
    path::Path,
    rc::Rc,
};

use crate::{mapped::MappedByteBuffer, memory::FileMapping};

/// How a file region is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapMode {
    /// Read-only; writes through the buffer are rejected.
    ReadOnly,
    /// Shared read-write; writes reach the file.
    ReadWrite,
    /// Copy-on-write; writes stay private to this mapping.
    Private,
}

/// An open file that can map regions of itself into memory.
///
/// Mappings belong to the channel. A region is unmapped once the last buffer
/// or view over it is dropped and the channel has let go of it; buffers never
/// unmap on their own. The channel lets go of regions no buffer uses anymore
/// whenever it maps a new one, resizes the file or is closed, so mapping in a
/// loop does not accumulate dead regions.
///
/// While a region is mapped, [`set_len`](FileChannel::set_len) refuses to
/// shrink the file below its end. Truncating the file through another handle
/// is outside the channel's control and makes later accesses to the region
/// fault.
///
/// # Examples
///
/// ```no_run
/// use rawbuf::{Buffer, ByteBuffer, FileChannel, MapMode};
///
/// let channel = FileChannel::open("data.bin")?;
/// let mut buf = channel.map(MapMode::ReadOnly)?;
/// let magic = buf.get_int()?;
/// println!("magic {magic:#x}, {} bytes left", buf.remaining());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FileChannel {
    file: File,
    mappings: RefCell<Vec<Rc<FileMapping>>>,
}

impl FileChannel {
    /// Wrap an open [`std::fs::File`].
    pub fn from_std(file: File) -> Self {
        Self {
            file,
            mappings: RefCell::new(Vec::new()),
        }
    }

    /// Open a file for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        File::open(path).map(Self::from_std)
    }

    /// Open an existing file for reading and writing.
    pub fn open_rw(path: impl AsRef<Path>) -> io::Result<Self> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map(Self::from_std)
    }

    /// Current length of the file.
    pub fn size(&self) -> io::Result<u64> {
        self.file.metadata().map(|m| m.len())
    }

    /// Truncate or extend the file.
    ///
    /// Fails with `InvalidInput` when `len` would cut into a region that is
    /// still mapped.
    pub fn set_len(&self, len: u64) -> io::Result<()> {
        let mapped_end = self.mapped_end();
        if len < mapped_end {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot truncate to {len} bytes, a mapped region ends at {mapped_end}"),
            ));
        }
        self.file.set_len(len)
    }

    /// Flush file content and metadata to disk.
    pub fn sync_all(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Map the whole file. The buffer capacity is the file length at the
    /// time of the call.
    pub fn map(&self, mode: MapMode) -> io::Result<MappedByteBuffer> {
        let size = self.size()?;
        self.map_region(mode, 0, size)
    }

    /// Map `size` bytes starting at file offset `position`.
    ///
    /// A [`ReadWrite`](MapMode::ReadWrite) region reaching past the end of
    /// the file grows the file first, and the old length is restored if the
    /// mapping then fails. Other modes must stay within the file.
    pub fn map_region(
        &self,
        mode: MapMode,
        position: u64,
        size: u64,
    ) -> io::Result<MappedByteBuffer> {
        let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidInput, msg.to_string());
        let len = usize::try_from(size).map_err(|_| invalid("region too large"))?;
        let end = position
            .checked_add(size)
            .ok_or_else(|| invalid("region end overflows"))?;
        let file_len = self.size()?;
        let grown = end > file_len;
        if grown {
            match mode {
                MapMode::ReadWrite => self.file.set_len(end)?,
                MapMode::ReadOnly | MapMode::Private => {
                    return Err(invalid("region extends beyond end of file"))
                }
            }
        }

        let mapping = match FileMapping::map(&self.file, mode, position, len) {
            Ok(mapping) => Rc::new(mapping),
            Err(err) => {
                if grown {
                    // The mapping error is the one worth reporting.
                    let _ = self.file.set_len(file_len);
                }
                return Err(err);
            }
        };
        self.prune();
        self.mappings.borrow_mut().push(mapping.clone());
        Ok(MappedByteBuffer::new(mapping, mode))
    }

    /// Number of mapped regions still used by some buffer.
    pub fn mapping_count(&self) -> usize {
        self.prune();
        self.mappings.borrow().len()
    }

    /// Drop the regions only the channel still refers to.
    fn prune(&self) {
        self.mappings
            .borrow_mut()
            .retain(|mapping| Rc::strong_count(mapping) > 1);
    }

    /// End of the furthest region still in use, 0 when nothing is mapped.
    fn mapped_end(&self) -> u64 {
        self.prune();
        self.mappings
            .borrow()
            .iter()
            .map(|mapping| mapping.end())
            .max()
            .unwrap_or(0)
    }

    /// Close the channel, giving up its hold on the mappings.
    ///
    /// Regions still referenced by buffers stay mapped until those buffers
    /// are dropped.
    pub fn close(self) -> io::Result<()> {
        drop(self.mappings.take());
        Ok(())
    }
}

impl AsRawFd for FileChannel {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl fmt::Debug for FileChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileChannel")
            .field("fd", &self.file.as_raw_fd())
            .field("mappings", &self.mappings.borrow().len())
            .finish()
    }
}
