//! Rawbuf provides fixed-capacity buffers addressed by position and limit,
//! over memory that is not owned by the Rust heap: blocks from the global
//! allocator ([`DirectByteBuffer`]), file regions mapped by the operating
//! system ([`MappedByteBuffer`]) and typed views ([`ViewBuffer`]) that read
//! and write `u16`, `i16`, `i32`, `i64`, `f32` or `f64` values in a fixed
//! byte order over either of them.
//!
//! Duplicates, slices and views alias the memory of the buffer they come from.
//! The memory is reference counted and released deterministically when the
//! last alias is dropped. Like the rest of a thread-per-core program, buffers
//! are neither `Send` nor `Sync`: all aliases of a block live on one thread,
//! and every access is a plain copy in or out of the region.
//!
//! ```
//! use rawbuf::{Buffer, ByteBuffer, ByteOrder, DirectByteBuffer};
//!
//! let mut buf = DirectByteBuffer::allocate(8).unwrap();
//! buf.put_bytes(&[0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0]).unwrap();
//! buf.flip();
//!
//! let ints = buf.as_int_buffer();
//! assert_eq!(ints.get_at(0).unwrap(), 0x12345678);
//!
//! buf.set_order(ByteOrder::LittleEndian);
//! let chars = buf.as_char_buffer();
//! assert_eq!(chars.get_at(0).unwrap(), 0x3412);
//! ```

#![warn(missing_docs, unreachable_pub)]

#[macro_use]
mod macros;

mod memory;

pub mod buffer;
pub mod byte_buffer;
pub mod codec;
pub mod error;
pub mod order;
pub mod view;

mod direct;
#[cfg(unix)]
mod channel;
#[cfg(unix)]
mod mapped;

pub use buffer::{Buffer, BufferState};
pub use byte_buffer::ByteBuffer;
#[cfg(unix)]
pub use channel::{FileChannel, MapMode};
pub use codec::Scalar;
pub use direct::{AllocOptions, DirectByteBuffer};
pub use error::{BufferError, Result};
#[cfg(unix)]
pub use mapped::MappedByteBuffer;
pub use order::ByteOrder;
pub use view::{
    CharBuffer, DoubleBuffer, FloatBuffer, IntBuffer, LongBuffer, ShortBuffer, ViewBuffer,
    ViewLayout,
};
