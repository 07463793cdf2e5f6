//! Raw memory regions behind the byte buffers.
//!
//! A region is an address and a length. Buffers never hold references into a
//! region: every access copies bytes in or out through raw pointers, so any
//! number of aliases on the same thread can read and write it.

mod block;
pub(crate) use block::DirectBlock;

#[cfg(unix)]
mod mapping;
#[cfg(unix)]
pub(crate) use mapping::FileMapping;

/// A contiguous, fixed region of raw memory.
///
/// # Safety
/// `as_ptr` must return the same address for the whole lifetime of the value,
/// valid for reads of `len` bytes, and valid for writes unless the region was
/// created read-only.
pub(crate) unsafe trait Memory {
    fn as_ptr(&self) -> *mut u8;

    fn len(&self) -> usize;
}

#[inline]
fn check_span<M: Memory + ?Sized>(mem: &M, at: usize, len: usize) {
    assert!(
        at.checked_add(len).is_some_and(|end| end <= mem.len()),
        "region access [{at}, {at}+{len}) beyond {}",
        mem.len()
    );
}

/// Copy `dst.len()` bytes starting at `at` out of the region.
#[inline]
pub(crate) fn read<M: Memory + ?Sized>(mem: &M, at: usize, dst: &mut [u8]) {
    check_span(mem, at, dst.len());
    // Safety: span checked above; `dst` is caller memory and cannot overlap a
    // region no reference is ever handed out for.
    unsafe { std::ptr::copy_nonoverlapping(mem.as_ptr().add(at), dst.as_mut_ptr(), dst.len()) }
}

/// Copy `src` into the region starting at `at`.
///
/// Callers must not write through a region mapped without write access.
#[inline]
pub(crate) fn write<M: Memory + ?Sized>(mem: &M, at: usize, src: &[u8]) {
    check_span(mem, at, src.len());
    // Safety: span checked above, see `read`.
    unsafe { std::ptr::copy_nonoverlapping(src.as_ptr(), mem.as_ptr().add(at), src.len()) }
}

#[inline]
pub(crate) fn read_byte<M: Memory + ?Sized>(mem: &M, at: usize) -> u8 {
    check_span(mem, at, 1);
    // Safety: span checked above.
    unsafe { mem.as_ptr().add(at).read() }
}

#[inline]
pub(crate) fn write_byte<M: Memory + ?Sized>(mem: &M, at: usize, value: u8) {
    check_span(mem, at, 1);
    // Safety: span checked above.
    unsafe { mem.as_ptr().add(at).write(value) }
}

/// Move `len` bytes from `src` to `dst` inside the region; the ranges may
/// overlap.
#[inline]
pub(crate) fn copy_within<M: Memory + ?Sized>(mem: &M, src: usize, dst: usize, len: usize) {
    check_span(mem, src, len);
    check_span(mem, dst, len);
    // Safety: both spans checked above; `copy` has memmove semantics.
    unsafe { std::ptr::copy(mem.as_ptr().add(src), mem.as_ptr().add(dst), len) }
}
