//! Cursor state shared by every buffer kind.

use crate::error::{BufferError, Result};

/// Capacity, limit, position and mark of a buffer.
///
/// `mark <= position <= limit <= capacity` holds after every successful
/// mutation. Units are elements: bytes for byte buffers, scalars for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferState {
    capacity: usize,
    limit: usize,
    position: usize,
    mark: Option<usize>,
}

impl BufferState {
    /// Create a state with `limit = capacity`, position 0 and no mark.
    #[inline]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            limit: capacity,
            position: 0,
            mark: None,
        }
    }

    /// Create a state from explicit values, rejecting any violation of the
    /// ordering invariant.
    pub fn new(
        capacity: usize,
        limit: usize,
        position: usize,
        mark: Option<usize>,
    ) -> Result<Self> {
        if limit > capacity {
            return Err(BufferError::illegal("limit", limit, capacity));
        }
        if position > limit {
            return Err(BufferError::illegal("position", position, limit));
        }
        if let Some(mark) = mark {
            if mark > position {
                return Err(BufferError::illegal("mark", mark, position));
            }
        }
        Ok(Self {
            capacity,
            limit,
            position,
            mark,
        })
    }

    /// Fixed number of elements.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the first element that should not be read or written.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Index of the next element to be read or written.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Recorded mark, if any.
    #[inline]
    pub const fn mark(&self) -> Option<usize> {
        self.mark
    }

    /// Elements between position and limit.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Move the position. A mark beyond the new position is discarded.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return Err(BufferError::illegal("position", position, self.limit));
        }
        self.position = position;
        if self.mark.is_some_and(|m| m > position) {
            self.mark = None;
        }
        Ok(())
    }

    /// Move the limit. Position is clamped to it and a mark beyond it is
    /// discarded.
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.capacity {
            return Err(BufferError::illegal("limit", limit, self.capacity));
        }
        self.limit = limit;
        if self.position > limit {
            self.position = limit;
        }
        if self.mark.is_some_and(|m| m > limit) {
            self.mark = None;
        }
        Ok(())
    }

    /// Record the current position.
    #[inline]
    pub fn mark_position(&mut self) {
        self.mark = Some(self.position);
    }

    /// Return to the recorded mark.
    pub fn reset(&mut self) -> Result<()> {
        let mark = self.mark.ok_or(BufferError::InvalidMark)?;
        self.position = mark;
        Ok(())
    }

    /// Position 0, limit at capacity, no mark.
    #[inline]
    pub fn clear(&mut self) {
        self.limit = self.capacity;
        self.position = 0;
        self.mark = None;
    }

    /// Limit at the current position, then position 0, no mark.
    #[inline]
    pub fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
    }

    /// Position 0, no mark.
    #[inline]
    pub fn rewind(&mut self) {
        self.position = 0;
        self.mark = None;
    }

    /// Position of a relative get of `n` elements. Does not move the cursor;
    /// call [`advance`](Self::advance) once the access succeeded.
    #[inline]
    pub(crate) fn check_get(&self, n: usize) -> Result<usize> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(BufferError::Underflow {
                needed: n,
                remaining,
            });
        }
        Ok(self.position)
    }

    /// Position of a relative put of `n` elements. Does not move the cursor.
    #[inline]
    pub(crate) fn check_put(&self, n: usize) -> Result<usize> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(BufferError::Overflow {
                needed: n,
                remaining,
            });
        }
        Ok(self.position)
    }

    /// Check that `[index, index + n)` lies within the capacity.
    #[inline]
    pub(crate) fn check_index(&self, index: usize, n: usize) -> Result<()> {
        match index.checked_add(n) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(BufferError::IndexOutOfBounds {
                index,
                len: self.capacity,
            }),
        }
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.position += n;
    }

    /// State after a compaction that kept `kept` elements.
    #[inline]
    pub(crate) fn compacted(&mut self, kept: usize) {
        self.position = kept;
        self.limit = self.capacity;
        self.mark = None;
    }
}

#[allow(unreachable_pub)]
pub(crate) mod sealed {
    use super::BufferState;

    pub trait Cursor {
        /// Mutable cursor state. Only the checked `BufferState` transitions
        /// may go through it; capacity never changes after construction.
        fn state_mut(&mut self) -> &mut BufferState;
    }
}

use sealed::Cursor;

/// Cursor operations common to every buffer.
///
/// Implementors only expose their [`BufferState`]; everything else is
/// provided. The state can be read but not replaced from outside the crate:
///
/// ```compile_fail
/// use rawbuf::{Buffer, BufferState, DirectByteBuffer};
///
/// let mut buf = DirectByteBuffer::allocate(4).unwrap();
/// *buf.state_mut() = BufferState::new(1024, 1024, 0, None).unwrap();
/// ```
pub trait Buffer: Cursor {
    /// Cursor state of this buffer.
    fn state(&self) -> &BufferState;

    /// Whether mutating calls are rejected.
    fn is_read_only(&self) -> bool;

    /// Whether the content lives outside the Rust heap (allocated or mapped).
    fn is_direct(&self) -> bool;

    /// Fixed number of elements.
    #[inline]
    fn capacity(&self) -> usize {
        self.state().capacity()
    }

    /// Index of the next element to be read or written.
    #[inline]
    fn position(&self) -> usize {
        self.state().position()
    }

    /// Move the position; fails unless `position <= limit`.
    #[inline]
    fn set_position(&mut self, position: usize) -> Result<()> {
        self.state_mut().set_position(position)
    }

    /// Index of the first element that should not be read or written.
    #[inline]
    fn limit(&self) -> usize {
        self.state().limit()
    }

    /// Move the limit; fails unless `limit <= capacity`.
    #[inline]
    fn set_limit(&mut self, limit: usize) -> Result<()> {
        self.state_mut().set_limit(limit)
    }

    /// Recorded mark, if any.
    #[inline]
    fn mark(&self) -> Option<usize> {
        self.state().mark()
    }

    /// Record the current position.
    #[inline]
    fn mark_position(&mut self) {
        self.state_mut().mark_position()
    }

    /// Return to the recorded mark; fails with
    /// [`InvalidMark`](BufferError::InvalidMark) when there is none.
    #[inline]
    fn reset(&mut self) -> Result<()> {
        self.state_mut().reset()
    }

    /// Prepare for filling from the start.
    #[inline]
    fn clear(&mut self) {
        self.state_mut().clear()
    }

    /// Switch from filling to draining.
    #[inline]
    fn flip(&mut self) {
        self.state_mut().flip()
    }

    /// Drain again from the start.
    #[inline]
    fn rewind(&mut self) {
        self.state_mut().rewind()
    }

    /// `limit - position`.
    #[inline]
    fn remaining(&self) -> usize {
        self.state().remaining()
    }

    /// `remaining() > 0`.
    #[inline]
    fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_ordering() {
        assert!(BufferState::new(10, 10, 3, Some(2)).is_ok());
        assert_eq!(
            BufferState::new(10, 11, 0, None),
            Err(BufferError::illegal("limit", 11, 10))
        );
        assert_eq!(
            BufferState::new(10, 5, 6, None),
            Err(BufferError::illegal("position", 6, 5))
        );
        assert_eq!(
            BufferState::new(10, 5, 3, Some(4)),
            Err(BufferError::illegal("mark", 4, 3))
        );
    }

    #[test]
    fn set_limit_clamps_position_and_drops_mark() {
        let mut state = BufferState::with_capacity(16);
        state.set_position(10).unwrap();
        state.mark_position();
        state.set_limit(8).unwrap();
        assert_eq!(state.position(), 8);
        assert_eq!(state.mark(), None);

        let mut state = BufferState::with_capacity(16);
        state.set_position(4).unwrap();
        state.mark_position();
        state.set_limit(8).unwrap();
        assert_eq!(state.mark(), Some(4));
    }

    #[test]
    fn set_position_drops_mark_beyond() {
        let mut state = BufferState::with_capacity(16);
        state.set_position(6).unwrap();
        state.mark_position();
        state.set_position(7).unwrap();
        assert_eq!(state.mark(), Some(6));
        state.set_position(5).unwrap();
        assert_eq!(state.mark(), None);
    }

    #[test]
    fn checks_do_not_move_cursor() {
        let mut state = BufferState::new(8, 4, 2, None).unwrap();
        assert_eq!(state.check_get(2), Ok(2));
        assert_eq!(
            state.check_get(3),
            Err(BufferError::Underflow {
                needed: 3,
                remaining: 2
            })
        );
        assert_eq!(
            state.check_put(3),
            Err(BufferError::Overflow {
                needed: 3,
                remaining: 2
            })
        );
        assert_eq!(state.position(), 2);
        state.advance(2);
        assert_eq!(state.position(), 4);
    }

    #[test]
    fn check_index_against_capacity() {
        let state = BufferState::new(8, 2, 0, None).unwrap();
        assert!(state.check_index(4, 4).is_ok());
        assert_eq!(
            state.check_index(5, 4),
            Err(BufferError::IndexOutOfBounds { index: 5, len: 8 })
        );
        assert!(state.check_index(usize::MAX, 2).is_err());
    }
}
