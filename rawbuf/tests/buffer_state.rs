use proptest::prelude::*;
use rawbuf::{Buffer, BufferError, BufferState, ByteBuffer, DirectByteBuffer};

#[test]
fn flip_after_fill() {
    let mut buf = DirectByteBuffer::allocate(16).unwrap();
    buf.put_bytes(b"hello").unwrap();
    buf.mark_position();
    buf.flip();
    assert_eq!(buf.position(), 0);
    assert_eq!(buf.limit(), 5);
    assert_eq!(buf.mark(), None);
    assert_eq!(buf.remaining(), 5);
}

#[test]
fn reset_without_mark() {
    let mut buf = DirectByteBuffer::allocate(4).unwrap();
    assert_eq!(buf.reset(), Err(BufferError::InvalidMark));

    buf.set_position(1).unwrap();
    buf.mark_position();
    buf.set_position(3).unwrap();
    buf.reset().unwrap();
    assert_eq!(buf.position(), 1);

    buf.rewind();
    assert_eq!(buf.position(), 0);
    assert_eq!(buf.reset(), Err(BufferError::InvalidMark));
}

#[test]
fn position_beyond_limit() {
    let mut buf = DirectByteBuffer::allocate(8).unwrap();
    buf.set_limit(4).unwrap();
    assert_eq!(
        buf.set_position(5),
        Err(BufferError::IllegalArgument {
            name: "position",
            value: 5,
            bound: 4
        })
    );
    assert_eq!(buf.position(), 0);
    assert_eq!(
        buf.set_limit(9),
        Err(BufferError::IllegalArgument {
            name: "limit",
            value: 9,
            bound: 8
        })
    );
    assert_eq!(buf.limit(), 4);
}

#[test]
fn clear_restores_capacity() {
    let mut buf = DirectByteBuffer::allocate(8).unwrap();
    buf.put_bytes(&[1, 2, 3]).unwrap();
    buf.flip();
    buf.clear();
    assert_eq!((buf.position(), buf.limit()), (0, 8));
    // Content is untouched.
    assert_eq!(buf.get().unwrap(), 1);
}

#[test]
fn has_remaining_tracks_limit() {
    let mut buf = DirectByteBuffer::allocate(2).unwrap();
    assert!(buf.has_remaining());
    buf.put(1).unwrap();
    buf.put(2).unwrap();
    assert!(!buf.has_remaining());
    assert_eq!(
        buf.put(3),
        Err(BufferError::Overflow {
            needed: 1,
            remaining: 0
        })
    );
    buf.flip();
    buf.get().unwrap();
    buf.get().unwrap();
    assert_eq!(
        buf.get(),
        Err(BufferError::Underflow {
            needed: 1,
            remaining: 0
        })
    );
}

#[derive(Debug, Clone)]
enum Op {
    Position(usize),
    Limit(usize),
    Mark,
    Reset,
    Flip,
    Rewind,
    Clear,
    Get(usize),
    Put(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..40usize).prop_map(Op::Position),
        (0..40usize).prop_map(Op::Limit),
        Just(Op::Mark),
        Just(Op::Reset),
        Just(Op::Flip),
        Just(Op::Rewind),
        Just(Op::Clear),
        (0..12usize).prop_map(Op::Get),
        (0..12usize).prop_map(Op::Put),
    ]
}

fn holds(state: &BufferState) -> bool {
    state.position() <= state.limit()
        && state.limit() <= state.capacity()
        && state.mark().map_or(true, |m| m <= state.position())
}

proptest! {
    #[test]
    fn cursor_invariant_holds(ops in prop::collection::vec(op(), 1..64)) {
        let mut buf = DirectByteBuffer::allocate(32).unwrap();
        for op in ops {
            let before = *buf.state();
            let result = match op {
                Op::Position(p) => buf.set_position(p),
                Op::Limit(l) => buf.set_limit(l),
                Op::Mark => { buf.mark_position(); Ok(()) }
                Op::Reset => buf.reset(),
                Op::Flip => { buf.flip(); Ok(()) }
                Op::Rewind => { buf.rewind(); Ok(()) }
                Op::Clear => { buf.clear(); Ok(()) }
                Op::Get(n) => { let mut dst = vec![0; n]; buf.get_bytes(&mut dst) }
                Op::Put(n) => buf.put_bytes(&vec![7; n]),
            };
            prop_assert!(holds(buf.state()));
            if result.is_err() {
                prop_assert_eq!(before, *buf.state());
            }
        }
    }
}
