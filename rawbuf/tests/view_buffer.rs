use rawbuf::{
    Buffer, BufferError, ByteBuffer, ByteOrder, DirectByteBuffer, IntBuffer, LongBuffer,
    ViewBuffer, ViewLayout,
};

const SAMPLE: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0];

fn sample() -> DirectByteBuffer {
    let mut buf = DirectByteBuffer::allocate(SAMPLE.len()).unwrap();
    buf.put_bytes(&SAMPLE).unwrap();
    buf.flip();
    buf
}

#[test]
fn reads_in_view_order() {
    let bytes = sample();
    let ints: IntBuffer<_> = ViewBuffer::with_order(&bytes, ByteOrder::BigEndian);
    assert_eq!(ints.capacity(), 2);
    assert_eq!(ints.get_at(0).unwrap(), 0x12345678);
    assert_eq!(ints.get_at(1).unwrap(), 0x9abcdef0u32 as i32);

    let chars = ViewBuffer::<u16, _>::with_order(&bytes, ByteOrder::LittleEndian);
    assert_eq!(chars.capacity(), 4);
    assert_eq!(chars.get_at(0).unwrap(), 0x3412);
    assert_eq!(chars.order(), ByteOrder::LittleEndian);
}

#[test]
fn order_fixed_at_creation() {
    let mut bytes = sample();
    let shorts = bytes.as_short_buffer();
    assert_eq!(shorts.order(), ByteOrder::BigEndian);

    bytes.set_order(ByteOrder::LittleEndian);
    assert_eq!(shorts.order(), ByteOrder::BigEndian);
    assert_eq!(shorts.get_at(0).unwrap(), 0x1234);
    assert_eq!(bytes.as_short_buffer().get_at(0).unwrap(), 0x3412);
}

#[test]
fn long_big_to_little_swaps_bytes() {
    let bytes = DirectByteBuffer::allocate(16).unwrap();
    let value: i64 = 0x0102_0304_0506_0708;

    let mut big: LongBuffer<_> = ViewBuffer::with_order(&bytes, ByteOrder::BigEndian);
    big.put(value).unwrap();
    big.put(-value).unwrap();

    let little: LongBuffer<_> = ViewBuffer::with_order(&bytes, ByteOrder::LittleEndian);
    assert_eq!(little.get_at(0).unwrap(), value.swap_bytes());
    assert_eq!(little.get_at(1).unwrap(), (-value).swap_bytes());
    assert_eq!(big.get_at(0).unwrap(), value);
    assert_eq!(bytes.get_at(0).unwrap(), 0x01);
}

#[test]
fn view_starts_at_backing_position() {
    let mut bytes = DirectByteBuffer::allocate(11).unwrap();
    bytes.set_position(2).unwrap();
    let mut ints = bytes.as_int_buffer();
    // 9 remaining bytes hold two whole ints.
    assert_eq!(ints.capacity(), 2);
    assert_eq!(ints.offset(), 2);
    ints.put_at(1, -2).unwrap();
    assert_eq!(bytes.get_int_at(6).unwrap(), -2);
    assert_eq!(
        ints.put_at(2, 0),
        Err(BufferError::IndexOutOfBounds { index: 2, len: 2 })
    );
    bytes.rewind();
    assert_eq!(bytes.to_vec().unwrap(), [0, 0, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xfe, 0]);
}

#[test]
fn relative_access_advances_by_one_element() {
    let bytes = sample();
    let mut shorts = bytes.as_short_buffer();
    let first = shorts.get().unwrap();
    assert_eq!(shorts.position(), 1);
    shorts.set_position(0).unwrap();
    shorts.put(first).unwrap();
    assert_eq!(shorts.position(), 1);
    assert_eq!(bytes.to_vec().unwrap(), SAMPLE);

    shorts.set_position(4).unwrap();
    assert_eq!(
        shorts.get(),
        Err(BufferError::Underflow {
            needed: 1,
            remaining: 0
        })
    );
    assert_eq!(
        shorts.put(1),
        Err(BufferError::Overflow {
            needed: 1,
            remaining: 0
        })
    );
}

#[test]
fn floats_through_views() {
    let bytes = DirectByteBuffer::allocate(24).unwrap();
    let mut floats = bytes.as_float_buffer();
    floats.put_slice(&[1.0, -2.5, f32::INFINITY]).unwrap();
    let mut doubles = bytes.as_double_buffer();
    doubles.set_position(2).unwrap();
    doubles.put(std::f64::consts::PI).unwrap();

    floats.flip();
    let mut out = [0f32; 3];
    floats.get_slice(&mut out).unwrap();
    assert_eq!(out, [1.0, -2.5, f32::INFINITY]);
    assert_eq!(bytes.get_double_at(16).unwrap(), std::f64::consts::PI);
    assert_eq!(bytes.get_float_at(4).unwrap(), -2.5);
}

#[test]
fn bulk_is_all_or_nothing() {
    let bytes = DirectByteBuffer::allocate(8).unwrap();
    let mut ints = bytes.as_int_buffer();
    assert_eq!(
        ints.put_slice(&[1, 2, 3]),
        Err(BufferError::Overflow {
            needed: 3,
            remaining: 2
        })
    );
    assert_eq!(ints.position(), 0);
    assert_eq!(bytes.to_vec().unwrap(), [0; 8]);

    let mut out = [0i32; 3];
    assert!(ints.get_slice(&mut out).is_err());
    assert_eq!(ints.position(), 0);
}

#[test]
fn slice_and_duplicate() {
    let bytes = DirectByteBuffer::allocate(16).unwrap();
    let mut ints = bytes.as_int_buffer();
    ints.put_slice(&[10, 20, 30, 40]).unwrap();
    ints.set_position(1).unwrap();
    ints.set_limit(3).unwrap();
    ints.mark_position();

    let mut slice = ints.slice();
    assert_eq!(slice.capacity(), 2);
    assert_eq!(slice.limit(), 2);
    assert_eq!(slice.position(), 0);
    assert_eq!(slice.offset(), 4);
    assert_eq!(slice.to_vec().unwrap(), [20, 30]);
    slice.put_at(0, 21).unwrap();
    assert_eq!(ints.get_at(1).unwrap(), 21);

    let mut dup = ints.duplicate();
    assert_eq!(dup.mark(), Some(1));
    dup.get().unwrap();
    assert_eq!(dup.position(), 2);
    assert_eq!(ints.position(), 1);
    dup.put_at(3, 41).unwrap();
    assert_eq!(ints.get_at(3).unwrap(), 41);
}

#[test]
fn compact_moves_elements() {
    let bytes = DirectByteBuffer::allocate(10).unwrap();
    let mut shorts = bytes.as_short_buffer();
    shorts.put_slice(&[1, 2, 3, 4, 5]).unwrap();
    shorts.set_position(2).unwrap();
    shorts.set_limit(5).unwrap();
    shorts.compact().unwrap();
    assert_eq!(shorts.position(), 3);
    assert_eq!(shorts.limit(), 5);
    shorts.flip();
    assert_eq!(shorts.to_vec().unwrap(), [3, 4, 5]);
    assert_eq!(bytes.to_vec().unwrap(), [0, 3, 0, 4, 0, 5, 0, 4, 0, 5]);
}

#[test]
fn read_only_views() {
    let bytes = sample();
    let ro_bytes = bytes.as_read_only().unwrap();
    let mut from_ro = ro_bytes.as_long_buffer();
    assert!(from_ro.is_read_only());
    assert_eq!(from_ro.put(1), Err(BufferError::ReadOnly));
    assert_eq!(from_ro.get().unwrap(), 0x123456789abcdef0);

    let mut ints = bytes.as_int_buffer();
    let mut ro = ints.as_read_only();
    assert_eq!(ro.put_at(0, 0), Err(BufferError::ReadOnly));
    assert_eq!(ro.compact(), Err(BufferError::ReadOnly));
    assert_eq!(ro.put_slice(&[1]), Err(BufferError::ReadOnly));
    assert!(ro.slice().is_read_only());
    ints.put_at(0, 7).unwrap();
    assert_eq!(ro.get_at(0).unwrap(), 7);
}

#[test]
fn explicit_layout() {
    let bytes = DirectByteBuffer::allocate(32).unwrap();
    let layout = ViewLayout {
        offset: 8,
        capacity: 16,
        limit: 12,
        position: 4,
        mark: Some(4),
    };
    let mut ints =
        ViewBuffer::<i32, _>::with_layout(&bytes, layout, ByteOrder::LittleEndian, false).unwrap();
    assert_eq!(ints.capacity(), 4);
    assert_eq!(ints.limit(), 3);
    assert_eq!(ints.position(), 1);
    assert_eq!(ints.mark(), Some(1));
    ints.put(0x01020304).unwrap();
    assert_eq!(bytes.get_at(12).unwrap(), 0x04);
    assert_eq!(bytes.get_at(15).unwrap(), 0x01);

    let too_far = ViewLayout {
        offset: 20,
        capacity: 16,
        limit: 16,
        position: 0,
        mark: None,
    };
    assert_eq!(
        ViewBuffer::<i32, _>::with_layout(&bytes, too_far, ByteOrder::BigEndian, false).unwrap_err(),
        BufferError::IndexOutOfBounds { index: 20, len: 32 }
    );

    let inverted = ViewLayout {
        offset: 0,
        capacity: 16,
        limit: 4,
        position: 8,
        mark: None,
    };
    assert!(matches!(
        ViewBuffer::<i16, _>::with_layout(&bytes, inverted, ByteOrder::BigEndian, false),
        Err(BufferError::IllegalArgument { .. })
    ));

    let forced = ViewBuffer::<i64, _>::with_layout(
        &bytes.as_read_only().unwrap(),
        ViewLayout {
            capacity: 8,
            limit: 8,
            ..ViewLayout::default()
        },
        ByteOrder::BigEndian,
        false,
    )
    .unwrap();
    assert!(forced.is_read_only());
}

#[test]
fn views_keep_memory_alive() {
    let bytes = sample();
    let ints = bytes.as_int_buffer();
    drop(bytes);
    assert_eq!(ints.get_at(0).unwrap(), 0x12345678);
    assert!(ints.is_direct());
}
