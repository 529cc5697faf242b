use circular_deque::{CircularBuffer, Cursor, RingCursor};

/// Capacity 8 with the head at slot 6, so the live region wraps.
fn wrapped_five() -> CircularBuffer<i32> {
    let mut buf = CircularBuffer::with_capacity(8);
    buf.extend([2, 3, 4]);
    buf.push_front(1);
    buf.push_front(0);
    buf
}

#[test]
fn begin_before_end_across_wrap() {
    let buf = wrapped_five();
    let (front, back) = buf.as_slices();
    assert_eq!((front.len(), back.len()), (2, 3));

    let begin = buf.begin();
    let end = buf.end();
    assert!(begin < end);
    assert!(end > begin);
    assert_eq!(end - begin, buf.len() as isize);
    assert_eq!(begin - end, -(buf.len() as isize));
}

#[test]
fn forward_traversal_visits_len_elements() {
    let buf = wrapped_five();
    let mut cursor = buf.begin();
    let mut seen = Vec::new();
    while cursor != buf.end() {
        seen.push(*cursor.get().unwrap());
        cursor.move_next();
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    assert_eq!(cursor.get(), None);
    assert_eq!(cursor.logical_index(), 5);
}

#[test]
fn backward_traversal_from_end() {
    let buf = wrapped_five();
    let mut cursor = buf.end();
    let mut seen = Vec::new();
    while cursor != buf.begin() {
        cursor.move_prev();
        seen.push(*cursor.get().unwrap());
    }
    assert_eq!(seen, vec![4, 3, 2, 1, 0]);
}

#[test]
fn offset_arithmetic_wraps() {
    let buf = wrapped_five();
    let begin = buf.begin();
    for k in 0..5 {
        let c = begin + k;
        assert_eq!(c.get(), Some(&(k as i32)));
        assert_eq!(c - begin, k);
        assert_eq!(c.logical_index(), k as usize);
    }
    let mut c = buf.end();
    c -= 3;
    assert_eq!(c.get(), Some(&2));
    c += -1;
    assert_eq!(c.get(), Some(&1));
    assert_eq!((c - -2).get(), Some(&3));
}

#[test]
fn range_to_matches_iter() {
    let buf = wrapped_five();
    let all: Vec<_> = buf.begin().range_to(buf.end()).copied().collect();
    assert_eq!(all, buf.iter().copied().collect::<Vec<_>>());

    let middle: Vec<_> = (buf.begin() + 1).range_to(buf.end() - 1).copied().collect();
    assert_eq!(middle, vec![1, 2, 3]);

    assert_eq!(buf.end().range_to(buf.begin()).count(), 0);
}

#[test]
fn reverse_cursors() {
    let buf = wrapped_five();
    let mut r = buf.rbegin();
    let rend = buf.rend();
    assert!(r < rend);
    assert_eq!(rend - r, 5);

    let mut seen = Vec::new();
    while r != rend {
        seen.push(*r.get().unwrap());
        r.move_next();
    }
    assert_eq!(seen, vec![4, 3, 2, 1, 0]);
    assert_eq!(rend.get(), None);
    assert_eq!((buf.rbegin() + 2).get(), Some(&2));
}

#[test]
fn reverse_mut_cursor_writes() {
    let mut buf = wrapped_five();
    {
        let mut r = buf.rbegin_mut();
        *r.get_mut().unwrap() = 40;
        r += 1;
        *r.get_mut().unwrap() = 30;
    }
    assert_eq!(buf, [0, 1, 2, 30, 40]);
}

#[test]
fn mutable_cursor_converts_to_shared() {
    let mut buf = wrapped_five();
    let mut cursor = buf.begin_mut();
    cursor += 2;
    *cursor.get_mut().unwrap() *= 100;
    assert_eq!(cursor.as_cursor().get(), Some(&200));

    let shared: Cursor<'_, i32> = cursor.into();
    assert_eq!(shared.logical_index(), 2);
    assert_eq!(shared.get(), Some(&200));
}

#[test]
fn into_mut_outlives_cursor() {
    let mut buf = wrapped_five();
    let slot = (buf.end_mut() - 1).into_mut().unwrap();
    *slot = -4;
    assert_eq!(buf.back(), Some(&-4));
}

#[test]
fn empty_buffer_cursors_coincide() {
    let buf: CircularBuffer<u8> = CircularBuffer::new();
    assert!(buf.begin() == buf.end());
    assert_eq!(buf.end() - buf.begin(), 0);
    assert_eq!(buf.begin().get(), None);
    assert!(buf.rbegin() == buf.rend());
}

#[test]
fn generic_cursor_movement() {
    fn walk<C: RingCursor>(cursor: &mut C, steps: isize) -> usize {
        cursor.advance(steps);
        cursor.retreat(1);
        cursor.logical_index()
    }

    let buf = wrapped_five();
    let mut c = buf.begin();
    assert_eq!(walk(&mut c, 4), 3);
}
