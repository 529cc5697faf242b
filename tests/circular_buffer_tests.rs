use circular_deque::{CircularBuffer, TryReserveError};

fn mass_push_back(buf: &mut CircularBuffer<i32>, values: &[i32]) {
    for &v in values {
        buf.push_back(v);
    }
}

fn by_index(buf: &CircularBuffer<i32>) -> Vec<i32> {
    (0..buf.len()).map(|i| buf[i]).collect()
}

#[test]
fn clear_then_refill() {
    let mut buf = CircularBuffer::new();
    mass_push_back(&mut buf, &[1, 2, 3, 4]);
    assert_eq!(buf.len(), 4);
    assert_eq!(by_index(&buf), vec![1, 2, 3, 4]);

    buf.clear();
    assert!(buf.is_empty());
    assert!(buf.begin() == buf.end());

    mass_push_back(&mut buf, &[5, 6, 7, 8]);
    assert_eq!(by_index(&buf), vec![5, 6, 7, 8]);
}

#[test]
fn insert_into_middle() {
    let mut buf = CircularBuffer::new();
    mass_push_back(&mut buf, &[1, 2, 3]);
    buf.insert(1, 9);
    assert_eq!(by_index(&buf), vec![1, 9, 2, 3]);
}

#[test]
fn mixed_pushes_keep_push_order() {
    let mut buf = CircularBuffer::new();
    let mut expected = std::collections::VecDeque::new();
    for i in 0..50 {
        if i % 3 == 0 {
            buf.push_front(i);
            expected.push_front(i);
        } else {
            buf.push_back(i);
            expected.push_back(i);
        }
        assert_eq!(buf.len(), expected.len());
    }
    assert!(buf.iter().eq(expected.iter()));
    assert_eq!(buf.front(), expected.front());
    assert_eq!(buf.back(), expected.back());
}

#[test]
fn push_pop_pairs_are_noops() {
    let mut buf: CircularBuffer<i32> = (0..7).collect();
    let before: Vec<_> = buf.iter().copied().collect();

    buf.push_back(100);
    assert_eq!(buf.pop_back(), Some(100));
    buf.push_front(-100);
    assert_eq!(buf.pop_front(), Some(-100));

    assert_eq!(buf.iter().copied().collect::<Vec<_>>(), before);
}

#[test]
fn random_access_after_forced_wrap() {
    let mut buf = CircularBuffer::with_capacity(8);
    for i in 0..7 {
        buf.push_back(i);
    }
    for _ in 0..4 {
        buf.pop_front();
    }
    for i in 7..11 {
        buf.push_back(i);
    }
    assert_eq!(buf.capacity(), 8);
    let (front, back) = buf.as_slices();
    assert!(!back.is_empty(), "expected a wrapped layout, got {front:?} / {back:?}");
    assert_eq!(by_index(&buf), vec![4, 5, 6, 7, 8, 9, 10]);
}

#[test]
fn growth_keeps_logical_order() {
    let mut buf = CircularBuffer::new();
    let mut capacities = vec![buf.capacity()];
    for i in 0..10 {
        buf.push_back(i);
        if capacities.last() != Some(&buf.capacity()) {
            capacities.push(buf.capacity());
        }
        assert_eq!(by_index(&buf), (0..=i).collect::<Vec<_>>());
    }
    assert_eq!(capacities, vec![0, 2, 4, 8, 16]);
}

#[test]
fn insert_then_erase_round_trips_every_position() {
    for n in 0..12 {
        for pos in 0..=n {
            let mut buf = CircularBuffer::with_capacity(16);
            // Odd sizes start wrapped.
            if n % 2 == 1 {
                for i in (0..n as i32).rev() {
                    buf.push_front(i);
                }
            } else {
                buf.extend(0..n as i32);
            }
            let original = by_index(&buf);

            buf.insert(pos, -1);
            assert_eq!(buf[pos], -1);
            buf.erase(pos);
            assert_eq!(by_index(&buf), original, "n = {n}, pos = {pos}");
        }
    }
}

#[test]
fn clone_is_independent() {
    let mut original: CircularBuffer<String> = CircularBuffer::new();
    for word in ["alpha", "beta", "gamma"] {
        original.push_front(word.to_string());
    }
    let mut copy = original.clone();
    copy[0].push_str("-changed");
    copy.push_back("delta".to_string());
    copy.erase(1);

    assert_eq!(original, ["gamma", "beta", "alpha"].map(String::from));
    assert_eq!(copy, ["gamma-changed", "alpha", "delta"].map(String::from));
}

#[test]
fn remove_returns_values_and_rejects_out_of_range() {
    let mut buf: CircularBuffer<i32> = (0..5).collect();
    assert_eq!(buf.remove(2), Some(2));
    assert_eq!(buf.remove(4), None);
    assert_eq!(buf.remove(0), Some(0));
    assert_eq!(buf, [1, 3, 4]);
}

#[test]
fn empty_buffer_accessors() {
    let mut buf: CircularBuffer<i32> = CircularBuffer::default();
    assert_eq!(buf.front(), None);
    assert_eq!(buf.back_mut(), None);
    assert_eq!(buf.pop_back(), None);
    assert_eq!(buf.pop_front(), None);
    assert_eq!(buf.get(0), None);
    assert_eq!(buf.capacity(), 0);
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_past_len_panics() {
    let buf: CircularBuffer<i32> = (0..3).collect();
    let _ = buf[3];
}

#[test]
fn try_push_hands_element_back_on_overflow() -> anyhow::Result<()> {
    let mut buf: CircularBuffer<u32> = CircularBuffer::new();
    buf.try_push_back(1)?;
    buf.try_push_front(0)?;
    buf.try_insert(1, 5)?;
    assert_eq!(buf, [0, 5, 1]);

    let err = buf.try_reserve(usize::MAX - 1).unwrap_err();
    assert_eq!(err, TryReserveError::CapacityOverflow);
    assert_eq!(buf, [0, 5, 1]);
    Ok(())
}

#[test]
fn with_capacity_hint_holds_one_less_without_growing() {
    let mut buf = CircularBuffer::with_capacity(4);
    buf.extend([1, 2, 3]);
    assert_eq!(buf.capacity(), 4);
    buf.push_back(4);
    assert_eq!(buf.capacity(), 8);
}

#[test]
fn hash_and_eq_follow_logical_order() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let straight: CircularBuffer<i32> = (1..=4).collect();
    let mut wrapped = CircularBuffer::with_capacity(8);
    wrapped.extend([3, 4]);
    wrapped.push_front(2);
    wrapped.push_front(1);
    assert_eq!(straight, wrapped);

    let hash = |b: &CircularBuffer<i32>| {
        let mut h = DefaultHasher::new();
        b.hash(&mut h);
        h.finish()
    };
    assert_eq!(hash(&straight), hash(&wrapped));
}
