//! `proptest` strategies for buffers in arbitrary wrap states.
//!
//! A buffer built only with `push_back` never wraps. These strategies split
//! the generated elements and push the leading part onto the front, so the
//! live region straddles the end of the block while logical order still
//! matches the generated `Vec`.

use crate::CircularBuffer;
use core::fmt;
use core::ops::Range;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;

/// Builds a buffer holding exactly `items`, with the first `split` of them
/// pushed onto the front.
pub fn wrapped_from<T>(mut items: Vec<T>, split: usize) -> CircularBuffer<T> {
    let split = split.min(items.len());
    let back = items.split_off(split);
    let mut buf = CircularBuffer::with_capacity(items.len() + back.len() + 1);
    for value in back {
        buf.push_back(value);
    }
    for value in items.into_iter().rev() {
        buf.push_front(value);
    }
    buf
}

/// Strategy yielding `(expected, buffer)` where `buffer` holds `expected` in
/// logical order in some wrap state.
pub fn wrapped_buffer<S>(
    element: S,
    size: Range<usize>,
) -> impl Strategy<Value = (Vec<S::Value>, CircularBuffer<S::Value>)>
where
    S: Strategy,
    S::Value: Clone + fmt::Debug,
{
    (vec(element, size), any::<Index>()).prop_map(|(items, split)| {
        let split = split.index(items.len() + 1);
        let buf = wrapped_from(items.clone(), split);
        (items, buf)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_from_keeps_order_and_wraps() {
        let buf = wrapped_from(vec![1, 2, 3, 4, 5], 2);
        assert_eq!(buf, [1, 2, 3, 4, 5]);
        let (front, back) = buf.as_slices();
        assert_eq!(front, &[1, 2]);
        assert_eq!(back, &[3, 4, 5]);
    }

    proptest! {
        #[test]
        fn generated_buffers_match_expected((expected, buf) in wrapped_buffer(any::<u8>(), 0..64)) {
            prop_assert_eq!(buf.iter().copied().collect::<Vec<_>>(), expected);
        }
    }
}
