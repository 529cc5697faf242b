//! # `circular-deque` - Growable Ring-Buffer Deque
//!
//! A double-ended queue stored in one contiguous block of slots addressed
//! through a wrapping head index. Provides amortized O(1) push/pop at both
//! ends, O(1) random access by logical index, and insertion/removal at
//! logical position `k` of `n` elements in O(min(k, n − k)) element moves.
//!
//! ## Layout
//!
//! ```text
//!   capacity 8, head 6, len 5
//!
//!    0   1   2   3   4   5   6   7
//!  [ c | d | e | . | . | . | a | b ]
//!                ^tail       ^head
//! ```
//!
//! Logical index `i` lives at physical slot `(head + i) mod capacity`. Slots
//! outside the live region are never initialized. One slot always stays free
//! once a block exists, so `head == tail` only for an empty buffer.
//!
//! ## Guarantees
//!
//! - **Growth**: capacity goes 0 → 2 and then doubles. The new block is
//!   allocated before any element moves, so allocation failure leaves the
//!   buffer untouched; the fallible `try_*` operations report it as
//!   [`TryReserveError`].
//! - **Clear**: [`CircularBuffer::clear`] drops the elements *and* releases
//!   the block.
//! - **Cursors**: [`Cursor`] and [`CursorMut`] are random-access positions
//!   whose ordering and distance stay correct across the wrap point. They
//!   borrow the buffer, so a cursor can never outlive a reallocation.
//!
//! ## Cargo features
//!
//! - `tracing`: emit `tracing` events on growth and clear.
//! - `parallel`: `rayon` parallel iterators.
//! - `proptest`: the [`strategy`] module with `proptest` generators.
//!
//! ## Example
//!
//! ```rust
//! use circular_deque::CircularBuffer;
//!
//! let mut buf = CircularBuffer::new();
//! buf.push_back(2);
//! buf.push_back(3);
//! buf.push_front(1);
//! buf.insert(1, 9);
//! assert_eq!(buf, [1, 9, 2, 3]);
//!
//! let begin = buf.begin();
//! let end = buf.end();
//! assert!(begin < end);
//! assert_eq!(end - begin, 4);
//! assert_eq!(begin.range_to(end).copied().collect::<Vec<_>>(), vec![1, 9, 2, 3]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub mod error;
pub mod ring;

#[cfg(feature = "proptest")]
pub mod strategy;

pub use error::{InsertError, TryReserveError};
pub use ring::{CircularBuffer, Cursor, CursorMut, IntoIter, Iter, IterMut, Reversed, RingCursor};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Block pointer + length, head, tail, len.
    assert!(mem::size_of::<CircularBuffer<u64>>() == mem::size_of::<usize>() * 5);
    // An empty buffer costs nothing extra for zero-sized elements.
    assert!(mem::size_of::<CircularBuffer<()>>() == mem::size_of::<CircularBuffer<u8>>());
};
