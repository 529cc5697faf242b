//! Random-access cursors over a `CircularBuffer`.
//!
//! A cursor is a value type: a view of the slot block plus a physical slot
//! index, the buffer head at creation (`start`) and the capacity. Nothing is
//! owned. Cursors borrow the buffer they came from, so growth or shifting
//! cannot happen while one is alive.
//!
//! Ordering and distance are wrap-aware. A cursor whose physical index is
//! below `start` has wrapped past the end of the block and is therefore
//! further along than any cursor that has not, even though its raw index is
//! smaller:
//!
//! ```text
//!   capacity 8, start 5, len 5
//!
//!    0   1   2   3   4   5   6   7
//!  [ d | e | . | . | . | a | b | c ]
//!            ^end        ^begin
//!
//!  begin: unwrapped, index 5  -> offset 0
//!  end:   wrapped,   index 2  -> offset 5
//! ```

use super::iter::Iter;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::MaybeUninit;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;

/// Physical position plus the anchor needed to order it.
#[derive(Clone, Copy)]
pub(crate) struct Position {
    index: usize,
    start: usize,
    capacity: usize,
}

impl Position {
    #[inline(always)]
    pub(crate) fn new(index: usize, start: usize, capacity: usize) -> Self {
        Self {
            index,
            start,
            capacity,
        }
    }

    #[inline(always)]
    fn is_wrapped(&self) -> bool {
        self.index < self.start
    }

    /// Logical offset from `start`.
    #[inline(always)]
    fn offset(&self) -> usize {
        if self.is_wrapped() {
            self.index + self.capacity - self.start
        } else {
            self.index - self.start
        }
    }

    #[inline]
    fn step_forward(&mut self, step: usize) {
        let idx = self.index + step;
        self.index = if idx >= self.capacity {
            idx - self.capacity
        } else {
            idx
        };
    }

    #[inline]
    fn advance(&mut self, k: isize) {
        if self.capacity == 0 {
            return;
        }
        let step = k.rem_euclid(self.capacity as isize) as usize;
        self.step_forward(step);
    }

    #[inline]
    fn retreat(&mut self, k: isize) {
        if self.capacity == 0 {
            return;
        }
        let step = k.rem_euclid(self.capacity as isize) as usize;
        if step != 0 {
            self.step_forward(self.capacity - step);
        }
    }

    /// `self - origin`, corrected by a full turn when the two sit on opposite
    /// sides of the wrap point.
    #[inline]
    fn distance(&self, origin: &Position) -> isize {
        let raw = self.index as isize - origin.index as isize;
        if self.is_wrapped() == origin.is_wrapped() {
            raw
        } else if self.index < origin.index {
            raw + self.capacity as isize
        } else {
            raw - self.capacity as isize
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.is_wrapped(), self.index).cmp(&(other.is_wrapped(), other.index))
    }
}

/// # Safety
/// Every slot in `slots` holds a live value.
#[inline(always)]
unsafe fn assume_init_slice<T>(slots: &[MaybeUninit<T>]) -> &[T] {
    &*(slots as *const [MaybeUninit<T>] as *const [T])
}

/// Movement shared by both cursor variants; lets [`Reversed`] wrap either.
pub trait RingCursor {
    /// Moves `k` logical positions toward the back (toward the front if negative).
    fn advance(&mut self, k: isize);

    /// Moves `k` logical positions toward the front (toward the back if negative).
    fn retreat(&mut self, k: isize);

    /// Logical index the cursor points at; `len` for the end cursor.
    fn logical_index(&self) -> usize;
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A shared cursor. `Copy`, ordered, and subtractable.
pub struct Cursor<'a, T> {
    slots: &'a [MaybeUninit<T>],
    len: usize,
    pos: Position,
}

impl<'a, T> Cursor<'a, T> {
    #[inline]
    pub(crate) fn new(slots: &'a [MaybeUninit<T>], len: usize, index: usize, start: usize) -> Self {
        Self {
            slots,
            len,
            pos: Position::new(index, start, slots.len()),
        }
    }

    #[inline]
    fn peek(&self, pos: Position) -> Option<&'a T> {
        if pos.offset() < self.len {
            // SAFETY: offsets below `len` from the head are live slots.
            Some(unsafe { self.slots.get_unchecked(pos.index).assume_init_ref() })
        } else {
            None
        }
    }

    /// The element under the cursor, or `None` at (or past) the end.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        self.peek(self.pos)
    }

    /// Logical index of the cursor; `len` for the end cursor.
    #[inline]
    pub fn logical_index(&self) -> usize {
        self.pos.offset()
    }

    /// Steps one element toward the back.
    #[inline]
    pub fn move_next(&mut self) {
        self.pos.advance(1);
    }

    /// Steps one element toward the front.
    #[inline]
    pub fn move_prev(&mut self) {
        self.pos.retreat(1);
    }

    /// Iterates the elements in `[self, end)`.
    ///
    /// The range is clamped to the live region, so cursors moved past the end
    /// yield nothing.
    pub fn range_to(self, end: Cursor<'a, T>) -> Iter<'a, T> {
        let capacity = self.slots.len();
        let from = self.logical_index().min(self.len);
        let to = end.logical_index().min(self.len).max(from);
        let count = to - from;

        let mut first = self.pos;
        first.index = first.start;
        first.advance(from as isize);
        let head_run = count.min(capacity - first.index);

        // SAFETY: `[from, to)` lies inside the live region.
        unsafe {
            Iter::new(
                assume_init_slice(&self.slots[first.index..first.index + head_run]),
                assume_init_slice(&self.slots[..count - head_run]),
            )
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("logical_index", &self.logical_index())
            .field("len", &self.len)
            .field("capacity", &self.pos.capacity)
            .finish()
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.slots.as_ptr(), other.slots.as_ptr()) && self.pos == other.pos
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> Hash for Cursor<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slots.as_ptr().hash(state);
        self.pos.index.hash(state);
    }
}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Only meaningful between cursors of the same buffer.
impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos.cmp(&other.pos)
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    #[inline]
    fn add_assign(&mut self, k: isize) {
        self.pos.advance(k);
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    #[inline]
    fn sub_assign(&mut self, k: isize) {
        self.pos.retreat(k);
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, k: isize) -> Self {
        self += k;
        self
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, k: isize) -> Self {
        self -= k;
        self
    }
}

impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Cursor<'a, T>) -> isize {
        self.pos.distance(&origin.pos)
    }
}

impl<T> RingCursor for Cursor<'_, T> {
    fn advance(&mut self, k: isize) {
        *self += k;
    }

    fn retreat(&mut self, k: isize) {
        *self -= k;
    }

    fn logical_index(&self) -> usize {
        Cursor::logical_index(self)
    }
}

// ---------------------------------------------------------------------------
// CursorMut
// ---------------------------------------------------------------------------

/// An exclusive cursor. Converts into a [`Cursor`], never the reverse.
pub struct CursorMut<'a, T> {
    slots: &'a mut [MaybeUninit<T>],
    len: usize,
    pos: Position,
}

impl<'a, T> CursorMut<'a, T> {
    #[inline]
    pub(crate) fn new(
        slots: &'a mut [MaybeUninit<T>],
        len: usize,
        index: usize,
        start: usize,
    ) -> Self {
        let capacity = slots.len();
        Self {
            slots,
            len,
            pos: Position::new(index, start, capacity),
        }
    }

    #[inline]
    fn peek(&self, pos: Position) -> Option<&T> {
        if pos.offset() < self.len {
            // SAFETY: offsets below `len` from the head are live slots.
            Some(unsafe { self.slots.get_unchecked(pos.index).assume_init_ref() })
        } else {
            None
        }
    }

    #[inline]
    fn peek_mut(&mut self, pos: Position) -> Option<&mut T> {
        if pos.offset() < self.len {
            // SAFETY: offsets below `len` from the head are live slots.
            Some(unsafe { self.slots.get_unchecked_mut(pos.index).assume_init_mut() })
        } else {
            None
        }
    }

    /// The element under the cursor, or `None` at (or past) the end.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.peek(self.pos)
    }

    /// Mutable access to the element under the cursor.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.peek_mut(self.pos)
    }

    /// Gives up the cursor, keeping the borrow of the element under it.
    pub fn into_mut(self) -> Option<&'a mut T> {
        let CursorMut { slots, len, pos } = self;
        if pos.offset() < len {
            // SAFETY: offsets below `len` from the head are live slots.
            Some(unsafe { slots.get_unchecked_mut(pos.index).assume_init_mut() })
        } else {
            None
        }
    }

    /// A shared cursor at the same position, borrowing from this one.
    #[inline]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor {
            slots: self.slots,
            len: self.len,
            pos: self.pos,
        }
    }

    /// Logical index of the cursor; `len` for the end cursor.
    #[inline]
    pub fn logical_index(&self) -> usize {
        self.pos.offset()
    }

    /// Steps one element toward the back.
    #[inline]
    pub fn move_next(&mut self) {
        self.pos.advance(1);
    }

    /// Steps one element toward the front.
    #[inline]
    pub fn move_prev(&mut self) {
        self.pos.retreat(1);
    }
}

impl<'a, T> From<CursorMut<'a, T>> for Cursor<'a, T> {
    fn from(cursor: CursorMut<'a, T>) -> Self {
        let CursorMut { slots, len, pos } = cursor;
        Cursor { slots, len, pos }
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("logical_index", &self.logical_index())
            .field("len", &self.len)
            .field("capacity", &self.pos.capacity)
            .finish()
    }
}

impl<T> PartialEq for CursorMut<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.slots.as_ptr(), other.slots.as_ptr()) && self.pos == other.pos
    }
}

impl<T> Eq for CursorMut<'_, T> {}

impl<T> PartialOrd for CursorMut<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for CursorMut<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos.cmp(&other.pos)
    }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
    #[inline]
    fn add_assign(&mut self, k: isize) {
        self.pos.advance(k);
    }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
    #[inline]
    fn sub_assign(&mut self, k: isize) {
        self.pos.retreat(k);
    }
}

impl<T> Add<isize> for CursorMut<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, k: isize) -> Self {
        self += k;
        self
    }
}

impl<T> Sub<isize> for CursorMut<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, k: isize) -> Self {
        self -= k;
        self
    }
}

impl<T> RingCursor for CursorMut<'_, T> {
    fn advance(&mut self, k: isize) {
        *self += k;
    }

    fn retreat(&mut self, k: isize) {
        *self -= k;
    }

    fn logical_index(&self) -> usize {
        CursorMut::logical_index(self)
    }
}

// ---------------------------------------------------------------------------
// Reversed
// ---------------------------------------------------------------------------

/// Reverse adapter: walks from the back and reads the element just before its
/// base, so `Reversed::new(end)` is the reverse begin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Reversed<C> {
    base: C,
}

impl<C> Reversed<C> {
    /// Wraps `base`; the adapter reads the element before it.
    #[inline]
    pub fn new(base: C) -> Self {
        Self { base }
    }

    /// The underlying forward cursor.
    #[inline]
    pub fn base(&self) -> &C {
        &self.base
    }

    /// Unwraps the underlying forward cursor.
    #[inline]
    pub fn into_base(self) -> C {
        self.base
    }
}

impl<C: RingCursor> Reversed<C> {
    /// Steps one element toward the front of the buffer.
    #[inline]
    pub fn move_next(&mut self) {
        self.base.retreat(1);
    }

    /// Steps one element toward the back of the buffer.
    #[inline]
    pub fn move_prev(&mut self) {
        self.base.advance(1);
    }
}

impl<'a, T> Reversed<Cursor<'a, T>> {
    /// The element before the base, or `None` once the front is passed.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        let mut pos = self.base.pos;
        pos.retreat(1);
        self.base.peek(pos)
    }
}

impl<'a, T> Reversed<CursorMut<'a, T>> {
    /// The element before the base, or `None` once the front is passed.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        let mut pos = self.base.pos;
        pos.retreat(1);
        self.base.peek(pos)
    }

    /// Mutable access to the element before the base.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        let mut pos = self.base.pos;
        pos.retreat(1);
        self.base.peek_mut(pos)
    }
}

impl<C: Ord> PartialOrd for Reversed<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for Reversed<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.base.cmp(&self.base)
    }
}

impl<C: RingCursor> AddAssign<isize> for Reversed<C> {
    #[inline]
    fn add_assign(&mut self, k: isize) {
        self.base.retreat(k);
    }
}

impl<C: RingCursor> SubAssign<isize> for Reversed<C> {
    #[inline]
    fn sub_assign(&mut self, k: isize) {
        self.base.advance(k);
    }
}

impl<C: RingCursor> Add<isize> for Reversed<C> {
    type Output = Self;

    #[inline]
    fn add(mut self, k: isize) -> Self {
        self += k;
        self
    }
}

impl<C: RingCursor> Sub<isize> for Reversed<C> {
    type Output = Self;

    #[inline]
    fn sub(mut self, k: isize) -> Self {
        self -= k;
        self
    }
}

impl<'a, T> Sub for Reversed<Cursor<'a, T>> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        origin.base - self.base
    }
}
