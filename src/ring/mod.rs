//! `CircularBuffer` - a growable ring-buffer deque.
//!
//! Elements live in a single block of slots addressed through a wrapping
//! `head`. Pushing and popping at either end is amortized O(1), indexing is
//! O(1), and inserting or erasing at logical position `k` of `n` moves
//! `min(k, n - k)` elements by shifting whichever side is shorter.
//!
//! Performance characteristics:
//! - Push/Pop: amortized O(1); growth doubles the block
//! - Access: O(1) with a single conditional subtraction
//! - Insert/Erase: O(min(k, n - k)) element moves
//! - Memory: one block, one slot always kept free once allocated

mod cursor;
mod iter;
mod raw;
mod serde_impl;

#[cfg(feature = "parallel")]
mod parallel;

pub use cursor::{Cursor, CursorMut, Reversed, RingCursor};
pub use iter::{IntoIter, Iter, IterMut};

use crate::error::{InsertError, TryReserveError};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};
use raw::RawRing;

/// A double-ended queue stored in a growable ring buffer.
///
/// The block keeps one slot free, so a buffer of capacity `C` holds at most
/// `C - 1` elements before the next push doubles it.
pub struct CircularBuffer<T> {
    raw: RawRing<T>,
}

#[cold]
#[inline(never)]
fn handle_reserve_error(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => panic!("capacity overflow"),
        TryReserveError::AllocError { layout } => std::alloc::handle_alloc_error(layout),
    }
}

impl<T> CircularBuffer<T> {
    /// Creates an empty buffer without allocating.
    #[inline]
    pub fn new() -> Self {
        Self {
            raw: RawRing::new(),
        }
    }

    /// Creates an empty buffer whose block has exactly `capacity` slots.
    ///
    /// # Panics
    /// Panics if the capacity overflows; aborts on allocation failure.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(buf) => buf,
            Err(err) => handle_reserve_error(err),
        }
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    ///
    /// # Errors
    /// Returns `TryReserveError` if the block cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            raw: RawRing::try_with_capacity(capacity)?,
        })
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the buffer holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Total slot count of the current block.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    // ---- capacity ----

    /// Grows the block so `additional` more elements fit without reallocating.
    ///
    /// # Panics
    /// Panics if the capacity overflows; aborts on allocation failure.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            handle_reserve_error(err);
        }
    }

    /// Fallible version of [`reserve`](Self::reserve). On error the buffer is
    /// left unchanged.
    ///
    /// # Errors
    /// Returns `TryReserveError` if the capacity overflows or the allocator fails.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        if additional == 0 {
            return Ok(());
        }
        self.raw.ensure_capacity(required)
    }

    // ---- element access ----

    /// Reference to the element at logical `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            // SAFETY: checked against `len`.
            Some(unsafe { self.get_unchecked(index) })
        } else {
            None
        }
    }

    /// Mutable reference to the element at logical `index`, if any.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            // SAFETY: checked against `len`.
            Some(unsafe { self.get_unchecked_mut(index) })
        } else {
            None
        }
    }

    /// Reference to the element at logical `index` without a bounds check.
    ///
    /// # Safety
    /// `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len(), "index {index} out of bounds");
        self.raw.slot(self.raw.physical(index))
    }

    /// Mutable reference to the element at logical `index` without a bounds check.
    ///
    /// # Safety
    /// `index < self.len()`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len(), "index {index} out of bounds");
        let phys = self.raw.physical(index);
        self.raw.slot_mut(phys)
    }

    /// First element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Mutable first element.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Mutable last element.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len().checked_sub(1) {
            Some(i) => self.get_mut(i),
            None => None,
        }
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let (front, back) = self.as_slices();
        front.contains(value) || back.contains(value)
    }

    /// The live elements as two contiguous runs, in logical order.
    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.raw.as_slices()
    }

    /// Mutable version of [`as_slices`](Self::as_slices).
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        self.raw.as_mut_slices()
    }

    // ---- end operations ----

    /// Appends an element.
    ///
    /// # Panics
    /// Panics if the capacity overflows; aborts on allocation failure.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            handle_reserve_error(err.error);
        }
    }

    /// Prepends an element.
    ///
    /// # Panics
    /// Panics if the capacity overflows; aborts on allocation failure.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            handle_reserve_error(err.error);
        }
    }

    /// Appends an element, handing it back if the buffer cannot grow.
    ///
    /// # Errors
    /// Returns `InsertError` carrying `value` when growth fails.
    #[inline]
    pub fn try_push_back(&mut self, value: T) -> Result<(), InsertError<T>> {
        if let Err(error) = self.raw.ensure_capacity(self.len() + 1) {
            return Err(InsertError {
                element: value,
                error,
            });
        }
        // SAFETY: capacity ensured above.
        unsafe { self.raw.push_back_unchecked(value) };
        Ok(())
    }

    /// Prepends an element, handing it back if the buffer cannot grow.
    ///
    /// # Errors
    /// Returns `InsertError` carrying `value` when growth fails.
    #[inline]
    pub fn try_push_front(&mut self, value: T) -> Result<(), InsertError<T>> {
        if let Err(error) = self.raw.ensure_capacity(self.len() + 1) {
            return Err(InsertError {
                element: value,
                error,
            });
        }
        // SAFETY: capacity ensured above.
        unsafe { self.raw.push_front_unchecked(value) };
        Ok(())
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        self.raw.pop_back()
    }

    /// Removes and returns the first element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.raw.pop_front()
    }

    // ---- positional operations ----

    /// Inserts `value` at logical `pos`, shifting the shorter side.
    ///
    /// Returns a cursor to the inserted element.
    ///
    /// # Panics
    /// Panics if `pos > len`, if the capacity overflows; aborts on allocation
    /// failure.
    pub fn insert(&mut self, pos: usize, value: T) -> CursorMut<'_, T> {
        match self.try_insert(pos, value) {
            Ok(cursor) => cursor,
            Err(err) => handle_reserve_error(err.error),
        }
    }

    /// Fallible version of [`insert`](Self::insert).
    ///
    /// # Errors
    /// Returns `InsertError` carrying `value` when growth fails; the buffer is
    /// unchanged.
    ///
    /// # Panics
    /// Panics if `pos > len`.
    pub fn try_insert(&mut self, pos: usize, value: T) -> Result<CursorMut<'_, T>, InsertError<T>> {
        let len = self.len();
        assert!(pos <= len, "insertion index (is {pos}) should be <= len (is {len})");
        if let Err(error) = self.raw.ensure_capacity(len + 1) {
            return Err(InsertError {
                element: value,
                error,
            });
        }

        // SAFETY: capacity leaves a free slot on either side. Every relocation
        // moves a live value into the slot vacated just before it, and the
        // hole left at `pos` is filled before anything can observe the ring.
        unsafe {
            if pos >= len - pos {
                //  [a b c d .]  insert X at 3  ->  [a b c X d]
                for i in (pos..len).rev() {
                    let (dst, src) = (self.raw.physical(i + 1), self.raw.physical(i));
                    self.raw.relocate(dst, src);
                }
                self.raw.extend_back();
            } else {
                //  [. a b c d]  insert X at 1  ->  [a X b c d]
                self.raw.extend_front();
                for i in 0..pos {
                    let (dst, src) = (self.raw.physical(i), self.raw.physical(i + 1));
                    self.raw.relocate(dst, src);
                }
            }
            let slot = self.raw.physical(pos);
            self.raw.write(slot, value);
        }

        Ok(self.cursor_mut_at(pos))
    }

    /// Removes the element at logical `pos` and returns it.
    pub fn remove(&mut self, pos: usize) -> Option<T> {
        if pos < self.len() {
            Some(self.take_at(pos))
        } else {
            None
        }
    }

    /// Removes the element at logical `pos`, shifting the shorter side.
    ///
    /// Returns a cursor to the element that now occupies `pos`, which is the
    /// end cursor if `pos` was the last index.
    ///
    /// # Panics
    /// Panics if `pos >= len`.
    pub fn erase(&mut self, pos: usize) -> CursorMut<'_, T> {
        let len = self.len();
        assert!(pos < len, "removal index (is {pos}) should be < len (is {len})");
        drop(self.take_at(pos));
        self.cursor_mut_at(pos)
    }

    fn take_at(&mut self, pos: usize) -> T {
        let len = self.len();
        debug_assert!(pos < len);
        // SAFETY: `pos` is live. After the value moves out, each relocation
        // fills the hole left by the previous one, and the final hole at one
        // end is retracted out of the live region.
        unsafe {
            let removed = self.raw.read(self.raw.physical(pos));
            if pos >= len - pos {
                for i in pos + 1..len {
                    let (dst, src) = (self.raw.physical(i - 1), self.raw.physical(i));
                    self.raw.relocate(dst, src);
                }
                self.raw.retract_back();
            } else {
                for i in (0..pos).rev() {
                    let (dst, src) = (self.raw.physical(i + 1), self.raw.physical(i));
                    self.raw.relocate(dst, src);
                }
                self.raw.retract_front();
            }
            removed
        }
    }

    /// Drops every element and releases the block, returning to the state of
    /// [`new`](Self::new). Capacity is not kept.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            released_capacity = self.capacity(),
            len = self.len(),
            "ring cleared"
        );
        self.raw = RawRing::new();
    }

    /// Exchanges the full state of two buffers in O(1). Elements are not touched.
    #[inline]
    pub fn swap(lhs: &mut Self, rhs: &mut Self) {
        core::mem::swap(&mut lhs.raw, &mut rhs.raw);
    }

    // ---- cursors ----

    fn cursor_at(&self, logical: usize) -> Cursor<'_, T> {
        Cursor::new(
            self.raw.slots(),
            self.raw.len(),
            self.raw.physical(logical),
            self.raw.head(),
        )
    }

    fn cursor_mut_at(&mut self, logical: usize) -> CursorMut<'_, T> {
        let (len, index, head) = (self.raw.len(), self.raw.physical(logical), self.raw.head());
        CursorMut::new(self.raw.slots_mut(), len, index, head)
    }

    /// Cursor at the first element (equal to [`end`](Self::end) when empty).
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T> {
        self.cursor_at(0)
    }

    /// Cursor one past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        self.cursor_at(self.len())
    }

    /// Exclusive cursor at the first element.
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        self.cursor_mut_at(0)
    }

    /// Exclusive cursor one past the last element.
    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let len = self.len();
        self.cursor_mut_at(len)
    }

    /// Reverse cursor at the last element.
    #[inline]
    pub fn rbegin(&self) -> Reversed<Cursor<'_, T>> {
        Reversed::new(self.end())
    }

    /// Reverse cursor one before the first element.
    #[inline]
    pub fn rend(&self) -> Reversed<Cursor<'_, T>> {
        Reversed::new(self.begin())
    }

    /// Exclusive reverse cursor at the last element.
    #[inline]
    pub fn rbegin_mut(&mut self) -> Reversed<CursorMut<'_, T>> {
        Reversed::new(self.end_mut())
    }

    /// Exclusive reverse cursor one before the first element.
    #[inline]
    pub fn rend_mut(&mut self) -> Reversed<CursorMut<'_, T>> {
        Reversed::new(self.begin_mut())
    }

    // ---- iteration ----

    /// Iterates front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        Iter::new(front, back)
    }

    /// Iterates front to back with mutable access.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, back) = self.as_mut_slices();
        IterMut::new(front, back)
    }
}

impl<T> Default for CircularBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for CircularBuffer<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.capacity());
        for value in self {
            // SAFETY: same block size as `self`, which holds `len < capacity`.
            unsafe { copy.raw.push_back_unchecked(value.clone()) };
        }
        copy
    }

    /// Copy-and-swap: the replacement is built completely before `self` is
    /// touched, so a panicking `T::clone` leaves `self` as it was.
    fn clone_from(&mut self, source: &Self) {
        let mut replacement = source.clone();
        Self::swap(self, &mut replacement);
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for CircularBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CircularBuffer<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for CircularBuffer<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<[T]> for CircularBuffer<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for CircularBuffer<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self == &other[..]
    }
}

impl<T: Hash> Hash for CircularBuffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T> Index<usize> for CircularBuffer<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T> IndexMut<usize> for CircularBuffer<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T> Extend<T> for CircularBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for CircularBuffer<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for CircularBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<T> From<Vec<T>> for CircularBuffer<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T> IntoIterator for CircularBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a CircularBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut CircularBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
