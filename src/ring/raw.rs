//! `RawRing` - backing store, index translation and per-slot element lifetime.
//!
//! The ring owns a boxed slice of `MaybeUninit<T>` slots. Exactly the `len`
//! slots starting at `head` (wrapping at `capacity`) hold live values; every
//! other slot is uninitialized. Nothing outside this module writes or reads a
//! slot directly.

use crate::error::TryReserveError;
use core::alloc::Layout;
use core::mem::{self, MaybeUninit};
use core::ops::Range;
use core::ptr;
use core::slice;

pub(crate) struct RawRing<T> {
    slots: Box<[MaybeUninit<T>]>,
    /// Physical slot of logical element 0.
    head: usize,
    /// Physical slot one past the last logical element.
    tail: usize,
    len: usize,
}

impl<T> RawRing<T> {
    /// An empty ring with no backing block.
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new().into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// An empty ring whose block has exactly `capacity` slots.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self {
            slots: Self::allocate(capacity)?,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    fn allocate(capacity: usize) -> Result<Box<[MaybeUninit<T>]>, TryReserveError> {
        if capacity == 0 {
            return Ok(Vec::new().into_boxed_slice());
        }
        let layout =
            Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;
        let mut block: Vec<MaybeUninit<T>> = Vec::new();
        block
            .try_reserve_exact(capacity)
            .map_err(|_| TryReserveError::AllocError { layout })?;
        block.resize_with(capacity, MaybeUninit::uninit);
        Ok(block.into_boxed_slice())
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    #[inline(always)]
    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    #[inline(always)]
    pub(crate) fn slots(&self) -> &[MaybeUninit<T>] {
        &self.slots
    }

    #[inline(always)]
    pub(crate) fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        &mut self.slots
    }

    // ---- index translation ----

    #[inline(always)]
    pub(crate) fn next(&self, x: usize) -> usize {
        let x = x + 1;
        if x == self.capacity() {
            0
        } else {
            x
        }
    }

    #[inline(always)]
    pub(crate) fn prev(&self, x: usize) -> usize {
        if x == 0 {
            self.capacity() - 1
        } else {
            x - 1
        }
    }

    /// Maps a logical offset to its physical slot.
    ///
    /// `logical` may be anything below `capacity`, including `len` (the end slot).
    #[inline(always)]
    pub(crate) fn physical(&self, logical: usize) -> usize {
        debug_assert!(logical <= self.capacity());
        let idx = self.head + logical;
        if idx >= self.capacity() {
            idx - self.capacity()
        } else {
            idx
        }
    }

    /// Physical ranges of the live region, in logical order.
    pub(crate) fn live_ranges(&self) -> (Range<usize>, Range<usize>) {
        if self.head + self.len <= self.capacity() {
            (self.head..self.head + self.len, 0..0)
        } else {
            (self.head..self.capacity(), 0..self.tail)
        }
    }

    // ---- growth ----

    /// Makes sure a mutation that brings the length to `required` can proceed.
    ///
    /// One slot always stays free, so growth triggers once `required` reaches
    /// the capacity. The capacity goes to 2 from empty and doubles otherwise.
    pub(crate) fn ensure_capacity(&mut self, required: usize) -> Result<(), TryReserveError> {
        if required < self.capacity() {
            return Ok(());
        }
        let mut target = self.capacity();
        while required >= target {
            target = if target == 0 {
                2
            } else {
                target
                    .checked_mul(2)
                    .ok_or(TryReserveError::CapacityOverflow)?
            };
        }
        self.grow_to(target)
    }

    /// Relocates every live element into a fresh block of `capacity` slots.
    ///
    /// The block is allocated before any element moves, so a failure leaves
    /// `self` exactly as it was.
    fn grow_to(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        debug_assert!(capacity > self.len);
        let mut fresh = match Self::try_with_capacity(capacity) {
            Ok(fresh) => fresh,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    old_capacity = self.capacity(),
                    capacity,
                    error = %err,
                    "ring growth failed"
                );
                return Err(err);
            }
        };

        let (front, back) = self.live_ranges();
        // SAFETY: both ranges are live and in bounds of `self.slots`; the
        // destination holds `front.len() + back.len() == self.len < capacity`
        // uninitialized slots. Ownership moves bitwise to `fresh`.
        unsafe {
            let src = self.slots.as_ptr();
            let dst = fresh.slots.as_mut_ptr();
            ptr::copy_nonoverlapping(src.add(front.start), dst, front.len());
            ptr::copy_nonoverlapping(src, dst.add(front.len()), back.len());
        }
        fresh.len = self.len;
        fresh.tail = self.len;

        // The old block no longer owns any element.
        self.len = 0;
        self.head = 0;
        self.tail = 0;
        mem::swap(self, &mut fresh);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            old_capacity = fresh.capacity(),
            capacity,
            len = self.len,
            "ring grew"
        );
        Ok(())
    }

    // ---- element lifetime ----

    /// # Safety
    /// `phys < capacity` and the slot does not hold a live value.
    #[inline(always)]
    pub(crate) unsafe fn write(&mut self, phys: usize, value: T) {
        self.slots.get_unchecked_mut(phys).write(value);
    }

    /// Moves the value out of a slot, leaving it logically uninitialized.
    ///
    /// # Safety
    /// `phys < capacity` and the slot holds a live value.
    #[inline(always)]
    pub(crate) unsafe fn read(&self, phys: usize) -> T {
        self.slots.get_unchecked(phys).assume_init_read()
    }

    /// Moves the value in `src` into the (dead) slot `dst`.
    ///
    /// # Safety
    /// Both indices are in bounds, `src` is live and `dst` is not.
    #[inline(always)]
    pub(crate) unsafe fn relocate(&mut self, dst: usize, src: usize) {
        let base = self.slots.as_mut_ptr();
        ptr::copy_nonoverlapping(base.add(src), base.add(dst), 1);
    }

    /// # Safety
    /// The slot at `phys` holds a live value.
    #[inline(always)]
    pub(crate) unsafe fn slot(&self, phys: usize) -> &T {
        self.slots.get_unchecked(phys).assume_init_ref()
    }

    /// # Safety
    /// The slot at `phys` holds a live value.
    #[inline(always)]
    pub(crate) unsafe fn slot_mut(&mut self, phys: usize) -> &mut T {
        self.slots.get_unchecked_mut(phys).assume_init_mut()
    }

    // ---- end operations ----

    /// # Safety
    /// `len + 1 < capacity`.
    #[inline]
    pub(crate) unsafe fn push_back_unchecked(&mut self, value: T) {
        self.write(self.tail, value);
        self.tail = self.next(self.tail);
        self.len += 1;
    }

    /// # Safety
    /// `len + 1 < capacity`.
    #[inline]
    pub(crate) unsafe fn push_front_unchecked(&mut self, value: T) {
        let head = self.prev(self.head);
        self.write(head, value);
        self.head = head;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.tail = self.prev(self.tail);
        self.len -= 1;
        // SAFETY: the old last element lived at the new `tail`.
        Some(unsafe { self.read(self.tail) })
    }

    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let head = self.head;
        self.len -= 1;
        self.head = self.next(head);
        // SAFETY: `head` held logical element 0.
        Some(unsafe { self.read(head) })
    }

    /// Moves `head` one slot back and counts the slot as live.
    ///
    /// # Safety
    /// The caller writes the new front slot before the ring is observed again.
    #[inline]
    pub(crate) unsafe fn extend_front(&mut self) {
        self.head = self.prev(self.head);
        self.len += 1;
    }

    /// # Safety
    /// The caller writes the new back slot before the ring is observed again.
    #[inline]
    pub(crate) unsafe fn extend_back(&mut self) {
        self.tail = self.next(self.tail);
        self.len += 1;
    }

    /// Forgets the front slot. Its value must already have been moved out.
    ///
    /// # Safety
    /// `len > 0` and the front slot no longer holds a value that needs dropping.
    #[inline]
    pub(crate) unsafe fn retract_front(&mut self) {
        self.head = self.next(self.head);
        self.len -= 1;
    }

    /// # Safety
    /// `len > 0` and the back slot no longer holds a value that needs dropping.
    #[inline]
    pub(crate) unsafe fn retract_back(&mut self) {
        self.tail = self.prev(self.tail);
        self.len -= 1;
    }

    // ---- views ----

    pub(crate) fn as_slices(&self) -> (&[T], &[T]) {
        let (front, back) = self.live_ranges();
        // SAFETY: both ranges cover live slots only.
        unsafe {
            let base = self.slots.as_ptr().cast::<T>();
            (
                slice::from_raw_parts(base.add(front.start), front.len()),
                slice::from_raw_parts(base, back.len()),
            )
        }
    }

    pub(crate) fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (front, back) = self.live_ranges();
        // SAFETY: both ranges cover live slots only and never overlap.
        unsafe {
            let base = self.slots.as_mut_ptr().cast::<T>();
            (
                slice::from_raw_parts_mut(base.add(front.start), front.len()),
                slice::from_raw_parts_mut(base, back.len()),
            )
        }
    }
}

impl<T> Drop for RawRing<T> {
    fn drop(&mut self) {
        /// Drops the back half even if a destructor in the front half panics.
        struct Dropper<'a, T>(&'a mut [T]);

        impl<T> Drop for Dropper<'_, T> {
            fn drop(&mut self) {
                // SAFETY: the slice covers live slots that are dropped exactly once.
                unsafe { ptr::drop_in_place(self.0) }
            }
        }

        let (front, back) = self.as_mut_slices();
        // SAFETY: the elements are dropped exactly once and the block is freed
        // by the `Box` afterwards.
        unsafe {
            let _back = Dropper(back);
            ptr::drop_in_place(front);
        }
    }
}
