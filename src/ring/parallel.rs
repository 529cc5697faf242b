//! Rayon parallel iteration over the two contiguous halves.

use super::CircularBuffer;
use rayon::iter::Chain;
use rayon::prelude::*;
use rayon::slice::{Iter, IterMut};

impl<T: Sync> CircularBuffer<T> {
    /// Parallel iterator in logical order.
    pub fn par_iter(&self) -> Chain<Iter<'_, T>, Iter<'_, T>> {
        let (front, back) = self.as_slices();
        front.par_iter().chain(back.par_iter())
    }
}

impl<T: Send> CircularBuffer<T> {
    /// Parallel iterator with mutable access, in logical order.
    pub fn par_iter_mut(&mut self) -> Chain<IterMut<'_, T>, IterMut<'_, T>> {
        let (front, back) = self.as_mut_slices();
        front.par_iter_mut().chain(back.par_iter_mut())
    }
}
