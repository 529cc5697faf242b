//! Error types for fallible growth.
//!
//! Growth is the only place a `CircularBuffer` can fail at runtime. Every other
//! precondition (popping an empty buffer, indexing past the end) is expressed
//! through `Option` or a panic.

use core::alloc::Layout;
use core::fmt;

/// The error type for `try_reserve` and the other fallible growth paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryReserveError {
    /// The requested capacity exceeds `isize::MAX` bytes or overflows `usize`.
    CapacityOverflow,
    /// The allocator refused to hand out a block for `layout`.
    AllocError {
        /// The layout of the block that could not be allocated.
        layout: Layout,
    },
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")?;
        match self {
            TryReserveError::CapacityOverflow => {
                f.write_str(" because the computed capacity exceeded the collection's maximum")
            }
            TryReserveError::AllocError { layout } => write!(
                f,
                " because the memory allocator returned an error (size {}, align {})",
                layout.size(),
                layout.align()
            ),
        }
    }
}

impl std::error::Error for TryReserveError {}

/// A push or insert that could not grow the buffer.
///
/// The rejected element is handed back so the caller can retry or drop it.
#[derive(Clone, PartialEq, Eq)]
pub struct InsertError<T> {
    /// The element that could not be stored.
    pub element: T,
    /// Why the buffer could not grow.
    pub error: TryReserveError,
}

impl<T> InsertError<T> {
    /// Discards the element and keeps the underlying reserve error.
    pub fn into_error(self) -> TryReserveError {
        self.error
    }
}

impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not make room for element: {}", self.error)
    }
}

impl<T> std::error::Error for InsertError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<InsertError<T>> for TryReserveError {
    fn from(err: InsertError<T>) -> Self {
        err.error
    }
}
