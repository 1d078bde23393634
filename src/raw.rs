//! Heap representation of an [SsoBuf](crate::SsoBuf)

use crate::alloc::alloc::{self, Layout};
use core::ptr::NonNull;
use core::{error, fmt};

/// Maximum number of content bytes a buffer can hold.
///
/// One extra byte is always allocated for the trailing NUL terminator,
/// so the backing allocation never exceeds `isize::MAX` bytes.
pub const MAX_SIZE: usize = isize::MAX as usize - 1;

/// Heap-allocated representation.
///
/// `ptr` exclusively owns an allocation of `cap + 1` bytes. The extra
/// slot holds the NUL terminator.
pub(crate) struct RawBuf {
    pub ptr: NonNull<u8>,
    pub cap: usize,
    pub len: usize,
}

/// Represents an error when growing a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    /// The requested length exceeds [MAX_SIZE].
    ///
    /// This is reported before any allocation is attempted.
    CapacityOverflow,
    /// The allocator failed to provide the requested layout.
    AllocError(Layout),
}

impl ReserveError {
    pub(crate) fn handle(&self) -> ! {
        if let Self::AllocError(layout) = self {
            alloc::handle_alloc_error(*layout)
        }
        panic!("Fatal error: {self}")
    }
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => {
                write!(f, "requested capacity exceeds the maximum buffer size ({MAX_SIZE})")
            }
            Self::AllocError(layout) => {
                write!(f, "failed to allocate {} bytes", layout.size())
            }
        }
    }
}

impl error::Error for ReserveError {}

/// Capacity to use when a buffer with capacity `current` must grow to
/// hold at least `required` bytes.
///
/// Anything short of doubling is rounded up to `2 * current`, so that
/// repeated small appends stay amortized O(1). The result is clamped
/// to [MAX_SIZE]; a `required` beyond that is an error.
pub(crate) const fn grow_amortized(current: usize, required: usize) -> Result<usize, ReserveError> {
    if required > MAX_SIZE {
        return Err(ReserveError::CapacityOverflow);
    }
    let mut cap = required;
    if cap < current * 2 {
        cap = current * 2;
        if cap > MAX_SIZE {
            cap = MAX_SIZE;
        }
    }
    Ok(cap)
}

impl RawBuf {
    /// Allocates a buffer able to hold `cap` bytes plus the terminator.
    ///
    /// The contents (including the terminator slot) are uninitialized.
    pub fn allocate(cap: usize) -> Result<Self, ReserveError> {
        let Ok(layout) = Layout::array::<u8>(cap + 1) else {
            return Err(ReserveError::CapacityOverflow);
        };
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(ReserveError::AllocError(layout));
        };
        Ok(Self { ptr, cap, len: 0 })
    }

    /// Reallocates the buffer to hold exactly `new_cap` bytes plus the
    /// terminator, preserving the first `min(cap, new_cap) + 1` bytes.
    ///
    /// On failure the old buffer is left untouched.
    pub fn resize(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        let Ok(new_layout) = Layout::array::<u8>(new_cap + 1) else {
            return Err(ReserveError::CapacityOverflow);
        };
        let old_layout = Layout::array::<u8>(self.cap + 1).unwrap();
        let ptr = self.ptr.as_ptr();
        let new_ptr = unsafe { alloc::realloc(ptr, old_layout, new_layout.size()) };
        let Some(new_ptr) = NonNull::new(new_ptr) else {
            return Err(ReserveError::AllocError(new_layout));
        };
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// # Safety
    /// The buffer must not be accessed again after this call.
    pub unsafe fn destroy(&mut self) {
        let layout = Layout::array::<u8>(self.cap + 1).unwrap();
        unsafe {
            alloc::dealloc(self.ptr.as_ptr(), layout);
        }
    }
}

impl Clone for RawBuf {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for RawBuf {}
