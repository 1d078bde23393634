/*  Copyright (C) 2025 the sso-buf authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, version 3.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>. */

//! SSO Buf
//!
//! A byte string buffer that stores short contents inline.
//!
//! An [`SsoBuf<N>`](SsoBuf) keeps up to `N - 1` bytes in an inline array
//! (one slot of the array is reserved for a trailing NUL terminator).
//! When the contents grow past that, the buffer moves to the heap.
//! The buffer only moves back inline when [shrink_to_fit](SsoBuf::shrink_to_fit)
//! is called and the contents fit.
//!
//! # Example
//! ```
//! use sso_buf::SsoBuf;
//!
//! let mut buf = SsoBuf::<16>::new();
//!
//! buf.append(b"123456789012345");
//!
//! // Up to this point no heap allocation was needed.
//! // The bytes live inside the struct itself.
//! assert!(buf.is_inline());
//!
//! buf.push(b'!'); // This moves the buffer to the heap
//!
//! assert!(!buf.is_inline());
//! assert_eq!(buf, b"123456789012345!");
//! ```
//!
//! # Memory layout
//! For an `SsoBuf<N>`
//!
//! Inline (capacity `N - 1`)
//! - u8      : Length
//! - [u8; N] : Data, NUL-terminated
//!
//! Heap
//! - u8*   : Data, NUL-terminated
//! - usize : Capacity
//! - usize : Length
//!
//! A separate one-byte discriminant records which representation is
//! active. With the default `N` the inline array fills exactly the
//! space the heap representation would occupy.
//!
//! # Terminator
//! In both representations the byte at offset `len()` is always `0`,
//! like a C string. The terminator is not part of the contents: it is
//! excluded from [len](SsoBuf::len) and [capacity](SsoBuf::capacity),
//! and every mutation rewrites it. [as_bytes_with_nul](SsoBuf::as_bytes_with_nul)
//! exposes it.

#![no_std]

extern crate alloc;
use alloc::vec::Vec;

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::ops::{Deref, DerefMut};
use core::str::Utf8Error;
use core::{error, fmt, mem, ptr, slice, str};

use static_assertions::assert_eq_size;

mod raw;
use raw::RawBuf;
pub use raw::{MAX_SIZE, ReserveError};

pub mod iter;

/// Inline size (in bytes) for which [SsoBuf] is as large as its heap
/// representation, so short contents cost no extra space at all.
pub const DEFAULT_INLINE: usize = mem::size_of::<RawBuf>() - 1;

#[derive(Clone, Copy)]
struct InlineBuf<const N: usize> {
    len: u8,
    data: [u8; N],
}

assert_eq_size!(InlineBuf<DEFAULT_INLINE>, RawBuf);

union Repr<const N: usize> {
    inline: InlineBuf<N>,
    heap: RawBuf,
}

/// Discriminant for the active representation.
///
/// This is physical state, not a function of the length: a buffer that
/// grew onto the heap stays there even if it later shrinks below the
/// inline capacity, until explicitly demoted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Mode {
    Inline,
    Heap,
}

/// A byte string buffer that stores short contents inline.
///
/// See the [crate documentation](crate) for an overview.
pub struct SsoBuf<const N: usize = DEFAULT_INLINE> {
    repr: Repr<N>,
    mode: Mode,
}

/* The heap buffer is exclusively owned and the contents are plain
 * bytes. Mutation requires &mut, which is already exclusive; the type
 * provides no further synchronization. */
unsafe impl<const N: usize> Send for SsoBuf<N> {}
unsafe impl<const N: usize> Sync for SsoBuf<N> {}

/// Error returned when a position argument falls outside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The offending byte offset
    pub index: usize,
    /// The buffer's length at the time of the call
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position {} is out of range for a buffer of length {}",
            self.index, self.len
        )
    }
}

impl error::Error for OutOfRange {}

impl<const N: usize> SsoBuf<N> {
    /// Usable bytes of the inline array. One slot is reserved for the
    /// NUL terminator.
    pub const INLINE_CAPACITY: usize = N - 1;

    /// Moves the contents to a heap buffer of capacity `new_cap`.
    ///
    /// If the allocation fails, the buffer is left untouched.
    fn promote(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        debug_assert!(self.is_inline());
        debug_assert!(new_cap >= self.len());
        let len = self.len();
        let mut heap = RawBuf::allocate(new_cap)?;
        heap.len = len;
        unsafe {
            /* Contents plus terminator */
            ptr::copy_nonoverlapping(self.repr.inline.data.as_ptr(), heap.ptr.as_ptr(), len + 1);
        }
        self.repr = Repr { heap };
        self.mode = Mode::Heap;
        Ok(())
    }

    /// Moves the contents back into the inline array and releases the
    /// heap buffer.
    ///
    /// # Panics
    /// If the current length exceeds [INLINE_CAPACITY](Self::INLINE_CAPACITY).
    /// That is a caller bug: shrink paths must check the length first.
    fn demote(&mut self) {
        if self.is_inline() {
            return;
        }
        let mut heap = unsafe { self.repr.heap };
        assert!(
            heap.len <= Self::INLINE_CAPACITY,
            "length {} does not fit the inline capacity {}",
            heap.len,
            Self::INLINE_CAPACITY
        );
        /* Zeroing the array also plants the terminator */
        let mut inline = InlineBuf {
            len: heap.len as u8,
            data: [0; N],
        };
        unsafe {
            ptr::copy_nonoverlapping(heap.ptr.as_ptr(), inline.data.as_mut_ptr(), heap.len);
            heap.destroy();
        }
        self.repr = Repr { inline };
        self.mode = Mode::Inline;
    }

    /// Stores the new length in the active representation and writes
    /// the terminator at `data()[n]`.
    ///
    /// # Safety
    /// `n` must not exceed the current capacity, and the bytes in
    /// `[0, n)` must be initialized.
    unsafe fn set_len(&mut self, n: usize) {
        debug_assert!(n <= self.capacity());
        match self.mode {
            Mode::Inline => unsafe { self.repr.inline.len = n as u8 },
            Mode::Heap => unsafe { self.repr.heap.len = n },
        }
        unsafe { self.as_mut_ptr().add(n).write(0) };
    }

    /// Replaces the `old_len` bytes at `pos` with `new_len` bytes read
    /// from `src`. A null `src` grows the region without filling it;
    /// the caller must then initialize `[pos, pos + new_len)` itself.
    ///
    /// Every insertion and deletion funnels through here.
    ///
    /// # Safety
    /// `pos + old_len <= len()` must hold, and `src`, when non-null,
    /// must be valid for `new_len` reads and must not alias the buffer.
    unsafe fn splice_raw(
        &mut self,
        pos: usize,
        old_len: usize,
        src: *const u8,
        new_len: usize,
    ) -> Result<(), ReserveError> {
        let len = self.len();
        debug_assert!(pos <= len && old_len <= len - pos);
        let remaining = len - pos - old_len;
        let Some(new_total) = (len - old_len).checked_add(new_len) else {
            return Err(ReserveError::CapacityOverflow);
        };

        if new_total <= self.capacity() {
            unsafe {
                let dat = self.as_mut_ptr();
                /* copy handles the overlap in either direction */
                ptr::copy(dat.add(pos + old_len), dat.add(pos + new_len), remaining);
                if !src.is_null() {
                    ptr::copy_nonoverlapping(src, dat.add(pos), new_len);
                }
                self.set_len(new_total);
            }
        } else {
            let new_cap = raw::grow_amortized(self.capacity(), new_total)?;
            let mut heap = RawBuf::allocate(new_cap)?;
            heap.len = new_total;
            unsafe {
                let dat = self.as_ptr();
                let dst = heap.ptr.as_ptr();
                ptr::copy_nonoverlapping(dat, dst, pos);
                if !src.is_null() {
                    ptr::copy_nonoverlapping(src, dst.add(pos), new_len);
                }
                ptr::copy_nonoverlapping(dat.add(pos + old_len), dst.add(pos + new_len), remaining);
                dst.add(new_total).write(0);
                if let Mode::Heap = self.mode {
                    self.repr.heap.destroy();
                }
            }
            self.repr = Repr { heap };
            self.mode = Mode::Heap;
        }
        Ok(())
    }

    const fn check_range(&self, pos: usize, n: usize) -> Result<(), OutOfRange> {
        let len = self.len();
        if pos > len {
            return Err(OutOfRange { index: pos, len });
        }
        if n > len - pos {
            return Err(OutOfRange { index: pos + n, len });
        }
        Ok(())
    }
}

impl<const N: usize> SsoBuf<N> {
    /// Creates a new, empty [SsoBuf]
    pub const fn new() -> Self {
        const {
            assert!(
                N >= 1 && N <= 256,
                "the inline size must be between 1 and 256 bytes"
            )
        };
        Self {
            repr: Repr {
                inline: InlineBuf {
                    len: 0,
                    data: [0; N],
                },
            },
            mode: Mode::Inline,
        }
    }

    /// Creates a new [SsoBuf] with at least the given capacity.
    ///
    /// Capacities up to [INLINE_CAPACITY](Self::INLINE_CAPACITY) need
    /// no allocation; anything larger allocates exactly `cap` bytes
    /// (plus the terminator slot) on the heap.
    pub fn with_capacity(cap: usize) -> Self {
        Self::try_with_capacity(cap).unwrap_or_else(|err| err.handle())
    }

    /// Like [with_capacity](Self::with_capacity), but returns a
    /// [ReserveError] instead of panicking when the allocation fails.
    pub fn try_with_capacity(cap: usize) -> Result<Self, ReserveError> {
        if cap <= Self::INLINE_CAPACITY {
            return Ok(Self::new());
        }
        if cap > MAX_SIZE {
            return Err(ReserveError::CapacityOverflow);
        }
        let heap = RawBuf::allocate(cap)?;
        unsafe { heap.ptr.as_ptr().write(0) };
        Ok(Self {
            repr: Repr { heap },
            mode: Mode::Heap,
        })
    }

    /// Creates a buffer holding `len` copies of `byte`.
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let buf = SsoBuf::<8>::filled(5, b'x');
    /// assert_eq!(buf, b"xxxxx");
    /// ```
    pub fn filled(len: usize, byte: u8) -> Self {
        let mut buf = Self::with_capacity(len);
        unsafe {
            buf.as_mut_ptr().write_bytes(byte, len);
            buf.set_len(len);
        }
        buf
    }

    /// Returns the number of content bytes, excluding the terminator
    #[inline]
    pub const fn len(&self) -> usize {
        match self.mode {
            Mode::Inline => unsafe { self.repr.inline.len as usize },
            Mode::Heap => unsafe { self.repr.heap.len },
        }
    }

    /// Returns true if the buffer holds no content bytes
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the usable capacity, excluding the terminator slot
    #[inline]
    pub const fn capacity(&self) -> usize {
        match self.mode {
            Mode::Inline => Self::INLINE_CAPACITY,
            Mode::Heap => unsafe { self.repr.heap.cap },
        }
    }

    /// Returns the largest length this buffer can ever reach.
    ///
    /// Growing past this reports [ReserveError::CapacityOverflow]
    /// before any allocation is attempted.
    #[inline]
    pub const fn max_size(&self) -> usize {
        MAX_SIZE
    }

    /// Returns true if the contents currently live inside the struct
    /// itself, with no heap allocation.
    ///
    /// Note that this is sticky: a buffer that once grew onto the heap
    /// reports `false` even after shrinking, until
    /// [shrink_to_fit](Self::shrink_to_fit) moves it back.
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let mut buf = SsoBuf::<8>::new();
    /// buf.append(b"1234567");
    /// assert!(buf.is_inline());
    ///
    /// buf.push(b'8');
    /// assert!(!buf.is_inline());
    ///
    /// buf.truncate(2);
    /// assert!(!buf.is_inline()); // still on the heap
    ///
    /// buf.shrink_to_fit();
    /// assert!(buf.is_inline());
    /// ```
    #[inline]
    pub const fn is_inline(&self) -> bool {
        matches!(self.mode, Mode::Inline)
    }

    /// Gets a const pointer to the first content byte
    #[inline]
    pub const fn as_ptr(&self) -> *const u8 {
        match self.mode {
            Mode::Inline => unsafe { self.repr.inline.data.as_ptr() },
            Mode::Heap => unsafe { self.repr.heap.ptr.as_ptr() },
        }
    }

    /// Gets a mutable pointer to the first content byte
    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut u8 {
        match self.mode {
            Mode::Inline => unsafe { (&raw mut self.repr.inline.data).cast() },
            Mode::Heap => unsafe { self.repr.heap.ptr.as_ptr() },
        }
    }

    /// Gets the contents as a slice, excluding the terminator
    #[inline]
    pub const fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// Gets the contents as a mutable slice, excluding the terminator
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len()) }
    }

    /// Gets the contents plus the trailing NUL terminator.
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let buf = SsoBuf::<8>::from(b"abc");
    /// assert_eq!(buf.as_bytes_with_nul(), b"abc\0");
    /// ```
    #[inline]
    pub const fn as_bytes_with_nul(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len() + 1) }
    }

    /// Returns the contents as a str slice, if they are valid UTF-8
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(self.as_slice())
    }

    /// Returns the byte at `index`, or an [OutOfRange] error.
    ///
    /// Unlike indexing through the slice view, this never panics. The
    /// terminator slot is not addressable here; use
    /// [as_bytes_with_nul](Self::as_bytes_with_nul) for that.
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let buf = SsoBuf::<8>::from(b"abc");
    /// assert_eq!(buf.at(2), Ok(b'c'));
    /// assert!(buf.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<u8, OutOfRange> {
        match self.as_slice().get(index) {
            Some(b) => Ok(*b),
            None => Err(OutOfRange {
                index,
                len: self.len(),
            }),
        }
    }
}

impl<const N: usize> SsoBuf<N> {
    /// Reserves space for at least `additional` more bytes.
    ///
    /// A no-op when the current capacity already suffices. Otherwise
    /// the capacity at least doubles, moving the contents to the heap
    /// if they were inline.
    ///
    /// # Panics
    /// If the new length would exceed [MAX_SIZE], or on allocation
    /// failure.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve(additional).unwrap_or_else(|err| err.handle());
    }

    /// Like [reserve](Self::reserve), but on failure returns a
    /// [ReserveError] instead of panicking.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), ReserveError> {
        let Some(required) = self.len().checked_add(additional) else {
            return Err(ReserveError::CapacityOverflow);
        };
        if required <= self.capacity() {
            return Ok(());
        }
        let new_cap = raw::grow_amortized(self.capacity(), required)?;
        self.grow_to(new_cap)
    }

    /// Reserves space for exactly `additional` more bytes
    #[inline]
    pub fn reserve_exact(&mut self, additional: usize) {
        self.try_reserve_exact(additional)
            .unwrap_or_else(|err| err.handle());
    }

    /// Like [reserve_exact](Self::reserve_exact), but on failure
    /// returns a [ReserveError] instead of panicking.
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), ReserveError> {
        let Some(required) = self.len().checked_add(additional) else {
            return Err(ReserveError::CapacityOverflow);
        };
        if required <= self.capacity() {
            return Ok(());
        }
        if required > MAX_SIZE {
            return Err(ReserveError::CapacityOverflow);
        }
        self.grow_to(required)
    }

    fn grow_to(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        match self.mode {
            Mode::Inline => self.promote(new_cap),
            Mode::Heap => unsafe { self.repr.heap.resize(new_cap) },
        }
    }

    /// Shrinks the capacity to match the length.
    ///
    /// If the contents fit the inline array they move back into it and
    /// the heap buffer is released; otherwise the heap buffer is
    /// reallocated to exactly `len()` bytes (plus the terminator).
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let mut buf = SsoBuf::<8>::from(b"some longer contents");
    /// assert!(!buf.is_inline());
    ///
    /// buf.truncate(3);
    /// buf.shrink_to_fit();
    ///
    /// assert!(buf.is_inline());
    /// assert_eq!(buf, b"som");
    /// ```
    pub fn shrink_to_fit(&mut self) {
        if self.is_inline() {
            return;
        }
        let len = self.len();
        if len <= Self::INLINE_CAPACITY {
            self.demote();
        } else if len < self.capacity() {
            unsafe { self.repr.heap.resize(len) }.unwrap_or_else(|err| err.handle());
        }
    }

    /// Replaces the `old_len` bytes starting at `pos` with `src`.
    ///
    /// This is the primitive every other mutation derives from:
    /// `append(s)` is `replace(len, 0, s)`, `erase(p, n)` is
    /// `replace(p, n, &[])`, and so on.
    ///
    /// # Errors
    /// If `pos > len()` or `pos + old_len > len()`. The buffer is
    /// unchanged in that case.
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let mut buf = SsoBuf::<16>::from(b"hello world");
    /// buf.replace(6, 5, b"there").unwrap();
    /// assert_eq!(buf, b"hello there");
    /// ```
    pub fn replace(&mut self, pos: usize, old_len: usize, src: &[u8]) -> Result<(), OutOfRange> {
        self.check_range(pos, old_len)?;
        unsafe { self.splice_raw(pos, old_len, src.as_ptr(), src.len()) }
            .unwrap_or_else(|err| err.handle());
        Ok(())
    }

    /// Replaces the `old_len` bytes starting at `pos` with `count`
    /// copies of `byte`.
    ///
    /// # Errors
    /// Same bounds contract as [replace](Self::replace).
    pub fn replace_fill(
        &mut self,
        pos: usize,
        old_len: usize,
        count: usize,
        byte: u8,
    ) -> Result<(), OutOfRange> {
        self.check_range(pos, old_len)?;
        unsafe {
            self.splice_raw(pos, old_len, ptr::null(), count)
                .unwrap_or_else(|err| err.handle());
            self.as_mut_ptr().add(pos).write_bytes(byte, count);
        }
        Ok(())
    }

    /// Appends a slice to the back of the buffer
    #[inline]
    pub fn append(&mut self, src: &[u8]) {
        unsafe { self.splice_raw(self.len(), 0, src.as_ptr(), src.len()) }
            .unwrap_or_else(|err| err.handle());
    }

    /// Overwrites the whole contents with `src`
    #[inline]
    pub fn assign(&mut self, src: &[u8]) {
        unsafe { self.splice_raw(0, self.len(), src.as_ptr(), src.len()) }
            .unwrap_or_else(|err| err.handle());
    }

    /// Appends a byte to the back of the buffer
    pub fn push(&mut self, byte: u8) {
        let len = self.len();
        unsafe {
            /* Grow by one unfilled slot, then write into it */
            self.splice_raw(len, 0, ptr::null(), 1)
                .unwrap_or_else(|err| err.handle());
            self.as_mut_ptr().add(len).write(byte);
        }
    }

    /// Removes and returns the last byte, if any
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let mut buf = SsoBuf::<8>::from(b"ab");
    /// assert_eq!(buf.pop(), Some(b'b'));
    /// assert_eq!(buf.pop(), Some(b'a'));
    /// assert_eq!(buf.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<u8> {
        let len = self.len().checked_sub(1)?;
        let byte = self.as_slice()[len];
        unsafe { self.set_len(len) };
        Some(byte)
    }

    /// Tries to push a byte without growing. If the push would have
    /// caused a reallocation, returns the byte back.
    pub fn push_within_capacity(&mut self, byte: u8) -> Result<(), u8> {
        let len = self.len();
        if len >= self.capacity() {
            return Err(byte);
        }
        unsafe {
            self.as_mut_ptr().add(len).write(byte);
            self.set_len(len + 1);
        }
        Ok(())
    }

    /// Tries to append a slice without growing. If the append would
    /// have caused a reallocation, returns the slice back.
    pub fn append_within_capacity<'a>(&mut self, src: &'a [u8]) -> Result<(), &'a [u8]> {
        let len = self.len();
        if src.len() > self.capacity() - len {
            return Err(src);
        }
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.as_mut_ptr().add(len), src.len());
            self.set_len(len + src.len());
        }
        Ok(())
    }

    /// Inserts a byte at the given position, shifting the tail right
    ///
    /// # Errors
    /// If `pos > len()`
    #[inline]
    pub fn insert(&mut self, pos: usize, byte: u8) -> Result<(), OutOfRange> {
        self.insert_slice(pos, &[byte])
    }

    /// Inserts a slice at the given position, shifting the tail right
    ///
    /// # Errors
    /// If `pos > len()`
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let mut buf = SsoBuf::<8>::from(b"Heworld");
    /// buf.insert_slice(2, b"llo ").unwrap();
    /// assert_eq!(buf, b"Hello world");
    /// ```
    pub fn insert_slice(&mut self, pos: usize, src: &[u8]) -> Result<(), OutOfRange> {
        self.check_range(pos, 0)?;
        unsafe { self.splice_raw(pos, 0, src.as_ptr(), src.len()) }
            .unwrap_or_else(|err| err.handle());
        Ok(())
    }

    /// Removes the `n` bytes starting at `pos`, shifting the tail left.
    ///
    /// The capacity is unaffected.
    ///
    /// # Errors
    /// If `pos + n > len()`
    ///
    /// # Example
    /// ```
    /// use sso_buf::SsoBuf;
    ///
    /// let mut buf = SsoBuf::<16>::from(b"0123456789");
    /// buf.erase(2, 6).unwrap();
    /// assert_eq!(buf, b"0189");
    /// ```
    pub fn erase(&mut self, pos: usize, n: usize) -> Result<(), OutOfRange> {
        self.check_range(pos, n)?;
        unsafe { self.splice_raw(pos, n, ptr::null(), 0) }.unwrap_or_else(|err| err.handle());
        Ok(())
    }

    /// Removes and returns the byte at `index`, shifting the tail left
    pub fn remove(&mut self, index: usize) -> Option<u8> {
        if index >= self.len() {
            return None;
        }
        let byte = self.as_slice()[index];
        /* In range, so this cannot fail */
        let _ = self.erase(index, 1);
        Some(byte)
    }

    /// Shortens the buffer to `new_len` bytes.
    ///
    /// A no-op if `new_len >= len()`. The capacity is unaffected.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len() {
            unsafe { self.set_len(new_len) };
        }
    }

    /// Clears the contents. The capacity is unaffected.
    #[inline]
    pub fn clear(&mut self) {
        unsafe { self.set_len(0) };
    }
}

impl<const N: usize> Drop for SsoBuf<N> {
    fn drop(&mut self) {
        if let Mode::Heap = self.mode {
            unsafe { self.repr.heap.destroy() }
        }
    }
}

impl<const N: usize> Default for SsoBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Clone for SsoBuf<N> {
    fn clone(&self) -> Self {
        let mut buf = Self::with_capacity(self.len());
        buf.append(self.as_slice());
        buf
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source.as_slice());
    }
}

impl<const N: usize> Deref for SsoBuf<N> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<const N: usize> DerefMut for SsoBuf<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<const N: usize> fmt::Debug for SsoBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{}\"", self.as_slice().escape_ascii())
    }
}

impl<const N: usize, S> PartialEq<S> for SsoBuf<N>
where
    S: AsRef<[u8]>,
{
    fn eq(&self, other: &S) -> bool {
        self.as_slice() == other.as_ref()
    }
}

impl<const N: usize> PartialEq<SsoBuf<N>> for &[u8] {
    fn eq(&self, other: &SsoBuf<N>) -> bool {
        *self == other.as_slice()
    }
}

impl<const N: usize> PartialEq<SsoBuf<N>> for &str {
    fn eq(&self, other: &SsoBuf<N>) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl<const N: usize> Eq for SsoBuf<N> {}

impl<const N: usize> PartialOrd for SsoBuf<N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> Ord for SsoBuf<N> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<const N: usize> Hash for SsoBuf<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<const N: usize> AsRef<[u8]> for SsoBuf<N> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize> AsMut<[u8]> for SsoBuf<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl<const N: usize> Borrow<[u8]> for SsoBuf<N> {
    fn borrow(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<const N: usize> From<&[u8]> for SsoBuf<N> {
    fn from(value: &[u8]) -> Self {
        let mut buf = Self::with_capacity(value.len());
        buf.append(value);
        buf
    }
}

impl<const N: usize> From<&str> for SsoBuf<N> {
    fn from(value: &str) -> Self {
        Self::from(value.as_bytes())
    }
}

impl<const N: usize, const M: usize> From<&[u8; M]> for SsoBuf<N> {
    fn from(value: &[u8; M]) -> Self {
        Self::from(value as &[u8])
    }
}

impl<const N: usize, const M: usize> From<[u8; M]> for SsoBuf<N> {
    fn from(value: [u8; M]) -> Self {
        Self::from(&value[..])
    }
}

/// Copies the contents. The vector's allocation cannot be adopted
/// because the buffer needs room for its trailing terminator.
impl<const N: usize> From<Vec<u8>> for SsoBuf<N> {
    fn from(value: Vec<u8>) -> Self {
        Self::from(value.as_slice())
    }
}

impl<const N: usize> From<SsoBuf<N>> for Vec<u8> {
    fn from(value: SsoBuf<N>) -> Self {
        value.as_slice().to_vec()
    }
}

impl<const N: usize> FromIterator<u8> for SsoBuf<N> {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<'a, const N: usize> FromIterator<&'a u8> for SsoBuf<N> {
    fn from_iter<I: IntoIterator<Item = &'a u8>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl<const N: usize> Extend<u8> for SsoBuf<N> {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, upper) = iter.size_hint();
        self.reserve(upper.unwrap_or(lower));
        for byte in iter {
            self.push(byte);
        }
    }
}

impl<'a, const N: usize> Extend<&'a u8> for SsoBuf<N> {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, const N: usize> Extend<&'a [u8]> for SsoBuf<N> {
    fn extend<I: IntoIterator<Item = &'a [u8]>>(&mut self, iter: I) {
        iter.into_iter().for_each(|slice| self.append(slice));
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for SsoBuf<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(self.as_slice())
    }
}

#[cfg(feature = "serde")]
impl<'de, const N: usize> serde::Deserialize<'de> for SsoBuf<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct BytesVisitor<const N: usize>;

        impl<'de, const N: usize> serde::de::Visitor<'de> for BytesVisitor<N> {
            type Value = SsoBuf<N>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a byte buffer")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(SsoBuf::from(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(SsoBuf::from(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut buf = SsoBuf::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    buf.push(byte);
                }
                Ok(buf)
            }
        }

        deserializer.deserialize_bytes(BytesVisitor)
    }
}

#[cfg(test)]
mod test;
