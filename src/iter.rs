//! Iterator implementation for SsoBuf

use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::{ptr, slice};

use crate::raw::RawBuf;
use crate::{Mode, SsoBuf};

enum Kind<const N: usize> {
    Inline([u8; N]),
    Heap(RawBuf),
}

impl<const N: usize> Kind<N> {
    const fn ptr(&self) -> *const u8 {
        match self {
            Kind::Inline(arr) => arr.as_ptr(),
            Kind::Heap(raw) => raw.ptr.as_ptr(),
        }
    }
}

/// Owning iterator over the bytes of an [SsoBuf]
///
/// This struct is returned from the [SsoBuf::into_iter] function
pub struct SsoBufIter<const N: usize> {
    start: usize,
    len: usize,
    buf: Kind<N>,
    _marker: PhantomData<SsoBuf<N>>,
}

impl<const N: usize> SsoBufIter<N> {
    /// Casts the remaining portion of this iterator as a slice
    pub const fn as_slice(&self) -> &[u8] {
        unsafe {
            let ptr = self.buf.ptr().add(self.start);
            slice::from_raw_parts(ptr, self.len)
        }
    }
}

impl<const N: usize> Drop for SsoBufIter<N> {
    fn drop(&mut self) {
        /* Bytes need no dropping, only the backing allocation does */
        if let Kind::Heap(raw) = &mut self.buf {
            unsafe { raw.destroy() }
        }
    }
}

impl<const N: usize> Iterator for SsoBufIter<N> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            None
        } else {
            let byte = unsafe { self.buf.ptr().add(self.start).read() };
            self.start += 1;
            self.len -= 1;
            Some(byte)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.len {
            self.start += self.len;
            self.len = 0;
            return None;
        }
        self.start += n;
        self.len -= n;
        self.next()
    }
}

impl<const N: usize> DoubleEndedIterator for SsoBufIter<N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            let byte = unsafe { self.buf.ptr().add(self.start + self.len).read() };
            Some(byte)
        }
    }

    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        if n >= self.len {
            self.len = 0;
            return None;
        }
        self.len -= n;
        self.next_back()
    }
}

impl<const N: usize> ExactSizeIterator for SsoBufIter<N> {}

impl<const N: usize> FusedIterator for SsoBufIter<N> {}

impl<const N: usize> IntoIterator for SsoBuf<N> {
    type Item = u8;

    type IntoIter = SsoBufIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        let buf = ManuallyDrop::new(self);

        let len = buf.len();
        let kind = unsafe {
            let repr = ptr::read(&buf.repr);
            match buf.mode {
                Mode::Inline => Kind::Inline(repr.inline.data),
                Mode::Heap => Kind::Heap(repr.heap),
            }
        };

        SsoBufIter {
            start: 0,
            len,
            buf: kind,
            _marker: PhantomData,
        }
    }
}

impl<'a, const N: usize> IntoIterator for &'a SsoBuf<N> {
    type Item = &'a u8;
    type IntoIter = slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, const N: usize> IntoIterator for &'a mut SsoBuf<N> {
    type Item = &'a mut u8;
    type IntoIter = slice::IterMut<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
mod test {
    use crate::SsoBuf;

    #[test]
    fn forward_and_back() {
        let buf = SsoBuf::<8>::from(b"abcde");
        let mut iter = buf.into_iter();

        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(b'a'));
        assert_eq!(iter.next_back(), Some(b'e'));
        assert_eq!(iter.as_slice(), b"bcd");
        assert_eq!(iter.next(), Some(b'b'));
        assert_eq!(iter.next(), Some(b'c'));
        assert_eq!(iter.next(), Some(b'd'));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    #[allow(clippy::iter_nth_zero)]
    fn nth() {
        let mut iter = SsoBuf::<8>::from(b"1234567").into_iter();

        assert_eq!(Some(b'3'), iter.nth(2));
        assert_eq!(Some(b'4'), iter.nth(0));

        assert_eq!(Some(b'6'), iter.nth_back(1));
        assert_eq!(Some(b'5'), iter.nth_back(0));

        assert_eq!(iter.len(), 0);
    }

    #[test]
    fn heap_buffer_released() {
        let buf = SsoBuf::<4>::from(b"a longer heap buffer");
        assert!(!buf.is_inline());

        let mut iter = buf.into_iter();
        assert_eq!(iter.next(), Some(b'a'));
        drop(iter); // must free the heap allocation
    }

    #[test]
    fn collect_roundtrip() {
        let buf = SsoBuf::<8>::from(b"xyz");
        let collected: SsoBuf<8> = buf.into_iter().collect();
        assert_eq!(collected, b"xyz");
    }
}
