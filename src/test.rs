use super::{DEFAULT_INLINE, MAX_SIZE, OutOfRange, ReserveError, SsoBuf};

extern crate std;
use std::prelude::rust_2024::*;

fn check_terminator<const N: usize>(buf: &SsoBuf<N>) {
    let bytes = buf.as_bytes_with_nul();
    assert_eq!(bytes.len(), buf.len() + 1);
    assert_eq!(bytes[buf.len()], 0, "missing NUL terminator");
    assert!(buf.len() <= buf.capacity());
}

#[test]
fn check_sizes() {
    use core::mem;

    /* With the default inline size, both representations occupy the
     * same space */
    assert_eq!(DEFAULT_INLINE, mem::size_of::<usize>() * 3 - 1);
    assert_eq!(SsoBuf::<DEFAULT_INLINE>::INLINE_CAPACITY, DEFAULT_INLINE - 1);
    assert!(
        mem::size_of::<SsoBuf>() <= mem::size_of::<String>() + mem::size_of::<usize>()
    );
}

#[test]
fn empty() {
    let buf = SsoBuf::<8>::new();

    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), 7);
    assert!(buf.is_inline());
    check_terminator(&buf);
}

#[test]
fn fill_to_inline_capacity() {
    let mut buf = SsoBuf::<8>::new();

    for (i, byte) in (b'0'..b'7').enumerate() {
        buf.push(byte);
        assert_eq!(buf.len(), i + 1);
        check_terminator(&buf);
    }

    assert!(buf.is_inline());
    assert_eq!(buf, b"0123456");

    /* The data pointer must point inside the struct itself */
    let base = &buf as *const _ as usize;
    let data = buf.as_ptr() as usize;
    assert!(data >= base && data < base + core::mem::size_of::<SsoBuf<8>>());
}

#[test]
fn promote_on_overflow() {
    let mut buf = SsoBuf::<8>::from(b"0123456");
    assert!(buf.is_inline());

    buf.push(b'7');

    assert!(!buf.is_inline());
    assert_eq!(buf, b"01234567");
    assert!(buf.capacity() > SsoBuf::<8>::INLINE_CAPACITY);
    check_terminator(&buf);
}

#[test]
fn promote_empty() {
    let mut buf = SsoBuf::<8>::new();
    buf.reserve(100);

    assert!(!buf.is_inline());
    assert!(buf.is_empty());
    assert!(buf.capacity() >= 100);
    check_terminator(&buf);
}

#[test]
fn demote_empty() {
    let mut buf = SsoBuf::<8>::new();
    buf.reserve(100);
    buf.shrink_to_fit();

    assert!(buf.is_inline());
    assert!(buf.is_empty());
    check_terminator(&buf);
}

#[test]
fn erase_then_shrink_demotes() {
    let mut buf = SsoBuf::<8>::filled(50, b'a');
    assert!(!buf.is_inline());
    assert_eq!(buf.len(), 50);

    buf.erase(5, 45).unwrap();
    assert_eq!(buf.len(), 5);
    /* Mode is physical state: still on the heap */
    assert!(!buf.is_inline());

    buf.shrink_to_fit();
    assert!(buf.is_inline());
    assert_eq!(buf, b"aaaaa");
    check_terminator(&buf);
}

#[test]
fn shrink_is_idempotent() {
    let mut buf = SsoBuf::<8>::from(b"0123456789abcdef");
    buf.truncate(12);

    buf.shrink_to_fit();
    let first = buf.capacity();
    buf.shrink_to_fit();
    assert_eq!(buf.capacity(), first);
    assert_eq!(first, 12);

    buf.truncate(3);
    buf.shrink_to_fit();
    let first = buf.capacity();
    buf.shrink_to_fit();
    assert_eq!(buf.capacity(), first);
    assert!(buf.is_inline());
}

#[test]
fn growth_is_geometric() {
    let mut buf = SsoBuf::<8>::from(b"0123456");
    let old_len = buf.len();
    let old_cap = buf.capacity();

    buf.append(b"789");

    assert!(buf.capacity() >= old_len + 3);
    assert!(buf.capacity() < 2 * (old_cap + 1) + 3);
    assert_eq!(buf, b"0123456789");

    /* Appending one byte at a time must not reallocate every time */
    let mut reallocs = 0;
    let mut cap = buf.capacity();
    for _ in 0..1000 {
        buf.push(b'x');
        if buf.capacity() != cap {
            cap = buf.capacity();
            reallocs += 1;
        }
    }
    assert!(reallocs <= 8, "{reallocs} reallocations for 1000 pushes");
}

#[test]
fn reserve_within_capacity_is_noop() {
    let mut buf = SsoBuf::<8>::from(b"abc");
    let ptr = buf.as_ptr();
    buf.reserve(4);
    assert!(buf.is_inline());
    assert_eq!(buf.as_ptr(), ptr);

    let mut buf = SsoBuf::<8>::with_capacity(100);
    buf.append(b"abc");
    let cap = buf.capacity();
    buf.reserve(50);
    assert_eq!(buf.capacity(), cap);
}

#[test]
fn reserve_exact() {
    let mut buf = SsoBuf::<8>::from(b"abcd");
    buf.reserve_exact(20);
    assert_eq!(buf.capacity(), 24);
    assert_eq!(buf, b"abcd");
    check_terminator(&buf);
}

#[test]
fn try_reserve_overflow() {
    let mut buf = SsoBuf::<8>::from(b"abc");

    let err = buf.try_reserve(MAX_SIZE).unwrap_err();
    assert_eq!(err, ReserveError::CapacityOverflow);
    /* Failed reservations leave the buffer untouched */
    assert_eq!(buf, b"abc");
    assert!(buf.is_inline());

    let err = buf.try_reserve(usize::MAX).unwrap_err();
    assert_eq!(err, ReserveError::CapacityOverflow);

    assert!(buf.try_reserve_exact(MAX_SIZE).is_err());
    assert!(buf.try_reserve(10).is_ok());
}

#[test]
fn replace_grow_and_shrink() {
    let mut buf = SsoBuf::<32>::from(b"hello cruel world");

    /* Shrinking replacement, in place */
    buf.replace(6, 6, b"").unwrap();
    assert_eq!(buf, b"hello world");
    check_terminator(&buf);

    /* Growing replacement, in place */
    buf.replace(6, 5, b"there, world").unwrap();
    assert_eq!(buf, b"hello there, world");
    check_terminator(&buf);

    /* Growing replacement, reallocates */
    buf.replace(6, 0, b"and only then, dear ").unwrap();
    assert_eq!(buf, b"hello and only then, dear there, world");
    assert!(!buf.is_inline());
    check_terminator(&buf);
}

#[test]
fn replace_bounds() {
    let mut buf = SsoBuf::<8>::from(b"abc");

    assert_eq!(
        buf.replace(4, 0, b"x"),
        Err(OutOfRange { index: 4, len: 3 })
    );
    assert_eq!(
        buf.replace(1, 3, b"x"),
        Err(OutOfRange { index: 4, len: 3 })
    );
    /* Replacing the empty range at len() is an append */
    buf.replace(3, 0, b"d").unwrap();
    assert_eq!(buf, b"abcd");
}

#[test]
fn replace_fill() {
    let mut buf = SsoBuf::<8>::from(b"abcdef");
    buf.replace_fill(2, 2, 5, b'-').unwrap();
    assert_eq!(buf, b"ab-----ef");
    assert!(!buf.is_inline());
    check_terminator(&buf);
}

#[test]
fn assign() {
    let mut buf = SsoBuf::<8>::from(b"abc");
    buf.assign(b"a whole new set of contents");
    assert_eq!(buf, b"a whole new set of contents");

    buf.assign(b"tiny");
    assert_eq!(buf, b"tiny");
    /* Capacity (and mode) are sticky */
    assert!(!buf.is_inline());
    check_terminator(&buf);
}

#[test]
fn insert_and_erase() {
    let mut buf = SsoBuf::<16>::from(b"02468");

    buf.insert(1, b'1').unwrap();
    buf.insert(3, b'3').unwrap();
    buf.insert_slice(5, b"5 7").unwrap();
    assert_eq!(buf, b"012345 768");

    buf.erase(6, 2).unwrap();
    assert_eq!(buf, b"01234568");

    assert_eq!(buf.insert(9, b'x'), Err(OutOfRange { index: 9, len: 8 }));
    assert_eq!(buf.erase(7, 2), Err(OutOfRange { index: 9, len: 8 }));
    check_terminator(&buf);
}

#[test]
fn remove() {
    let mut buf = SsoBuf::<8>::from(b"abc");
    assert_eq!(buf.remove(1), Some(b'b'));
    assert_eq!(buf, b"ac");
    assert_eq!(buf.remove(5), None);
}

#[test]
fn push_pop() {
    let mut buf = SsoBuf::<4>::new();

    for byte in *b"abcdef" {
        buf.push(byte);
        check_terminator(&buf);
    }
    assert_eq!(buf, b"abcdef");

    for byte in b"abcdef".iter().rev() {
        assert_eq!(buf.pop(), Some(*byte));
        check_terminator(&buf);
    }
    assert_eq!(buf.pop(), None);
}

#[test]
fn within_capacity() {
    let mut buf = SsoBuf::<4>::new();

    assert_eq!(buf.push_within_capacity(b'a'), Ok(()));
    assert_eq!(buf.append_within_capacity(b"bc"), Ok(()));
    assert_eq!(buf.push_within_capacity(b'd'), Err(b'd'));
    assert_eq!(buf.append_within_capacity(b"de"), Err(&b"de"[..]));

    assert_eq!(buf, b"abc");
    assert!(buf.is_inline());
    check_terminator(&buf);
}

#[test]
fn at_bounds() {
    let buf = SsoBuf::<8>::from(b"abc");

    assert_eq!(buf.at(buf.len() - 1), Ok(b'c'));
    assert_eq!(
        buf.at(buf.len()),
        Err(OutOfRange { index: 3, len: 3 })
    );
}

#[test]
fn promote_demote_roundtrip() {
    let mut buf = SsoBuf::<8>::from(b"abcdefg");
    let before: Vec<u8> = buf.as_slice().to_vec();
    assert!(buf.is_inline());

    buf.reserve_exact(100);
    assert!(!buf.is_inline());
    assert_eq!(buf.as_slice(), &before[..]);

    buf.shrink_to_fit();
    assert!(buf.is_inline());
    assert_eq!(buf.as_slice(), &before[..]);
    check_terminator(&buf);
}

#[test]
fn clone_is_deep() {
    let mut buf = SsoBuf::<8>::from(b"a heap allocated buffer");
    assert!(!buf.is_inline());

    let mut copy = buf.clone();
    copy.as_mut_slice()[0] = b'X';
    copy.append(b" plus more");

    assert_eq!(buf, b"a heap allocated buffer");
    assert_eq!(copy, b"X heap allocated buffer plus more");

    buf.clear();
    assert_eq!(copy.len(), 33);
}

#[test]
fn clone_from_reuses_capacity() {
    let src = SsoBuf::<8>::from(b"0123456789");
    let mut dst = SsoBuf::<8>::with_capacity(64);
    let ptr = dst.as_ptr();

    dst.clone_from(&src);
    assert_eq!(dst, b"0123456789");
    assert_eq!(dst.as_ptr(), ptr);
}

#[test]
fn truncate_and_clear() {
    let mut buf = SsoBuf::<8>::from(b"0123456789");
    let cap = buf.capacity();

    buf.truncate(20); // no-op
    assert_eq!(buf.len(), 10);

    buf.truncate(4);
    assert_eq!(buf, b"0123");
    assert_eq!(buf.capacity(), cap);
    check_terminator(&buf);

    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), cap);
    check_terminator(&buf);
}

#[test]
fn with_capacity_modes() {
    let buf = SsoBuf::<8>::with_capacity(7);
    assert!(buf.is_inline());
    check_terminator(&buf);

    let buf = SsoBuf::<8>::with_capacity(8);
    assert!(!buf.is_inline());
    assert_eq!(buf.capacity(), 8);
    check_terminator(&buf);

    assert_eq!(
        SsoBuf::<8>::try_with_capacity(MAX_SIZE + 1).unwrap_err(),
        ReserveError::CapacityOverflow
    );
}

#[test]
fn comparisons() {
    let a = SsoBuf::<8>::from("abc");
    let b = SsoBuf::<8>::from("abd");

    assert_eq!(a, b"abc");
    assert_eq!(a, "abc");
    assert_eq!("abc", a);
    assert_eq!(&b"abc"[..], a);
    assert!(a < b);
    assert_ne!(a, b);

    /* Equality ignores mode and capacity */
    let mut heap = a.clone();
    heap.reserve_exact(100);
    assert!(!heap.is_inline());
    assert_eq!(a, heap);
}

#[test]
fn hash_agrees_with_eq() {
    use core::hash::BuildHasher;
    use std::hash::RandomState;

    let a = SsoBuf::<8>::from("contents");
    let mut b = SsoBuf::<8>::from("contents");
    b.reserve_exact(200);

    let state = RandomState::new();
    assert_eq!(state.hash_one(&a), state.hash_one(&b));
}

#[test]
fn conversions() {
    let buf = SsoBuf::<8>::from(vec![1u8, 2, 3]);
    assert_eq!(buf, [1, 2, 3]);

    let vec: Vec<u8> = buf.into();
    assert_eq!(vec, [1, 2, 3]);

    let buf = SsoBuf::<8>::from([b'x'; 4]);
    assert_eq!(buf, b"xxxx");

    let buf: SsoBuf<8> = (b'a'..=b'e').collect();
    assert_eq!(buf.as_str(), Ok("abcde"));

    let buf: SsoBuf<8> = [b'a', b'b'].iter().collect();
    assert_eq!(buf, b"ab");
}

#[test]
fn extend() {
    let mut buf = SsoBuf::<8>::new();
    buf.extend(b'0'..=b'9');
    buf.extend([&b"ab"[..], b"cd"]);
    assert_eq!(buf, b"0123456789abcd");
    check_terminator(&buf);
}

#[test]
fn deref_slice_api() {
    let mut buf = SsoBuf::<8>::from(b"hello");

    assert_eq!(buf[0], b'h');
    assert_eq!(buf.first(), Some(&b'h'));
    assert_eq!(buf.last(), Some(&b'o'));
    assert_eq!(buf.iter().rev().copied().collect::<Vec<_>>(), b"olleh");

    buf[0] = b'H';
    for byte in buf.iter_mut() {
        byte.make_ascii_uppercase();
    }
    assert_eq!(buf, b"HELLO");
}

#[test]
fn debug_output() {
    let buf = SsoBuf::<8>::from(b"ab\0c");
    assert_eq!(std::format!("{buf:?}"), "b\"ab\\x00c\"");
}

#[test]
fn error_display() {
    let err = OutOfRange { index: 9, len: 4 };
    assert_eq!(
        std::format!("{err}"),
        "position 9 is out of range for a buffer of length 4"
    );

    let err = ReserveError::CapacityOverflow;
    assert!(std::format!("{err}").contains("maximum buffer size"));
}

#[test]
fn default_inline_size() {
    let buf: SsoBuf = SsoBuf::new();
    assert_eq!(buf.capacity(), DEFAULT_INLINE - 1);
    assert!(buf.max_size() >= buf.capacity());
}

#[cfg(feature = "serde")]
mod serde {
    use super::*;

    #[test]
    fn roundtrip() {
        let buf = SsoBuf::<8>::from(b"serialized contents");

        let json = serde_json::to_string(&buf).unwrap();
        let back: SsoBuf<8> = serde_json::from_str(&json).unwrap();

        assert_eq!(buf, back);
    }

    #[test]
    fn from_str_input() {
        let back: SsoBuf<8> = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, b"abc");
    }
}
