//! Byte View Module
//!
//! Immutable value container handed out to cache callers.

use std::fmt;
use std::sync::Arc;

// == Byte View ==
/// An immutable snapshot of cached bytes.
///
/// Cloning is cheap (the bytes are shared), and no method hands out a
/// mutable reference, so callers can never alter what the cache holds.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    // == Constructor ==
    /// Creates a view by copying the given bytes.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: Arc::from(bytes.as_ref()),
        }
    }

    // == Length ==
    /// Returns the number of bytes in the view.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Byte Slice ==
    /// Returns an owned copy of the bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Borrows the bytes without copying.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.len())
            .field("bytes", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_len_and_string() {
        let view = ByteView::from("630");

        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(view.to_string(), "630");
    }

    #[test]
    fn test_byte_slice_is_a_copy() {
        let view = ByteView::new(b"abc");

        let mut copy = view.byte_slice();
        copy[0] = b'z';

        assert_eq!(view.as_slice(), b"abc");
        assert_eq!(copy, b"zbc");
    }

    #[test]
    fn test_new_copies_source_buffer() {
        let mut source = vec![1u8, 2, 3];
        let view = ByteView::new(&source);

        source[0] = 9;

        assert_eq!(view.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_clones_compare_equal() {
        let view = ByteView::from(vec![7u8; 16]);
        let clone = view.clone();

        assert_eq!(view, clone);
        assert_eq!(clone.len(), 16);
    }

    #[test]
    fn test_default_is_empty() {
        let view = ByteView::default();
        assert!(view.is_empty());
        assert_eq!(view.to_string(), "");
    }
}
