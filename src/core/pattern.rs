//! Byte patterns with single-byte wildcards
//!
//! A [`BytePattern`] is a fixed-length sequence of elements, each either a
//! literal byte or [`PatternByte::Any`]. Patterns are matched directly against
//! raw buffers; literal bytes are compared by value and never interpreted, so
//! no escaping layer is needed.

use crate::core::error::{StampError, StampResult};

/// One element of a byte pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternByte {
    /// Matches exactly this byte
    Literal(u8),
    /// Matches any single byte
    Any,
}

impl PatternByte {
    fn matches(&self, byte: u8) -> bool {
        match self {
            PatternByte::Literal(b) => *b == byte,
            PatternByte::Any => true,
        }
    }
}

/// A located pattern occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Offset of the first byte in the haystack
    pub offset: usize,
    /// Bytes bound to the wildcard positions, in pattern order
    pub bound: Vec<u8>,
}

/// Ordered sequence of literal and wildcard bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BytePattern {
    elements: Vec<PatternByte>,
}

impl BytePattern {
    /// Create an empty pattern
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pattern made only of literal bytes
    pub fn literal(bytes: &[u8]) -> Self {
        Self {
            elements: bytes.iter().copied().map(PatternByte::Literal).collect(),
        }
    }

    /// Append a literal byte
    pub fn push_literal(&mut self, byte: u8) -> &mut Self {
        self.elements.push(PatternByte::Literal(byte));
        self
    }

    /// Append a run of literal bytes
    pub fn extend_literal(&mut self, bytes: &[u8]) -> &mut Self {
        self.elements
            .extend(bytes.iter().copied().map(PatternByte::Literal));
        self
    }

    /// Append a wildcard
    pub fn push_any(&mut self) -> &mut Self {
        self.elements.push(PatternByte::Any);
        self
    }

    /// The pattern elements
    pub fn elements(&self) -> &[PatternByte] {
        &self.elements
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the pattern has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of literal elements
    pub fn literal_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, PatternByte::Literal(_)))
            .count()
    }

    /// Number of wildcard elements
    pub fn wildcard_count(&self) -> usize {
        self.len() - self.literal_count()
    }

    /// Literal bytes, if the pattern contains no wildcard
    pub fn to_literal(&self) -> Option<Vec<u8>> {
        self.elements
            .iter()
            .map(|e| match e {
                PatternByte::Literal(b) => Some(*b),
                PatternByte::Any => None,
            })
            .collect()
    }

    /// Whether the pattern matches `window` exactly (lengths must agree)
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() == self.len()
            && self
                .elements
                .iter()
                .zip(window)
                .all(|(e, b)| e.matches(*b))
    }

    /// Find the first occurrence in `haystack`
    pub fn find(&self, haystack: &[u8]) -> Option<PatternMatch> {
        self.find_from(haystack, 0)
    }

    /// Find the first occurrence at or after `start`
    pub fn find_from(&self, haystack: &[u8], start: usize) -> Option<PatternMatch> {
        if self.is_empty() || start > haystack.len() {
            return None;
        }
        let offset = haystack[start..]
            .windows(self.len())
            .position(|window| self.matches(window))?
            + start;
        let bound = self
            .elements
            .iter()
            .zip(&haystack[offset..offset + self.len()])
            .filter(|(e, _)| matches!(e, PatternByte::Any))
            .map(|(_, b)| *b)
            .collect();
        Some(PatternMatch { offset, bound })
    }

    /// Fill the wildcards, in order, with `values`
    pub fn bind(&self, values: &[u8]) -> StampResult<Vec<u8>> {
        if values.len() != self.wildcard_count() {
            return Err(StampError::BadParam(format!(
                "pattern has {} wildcards, got {} values",
                self.wildcard_count(),
                values.len()
            )));
        }
        let mut values = values.iter();
        Ok(self
            .elements
            .iter()
            .map(|e| match e {
                PatternByte::Literal(b) => *b,
                // Length checked above
                PatternByte::Any => values.next().copied().unwrap_or_default(),
            })
            .collect())
    }
}

impl From<&[u8]> for BytePattern {
    fn from(bytes: &[u8]) -> Self {
        Self::literal(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_with_hole() -> BytePattern {
        let mut p = BytePattern::new();
        p.push_literal(0x18).push_any().extend_literal(&[0x20, 0x19]);
        p
    }

    #[test]
    fn test_counts() {
        let p = pattern_with_hole();
        assert_eq!(p.len(), 4);
        assert_eq!(p.literal_count(), 3);
        assert_eq!(p.wildcard_count(), 1);
        assert_eq!(p.to_literal(), None);
        assert_eq!(
            BytePattern::literal(b"abc").to_literal(),
            Some(b"abc".to_vec())
        );
    }

    #[test]
    fn test_find_binds_wildcard() {
        let hay = [0x00, 0x18, 0x18, 0x04, 0x20, 0x19, 0xFF];
        let m = pattern_with_hole().find(&hay).unwrap();
        assert_eq!(m.offset, 2);
        assert_eq!(m.bound, vec![0x04]);
    }

    #[test]
    fn test_find_from_and_miss() {
        let hay = [0x18, 0x01, 0x20, 0x19, 0x18, 0x02, 0x20, 0x19];
        let p = pattern_with_hole();
        assert_eq!(p.find_from(&hay, 1).unwrap().bound, vec![0x02]);
        assert!(p.find_from(&hay, 5).is_none());
        assert!(p.find(&hay[..3]).is_none());
        assert!(p.find_from(&hay, 100).is_none());
        assert!(BytePattern::new().find(&hay).is_none());
    }

    #[test]
    fn test_literal_bytes_are_not_metacharacters() {
        let p = BytePattern::literal(b".*");
        assert!(p.find(b"abc").is_none());
        assert_eq!(p.find(b"a.*c").unwrap().offset, 1);
    }

    #[test]
    fn test_from_slice() {
        let bytes: &[u8] = &[0x18, 0x04];
        let p = BytePattern::from(bytes);
        assert_eq!(p, BytePattern::literal(bytes));
        assert_eq!(p.wildcard_count(), 0);
        assert_eq!(p.find(&[0x00, 0x18, 0x04]).unwrap().offset, 1);
    }

    #[test]
    fn test_bind() {
        let p = pattern_with_hole();
        assert_eq!(p.bind(&[0x44]).unwrap(), vec![0x18, 0x44, 0x20, 0x19]);
        assert!(p.bind(&[]).is_err());
    }
}
