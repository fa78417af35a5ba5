//! Splitting bracket-notation keys into classified path segments.
//!
//! `schedule[daysOfWeek][0]` splits into the root `schedule` followed by
//! `Key("daysOfWeek")` and `Index(0)`. Splitting keeps every maximal run of
//! characters outside `[`/`]`, so empty brackets and stray brackets simply
//! vanish from the segment list.

use memchr::{memchr, memchr2};
use smallvec::SmallVec;

use crate::constants::{CLOSE_BRACKET, INLINE_SEGMENTS, OPEN_BRACKET};

pub type Segments<'a> = SmallVec<[&'a str; INLINE_SEGMENTS]>;

/// One step below the root of a key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A non-negative integer literal; addresses an array slot.
    Index(usize),
    /// Anything else; addresses an object property.
    Key(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a raw segment. Only plain ASCII digits count as an index, and
    /// only while the value stays within `max_index`.
    pub fn classify(raw: &'a str, max_index: Option<usize>) -> Self {
        match parse_index(raw) {
            Some(index) if max_index.map_or(true, |max| index <= max) => Segment::Index(index),
            _ => Segment::Key(raw),
        }
    }
}

/// A bracketed key resolved into its root name and the segments below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    pub root: &'a str,
    pub segments: SmallVec<[Segment<'a>; INLINE_SEGMENTS]>,
}

impl<'a> KeyPath<'a> {
    /// Returns `None` for keys that do not address anything below a root,
    /// such as `a[]` or `[0]`.
    pub fn parse(key: &'a str, max_index: Option<usize>) -> Option<Self> {
        let raw = split_segments(key);
        let (root, rest) = raw.split_first()?;
        if rest.is_empty() {
            return None;
        }
        Some(Self {
            root: *root,
            segments: rest
                .iter()
                .map(|segment| Segment::classify(*segment, max_index))
                .collect(),
        })
    }
}

/// A key takes part in reconstruction only when it has both an opening and a
/// closing bracket somewhere in it.
#[inline]
pub fn is_bracketed(key: &str) -> bool {
    let bytes = key.as_bytes();
    memchr(OPEN_BRACKET, bytes).is_some() && memchr(CLOSE_BRACKET, bytes).is_some()
}

pub fn split_segments(key: &str) -> Segments<'_> {
    let bytes = key.as_bytes();
    let mut segments = Segments::new();
    let mut start = 0;
    while start < bytes.len() {
        match memchr2(OPEN_BRACKET, CLOSE_BRACKET, &bytes[start..]) {
            Some(offset) => {
                if offset > 0 {
                    segments.push(&key[start..start + offset]);
                }
                start += offset + 1;
            }
            None => {
                segments.push(&key[start..]);
                break;
            }
        }
    }
    segments
}

fn parse_index(raw: &str) -> Option<usize> {
    // `usize::from_str` accepts a leading `+`, which must stay a property name.
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
