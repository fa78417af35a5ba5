pub const OPEN_BRACKET: u8 = b'[';

pub const CLOSE_BRACKET: u8 = b']';

/// Largest digit segment still treated as an array index by default.
pub const DEFAULT_MAX_INDEX: usize = 10_000;

/// Default number of `null` holes one decode call may open up in arrays.
pub const DEFAULT_MAX_HOLES: usize = 10_000;

/// Hole budget used by [`transcode`](crate::transcode), which has no index cap.
pub const TRANSCODE_MAX_HOLES: usize = 1 << 20;

/// Inline capacity for a key's segment list; deeper keys spill to the heap.
pub const INLINE_SEGMENTS: usize = 8;

#[inline]
pub fn is_bracket_byte(byte: u8) -> bool {
    matches!(byte, OPEN_BRACKET | CLOSE_BRACKET)
}
