use crate::constants::{DEFAULT_MAX_HOLES, DEFAULT_MAX_INDEX};

/// How a form body with the same field name repeated is folded into one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// `tag=a&tag=b` becomes `"tag": ["a", "b"]`.
    #[default]
    Collect,
    /// Only the last occurrence is kept.
    Last,
}

/// How `null` leaves are written when flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullStyle {
    #[default]
    Skip,
    Empty,
}

/// Options for rebuilding nested values from bracket-notation keys.
///
/// The default is tuned for untrusted form bodies: oversized indices become
/// object keys and the total number of array holes per call is bounded.
/// [`transcode`](crate::transcode) itself runs without either limit.
///
/// # Examples
/// ```
/// use formnest::DecodeOptions;
///
/// let opts = DecodeOptions::new().with_strict(true).with_max_index(None);
/// assert!(opts.strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject keys that would overwrite each other instead of letting the last one win.
    pub strict: bool,
    /// Digit segments above this value are treated as object keys.
    pub max_index: Option<usize>,
    /// Keys that would open more `null` holes than remain in this budget are
    /// skipped. Counted across the whole call.
    pub max_holes: Option<usize>,
    pub duplicates: DuplicateKeys,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_index(mut self, max_index: Option<usize>) -> Self {
        self.max_index = max_index;
        self
    }

    pub fn with_max_holes(mut self, max_holes: Option<usize>) -> Self {
        self.max_holes = max_holes;
        self
    }

    /// No index cap and no hole budget: every digit segment indexes an array.
    pub fn unbounded(self) -> Self {
        self.with_max_index(None).with_max_holes(None)
    }

    pub fn with_duplicates(mut self, duplicates: DuplicateKeys) -> Self {
        self.duplicates = duplicates;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_index: Some(DEFAULT_MAX_INDEX),
            max_holes: Some(DEFAULT_MAX_HOLES),
            duplicates: DuplicateKeys::default(),
        }
    }
}

/// Options for flattening nested values back into bracket-notation pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub nulls: NullStyle,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nulls(mut self, nulls: NullStyle) -> Self {
        self.nulls = nulls;
        self
    }
}
