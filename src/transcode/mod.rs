//! Rebuilding nested objects and arrays from a flat map of bracket-notation keys.
//!
//! Keys are processed in map order. A plain key is copied through; a bracketed
//! key is walked segment by segment from its root slot, coercing each slot to
//! the container kind the next segment asks for. In the default mode the last
//! key to touch a slot wins and nothing ever fails. With `strict` enabled every
//! such overwrite is reported as [`ErrorKind::Conflict`](crate::ErrorKind).
//!
//! Array growth is bounded per call: a key that would open more `null` holes
//! than the remaining budget, or address an index no `Vec` can hold, is
//! skipped like a malformed key.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::constants::TRANSCODE_MAX_HOLES;
use crate::path::{is_bracketed, KeyPath, Segment};
use crate::{DecodeOptions, Error, Result};

/// Transcode with the default, lossy policy. Never fails.
///
/// # Examples
/// ```
/// use serde_json::{json, Map, Value};
///
/// let flat: Map<String, Value> = serde_json::from_value(json!({
///     "title": "Standup",
///     "schedule[daysOfWeek][0]": "Mon",
///     "schedule[daysOfWeek][1]": "Tue",
///     "schedule[startDate]": "2024-01-01",
/// }))
/// .unwrap();
///
/// let nested = formnest::transcode(&flat);
/// assert_eq!(
///     Value::Object(nested),
///     json!({
///         "title": "Standup",
///         "schedule": {"daysOfWeek": ["Mon", "Tue"], "startDate": "2024-01-01"},
///     })
/// );
/// ```
pub fn transcode(flat: &Map<String, Value>) -> Map<String, Value> {
    // Non-strict transcoding has no failure path.
    transcode_with_options(flat, &lossy_options()).unwrap_or_default()
}

/// Like [`transcode`], but moves leaf values out of `flat` instead of cloning them.
pub fn transcode_owned(flat: Map<String, Value>) -> Map<String, Value> {
    transcode_owned_with_options(flat, &lossy_options()).unwrap_or_default()
}

pub fn transcode_with_options(
    flat: &Map<String, Value>,
    options: &DecodeOptions,
) -> Result<Map<String, Value>> {
    let mut transcoder = Transcoder::new(options);
    for (key, value) in flat {
        transcoder.push(key, value.clone())?;
    }
    Ok(transcoder.finish())
}

pub fn transcode_owned_with_options(
    flat: Map<String, Value>,
    options: &DecodeOptions,
) -> Result<Map<String, Value>> {
    let mut transcoder = Transcoder::new(options);
    for (key, value) in flat {
        transcoder.push(&key, value)?;
    }
    Ok(transcoder.finish())
}

// Every digit segment is an index; only the hole budget bounds allocation.
fn lossy_options() -> DecodeOptions {
    DecodeOptions::default()
        .with_strict(false)
        .with_max_index(None)
        .with_max_holes(Some(TRANSCODE_MAX_HOLES))
}

/// Longest array a `Vec<Value>` can hold without overflowing its byte size.
const MAX_ARRAY_LEN: usize = isize::MAX as usize / std::mem::size_of::<Value>();

/// A path step with owned names, used to remember where explicit `null`
/// leaves were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Step {
    Key(String),
    Index(usize),
}

impl From<Segment<'_>> for Step {
    fn from(segment: Segment<'_>) -> Self {
        match segment {
            Segment::Index(index) => Step::Index(index),
            Segment::Key(name) => Step::Key(name.to_string()),
        }
    }
}

struct Transcoder<'o> {
    options: &'o DecodeOptions,
    out: Map<String, Value>,
    holes_left: Option<usize>,
    /// Strict mode only: a `null` written by a key is occupied, unlike a hole.
    explicit_nulls: HashSet<Vec<Step>>,
}

impl<'o> Transcoder<'o> {
    fn new(options: &'o DecodeOptions) -> Self {
        Self {
            options,
            out: Map::new(),
            holes_left: options.max_holes,
            explicit_nulls: HashSet::new(),
        }
    }

    fn push(&mut self, key: &str, value: Value) -> Result<()> {
        if !is_bracketed(key) {
            return self.insert_plain(key, value);
        }
        match KeyPath::parse(key, self.options.max_index) {
            Some(path) => self.insert_path(key, &path, value),
            // Malformed keys such as `a[]` are dropped.
            None => Ok(()),
        }
    }

    fn finish(self) -> Map<String, Value> {
        self.out
    }

    // Input keys are unique, so an occupied entry here was created by a
    // bracketed key sharing this root. The reconstruction keeps the slot.
    fn insert_plain(&mut self, key: &str, value: Value) -> Result<()> {
        if self.out.contains_key(key) {
            if self.options.strict {
                return Err(Error::conflict(
                    key,
                    "field is also addressed with bracket notation",
                ));
            }
            return Ok(());
        }
        if self.options.strict {
            let mut prefix = vec![Step::Key(key.to_string())];
            record_nulls(&value, &mut prefix, &mut self.explicit_nulls);
        }
        self.out.insert(key.to_string(), value);
        Ok(())
    }

    fn insert_path(&mut self, key: &str, path: &KeyPath<'_>, value: Value) -> Result<()> {
        let strict = self.options.strict;
        let Some(holes) = self.holes_needed(path) else {
            return self.skip(key, "array index is too large to allocate");
        };
        if let Some(left) = self.holes_left {
            if holes > left {
                return self.skip(
                    key,
                    format!("needs {holes} array holes but only {left} remain"),
                );
            }
            self.holes_left = Some(left - holes);
        }
        if strict {
            self.check_explicit_nulls(key, path)?;
        }

        let mut slot = self.out.entry(path.root).or_insert(Value::Null);
        for segment in &path.segments {
            slot = child_slot(slot, *segment, strict, key)?;
        }
        if strict && !slot.is_null() {
            return Err(Error::conflict(
                key,
                format!("{} already assigned", describe(slot)),
            ));
        }
        let record_null = strict && value.is_null();
        *slot = value;
        if record_null {
            self.explicit_nulls.insert(steps(path));
        }
        Ok(())
    }

    /// Count the `null` holes writing `path` would open, following the
    /// containers that already exist. `None` when an index cannot be allocated.
    fn holes_needed(&self, path: &KeyPath<'_>) -> Option<usize> {
        let mut current = self.out.get(path.root);
        let mut holes = 0_usize;
        for segment in &path.segments {
            current = match (*segment, current) {
                (Segment::Index(index), _) if index >= MAX_ARRAY_LEN => return None,
                (Segment::Index(index), Some(Value::Array(items))) => {
                    holes = holes.saturating_add(index.saturating_sub(items.len()));
                    items.get(index)
                }
                (Segment::Index(index), _) => {
                    holes = holes.saturating_add(index);
                    None
                }
                (Segment::Key(name), Some(Value::Object(map))) => map.get(name),
                (Segment::Key(_), _) => None,
            };
        }
        Some(holes)
    }

    fn check_explicit_nulls(&self, key: &str, path: &KeyPath<'_>) -> Result<()> {
        if self.explicit_nulls.is_empty() {
            return Ok(());
        }
        let mut prefix = vec![Step::Key(path.root.to_string())];
        for segment in path.segments.iter().map(Some).chain([None]) {
            if self.explicit_nulls.contains(&prefix) {
                return Err(Error::conflict(key, "null already assigned"));
            }
            if let Some(segment) = segment {
                prefix.push(Step::from(*segment));
            }
        }
        Ok(())
    }

    fn skip(&self, key: &str, reason: impl Into<String>) -> Result<()> {
        if self.options.strict {
            let message = format!("`{key}` skipped: {}", reason.into());
            return Err(Error::decode(message).with_key(key));
        }
        Ok(())
    }
}

/// Remember every `null` inside a plain value so strict mode treats it as taken.
fn record_nulls(value: &Value, prefix: &mut Vec<Step>, nulls: &mut HashSet<Vec<Step>>) {
    match value {
        Value::Null => {
            nulls.insert(prefix.clone());
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                prefix.push(Step::Index(index));
                record_nulls(item, prefix, nulls);
                prefix.pop();
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                prefix.push(Step::Key(name.clone()));
                record_nulls(item, prefix, nulls);
                prefix.pop();
            }
        }
        _ => {}
    }
}

fn steps(path: &KeyPath<'_>) -> Vec<Step> {
    std::iter::once(Step::Key(path.root.to_string()))
        .chain(path.segments.iter().map(|segment| Step::from(*segment)))
        .collect()
}

/// Coerce `slot` to the container `segment` addresses and return the child slot,
/// creating it as `null` when missing.
fn child_slot<'v>(
    slot: &'v mut Value,
    segment: Segment<'_>,
    strict: bool,
    key: &str,
) -> Result<&'v mut Value> {
    match segment {
        Segment::Index(index) => {
            let items = as_array(slot, strict, key)?;
            // Callers bound `index` below `MAX_ARRAY_LEN` before descending.
            if items.len() <= index {
                items.resize(index.saturating_add(1), Value::Null);
            }
            Ok(&mut items[index])
        }
        Segment::Key(name) => {
            let map = as_object(slot, strict, key)?;
            Ok(map.entry(name).or_insert(Value::Null))
        }
    }
}

fn as_array<'v>(slot: &'v mut Value, strict: bool, key: &str) -> Result<&'v mut Vec<Value>> {
    if !slot.is_array() {
        if strict && !slot.is_null() {
            return Err(Error::conflict(
                key,
                format!("expected array, found {}", describe(slot)),
            ));
        }
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut().ok_or_else(|| Error::conflict(key, "expected array"))
}

fn as_object<'v>(
    slot: &'v mut Value,
    strict: bool,
    key: &str,
) -> Result<&'v mut Map<String, Value>> {
    if !slot.is_object() {
        if strict && !slot.is_null() {
            return Err(Error::conflict(
                key,
                format!("expected object, found {}", describe(slot)),
            ));
        }
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut().ok_or_else(|| Error::conflict(key, "expected object"))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
