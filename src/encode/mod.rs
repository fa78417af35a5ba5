//! Flattening nested values back into bracket-notation form fields.

use serde::Serialize;
use serde_json::Value;

use crate::constants::is_bracket_byte;
use crate::num::number::format_leaf_number;
use crate::options::NullStyle;
use crate::{EncodeOptions, Error, Result};

pub fn to_string<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    let value = serde_json::to_value(value)
        .map_err(|err| Error::encode(format!("serialize failed: {err}")))?;
    let pairs = flatten(&value, options)?;
    Ok(form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish())
}

/// Flatten a JSON object into `(key, value)` form fields in document order.
///
/// # Examples
/// ```
/// use formnest::{flatten, EncodeOptions};
/// use serde_json::json;
///
/// let pairs = flatten(
///     &json!({"schedule": {"daysOfWeek": ["Mon", "Tue"]}}),
///     &EncodeOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(
///     pairs,
///     vec![
///         ("schedule[daysOfWeek][0]".to_string(), "Mon".to_string()),
///         ("schedule[daysOfWeek][1]".to_string(), "Tue".to_string()),
///     ]
/// );
/// ```
pub fn flatten(value: &Value, options: &EncodeOptions) -> Result<Vec<(String, String)>> {
    let Value::Object(map) = value else {
        return Err(Error::encode("root must be an object"));
    };
    let mut encoder = Flattener {
        options,
        pairs: Vec::new(),
        key: String::new(),
    };
    for (name, child) in map {
        check_name(name, "")?;
        encoder.key.clear();
        encoder.key.push_str(name);
        encoder.visit(child)?;
    }
    Ok(encoder.pairs)
}

struct Flattener<'o> {
    options: &'o EncodeOptions,
    pairs: Vec<(String, String)>,
    /// Key of the value currently being visited; extended and truncated in place.
    key: String,
}

impl Flattener<'_> {
    fn visit(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    check_name(name, &self.key)?;
                    let len = self.key.len();
                    self.key.push('[');
                    self.key.push_str(name);
                    self.key.push(']');
                    self.visit(child)?;
                    self.key.truncate(len);
                }
            }
            Value::Array(items) => {
                let mut buffer = itoa::Buffer::new();
                for (index, child) in items.iter().enumerate() {
                    let len = self.key.len();
                    self.key.push('[');
                    self.key.push_str(buffer.format(index));
                    self.key.push(']');
                    self.visit(child)?;
                    self.key.truncate(len);
                }
            }
            Value::Null => match self.options.nulls {
                NullStyle::Skip => {}
                NullStyle::Empty => self.emit(String::new()),
            },
            Value::Bool(flag) => self.emit(flag.to_string()),
            Value::Number(number) => self.emit(format_leaf_number(number)),
            Value::String(text) => self.emit(text.clone()),
        }
        Ok(())
    }

    fn emit(&mut self, value: String) {
        self.pairs.push((self.key.clone(), value));
    }
}

// Names with brackets, or empty names, cannot be read back as a single segment.
fn check_name(name: &str, parent: &str) -> Result<()> {
    if name.is_empty() || name.bytes().any(is_bracket_byte) {
        let location = if parent.is_empty() {
            String::new()
        } else {
            format!(" under `{parent}`")
        };
        return Err(Error::encode(format!(
            "field name `{name}`{location} cannot be expressed in bracket notation"
        ))
        .with_key(name));
    }
    // Below the root, an all-digit name would come back as an array index.
    if !parent.is_empty() && name.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::encode(format!(
            "field name `{name}` under `{parent}` would decode as an array index"
        ))
        .with_key(name));
    }
    Ok(())
}
