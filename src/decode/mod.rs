//! The inbound boundary: url-encoded bodies become a flat ordered map, the map
//! is transcoded, and the nested result is handed to serde.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::options::DuplicateKeys;
use crate::transcode::transcode_owned_with_options;
use crate::{DecodeOptions, Error, Result};

pub fn from_str<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> Result<T> {
    from_slice(input.as_bytes(), options)
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8], options: &DecodeOptions) -> Result<T> {
    let value = decode_slice(input, options)?;
    serde_json::from_value(value)
        .map_err(|err| Error::deserialize(format!("deserialize failed: {err}")))
}

pub fn from_reader<T: DeserializeOwned, R: Read>(
    mut reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|err| Error::decode(format!("read failed: {err}")))?;
    from_slice(&buf, options)
}

pub fn decode_slice(input: &[u8], options: &DecodeOptions) -> Result<Value> {
    let flat = parse_pairs(input, options);
    from_flat_map(flat, options).map(Value::Object)
}

/// Split a url-encoded body into an ordered map of still-flat field names.
///
/// Repeated names fold according to [`DecodeOptions::duplicates`].
pub fn parse_pairs(input: &[u8], options: &DecodeOptions) -> Map<String, Value> {
    let mut flat = Map::new();
    for (key, value) in form_urlencoded::parse(input) {
        let value = Value::String(value.into_owned());
        match options.duplicates {
            DuplicateKeys::Last => {
                flat.insert(key.into_owned(), value);
            }
            DuplicateKeys::Collect => match flat.get_mut(&*key) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    flat.insert(key.into_owned(), value);
                }
            },
        }
    }
    flat
}

/// Transcode a body some other decoder already split into fields.
pub fn from_flat_map(
    flat: Map<String, Value>,
    options: &DecodeOptions,
) -> Result<Map<String, Value>> {
    debug!(fields = flat.len(), strict = options.strict, "transcoding form body");
    trace!(?flat, "flat form body");
    let nested = transcode_owned_with_options(flat, options).inspect_err(|err| {
        warn!(key = err.key.as_deref().unwrap_or_default(), "rejected form body: {err}");
    })?;
    debug!(fields = nested.len(), "transcoded form body");
    trace!(?nested, "nested form body");
    Ok(nested)
}
