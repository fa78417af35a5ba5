//! Rebuild nested objects and arrays from bracket-notation form fields.
//!
//! HTML forms and `FormData` flatten structured input into keys such as
//! `schedule[startDate]` or `schedule[daysOfWeek][0]`. This crate turns such a
//! flat, ordered map back into the nested value the keys describe, and can
//! flatten a nested value into form fields again.
//!
//! ```
//! use serde_json::json;
//!
//! let body = "title=Standup&schedule[daysOfWeek][0]=Mon&schedule[daysOfWeek][1]=Tue";
//! let value = formnest::decode_to_value(body).unwrap();
//! assert_eq!(
//!     value,
//!     json!({"title": "Standup", "schedule": {"daysOfWeek": ["Mon", "Tue"]}})
//! );
//! ```

pub mod batch;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
mod num;
pub mod options;
pub mod path;
pub mod transcode;

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use crate::batch::transcode_batch;
pub use crate::encode::flatten;
pub use crate::error::{Error, ErrorKind};
pub use crate::options::{DecodeOptions, DuplicateKeys, EncodeOptions, NullStyle};
pub use crate::path::Segment;
pub use crate::transcode::{
    transcode, transcode_owned, transcode_owned_with_options, transcode_with_options,
};

pub type Result<T> = std::result::Result<T, Error>;

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    to_string_with_options(value, &EncodeOptions::default())
}

pub fn to_string_with_options<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    encode::to_string(value, options)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, &DecodeOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_str(input, options)
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    from_slice_with_options(input, &DecodeOptions::default())
}

pub fn from_slice_with_options<T: DeserializeOwned>(
    input: &[u8],
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_slice(input, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_reader_with_options(reader, &DecodeOptions::default())
}

pub fn from_reader_with_options<T: DeserializeOwned, R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_reader(reader, options)
}

pub fn decode_to_value(input: &str) -> Result<Value> {
    decode_to_value_with_options(input, &DecodeOptions::default())
}

pub fn decode_to_value_with_options(input: &str, options: &DecodeOptions) -> Result<Value> {
    decode::decode_slice(input.as_bytes(), options)
}
