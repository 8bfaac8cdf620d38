//! Receive-side wire format: frame envelope and `\0`-delimited body

pub mod body;
pub mod frame;

pub use body::{decode_fields, parse_numeric, strip_device_prefix, FieldList};
pub use frame::{Frame, FrameHeader};
