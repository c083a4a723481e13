//! Fixed-offset binary layout codec
//!
//! Account data and event payloads written by the Pump.fun program are plain
//! little-endian field sequences. A record layout is described by an ordered
//! [`Schema`]; [`decode_record`] walks it once and only hands out values when
//! every field decoded, so callers never see a half-populated record.
//!
//! # Field types
//!
//! - `Bool`: one byte, `0` is false and any other value is true (written as `1`)
//! - `U64` / `I64`: eight bytes, little-endian
//! - `Pubkey`: 32 raw bytes
//! - `String`: `u32` little-endian byte length followed by UTF-8 bytes. Only
//!   event payloads carry strings; account layouts are fully static.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::error::DecodeError;

pub const PUBKEY_LEN: usize = 32;
pub const STRING_LEN_PREFIX: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    U64,
    I64,
    Pubkey,
    String,
}

impl FieldType {
    /// Width on the wire, `None` for length-prefixed strings
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            FieldType::Bool => Some(1),
            FieldType::U64 | FieldType::I64 => Some(8),
            FieldType::Pubkey => Some(PUBKEY_LEN),
            FieldType::String => None,
        }
    }
}

/// One named entry of a record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Ordered record layout
pub type Schema = [Field];

/// Total width of a schema, `None` if any field is variable-length
pub fn schema_width(schema: &Schema) -> Option<usize> {
    schema.iter().map(|field| field.ty.fixed_width()).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Bool(bool),
    U64(u64),
    I64(i64),
    Pubkey(Pubkey),
    String(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::U64(_) => FieldType::U64,
            FieldValue::I64(_) => FieldType::I64,
            FieldValue::Pubkey(_) => FieldType::Pubkey,
            FieldValue::String(_) => FieldType::String,
        }
    }

    /// Number of bytes this value occupies once encoded
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::String(s) => STRING_LEN_PREFIX + s.len(),
            other => other.field_type().fixed_width().unwrap_or_default(),
        }
    }
}

fn read_array<const N: usize>(buffer: &[u8], offset: usize) -> Result<[u8; N], DecodeError> {
    let end = offset.saturating_add(N);
    buffer
        .get(offset..end)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::TooShort { expected: end, actual: buffer.len() })
}

/// Decodes a single field of type `ty` starting at `offset`
pub fn decode(buffer: &[u8], offset: usize, ty: FieldType) -> Result<FieldValue, DecodeError> {
    let value = match ty {
        FieldType::Bool => FieldValue::Bool(read_array::<1>(buffer, offset)?[0] != 0),
        FieldType::U64 => FieldValue::U64(u64::from_le_bytes(read_array(buffer, offset)?)),
        FieldType::I64 => FieldValue::I64(i64::from_le_bytes(read_array(buffer, offset)?)),
        FieldType::Pubkey => {
            FieldValue::Pubkey(Pubkey::new_from_array(read_array(buffer, offset)?))
        }
        FieldType::String => {
            let len = u32::from_le_bytes(read_array(buffer, offset)?) as usize;
            let start = offset + STRING_LEN_PREFIX;
            let end = start.saturating_add(len);
            let bytes = buffer
                .get(start..end)
                .ok_or(DecodeError::TooShort { expected: end, actual: buffer.len() })?;
            let text =
                std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset: start })?;
            FieldValue::String(text.to_owned())
        }
    };
    Ok(value)
}

/// A fully decoded record: one value per schema field, in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<FieldValue>,
    end: usize,
}

impl Record {
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Offset one past the last decoded byte
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn reader(self) -> RecordReader {
        RecordReader { values: self.values.into_iter(), index: 0 }
    }
}

/// Sequential typed access to the values of a [`Record`]
pub struct RecordReader {
    values: std::vec::IntoIter<FieldValue>,
    index: usize,
}

impl RecordReader {
    fn next_value(&mut self, expected: FieldType) -> Result<FieldValue, DecodeError> {
        let index = self.index;
        self.index += 1;
        match self.values.next() {
            Some(value) if value.field_type() == expected => Ok(value),
            _ => Err(DecodeError::FieldType { index, expected }),
        }
    }

    pub fn bool(&mut self) -> Result<bool, DecodeError> {
        match self.next_value(FieldType::Bool)? {
            FieldValue::Bool(v) => Ok(v),
            _ => Err(DecodeError::FieldType { index: self.index - 1, expected: FieldType::Bool }),
        }
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        match self.next_value(FieldType::U64)? {
            FieldValue::U64(v) => Ok(v),
            _ => Err(DecodeError::FieldType { index: self.index - 1, expected: FieldType::U64 }),
        }
    }

    pub fn i64(&mut self) -> Result<i64, DecodeError> {
        match self.next_value(FieldType::I64)? {
            FieldValue::I64(v) => Ok(v),
            _ => Err(DecodeError::FieldType { index: self.index - 1, expected: FieldType::I64 }),
        }
    }

    pub fn pubkey(&mut self) -> Result<Pubkey, DecodeError> {
        match self.next_value(FieldType::Pubkey)? {
            FieldValue::Pubkey(v) => Ok(v),
            _ => Err(DecodeError::FieldType { index: self.index - 1, expected: FieldType::Pubkey }),
        }
    }

    pub fn string(&mut self) -> Result<String, DecodeError> {
        match self.next_value(FieldType::String)? {
            FieldValue::String(v) => Ok(v),
            _ => Err(DecodeError::FieldType { index: self.index - 1, expected: FieldType::String }),
        }
    }
}

/// Decodes every field of `schema` starting at `offset`
///
/// # Arguments
/// * `buffer` - Raw bytes
/// * `offset` - Position of the first field
/// * `schema` - Ordered field layout
///
/// # Returns
/// The decoded record, or the first error hit. Static schemas are length
/// checked up front so the error reports the full width required.
pub fn decode_record(buffer: &[u8], offset: usize, schema: &Schema) -> Result<Record, DecodeError> {
    if let Some(width) = schema_width(schema) {
        let expected = offset.saturating_add(width);
        if buffer.len() < expected {
            return Err(DecodeError::TooShort { expected, actual: buffer.len() });
        }
    }

    let mut values = Vec::with_capacity(schema.len());
    let mut cursor = offset;
    for field in schema {
        let value = decode(buffer, cursor, field.ty)?;
        cursor += value.encoded_len();
        values.push(value);
    }

    Ok(Record { values, end: cursor })
}

/// Appends the wire form of `value` to `out`
pub fn encode(value: &FieldValue, out: &mut Vec<u8>) {
    match value {
        FieldValue::Bool(v) => out.push(u8::from(*v)),
        FieldValue::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        FieldValue::I64(v) => out.extend_from_slice(&v.to_le_bytes()),
        FieldValue::Pubkey(v) => out.extend_from_slice(v.as_ref()),
        FieldValue::String(v) => {
            out.extend_from_slice(&(v.len() as u32).to_le_bytes());
            out.extend_from_slice(v.as_bytes());
        }
    }
}

/// Encodes `values` in schema order, rejecting values that do not match
pub fn encode_record(schema: &Schema, values: &[FieldValue]) -> Result<Vec<u8>, DecodeError> {
    if values.len() != schema.len() {
        return Err(DecodeError::LengthMismatch { expected: schema.len(), actual: values.len() });
    }

    let mut out = Vec::with_capacity(values.iter().map(FieldValue::encoded_len).sum());
    for (index, (field, value)) in schema.iter().zip(values).enumerate() {
        if value.field_type() != field.ty {
            return Err(DecodeError::FieldType { index, expected: field.ty });
        }
        encode(value, &mut out);
    }
    Ok(out)
}
