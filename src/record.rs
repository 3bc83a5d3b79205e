//! Parsing of a single `key;value` line.

use crate::error::RecordError;

pub const SEPARATOR: u8 = b';';

/// One successfully parsed line. The key borrows from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub key: &'a str,
    pub value: f64,
}

/// Parses one line whose `\n` has already been stripped.
///
/// A trailing `\r` is dropped so CRLF files parse the same as LF files.
pub fn parse_record(line: &[u8]) -> Result<Record<'_>, RecordError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let sep = memchr::memchr(SEPARATOR, line)
        .ok_or(RecordError::MalformedRecord("missing separator"))?;
    let (key, value_text) = (&line[..sep], &line[sep + 1..]);

    if memchr::memchr(SEPARATOR, value_text).is_some() {
        return Err(RecordError::MalformedRecord("more than one separator"));
    }
    if value_text.is_empty() {
        return Err(RecordError::MalformedRecord("missing value"));
    }

    let key = std::str::from_utf8(key)
        .map_err(|_| RecordError::MalformedRecord("key is not valid UTF-8"))?;
    let value = parse_value(value_text)?;

    Ok(Record { key, value })
}

fn parse_value(text: &[u8]) -> Result<f64, RecordError> {
    match lexical_core::parse::<f64>(text) {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RecordError::InvalidNumber(
            String::from_utf8_lossy(text).into_owned(),
        )),
    }
}
