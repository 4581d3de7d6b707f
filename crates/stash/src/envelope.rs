// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The self-describing envelope format.
//!
//! An envelope is a single flag byte followed by the payload. The flag says whether the
//! payload is UTF-8 text or JSON, and whether it is gzip-compressed:
//!
//! | Byte | Flag | Payload |
//! |------|------|---------|
//! | `1` | [`Flag::PlainText`] | UTF-8 text |
//! | `2` | [`Flag::PlainTextCompressed`] | gzip of UTF-8 text |
//! | `3` | [`Flag::Structured`] | JSON |
//! | `4` | [`Flag::StructuredCompressed`] | gzip of JSON |
//!
//! A zero-length envelope means "no value". Any other flag byte is decoded on a best-effort
//! basis as JSON.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::options::DEFAULT_COMPRESSION_THRESHOLD;
use crate::{Error, ErrorKind, Result};

/// Identifies the shape of an envelope payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Uncompressed UTF-8 text.
    PlainText,
    /// Gzip-compressed UTF-8 text.
    PlainTextCompressed,
    /// Uncompressed JSON.
    Structured,
    /// Gzip-compressed JSON.
    StructuredCompressed,
    /// A flag byte this version does not know.
    Unknown(u8),
}

impl Flag {
    /// Returns `true` if the payload is gzip-compressed.
    ///
    /// Unknown flags are treated as uncompressed.
    #[must_use]
    pub fn is_compressed(self) -> bool {
        matches!(self, Self::PlainTextCompressed | Self::StructuredCompressed)
    }

    /// Returns `true` if the payload is UTF-8 text.
    #[must_use]
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::PlainText | Self::PlainTextCompressed)
    }
}

impl From<u8> for Flag {
    fn from(byte: u8) -> Self {
        match byte {
            1 => Self::PlainText,
            2 => Self::PlainTextCompressed,
            3 => Self::Structured,
            4 => Self::StructuredCompressed,
            other => Self::Unknown(other),
        }
    }
}

impl From<Flag> for u8 {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::PlainText => 1,
            Flag::PlainTextCompressed => 2,
            Flag::Structured => 3,
            Flag::StructuredCompressed => 4,
            Flag::Unknown(byte) => byte,
        }
    }
}

/// Encodes values into envelopes and decodes them back.
///
/// `String` values are stored as text; everything else is serialized as JSON. Payloads
/// whose length reaches the compression threshold are gzip-compressed.
///
/// # Examples
///
/// ```
/// use stash::{EnvelopeCodec, Flag};
///
/// let codec = EnvelopeCodec::default();
///
/// let bytes = codec.encode(&vec![1, 2, 3]).unwrap();
/// assert_eq!(Flag::from(bytes[0]), Flag::Structured);
///
/// let decoded: Option<Vec<i32>> = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, Some(vec![1, 2, 3]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeCodec {
    compression_threshold: usize,
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_THRESHOLD)
    }
}

impl EnvelopeCodec {
    /// Creates a codec that compresses payloads of at least `compression_threshold` bytes.
    #[must_use]
    pub fn new(compression_threshold: usize) -> Self {
        Self { compression_threshold }
    }

    /// Returns the compression threshold in bytes.
    #[must_use]
    pub fn compression_threshold(&self) -> usize {
        self.compression_threshold
    }

    /// Encodes a value.
    ///
    /// Text types (`String`, `&'static str`, `Box<str>` and `Cow<'static, str>`) are
    /// stored as UTF-8 text, any other type as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Serialization`] if the value cannot be serialized and
    /// [`ErrorKind::Compression`] if compressing it fails.
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + Any,
    {
        if let Some(text) = as_text(value) {
            return self.encode_str(text);
        }

        let payload = serde_json::to_vec(value).map_err(|e| Error::caused_by(ErrorKind::Serialization, e))?;
        self.seal(&payload, Flag::Structured, Flag::StructuredCompressed)
    }

    /// Encodes a string slice as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Compression`] if compressing the text fails.
    pub fn encode_str(&self, text: &str) -> Result<Vec<u8>> {
        self.seal(text.as_bytes(), Flag::PlainText, Flag::PlainTextCompressed)
    }

    /// Decodes an envelope into `T`.
    ///
    /// Returns `Ok(None)` for an empty envelope. Text envelopes requested as anything
    /// other than `String` are parsed as JSON, so a text payload of `42` decodes as an
    /// integer. Unknown flags are logged and the remaining bytes parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Decompression`] for corrupt compressed payloads and
    /// [`ErrorKind::Deserialization`] when the payload does not fit `T`.
    pub fn decode<T>(&self, bytes: &[u8]) -> Result<Option<T>>
    where
        T: DeserializeOwned + Any,
    {
        let Some((&byte, body)) = bytes.split_first() else {
            return Ok(None);
        };

        let flag = Flag::from(byte);
        if let Flag::Unknown(byte) = flag {
            tracing::warn!(flag = byte, len = body.len(), "unknown envelope flag, attempting structured decode");
            return from_json(body).map(Some);
        }

        let payload = if flag.is_compressed() { decompress(body)? } else { body.to_vec() };

        if flag.is_plain_text() && TypeId::of::<T>() == TypeId::of::<String>() {
            let text = String::from_utf8(payload).map_err(|e| Error::caused_by(ErrorKind::Deserialization, e))?;
            return downcast(text).map(Some);
        }

        from_json(&payload).map(Some)
    }

    fn seal(&self, payload: &[u8], plain: Flag, compressed: Flag) -> Result<Vec<u8>> {
        if payload.len() < self.compression_threshold {
            let mut envelope = Vec::with_capacity(payload.len() + 1);
            envelope.push(plain.into());
            envelope.extend_from_slice(payload);
            return Ok(envelope);
        }

        let mut encoder = GzEncoder::new(vec![u8::from(compressed)], Compression::fast());
        encoder
            .write_all(payload)
            .map_err(|e| Error::caused_by(ErrorKind::Compression, e))?;
        encoder.finish().map_err(|e| Error::caused_by(ErrorKind::Compression, e))
    }
}

fn as_text(value: &dyn Any) -> Option<&str> {
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(text.as_str());
    }
    if let Some(text) = value.downcast_ref::<&'static str>() {
        return Some(*text);
    }
    if let Some(text) = value.downcast_ref::<Box<str>>() {
        return Some(&**text);
    }
    value.downcast_ref::<Cow<'static, str>>().map(AsRef::as_ref)
}

fn decompress(body: &[u8]) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    GzDecoder::new(body)
        .read_to_end(&mut payload)
        .map_err(|e| Error::caused_by(ErrorKind::Decompression, e))?;
    Ok(payload)
}

fn from_json<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|e| Error::caused_by(ErrorKind::Deserialization, e))
}

fn downcast<T: Any>(text: String) -> Result<T> {
    let boxed: Box<dyn Any> = Box::new(text);
    match boxed.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(Error::new(ErrorKind::Deserialization)),
    }
}
