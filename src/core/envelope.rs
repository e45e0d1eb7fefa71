//! Purpose: Canonical JSON result envelopes and the owned buffers that carry them to the host.
//! Exports: `Status`, `InchiEnvelope`, `InchiKeyEnvelope`, `EncodedEnvelope`.
//! Role: Single serialization point for both handlers; owns the "text + status -> buffer" step.
//! Invariants: Every envelope field is always present (empty string, never omitted).
//! Invariants: Encoded buffers are valid UTF-8 JSON, NUL-terminated, with no interior NUL.
//! Invariants: Exactly one allocation per encode, sized to the JSON length plus terminator.
//! Invariants: Allocation failure is reported as `ErrorKind::OutOfMemory`, never a panic.
use std::ffi::{CStr, CString};
use std::io;
use std::os::raw::c_char;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};

/// Envelope `return_code`: `0` success, `1` success with warnings, `-1` failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Status {
    Success,
    Warning,
    Failure,
}

impl Status {
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Warning => 1,
            Status::Failure => -1,
        }
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl TryFrom<i32> for Status {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Success),
            1 => Ok(Status::Warning),
            -1 => Ok(Status::Failure),
            other => Err(format!("invalid return_code {other}")),
        }
    }
}

/// Result of a molfile -> InChI conversion.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InchiEnvelope {
    pub return_code: Status,
    pub inchi: String,
    pub auxinfo: String,
    pub message: String,
    pub log: String,
}

impl InchiEnvelope {
    pub fn failure(message: impl Into<String>, log: impl Into<String>) -> Self {
        Self {
            return_code: Status::Failure,
            inchi: String::new(),
            auxinfo: String::new(),
            message: message.into(),
            log: log.into(),
        }
    }
}

/// Result of an InChI -> InChIKey lookup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InchiKeyEnvelope {
    pub return_code: Status,
    pub inchikey: String,
    pub message: String,
}

impl InchiKeyEnvelope {
    pub fn success(inchikey: impl Into<String>) -> Self {
        Self {
            return_code: Status::Success,
            inchikey: inchikey.into(),
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            return_code: Status::Failure,
            inchikey: String::new(),
            message: message.into(),
        }
    }
}

/// Owned, NUL-terminated JSON text ready to cross the ABI boundary.
///
/// Ownership leaves Rust through [`EncodedEnvelope::into_raw`] and comes back
/// exactly once through [`EncodedEnvelope::from_raw`] (which is what
/// `inchi_web_free` does). Dropping an `EncodedEnvelope` frees the buffer.
#[derive(Debug)]
pub struct EncodedEnvelope {
    text: CString,
}

impl EncodedEnvelope {
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, Error> {
        let mut counter = ByteCounter(0);
        serde_json::to_writer(&mut counter, value).map_err(encoding_error)?;
        let json_len = counter.0;

        let total = json_len.checked_add(1).ok_or_else(|| {
            Error::new(ErrorKind::OutOfMemory).with_message("envelope length overflow")
        })?;
        let mut bytes = allocate_exact(total)?;
        serde_json::to_writer(&mut bytes, value).map_err(encoding_error)?;
        debug_assert_eq!(bytes.len(), json_len);
        bytes.push(0);

        let text = CString::from_vec_with_nul(bytes).map_err(|err| {
            Error::new(ErrorKind::Encoding)
                .with_message("envelope contains interior nul")
                .with_source(err)
        })?;
        Ok(Self { text })
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.text
    }

    /// The JSON text; `None` only if the UTF-8 invariant was broken.
    pub fn as_str(&self) -> Option<&str> {
        self.text.to_str().ok()
    }

    /// JSON length in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.text.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_bytes().is_empty()
    }

    /// Hands the buffer to the caller; it must come back through `from_raw` exactly once.
    pub fn into_raw(self) -> *mut c_char {
        self.text.into_raw()
    }

    /// Reclaims a buffer previously returned by [`EncodedEnvelope::into_raw`].
    ///
    /// # Safety
    /// `ptr` must come from `into_raw` and must not have been reclaimed before.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Self {
        Self {
            text: unsafe { CString::from_raw(ptr) },
        }
    }
}

pub(crate) fn allocate_exact(len: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(len).map_err(|err| {
        Error::new(ErrorKind::OutOfMemory)
            .with_message(format!("failed to allocate {len} byte envelope"))
            .with_source(err)
    })?;
    Ok(bytes)
}

fn encoding_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Encoding)
        .with_message("failed to serialize envelope")
        .with_source(err)
}

struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
