//! Purpose: C ABI bridge for WebAssembly / C hosts (libinchi_web).
//! Exports: `inchi_from_molfile`, `inchikey_from_inchi` (feature `native`), buffer and config helpers.
//! Role: Stable ABI surface; pointer validation, panic containment, ownership hand-off.
//! Invariants: NUL-terminated UTF-8 JSON out; every non-NULL result is freed once via `inchi_web_free`.
//! Invariants: Null inputs and panics become failure envelopes; nothing unwinds across `extern "C"`.
//! Invariants: NULL is returned only when the envelope itself cannot be allocated or encoded.
//! Notes: The generic `*_raw` functions carry the logic so it runs without the C library linked.
use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use serde::Serialize;
use tracing::{error, warn};

use crate::config::{self, AllocPolicy};
use crate::core::envelope::{EncodedEnvelope, InchiEnvelope, InchiKeyEnvelope, allocate_exact};
use crate::core::error::{Error, ErrorKind, error_kind_code};
use crate::core::handler;
use crate::core::inchi::InchiLibrary;

pub const ABI_VERSION: u32 = 1;

const MOLFILE_OP: &str = "MakeINCHIFromMolfileText";
const INCHIKEY_OP: &str = "GetINCHIKeyFromINCHI";
const VERSION_STRING: &str = concat!("inchi-web ", env!("CARGO_PKG_VERSION"), "\0");

#[cfg(feature = "native")]
#[unsafe(no_mangle)]
pub extern "C" fn inchi_from_molfile(molfile: *const c_char, options: *const c_char) -> *mut c_char {
    unsafe { molfile_to_raw(&crate::core::inchi::LinkedInchi, molfile, options) }
}

#[cfg(feature = "native")]
#[unsafe(no_mangle)]
pub extern "C" fn inchikey_from_inchi(inchi: *const c_char) -> *mut c_char {
    unsafe { inchikey_to_raw(&crate::core::inchi::LinkedInchi, inchi) }
}

/// Converts molfile text and returns an owned JSON envelope (or NULL on encoder failure).
///
/// # Safety
/// Non-null `molfile` and `options` must point to NUL-terminated strings valid for the call.
pub unsafe fn molfile_to_raw<L: InchiLibrary>(
    library: &L,
    molfile: *const c_char,
    options: *const c_char,
) -> *mut c_char {
    let envelope = run_guarded(
        MOLFILE_OP,
        || {
            let molfile = unsafe { c_arg(molfile, MOLFILE_OP, "molfile") }?;
            let options = unsafe { c_arg(options, MOLFILE_OP, "options") }?;
            Ok(handler::inchi_from_molfile(library, molfile, options))
        },
        |err| InchiEnvelope::failure(failure_message(&err, MOLFILE_OP), ""),
    );
    hand_over(MOLFILE_OP, &envelope)
}

/// Computes the InChIKey for `inchi` and returns an owned JSON envelope (or NULL on encoder failure).
///
/// # Safety
/// A non-null `inchi` must point to a NUL-terminated string valid for the call.
pub unsafe fn inchikey_to_raw<L: InchiLibrary>(library: &L, inchi: *const c_char) -> *mut c_char {
    let envelope = run_guarded(
        INCHIKEY_OP,
        || {
            let inchi = unsafe { c_arg(inchi, INCHIKEY_OP, "inchi") }?;
            Ok(handler::inchikey_from_inchi(library, inchi))
        },
        |err| InchiKeyEnvelope::failure(failure_message(&err, INCHIKEY_OP)),
    );
    hand_over(INCHIKEY_OP, &envelope)
}

#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_free(envelope: *mut c_char) {
    if envelope.is_null() {
        return;
    }
    unsafe {
        drop(EncodedEnvelope::from_raw(envelope));
    }
}

/// Allocates `len` zeroed bytes for host-written input; release with `inchi_web_dealloc`.
/// Returns NULL for `len == 0` or when the allocation fails.
#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_alloc(len: usize) -> *mut u8 {
    if len == 0 {
        return ptr::null_mut();
    }
    let mut bytes = match allocate_exact(len) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(len, error = %err, "input allocation failed");
            return ptr::null_mut();
        }
    };
    bytes.resize(len, 0);
    let data = bytes.into_boxed_slice();
    Box::into_raw(data) as *mut u8
}

#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_dealloc(data: *mut u8, len: usize) {
    if data.is_null() || len == 0 {
        return;
    }
    unsafe {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)));
    }
}

/// Applies environment config and installs logging. Returns 0, or the error kind code negated.
#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_init() -> i32 {
    match config::init() {
        Ok(_) => 0,
        Err(err) => {
            warn!(error = %err, "rejected adapter config; keeping defaults");
            -error_kind_code(err.kind())
        }
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_set_alloc_policy(policy: i32) -> i32 {
    match AllocPolicy::from_code(policy) {
        Some(policy) => {
            config::set_alloc_policy(policy);
            0
        }
        None => -1,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_abi_version() -> u32 {
    ABI_VERSION
}

#[unsafe(no_mangle)]
pub extern "C" fn inchi_web_version_string() -> *const c_char {
    VERSION_STRING.as_ptr() as *const c_char
}

unsafe fn c_arg<'a>(input: *const c_char, op: &str, name: &str) -> Result<&'a CStr, Error> {
    if input.is_null() {
        warn!(op, arg = name, "null argument");
        return Err(Error::new(ErrorKind::Usage).with_message(format!("{op}: {name} is null")));
    }
    Ok(unsafe { CStr::from_ptr(input) })
}

fn run_guarded<T>(
    op: &str,
    body: impl FnOnce() -> Result<T, Error>,
    on_error: impl FnOnce(Error) -> T,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => on_error(err),
        Err(_) => {
            warn!(op, "caught panic in handler");
            on_error(Error::new(ErrorKind::Internal).with_message(format!("{op}: internal error")))
        }
    }
}

fn failure_message(err: &Error, op: &str) -> String {
    err.message().unwrap_or(op).to_string()
}

fn hand_over<T: Serialize>(op: &str, envelope: &T) -> *mut c_char {
    match EncodedEnvelope::encode(envelope) {
        Ok(encoded) => encoded.into_raw(),
        Err(err) => {
            error!(op, kind = ?err.kind(), error = %err, "failed to encode envelope");
            if err.kind() == ErrorKind::OutOfMemory && config::alloc_policy() == AllocPolicy::Abort
            {
                std::process::abort();
            }
            ptr::null_mut()
        }
    }
}
