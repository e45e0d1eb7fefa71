//! Purpose: Safe seam over the InChI C API used by the request handlers.
//! Exports: `InchiLibrary`, `ConversionRecord`, `KeyBuffers`, `LinkedInchi` (feature `native`).
//! Role: Confines all native calls and native-owned memory to this module + `sys`.
//! Invariants: Conversion records release native text on drop, on every exit path.
//! Invariants: Key buffers are caller-owned, fixed-capacity, and read up to the first NUL only.
//! Notes: Handlers are generic over `InchiLibrary` so they can run without the C library linked.
use std::borrow::Cow;
use std::ffi::CStr;

#[cfg(feature = "native")]
pub mod sys;

/// InChIKey is 27 characters plus terminator.
pub const INCHIKEY_BUF_LEN: usize = 28;
/// Capacity of each of the two "extra" hash-extension outputs.
pub const XTRA_BUF_LEN: usize = 65;

/// Text fields of one `MakeINCHIFromMolfileText` result.
///
/// Implementors own (or borrow from the library) the underlying text and must
/// release it in `Drop`.
pub trait ConversionRecord {
    fn inchi(&self) -> Cow<'_, str>;
    fn aux_info(&self) -> Cow<'_, str>;
    fn message(&self) -> Cow<'_, str>;
    fn log(&self) -> Cow<'_, str>;
}

pub trait InchiLibrary {
    type Record: ConversionRecord;

    /// One native conversion call; returns the raw code and the record holding its output.
    fn make_inchi_from_molfile_text(&self, molfile: &CStr, options: &CStr) -> (i32, Self::Record);

    /// One native key computation writing into `buffers`; returns the raw code.
    fn get_inchikey_from_inchi(&self, inchi: &CStr, buffers: &mut KeyBuffers) -> i32;
}

/// Stack-scoped output storage for `GetINCHIKeyFromINCHI`.
#[derive(Clone, Debug)]
pub struct KeyBuffers {
    pub key: [u8; INCHIKEY_BUF_LEN],
    pub xtra1: [u8; XTRA_BUF_LEN],
    pub xtra2: [u8; XTRA_BUF_LEN],
}

impl KeyBuffers {
    pub fn new() -> Self {
        Self {
            key: [0; INCHIKEY_BUF_LEN],
            xtra1: [0; XTRA_BUF_LEN],
            xtra2: [0; XTRA_BUF_LEN],
        }
    }

    pub fn key_text(&self) -> Cow<'_, str> {
        text_until_nul(&self.key)
    }
}

impl Default for KeyBuffers {
    fn default() -> Self {
        Self::new()
    }
}

pub fn text_until_nul(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
}

#[cfg(feature = "native")]
pub use linked::{InchiOutput, LinkedInchi};

#[cfg(feature = "native")]
mod linked {
    use std::borrow::Cow;
    use std::ffi::CStr;
    use std::os::raw::c_char;
    use std::ptr;

    use super::{ConversionRecord, InchiLibrary, KeyBuffers, sys};

    /// The InChI library linked into this crate by `build.rs`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LinkedInchi;

    /// Owns an `inchi_Output`; `FreeINCHI` runs on drop.
    pub struct InchiOutput {
        raw: sys::inchi_Output,
    }

    impl InchiOutput {
        fn zeroed() -> Self {
            Self {
                raw: sys::inchi_Output {
                    szInChI: ptr::null_mut(),
                    szAuxInfo: ptr::null_mut(),
                    szMessage: ptr::null_mut(),
                    szLog: ptr::null_mut(),
                },
            }
        }
    }

    impl Drop for InchiOutput {
        fn drop(&mut self) {
            unsafe {
                sys::FreeINCHI(&mut self.raw);
            }
        }
    }

    impl ConversionRecord for InchiOutput {
        fn inchi(&self) -> Cow<'_, str> {
            c_text(self.raw.szInChI)
        }

        fn aux_info(&self) -> Cow<'_, str> {
            c_text(self.raw.szAuxInfo)
        }

        fn message(&self) -> Cow<'_, str> {
            c_text(self.raw.szMessage)
        }

        fn log(&self) -> Cow<'_, str> {
            c_text(self.raw.szLog)
        }
    }

    impl InchiLibrary for LinkedInchi {
        type Record = InchiOutput;

        fn make_inchi_from_molfile_text(
            &self,
            molfile: &CStr,
            options: &CStr,
        ) -> (i32, Self::Record) {
            let mut output = InchiOutput::zeroed();
            // The API takes a mutable options string.
            let mut options = options.to_bytes_with_nul().to_vec();
            let code = unsafe {
                sys::MakeINCHIFromMolfileText(
                    molfile.as_ptr(),
                    options.as_mut_ptr() as *mut c_char,
                    &mut output.raw,
                )
            };
            (code, output)
        }

        fn get_inchikey_from_inchi(&self, inchi: &CStr, buffers: &mut KeyBuffers) -> i32 {
            unsafe {
                sys::GetINCHIKeyFromINCHI(
                    inchi.as_ptr(),
                    0,
                    0,
                    buffers.key.as_mut_ptr() as *mut c_char,
                    buffers.xtra1.as_mut_ptr() as *mut c_char,
                    buffers.xtra2.as_mut_ptr() as *mut c_char,
                )
            }
        }
    }

    fn c_text<'a>(ptr: *const c_char) -> Cow<'a, str> {
        if ptr.is_null() {
            return Cow::Borrowed("");
        }
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
    }
}
