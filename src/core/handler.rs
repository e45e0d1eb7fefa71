//! Purpose: The two request handlers: molfile -> InChI and InChI -> InChIKey.
//! Exports: `inchi_from_molfile`, `inchikey_from_inchi`.
//! Role: Call the native library once, normalize its code + text into an envelope.
//! Invariants: Every native code yields exactly one envelope; unknown codes become failures.
//! Invariants: The native conversion record is released before the envelope is returned.
//! Invariants: Failure envelopes carry empty identifier fields, never missing ones.
use std::ffi::CStr;

use tracing::{debug, warn};

use crate::core::envelope::{InchiEnvelope, InchiKeyEnvelope, Status};
use crate::core::inchi::{ConversionRecord, InchiLibrary, KeyBuffers};
use crate::core::outcome::{InchiKeyOutcome, MolfileOutcome, unknown_molfile_code_message};

pub fn inchi_from_molfile<L: InchiLibrary>(
    library: &L,
    molfile: &CStr,
    options: &CStr,
) -> InchiEnvelope {
    let (code, record) = library.make_inchi_from_molfile_text(molfile, options);
    let outcome = MolfileOutcome::from_code(code);

    let envelope = match outcome {
        MolfileOutcome::Okay => InchiEnvelope {
            return_code: Status::Success,
            inchi: record.inchi().into_owned(),
            auxinfo: record.aux_info().into_owned(),
            message: String::new(),
            log: String::new(),
        },
        MolfileOutcome::Warning => InchiEnvelope {
            return_code: Status::Warning,
            inchi: record.inchi().into_owned(),
            auxinfo: record.aux_info().into_owned(),
            message: record.message().into_owned(),
            log: record.log().into_owned(),
        },
        MolfileOutcome::Eof
        | MolfileOutcome::Error
        | MolfileOutcome::ErrorGet
        | MolfileOutcome::ErrorComp => {
            InchiEnvelope::failure(record.message().into_owned(), record.log().into_owned())
        }
        MolfileOutcome::Unknown(code) => {
            warn!(code, "MakeINCHIFromMolfileText returned an unrecognized code");
            let diagnostic = unknown_molfile_code_message(code);
            InchiEnvelope::failure(diagnostic.clone(), diagnostic)
        }
    };
    drop(record);

    debug!(
        code,
        ?outcome,
        status = envelope.return_code.code(),
        "MakeINCHIFromMolfileText"
    );
    envelope
}

pub fn inchikey_from_inchi<L: InchiLibrary>(library: &L, inchi: &CStr) -> InchiKeyEnvelope {
    let mut buffers = KeyBuffers::new();
    let code = library.get_inchikey_from_inchi(inchi, &mut buffers);
    let outcome = InchiKeyOutcome::from_code(code);

    let envelope = match outcome.message() {
        None => InchiKeyEnvelope::success(buffers.key_text().into_owned()),
        Some(message) => {
            if let InchiKeyOutcome::Unknown(code) = outcome {
                warn!(code, "GetINCHIKeyFromINCHI returned an unrecognized code");
            }
            InchiKeyEnvelope::failure(message)
        }
    };

    debug!(
        code,
        ?outcome,
        status = envelope.return_code.code(),
        "GetINCHIKeyFromINCHI"
    );
    envelope
}

#[cfg(test)]
mod tests {
    use super::{inchi_from_molfile, inchikey_from_inchi};
    use crate::core::envelope::Status;
    use crate::core::inchi::{ConversionRecord, InchiLibrary, KeyBuffers};
    use crate::core::outcome::*;
    use std::borrow::Cow;
    use std::cell::Cell;
    use std::ffi::CStr;
    use std::rc::Rc;

    const ETHANOL_INCHI: &str = "InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3";
    const ETHANOL_AUX: &str = "AuxInfo=1/0/N:1,2,3/rA:3nCCO/rB:s1;s2;/rC:;;;";
    const ETHANOL_KEY: &str = "LFQSCWFLJHTTHZ-UHFFFAOYSA-N";

    struct Scripted {
        code: i32,
        released: Rc<Cell<usize>>,
        seen_options: Cell<Option<String>>,
    }

    impl Scripted {
        fn new(code: i32) -> Self {
            Self {
                code,
                released: Rc::new(Cell::new(0)),
                seen_options: Cell::new(None),
            }
        }
    }

    struct Record {
        released: Rc<Cell<usize>>,
    }

    impl Drop for Record {
        fn drop(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    impl ConversionRecord for Record {
        fn inchi(&self) -> Cow<'_, str> {
            Cow::Borrowed(ETHANOL_INCHI)
        }
        fn aux_info(&self) -> Cow<'_, str> {
            Cow::Borrowed(ETHANOL_AUX)
        }
        fn message(&self) -> Cow<'_, str> {
            Cow::Borrowed("Omitted undefined stereo")
        }
        fn log(&self) -> Cow<'_, str> {
            Cow::Borrowed("Structure #1. Warning (Omitted undefined stereo)")
        }
    }

    impl InchiLibrary for Scripted {
        type Record = Record;

        fn make_inchi_from_molfile_text(&self, _molfile: &CStr, options: &CStr) -> (i32, Record) {
            self.seen_options
                .set(Some(options.to_string_lossy().into_owned()));
            (
                self.code,
                Record {
                    released: Rc::clone(&self.released),
                },
            )
        }

        fn get_inchikey_from_inchi(&self, _inchi: &CStr, buffers: &mut KeyBuffers) -> i32 {
            if self.code == INCHIKEY_OK {
                buffers.key[..ETHANOL_KEY.len()].copy_from_slice(ETHANOL_KEY.as_bytes());
            }
            self.code
        }
    }

    #[test]
    fn okay_keeps_identifiers_and_blanks_diagnostics() {
        let library = Scripted::new(MOL2INCHI_RET_OKAY);
        let envelope = inchi_from_molfile(&library, c"ethanol", c"");
        assert_eq!(envelope.return_code, Status::Success);
        assert_eq!(envelope.inchi, ETHANOL_INCHI);
        assert_eq!(envelope.auxinfo, ETHANOL_AUX);
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.log, "");
        assert_eq!(library.released.get(), 1);
    }

    #[test]
    fn warning_keeps_everything() {
        let library = Scripted::new(MOL2INCHI_RET_WARNING);
        let envelope = inchi_from_molfile(&library, c"m", c"-SNon");
        assert_eq!(envelope.return_code, Status::Warning);
        assert_eq!(envelope.inchi, ETHANOL_INCHI);
        assert!(!envelope.message.is_empty());
        assert!(!envelope.log.is_empty());
        assert_eq!(library.seen_options.take().as_deref(), Some("-SNon"));
    }

    #[test]
    fn error_codes_blank_identifiers_and_release_record() {
        for code in [
            MOL2INCHI_RET_EOF,
            MOL2INCHI_RET_ERROR,
            MOL2INCHI_RET_ERROR_GET,
            MOL2INCHI_RET_ERROR_COMP,
        ] {
            let library = Scripted::new(code);
            let envelope = inchi_from_molfile(&library, c"m", c"");
            assert_eq!(envelope.return_code, Status::Failure, "code {code}");
            assert_eq!(envelope.inchi, "");
            assert_eq!(envelope.auxinfo, "");
            assert_eq!(envelope.message, "Omitted undefined stereo");
            assert_eq!(
                envelope.log,
                "Structure #1. Warning (Omitted undefined stereo)"
            );
            assert_eq!(library.released.get(), 1, "code {code}");
        }
    }

    #[test]
    fn unknown_conversion_code_names_the_value() {
        let library = Scripted::new(42);
        let envelope = inchi_from_molfile(&library, c"m", c"");
        assert_eq!(envelope.return_code, Status::Failure);
        assert_eq!(envelope.inchi, "");
        assert_eq!(envelope.auxinfo, "");
        assert_eq!(
            envelope.message,
            "MakeINCHIFromMolfileText: Unknown return code 42"
        );
        assert_eq!(envelope.log, envelope.message);
        assert_eq!(library.released.get(), 1);
    }

    #[test]
    fn key_success_reads_buffer() {
        let library = Scripted::new(INCHIKEY_OK);
        let envelope = inchikey_from_inchi(&library, c"InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3");
        assert_eq!(envelope.return_code, Status::Success);
        assert_eq!(envelope.inchikey, ETHANOL_KEY);
        assert_eq!(envelope.inchikey.len(), 27);
        assert_eq!(envelope.message, "");
    }

    #[test]
    fn key_failures_use_fixed_messages() {
        let library = Scripted::new(INCHIKEY_EMPTY_INPUT);
        let envelope = inchikey_from_inchi(&library, c"");
        assert_eq!(envelope.return_code, Status::Failure);
        assert_eq!(envelope.inchikey, "");
        assert_eq!(
            envelope.message,
            "GetINCHIKeyFromINCHI: Source string is empty"
        );

        let library = Scripted::new(-7);
        let envelope = inchikey_from_inchi(&library, c"InChI=1S/");
        assert_eq!(envelope.return_code, Status::Failure);
        assert_eq!(
            envelope.message,
            "GetINCHIKeyFromINCHI: Unknown return code -7"
        );
    }
}
