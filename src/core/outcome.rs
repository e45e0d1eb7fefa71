// Closed native return-code taxonomies and their mapping onto envelope statuses.
use crate::core::envelope::Status;

pub const MOL2INCHI_RET_EOF: i32 = -1;
pub const MOL2INCHI_RET_OKAY: i32 = 0;
pub const MOL2INCHI_RET_WARNING: i32 = 1;
pub const MOL2INCHI_RET_ERROR: i32 = 2;
pub const MOL2INCHI_RET_ERROR_GET: i32 = 3;
pub const MOL2INCHI_RET_ERROR_COMP: i32 = 4;

pub const INCHIKEY_OK: i32 = 0;
pub const INCHIKEY_UNKNOWN_ERROR: i32 = 1;
pub const INCHIKEY_EMPTY_INPUT: i32 = 2;
pub const INCHIKEY_INVALID_INCHI_PREFIX: i32 = 3;
pub const INCHIKEY_NOT_ENOUGH_MEMORY: i32 = 4;
pub const INCHIKEY_INVALID_INCHI: i32 = 20;
pub const INCHIKEY_INVALID_STD_INCHI: i32 = 21;

/// Return value of `MakeINCHIFromMolfileText`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MolfileOutcome {
    Okay,
    Warning,
    Eof,
    Error,
    ErrorGet,
    ErrorComp,
    Unknown(i32),
}

impl MolfileOutcome {
    pub fn from_code(code: i32) -> Self {
        match code {
            MOL2INCHI_RET_OKAY => MolfileOutcome::Okay,
            MOL2INCHI_RET_WARNING => MolfileOutcome::Warning,
            MOL2INCHI_RET_EOF => MolfileOutcome::Eof,
            MOL2INCHI_RET_ERROR => MolfileOutcome::Error,
            MOL2INCHI_RET_ERROR_GET => MolfileOutcome::ErrorGet,
            MOL2INCHI_RET_ERROR_COMP => MolfileOutcome::ErrorComp,
            other => MolfileOutcome::Unknown(other),
        }
    }

    pub fn status(self) -> Status {
        match self {
            MolfileOutcome::Okay => Status::Success,
            MolfileOutcome::Warning => Status::Warning,
            MolfileOutcome::Eof
            | MolfileOutcome::Error
            | MolfileOutcome::ErrorGet
            | MolfileOutcome::ErrorComp
            | MolfileOutcome::Unknown(_) => Status::Failure,
        }
    }
}

/// Return value of `GetINCHIKeyFromINCHI`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InchiKeyOutcome {
    Ok,
    UnknownError,
    EmptyInput,
    InvalidInchiPrefix,
    NotEnoughMemory,
    InvalidInchi,
    InvalidStdInchi,
    Unknown(i32),
}

impl InchiKeyOutcome {
    pub fn from_code(code: i32) -> Self {
        match code {
            INCHIKEY_OK => InchiKeyOutcome::Ok,
            INCHIKEY_UNKNOWN_ERROR => InchiKeyOutcome::UnknownError,
            INCHIKEY_EMPTY_INPUT => InchiKeyOutcome::EmptyInput,
            INCHIKEY_INVALID_INCHI_PREFIX => InchiKeyOutcome::InvalidInchiPrefix,
            INCHIKEY_NOT_ENOUGH_MEMORY => InchiKeyOutcome::NotEnoughMemory,
            INCHIKEY_INVALID_INCHI => InchiKeyOutcome::InvalidInchi,
            INCHIKEY_INVALID_STD_INCHI => InchiKeyOutcome::InvalidStdInchi,
            other => InchiKeyOutcome::Unknown(other),
        }
    }

    pub fn status(self) -> Status {
        match self {
            InchiKeyOutcome::Ok => Status::Success,
            _ => Status::Failure,
        }
    }

    /// Fixed diagnostic for failure codes; `None` for success.
    pub fn message(self) -> Option<String> {
        let text = match self {
            InchiKeyOutcome::Ok => return None,
            InchiKeyOutcome::UnknownError => "GetINCHIKeyFromINCHI: Unknown program error",
            InchiKeyOutcome::EmptyInput => "GetINCHIKeyFromINCHI: Source string is empty",
            InchiKeyOutcome::InvalidInchiPrefix => {
                "GetINCHIKeyFromINCHI: Invalid InChI prefix or invalid version (not 1)"
            }
            InchiKeyOutcome::NotEnoughMemory => "GetINCHIKeyFromINCHI: Not enough memory",
            InchiKeyOutcome::InvalidInchi => "GetINCHIKeyFromINCHI: Source InChI has invalid layout",
            InchiKeyOutcome::InvalidStdInchi => {
                "GetINCHIKeyFromINCHI: Source standard InChI has invalid layout"
            }
            InchiKeyOutcome::Unknown(code) => {
                return Some(format!("GetINCHIKeyFromINCHI: Unknown return code {code}"));
            }
        };
        Some(text.to_string())
    }
}

pub fn unknown_molfile_code_message(code: i32) -> String {
    format!("MakeINCHIFromMolfileText: Unknown return code {code}")
}
