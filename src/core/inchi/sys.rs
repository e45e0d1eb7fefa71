// Raw FFI bindings to the InChI API (inchi_api.h).
#![allow(non_camel_case_types, non_snake_case)]

use libc::c_int;
use std::os::raw::c_char;

#[repr(C)]
pub struct inchi_Output {
    pub szInChI: *mut c_char,
    pub szAuxInfo: *mut c_char,
    pub szMessage: *mut c_char,
    pub szLog: *mut c_char,
}

unsafe extern "C" {
    pub fn MakeINCHIFromMolfileText(
        moltext: *const c_char,
        options: *mut c_char,
        result: *mut inchi_Output,
    ) -> c_int;

    pub fn FreeINCHI(out: *mut inchi_Output);

    pub fn GetINCHIKeyFromINCHI(
        szINCHISource: *const c_char,
        xtra1: c_int,
        xtra2: c_int,
        szINCHIKey: *mut c_char,
        szXtra1: *mut c_char,
        szXtra2: *mut c_char,
    ) -> c_int;
}
