// Core modules: native seam, outcome taxonomy, handlers, envelope encoding, errors.
pub mod envelope;
pub mod error;
pub mod handler;
pub mod inchi;
pub mod outcome;
