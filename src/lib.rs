//! Purpose: JSON-envelope adapter exposing the IUPAC InChI library to WebAssembly / C hosts.
//! Exports: `abi` (C ABI surface), `config` (alloc policy, logging), `core` (handlers, envelopes, errors).
//! Role: Library behind `libinchi_web`; the `abi` exports are the stable host contract.
//! Invariants: Every host call returns one JSON envelope the host frees once via `inchi_web_free`.
//! Invariants: Native return codes never escape unmapped; failures travel inside the envelope.
pub mod abi;
pub mod config;
pub mod core;
