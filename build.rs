//! Purpose: Build or link the IUPAC InChI C library for the `native` feature.
//! Role: Cargo build-script; configures `cc` inputs/includes and link search paths.
//! Invariants: Does nothing unless the `native` feature is enabled.
//! Invariants: `INCHI_SRC_DIR` (compile from source) takes precedence over `INCHI_LIB_DIR` (prebuilt).
//! Invariants: Uses only Cargo-provided env vars plus the two INCHI_* overrides.
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const SOURCE_SUBDIRS: &[&str] = &[
    "INCHI_BASE/src",
    "INCHI_API/libinchi/src",
    "INCHI_API/libinchi/src/ixa",
];

fn main() {
    println!("cargo:rerun-if-env-changed=INCHI_SRC_DIR");
    println!("cargo:rerun-if-env-changed=INCHI_LIB_DIR");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    if let Some(src_dir) = env::var_os("INCHI_SRC_DIR").map(PathBuf::from) {
        compile_inchi(&src_dir);
        return;
    }

    let lib_dir = env::var_os("INCHI_LIB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            panic!(
                "feature `native` needs the InChI library; set INCHI_SRC_DIR to the INCHI-1-SRC \
                 tree or INCHI_LIB_DIR to a directory containing libinchi"
            )
        });
    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=inchi");
}

fn compile_inchi(src_dir: &Path) {
    let target = env::var("TARGET").unwrap_or_default();
    let mut build = cc::Build::new();
    build
        .warnings(false)
        .define("TARGET_API_LIB", None)
        .define("COMPILE_ANSI_ONLY", None)
        .include(src_dir.join("INCHI_BASE").join("src"))
        .include(src_dir.join("INCHI_API").join("libinchi").join("src"));

    let mut count = 0usize;
    for subdir in SOURCE_SUBDIRS {
        let dir = src_dir.join(subdir);
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        println!("cargo:rerun-if-changed={}", dir.display());
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "c"))
            .collect();
        files.sort();
        count += files.len();
        build.files(files);
    }

    if count == 0 {
        panic!(
            "no InChI C sources found under {}; expected {}",
            src_dir.display(),
            SOURCE_SUBDIRS.join(", ")
        );
    }

    if target.contains("emscripten") || target.contains("wasm32") {
        build.flag_if_supported("-fno-exceptions");
    }

    build.compile("inchi");
}
