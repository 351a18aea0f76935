// src/debug/helpers.rs

//! Miscellaneous helper functions for testing: temporary files and
//! temporary journal directories.

use std::fs::File;
use std::io::Write; // for `write_all`
use std::path::PathBuf;

use ::lazy_static::lazy_static;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

use crate::common::{
    FPath,
    FPaths,
};
use crate::readers::helpers::path_to_fpath;
use crate::readers::journalfiles::REFERENCES_FILE_NAME;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Temporary files and directories use this name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-lgfr-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_bytes(data.as_bytes())
}

/// Testing helper function to write a `[u8]` to a temporary file.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    defñ!();
    match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempdir() return Err {}", err);
        }
    }
}

/// Testing helper function to write a `[u8]` to file `name` in `tempdir`.
/// An existing file is overwritten.
pub fn write_file_in_tmpdir(
    data: &[u8],
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    let path: PathBuf = tempdir.path().join(name);
    defñ!("File::create({:?})", path);
    let mut file_ = match File::create(&path) {
        Ok(f) => f,
        Err(err) => panic!("File::create({:?}) Error {:?}", path, err),
    };
    if let Err(err) = file_.write_all(data) {
        panic!("write_all({:?}) Error {:?}", path, err);
    }

    path_to_fpath(&path)
}

/// Testing helper function to append a `str` to an existing file.
pub fn append_file(
    path: &FPath,
    data: &str,
) {
    let mut file_ = match std::fs::OpenOptions::new()
        .append(true)
        .open(path)
    {
        Ok(f) => f,
        Err(err) => panic!("open({:?}) Error {:?}", path, err),
    };
    if let Err(err) = file_.write_all(data.as_bytes()) {
        panic!("write_all({:?}) Error {:?}", path, err);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary journal helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A journal written to a `TempDir`. The directory is removed on drop.
pub struct TempJournal {
    pub tempdir: TempDir,
    /// path of the header file
    pub references_file: FPath,
    /// paths of the data files in the order given
    pub data_files: FPaths,
}

impl TempJournal {
    /// The journal directory.
    pub fn dir(&self) -> &std::path::Path {
        self.tempdir.path()
    }

    /// The header file as canonicalized by a reader.
    pub fn references_file_canonical(&self) -> FPath {
        match std::fs::canonicalize(&self.references_file) {
            Ok(p) => path_to_fpath(&p),
            Err(err) => panic!("canonicalize({:?}) Error {:?}", self.references_file, err),
        }
    }
}

/// Write a journal: header file `1Cv8.lgf` with content `references` and one
/// data file per `(name, content)` of `data_files`.
pub fn create_journal(
    references: &str,
    data_files: &[(&str, &str)],
) -> TempJournal {
    defn!("({} data files)", data_files.len());
    let tempdir: TempDir = create_temp_dir();
    let references_file: FPath = write_file_in_tmpdir(references.as_bytes(), REFERENCES_FILE_NAME, &tempdir);
    let mut paths: FPaths = FPaths::with_capacity(data_files.len());
    for (name, content) in data_files.iter() {
        paths.push(write_file_in_tmpdir(content.as_bytes(), name, &tempdir));
    }
    defx!("{:?}", tempdir.path());

    TempJournal {
        tempdir,
        references_file,
        data_files: paths,
    }
}
