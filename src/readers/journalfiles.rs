// src/readers/journalfiles.rs

//! Journal selection and the set of rotated data files.
//!
//! A journal is selected by a path to either its directory or its header
//! file. The data files are all `*.lgp` files in the same directory as the
//! header file, ordered by file name. That order defines the file index of a
//! [`LgfReader`] and so the ordering of record ordinals.
//!
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader

use std::io::{
    Error,
    ErrorKind,
    Result,
};
use std::path::PathBuf;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    FPath,
    FPaths,
    Path,
};
use crate::readers::helpers::{
    basename,
    path_has_extension,
    path_to_fpath,
};

/// Conventional file name of the text format header file.
pub const REFERENCES_FILE_NAME: &str = "1Cv8.lgf";
/// Conventional file name of the database-backed format.
pub const REFERENCES_DB_FILE_NAME: &str = "1Cv8.lgd";
/// Extension of the text format header file.
pub const REFERENCES_FILE_EXTENSION: &str = "lgf";
/// Extension of the database-backed format.
pub const REFERENCES_DB_FILE_EXTENSION: &str = "lgd";
/// Extension of rotated data files.
pub const DATA_FILE_EXTENSION: &str = "lgp";

/// Return the absolute path of the text format header file for `path`.
///
/// `path` may be the journal directory or the header file itself.
/// A directory without `1Cv8.lgf` falls back to `1Cv8.lgd`, which is
/// `ErrorKind::Unsupported`. Any other existing file is
/// `ErrorKind::InvalidInput`. A missing file is `ErrorKind::NotFound`.
pub fn locate_references_file(path: &Path) -> Result<FPath> {
    defn!("({:?})", path);
    let mut candidate: PathBuf = if path.is_dir() {
        path.join(REFERENCES_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    if !candidate.is_file() {
        candidate = path.join(REFERENCES_DB_FILE_NAME);
    }
    if !candidate.is_file() {
        defx!("not found");
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("no journal found at {:?}", path),
        ));
    }
    if path_has_extension(&candidate, REFERENCES_DB_FILE_EXTENSION) {
        defx!("database-backed journal {:?}", candidate);
        return Err(Error::new(
            ErrorKind::Unsupported,
            format!("database-backed journal {:?} is not supported", candidate),
        ));
    }
    if !path_has_extension(&candidate, REFERENCES_FILE_EXTENSION) {
        defx!("not a journal {:?}", candidate);
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("{:?} is not a journal header file", candidate),
        ));
    }
    let candidate: PathBuf = std::fs::canonicalize(&candidate)?;
    let fpath: FPath = path_to_fpath(&candidate);
    defx!("{:?}", fpath);

    Ok(fpath)
}

/// Return the data files in `directory` sorted by file name.
///
/// Subdirectories are not searched. Unreadable entries are skipped.
pub fn find_data_files(directory: &Path) -> FPaths {
    defn!("({:?})", directory);
    let mut paths: FPaths = FPaths::new();
    for entry in walkdir::WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(val) => val,
            Err(_err) => {
                defo!("Err({:?})", _err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !path_has_extension(entry.path(), DATA_FILE_EXTENSION) {
            continue;
        }
        defo!("data file {:?}", entry.path());
        paths.push(path_to_fpath(entry.path()));
    }
    defx!("{} data files", paths.len());

    paths
}

/// The header file and the ordered rotated data files of one journal.
///
/// The set of data files is fixed when created. Create a new `JournalFiles`
/// to see files rotated in since.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JournalFiles {
    references_file: FPath,
    directory: FPath,
    data_files: FPaths,
}

impl JournalFiles {
    /// Select the journal at `path` and list its data files.
    pub fn open(path: &Path) -> Result<JournalFiles> {
        let references_file: FPath = locate_references_file(path)?;
        let directory: PathBuf = match Path::new(&references_file).parent() {
            Some(dir) => dir.to_path_buf(),
            None => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("{:?} has no parent directory", references_file),
                ));
            }
        };
        let data_files: FPaths = find_data_files(&directory);

        Ok(JournalFiles {
            references_file,
            directory: path_to_fpath(&directory),
            data_files,
        })
    }

    pub fn references_file(&self) -> &FPath {
        &self.references_file
    }

    pub fn directory(&self) -> &FPath {
        &self.directory
    }

    pub fn data_files(&self) -> &FPaths {
        &self.data_files
    }

    pub fn len(&self) -> usize {
        self.data_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_files.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&FPath> {
        self.data_files.get(index)
    }

    /// Index of the data file named like `path`.
    ///
    /// Only the file name is compared, so a data file path spelled through a
    /// symbolic link still matches.
    pub fn index_of(
        &self,
        path: &FPath,
    ) -> Option<usize> {
        let name: FPath = basename(path);
        self.data_files
            .iter()
            .position(|p| basename(p) == name)
    }
}
