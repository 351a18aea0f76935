// src/readers/referencesreader.rs

//! The Reference Dictionary Manager.
//!
//! [`read_references`] parses the header file `1Cv8.lgf` into a fresh
//! [`ReferenceDictionaries`]. A [`ReferencesManager`] owns the current
//! dictionaries of one journal, re-reads them on request, and tracks the
//! [`Fingerprint`] and time of the last read.
//!
//! The header file looks like
//!
//! ```text
//! 1CV8LOG(ver 2.0)
//! 2c5e5b8e-6fa5-4c1a-8a7e-2b2b0b1e0d63
//!
//! {1,e5ab7f42-3c09-4d3b-a6d7-0b7a4bdc0d12,"Administrator",1},
//! {2,"WORKSTATION-01",1},
//! {3,"1CV8C",1},
//! {4,"_$Session$_.Start",1},
//! {7,1541,1},
//! ```
//!
//! Each entry is reassembled with the record boundary detector so a quoted
//! name may span lines.

use std::fmt;
use std::io::{
    Error,
    ErrorKind,
    Result,
};

use ::chrono::{
    Local,
    NaiveDateTime,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    Count,
    FPath,
    ResultS3,
};
use crate::data::references::{
    Application,
    Code,
    Computer,
    EventKind,
    Fingerprint,
    Metadata,
    PrimaryPort,
    ReferenceDictionaries,
    SecondaryPort,
    User,
    WorkServer,
};
#[allow(unused_imports)]
use crate::debug::printers::{
    de_err,
    de_wrn,
};
use crate::readers::boundary::{
    is_blank_line,
    is_record_complete,
    is_separator_line,
    BoundaryState,
};
use crate::readers::recorddecoder::{
    field_at,
    field_i64,
    parse_fields,
    unquote,
    DecodeError,
};
use crate::readers::textcursor::TextCursor;

/// First line of a journal file must begin with this.
pub const JOURNAL_SIGNATURE: &str = "1CV8LOG";

/// Count of lines before the first entry of a header or data file:
/// signature, journal GUID, blank line.
pub const HEADER_LINES: Count = 3;

/// Header entry type codes.
pub mod reference_type {
    pub const USERS: i64 = 1;
    pub const COMPUTERS: i64 = 2;
    pub const APPLICATIONS: i64 = 3;
    pub const EVENTS: i64 = 4;
    pub const METADATA: i64 = 5;
    pub const WORK_SERVERS: i64 = 6;
    pub const PRIMARY_PORTS: i64 = 7;
    pub const SECONDARY_PORTS: i64 = 8;
}

/// Add one header entry to `references`.
///
/// Returns `false` for entry types that are not reference dictionaries.
fn insert_entry(
    references: &mut ReferenceDictionaries,
    text: &str,
) -> std::result::Result<bool, DecodeError> {
    let fields: Vec<&str> = parse_fields(text)?;
    let type_code: i64 = field_i64(&fields, 0)?;
    match type_code {
        reference_type::USERS => {
            let code: Code = field_i64(&fields, 3)?;
            let uuid = String::from(field_at(&fields, 1)?);
            let name = unquote(field_at(&fields, 2)?);
            references.users.insert(code, User::new(code, uuid, name));
        }
        reference_type::METADATA => {
            let code: Code = field_i64(&fields, 3)?;
            let uuid = String::from(field_at(&fields, 1)?);
            let name = unquote(field_at(&fields, 2)?);
            references.metadata.insert(code, Metadata::new(code, uuid, name));
        }
        reference_type::COMPUTERS => {
            let code: Code = field_i64(&fields, 2)?;
            let name = unquote(field_at(&fields, 1)?);
            references.computers.insert(code, Computer::new(code, name));
        }
        reference_type::APPLICATIONS => {
            let code: Code = field_i64(&fields, 2)?;
            let name = unquote(field_at(&fields, 1)?);
            references.applications.insert(code, Application::new(code, name));
        }
        reference_type::EVENTS => {
            let code: Code = field_i64(&fields, 2)?;
            let name = unquote(field_at(&fields, 1)?);
            references.events.insert(code, EventKind::new(code, name));
        }
        reference_type::WORK_SERVERS => {
            let code: Code = field_i64(&fields, 2)?;
            let name = unquote(field_at(&fields, 1)?);
            references.work_servers.insert(code, WorkServer::new(code, name));
        }
        reference_type::PRIMARY_PORTS => {
            let code: Code = field_i64(&fields, 2)?;
            let port: i64 = field_i64(&fields, 1)?;
            references.primary_ports.insert(code, PrimaryPort::new(code, port));
        }
        reference_type::SECONDARY_PORTS => {
            let code: Code = field_i64(&fields, 2)?;
            let port: i64 = field_i64(&fields, 1)?;
            references.secondary_ports.insert(code, SecondaryPort::new(code, port));
        }
        _ => {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Check the first line of a journal file.
pub fn check_signature(
    path: &FPath,
    line: &str,
) -> Result<()> {
    if line.trim_start().starts_with(JOURNAL_SIGNATURE) {
        return Ok(());
    }

    Err(Error::new(
        ErrorKind::InvalidData,
        format!("{:?} is not a journal file, first line {:?}", path, line),
    ))
}

/// Parse the header file at `path` into new dictionaries.
///
/// Entries that cannot be parsed are skipped.
pub fn read_references(path: &FPath) -> Result<ReferenceDictionaries> {
    defn!("({:?})", path);
    let mut cursor = TextCursor::open(path)?;
    match cursor.read_line() {
        ResultS3::Found(line) => check_signature(path, &line)?,
        ResultS3::Done => {
            defx!("empty file");
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{:?} is empty", path),
            ));
        }
        ResultS3::Err(err) => {
            defx!("error {}", err);
            return Err(err);
        }
    }
    cursor.skip_lines(HEADER_LINES - 1)?;

    let mut references = ReferenceDictionaries::new();
    let mut state = BoundaryState::new();
    let mut text = String::with_capacity(128);
    loop {
        let line: String = match cursor.read_line() {
            ResultS3::Found(line) => line,
            ResultS3::Done => break,
            ResultS3::Err(err) => {
                defx!("error {}", err);
                return Err(err);
            }
        };
        if text.is_empty() && (is_blank_line(&line) || is_separator_line(&line)) {
            continue;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&line);
        if !is_record_complete(&line, &mut state) {
            continue;
        }
        if let Err(_err) = insert_entry(&mut references, &text) {
            de_wrn!("skip header entry {:?}: {}", text, _err);
        }
        text.clear();
        state.reset();
    }
    if !text.is_empty() {
        de_wrn!("incomplete header entry at end of {:?}", path);
    }
    defx!("{} entries", references.len());

    Ok(references)
}

/// Owns the current [`ReferenceDictionaries`] of a journal.
pub struct ReferencesManager {
    /// path to the header file
    path: FPath,
    references: ReferenceDictionaries,
    hash: Fingerprint,
    /// when `references` were last read, `None` before the first read
    read_date: Option<NaiveDateTime>,
    /// `Count` of successful calls to `refresh`
    pub(crate) refreshes: Count,
}

impl fmt::Debug for ReferencesManager {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("ReferencesManager")
            .field("path", &self.path)
            .field("entries", &self.references.len())
            .field("hash", &self.hash)
            .field("read_date", &self.read_date)
            .field("refreshes", &self.refreshes)
            .finish()
    }
}

impl ReferencesManager {
    /// Create a `ReferencesManager` for header file `path`. Nothing is read
    /// until [`refresh`].
    ///
    /// [`refresh`]: ReferencesManager::refresh
    pub fn new(path: FPath) -> ReferencesManager {
        ReferencesManager {
            path,
            references: ReferenceDictionaries::new(),
            hash: Fingerprint::new(),
            read_date: None,
            refreshes: 0,
        }
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub fn references(&self) -> &ReferenceDictionaries {
        &self.references
    }

    /// Fingerprint of the current dictionaries; empty before the first
    /// `refresh`.
    pub fn hash(&self) -> &Fingerprint {
        &self.hash
    }

    pub const fn read_date(&self) -> Option<NaiveDateTime> {
        self.read_date
    }

    pub const fn refreshes(&self) -> Count {
        self.refreshes
    }

    /// Re-read the header file and replace all dictionaries at once.
    ///
    /// The read date is the time the read began, so an entry added while
    /// reading triggers another refresh. Returns `true` if the fingerprint
    /// changed. On error the current dictionaries are kept.
    pub fn refresh(&mut self) -> Result<bool> {
        defn!("({:?})", self.path);
        let began: NaiveDateTime = Local::now().naive_local();
        let references: ReferenceDictionaries = read_references(&self.path)?;
        let hash: Fingerprint = references.fingerprint()?;
        let changed: bool = hash != self.hash;
        self.references = references;
        self.hash = hash;
        self.read_date = Some(began);
        self.refreshes += 1;
        defx!("changed {}, hash {}", changed, self.hash);

        Ok(changed)
    }

    /// A record with `period` at or after the last read may refer to
    /// entries added since then.
    pub fn needs_refresh(
        &self,
        period: &NaiveDateTime,
    ) -> bool {
        match self.read_date {
            Some(read_date) => *period >= read_date,
            None => true,
        }
    }
}
