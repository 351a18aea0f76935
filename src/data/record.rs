// src/data/record.rs

//! Implement [`LogicalRecord`], the reassembled text of one journal record,
//! and [`RowData`], the decoded form of a `LogicalRecord`.

use std::fmt;
use std::slice::Iter;

use ::chrono::NaiveDateTime;
use ::serde::{
    Deserialize,
    Serialize,
};

use crate::common::{
    Count,
    FPath,
    FileOffset,
};
use crate::data::references::{
    Application,
    Code,
    Computer,
    EventKind,
    Metadata,
    PrimaryPort,
    SecondaryPort,
    User,
    WorkServer,
};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

/// The local datetime of a record as written in the journal,
/// e.g. `20200412134348`.
pub type Period = NaiveDateTime;

/// The text of one record, reassembled from one or more physical lines.
///
/// Lines are joined with `'\n'` regardless of the line endings in the file.
#[derive(Clone, PartialEq, Eq)]
pub struct LogicalRecord {
    text: String,
    /// data file the record was read from
    data_file: FPath,
    /// byte offset of the first line of the record
    fileoffset: FileOffset,
    /// ordinal of the record within `data_file`
    file_event_number: Count,
}

impl fmt::Debug for LogicalRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        let mut d = f.debug_struct("LogicalRecord");
        d.field("data_file", &self.data_file)
            .field("fileoffset", &self.fileoffset)
            .field("file_event_number", &self.file_event_number);
        #[cfg(any(debug_assertions, test))]
        d.field("text", &str_to_String_noraw(&self.text));
        #[cfg(not(any(debug_assertions, test)))]
        d.field("text", &self.text);
        d.finish()
    }
}

impl LogicalRecord {
    pub fn new(
        text: String,
        data_file: FPath,
        fileoffset: FileOffset,
        file_event_number: Count,
    ) -> LogicalRecord {
        LogicalRecord {
            text,
            data_file,
            fileoffset,
            file_event_number,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn data_file(&self) -> &FPath {
        &self.data_file
    }

    pub const fn fileoffset(&self) -> FileOffset {
        self.fileoffset
    }

    pub const fn file_event_number(&self) -> Count {
        self.file_event_number
    }

    /// Count of physical lines the record was assembled from.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Importance level of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Information,
    Warning,
    Error,
    Note,
    #[default]
    Unknown,
}

impl Severity {
    /// Map the journal letter code to a `Severity`.
    pub fn from_code(code: &str) -> Severity {
        match code.trim() {
            "I" => Severity::Information,
            "W" => Severity::Warning,
            "E" => Severity::Error,
            "N" => Severity::Note,
            _ => Severity::Unknown,
        }
    }

    pub fn iterator() -> Iter<'static, Severity> {
        static SEVERITIES: [Severity; 5] = [
            Severity::Error,
            Severity::Information,
            Severity::Note,
            Severity::Unknown,
            Severity::Warning,
        ];
        SEVERITIES.iter()
    }
}

impl fmt::Display for Severity {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            Severity::Information => write!(f, "Information"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
            Severity::Note => write!(f, "Note"),
            Severity::Unknown => write!(f, "Unknown"),
        }
    }
}

/// State of the transaction a record was written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Committed,
    NotApplicable,
    RolledBack,
    Unfinished,
    #[default]
    Unknown,
}

impl TransactionStatus {
    /// Map the journal letter code to a `TransactionStatus`.
    pub fn from_code(code: &str) -> TransactionStatus {
        match code.trim() {
            "R" => TransactionStatus::Unfinished,
            "N" => TransactionStatus::NotApplicable,
            "U" => TransactionStatus::Committed,
            "C" => TransactionStatus::RolledBack,
            _ => TransactionStatus::Unknown,
        }
    }

    pub fn iterator() -> Iter<'static, TransactionStatus> {
        static TRANSACTION_STATUSES: [TransactionStatus; 5] = [
            TransactionStatus::Committed,
            TransactionStatus::NotApplicable,
            TransactionStatus::RolledBack,
            TransactionStatus::Unfinished,
            TransactionStatus::Unknown,
        ];
        TRANSACTION_STATUSES.iter()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            TransactionStatus::Committed => write!(f, "Committed"),
            TransactionStatus::NotApplicable => write!(f, "NotApplicable"),
            TransactionStatus::RolledBack => write!(f, "RolledBack"),
            TransactionStatus::Unfinished => write!(f, "Unfinished"),
            TransactionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A decoded record.
///
/// Reference fields hold a copy of the dictionary entry the record's code
/// resolved to at decode time, or `None` if the code was not in the
/// dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowData {
    pub period: Period,
    pub transaction_status: TransactionStatus,
    pub transaction_date: Option<NaiveDateTime>,
    pub transaction_id: i64,
    pub user_code: Code,
    pub user: Option<User>,
    pub computer: Option<Computer>,
    pub application: Option<Application>,
    pub connection_id: i64,
    pub event: Option<EventKind>,
    pub severity: Severity,
    pub comment: String,
    pub metadata: Option<Metadata>,
    pub data: String,
    pub data_presentation: String,
    pub work_server: Option<WorkServer>,
    pub primary_port: Option<PrimaryPort>,
    pub secondary_port: Option<SecondaryPort>,
    pub session: i64,
}

impl fmt::Display for RowData {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.period.format("%Y-%m-%d %H:%M:%S"),
            self.severity,
            self.event
                .as_ref()
                .map_or("", |e| e.name.as_str()),
            self.user
                .as_ref()
                .map_or("", |u| u.name.as_str()),
            self.comment,
        )
    }
}
