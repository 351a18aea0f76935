// src/readers/notify.rs

//! The notification surface of an [`LgfReader`].
//!
//! An [`LgfReaderObserver`] receives synchronous, in-order callbacks from
//! the reader's thread:
//!
//! * [`before_read_file`] before the first record of a data file is
//!   produced. A data file without records is not announced. Returning
//!   [`FileReadDecision::Skip`] advances to the next data file without
//!   reading records from this one.
//! * [`after_read_file`] when the reader reaches the end of an announced
//!   data file, or skips it.
//!
//! Moving the reader with `goto_record`, `restore_position` or `reset`
//! starts a new announcement: the next record produced is again preceded by
//! `before_read_file`, even in the middle of a data file. The end of the last
//! data file sends `after_read_file`; if more records are later written
//! there, they are announced again.
//! * [`before_read_record`] with the raw text of each completed record.
//!   Returning [`RecordDecision::Skip`] suppresses decoding.
//! * [`after_read_record`] after a record is decoded or skipped by the
//!   observer. A record that fails to decode goes to [`on_error`] instead.
//! * [`on_error`] for decode errors (not critical) and I/O errors
//!   (critical).
//!
//! [`NotificationLog`] records every callback into a shared `Vec`, for
//! callers that prefer to consume notifications as messages.
//!
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader
//! [`before_read_file`]: LgfReaderObserver::before_read_file
//! [`after_read_file`]: LgfReaderObserver::after_read_file
//! [`before_read_record`]: LgfReaderObserver::before_read_record
//! [`after_read_record`]: LgfReaderObserver::after_read_record
//! [`on_error`]: LgfReaderObserver::on_error

use std::error::Error;
use std::fmt;
use std::sync::{
    Arc,
    Mutex,
};

use crate::common::{
    Count,
    FPath,
};
use crate::data::record::RowData;

/// Answer to [`LgfReaderObserver::before_read_file`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileReadDecision {
    #[default]
    Read,
    Skip,
}

/// Answer to [`LgfReaderObserver::before_read_record`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordDecision {
    #[default]
    Decode,
    Skip,
}

/// Callbacks from an [`LgfReader`]. Every method has a do-nothing default.
///
/// [`LgfReader`]: crate::readers::lgfreader::LgfReader
pub trait LgfReaderObserver: Send {
    fn before_read_file(
        &mut self,
        _path: &FPath,
    ) -> FileReadDecision {
        FileReadDecision::Read
    }

    fn after_read_file(
        &mut self,
        _path: &FPath,
    ) {
    }

    /// `file_event_number` is the ordinal of the record within its file.
    fn before_read_record(
        &mut self,
        _raw: &str,
        _file_event_number: Count,
    ) -> RecordDecision {
        RecordDecision::Decode
    }

    /// `row` is `None` if the observer skipped decoding.
    fn after_read_record(
        &mut self,
        _row: Option<&RowData>,
        _file_event_number: Count,
    ) {
    }

    /// `raw` is the record text when the error concerns one record.
    fn on_error(
        &mut self,
        _error: &dyn Error,
        _raw: Option<&str>,
        _critical: bool,
    ) {
    }
}

/// Ignores all notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver {}

impl LgfReaderObserver for NullObserver {}

/// One recorded notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    BeforeReadFile(FPath),
    AfterReadFile(FPath),
    BeforeReadRecord(String, Count),
    /// `true` if the record was decoded
    AfterReadRecord(bool, Count),
    /// error message, raw text, critical
    Error(String, Option<String>, bool),
}

impl fmt::Display for Notification {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            Notification::BeforeReadFile(path) => write!(f, "before read file {}", path),
            Notification::AfterReadFile(path) => write!(f, "after read file {}", path),
            Notification::BeforeReadRecord(_, n) => write!(f, "before read record {}", n),
            Notification::AfterReadRecord(decoded, n) => {
                write!(f, "after read record {} (decoded {})", n, decoded)
            }
            Notification::Error(message, _, critical) => {
                write!(f, "error (critical {}): {}", critical, message)
            }
        }
    }
}

pub type Notifications = Vec<Notification>;

/// Appends every notification to a shared list.
///
/// Files named in `skip_files` are answered with
/// [`FileReadDecision::Skip`].
#[derive(Clone, Debug, Default)]
pub struct NotificationLog {
    log: Arc<Mutex<Notifications>>,
    skip_files: Vec<FPath>,
}

impl NotificationLog {
    pub fn new() -> NotificationLog {
        NotificationLog::default()
    }

    /// Skip data files with these paths.
    pub fn with_skip_files(skip_files: Vec<FPath>) -> NotificationLog {
        NotificationLog {
            log: Arc::new(Mutex::new(Notifications::new())),
            skip_files,
        }
    }

    /// A handle to the shared list, usable after the `NotificationLog` is
    /// moved into a reader.
    pub fn handle(&self) -> Arc<Mutex<Notifications>> {
        self.log.clone()
    }

    fn push(
        &self,
        notification: Notification,
    ) {
        // a poisoned lock still holds a usable list
        let mut log = match self.log.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        log.push(notification);
    }
}

impl LgfReaderObserver for NotificationLog {
    fn before_read_file(
        &mut self,
        path: &FPath,
    ) -> FileReadDecision {
        self.push(Notification::BeforeReadFile(path.clone()));
        if self.skip_files.contains(path) {
            return FileReadDecision::Skip;
        }

        FileReadDecision::Read
    }

    fn after_read_file(
        &mut self,
        path: &FPath,
    ) {
        self.push(Notification::AfterReadFile(path.clone()));
    }

    fn before_read_record(
        &mut self,
        raw: &str,
        file_event_number: Count,
    ) -> RecordDecision {
        self.push(Notification::BeforeReadRecord(String::from(raw), file_event_number));

        RecordDecision::Decode
    }

    fn after_read_record(
        &mut self,
        row: Option<&RowData>,
        file_event_number: Count,
    ) {
        self.push(Notification::AfterReadRecord(row.is_some(), file_event_number));
    }

    fn on_error(
        &mut self,
        error: &dyn Error,
        raw: Option<&str>,
        critical: bool,
    ) {
        self.push(Notification::Error(error.to_string(), raw.map(String::from), critical));
    }
}
