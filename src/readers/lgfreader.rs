// src/readers/lgfreader.rs

//! Implements an [`LgfReader`], the driver of deriving [`LogicalRecord`]s
//! and [`RowData`] from a text format journal.
//!
//! An `LgfReader` walks the rotated data files of a journal in file name
//! order, as if they were one stream of records. It drives a [`TextCursor`]
//! over the current data file and reassembles physical lines into records
//! with the record boundary detector.
//!
//! ### Positioning
//!
//! An `LgfReader` may be moved with
//!
//! * [`goto_record`], a linear scan over all data files counting complete
//!   records. Slow, but exact.
//! * [`restore_position`], replaying an [`EventLogPosition`] taken by
//!   [`get_current_position`], possibly by another `LgfReader` instance.
//!   The stored byte offset is checked and, if it does not land on a
//!   record-initial line, corrected by stepping up to
//!   [`BOUNDARY_CORRECTION_ATTEMPTS`] bytes forward, then backward.
//!
//! ### Tailing
//!
//! Records with a period within [`LgfReaderOptions::read_delay_ms`] of now
//! are not returned; [`read`] returns [`ResultReadRecord::Done`] and
//! retries that record on the next call. This avoids records still being
//! written.
//!
//! _XXX: not a rust "Reader"; does not implement trait [`Read`]._
//!
//! [`goto_record`]: LgfReader::goto_record
//! [`restore_position`]: LgfReader::restore_position
//! [`get_current_position`]: LgfReader::get_current_position
//! [`read`]: LgfReader::read
//! [`Read`]: std::io::Read

use std::fmt;
use std::io::{
    Error,
    ErrorKind,
    Result,
};

use ::chrono::{
    Duration,
    Local,
    NaiveDateTime,
};
use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};
use ::thiserror::Error;

use crate::common::{
    Count,
    FPath,
    FPaths,
    FileOffset,
    FileSz,
    LineNumber,
    Path,
    ResultS3,
};
use crate::data::position::EventLogPosition;
use crate::data::record::{
    LogicalRecord,
    RowData,
};
use crate::data::references::ReferenceDictionaries;
#[allow(unused_imports)]
use crate::debug::printers::{
    de_err,
    de_wrn,
};
use crate::readers::boundary::{
    is_blank_line,
    is_record_complete,
    is_record_initial,
    is_separator_line,
    BoundaryState,
};
use crate::readers::helpers::{
    fpath_to_path,
    path_filesz,
};
use crate::readers::journalfiles::JournalFiles;
use crate::readers::notify::{
    FileReadDecision,
    LgfReaderObserver,
    NullObserver,
    RecordDecision,
};
use crate::readers::recorddecoder::{
    LgfRecordDecoder,
    RecordDecoder,
};
use crate::readers::referencesreader::{
    ReferencesManager,
    HEADER_LINES,
};
use crate::readers::summary::SummaryLgfReader;
use crate::readers::textcursor::TextCursor;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LgfReader options, results, errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Lines at the start of each data file before the first record.
pub const LGP_HEADER_LINES: Count = HEADER_LINES;

/// Maximum single-byte steps, in each direction, when looking for a
/// record-initial line during [`LgfReader::restore_position`].
pub const BOUNDARY_CORRECTION_ATTEMPTS: usize = 10;

/// Default [`LgfReaderOptions::read_delay_ms`].
pub const READ_DELAY_MS_DEFAULT: u64 = 1000;

/// Settings of an [`LgfReader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LgfReaderOptions {
    /// Records with a period this many milliseconds before now, or later,
    /// are not returned. `0` returns all records.
    pub read_delay_ms: u64,
}

impl Default for LgfReaderOptions {
    fn default() -> LgfReaderOptions {
        LgfReaderOptions {
            read_delay_ms: READ_DELAY_MS_DEFAULT,
        }
    }
}

/// Return type of [`LgfReader::read`].
#[derive(Debug)]
pub enum ResultReadRecord {
    /// A record and its decoded form.
    Found(LogicalRecord, RowData),
    /// A record that was not decoded, and why. Reading may continue.
    Skipped(LogicalRecord, String),
    /// End of the journal, or the next record is within the read delay.
    Done,
    /// A fatal error. The reader must be [`reset`] before reading again.
    ///
    /// [`reset`]: LgfReader::reset
    Err(Error),
}

impl ResultReadRecord {
    pub const fn is_found(&self) -> bool {
        matches!(*self, ResultReadRecord::Found(_, _))
    }

    pub const fn is_skipped(&self) -> bool {
        matches!(*self, ResultReadRecord::Skipped(_, _))
    }

    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultReadRecord::Done)
    }

    pub const fn is_err(&self) -> bool {
        matches!(*self, ResultReadRecord::Err(_))
    }

    /// The record, decoded or not.
    pub fn record(&self) -> Option<&LogicalRecord> {
        match self {
            ResultReadRecord::Found(record, _) => Some(record),
            ResultReadRecord::Skipped(record, _) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for ResultReadRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            ResultReadRecord::Found(record, _) => {
                write!(f, "ResultReadRecord::Found(event {})", record.file_event_number())
            }
            ResultReadRecord::Skipped(record, reason) => write!(
                f,
                "ResultReadRecord::Skipped(event {}, {})",
                record.file_event_number(),
                reason
            ),
            ResultReadRecord::Done => write!(f, "ResultReadRecord::Done"),
            ResultReadRecord::Err(err) => write!(f, "ResultReadRecord::Err({})", err),
        }
    }
}

/// Why [`LgfReader::restore_position`] failed.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("position is for journal {position:?}, reader journal is {journal:?}")]
    WrongJournal { position: FPath, journal: FPath },
    #[error("data file {0:?} is not in the journal")]
    UnknownDataFile(FPath),
    #[error("no data at offset {offset} of {path:?}")]
    NoDataAtOffset { path: FPath, offset: FileOffset },
    #[error("no record begins near offset {offset} of {path:?}")]
    BoundaryNotFound { path: FPath, offset: FileOffset },
    #[error(transparent)]
    Io(#[from] Error),
}

/// Outcome of one run of the boundary correction loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Correction {
    /// a record-initial line begins at the offset
    Found(FileOffset),
    /// end of file at the offset
    NoData(FileOffset),
    NotFound,
}

/// Seek `cursor` to `start` and look for a record-initial line, stepping
/// one byte forward (or backward) per attempt.
///
/// On `Found` and `NoData` the `cursor` is left at the returned offset.
fn correct_boundary(
    cursor: &mut TextCursor,
    start: FileOffset,
    forward: bool,
) -> Result<Correction> {
    defn!("({}, forward {})", start, forward);
    let mut offset: FileOffset = start;
    for _attempt in 0..BOUNDARY_CORRECTION_ATTEMPTS {
        cursor.seek(offset)?;
        match cursor.peek_line() {
            ResultS3::Found(line) => {
                if is_record_initial(&line) {
                    defx!("Found({}) attempt {}", offset, _attempt);
                    return Ok(Correction::Found(offset));
                }
            }
            ResultS3::Done => {
                defx!("NoData({})", offset);
                return Ok(Correction::NoData(offset));
            }
            ResultS3::Err(err) => {
                defx!("error {}", err);
                return Err(err);
            }
        }
        if forward {
            offset += 1;
        } else {
            match offset.checked_sub(1) {
                Some(fo) => offset = fo,
                None => break,
            }
        }
    }
    defx!("NotFound");

    Ok(Correction::NotFound)
}

/// Outcome of [`next_record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NextRecord {
    /// A complete record.
    Complete {
        /// offset of the first line of the record
        fileoffset: FileOffset,
        /// index of the first line of the record among `lines`
        line: LineNumber,
        /// lines consumed, including skipped lines before the record
        lines: Count,
    },
    /// The file ends inside a record beginning at the offset. The cursor is
    /// moved back to that offset.
    Incomplete(FileOffset),
    /// End of file between records.
    Done,
}

/// Read lines from `cursor` until a record is complete.
///
/// Blank lines and a lone `,` between records are skipped. The record text
/// is appended to `text`, if given.
fn next_record(
    cursor: &mut TextCursor,
    mut text: Option<&mut String>,
) -> Result<NextRecord> {
    let mut state = BoundaryState::new();
    let mut record_beg: FileOffset = cursor.fileoffset();
    let mut in_record: bool = false;
    let mut lines: Count = 0;
    let mut record_line: LineNumber = 0;
    loop {
        let line: String = match cursor.read_line() {
            ResultS3::Found(line) => line,
            ResultS3::Done => {
                if !in_record {
                    return Ok(NextRecord::Done);
                }
                cursor.seek(record_beg)?;
                return Ok(NextRecord::Incomplete(record_beg));
            }
            ResultS3::Err(err) => return Err(err),
        };
        lines += 1;
        if !in_record {
            if is_blank_line(&line) {
                record_beg = cursor.fileoffset();
                continue;
            }
            if is_separator_line(&line) {
                // a lone "," between records
                match cursor.peek_line() {
                    ResultS3::Found(next) if !is_record_initial(&next) => {}
                    ResultS3::Found(_) | ResultS3::Done => {
                        record_beg = cursor.fileoffset();
                        continue;
                    }
                    ResultS3::Err(err) => return Err(err),
                }
            }
            in_record = true;
            record_line = lines - 1;
        } else if let Some(text) = text.as_mut() {
            text.push('\n');
        }
        if let Some(text) = text.as_mut() {
            text.push_str(&line);
        }
        if is_record_complete(&line, &mut state) {
            return Ok(NextRecord::Complete {
                fileoffset: record_beg,
                line: record_line,
                lines,
            });
        }
    }
}

/// Scan `path` counting complete records, the records `read` returns.
///
/// If `stop_at` is given and reached, return that count and the
/// `LineNumber` of the first line of that record.
fn scan_records(
    path: &FPath,
    stop_at: Option<Count>,
) -> Result<(Count, Option<LineNumber>)> {
    defn!("({:?}, {:?})", path, stop_at);
    let mut cursor = TextCursor::open(path)?;
    let mut line_number: LineNumber = cursor.skip_lines(LGP_HEADER_LINES)?;
    let mut count: Count = 0;
    loop {
        match next_record(&mut cursor, None)? {
            NextRecord::Complete { line, lines, .. } => {
                count += 1;
                if Some(count) == stop_at {
                    defx!("stop at line {}", line_number + line);
                    return Ok((count, Some(line_number + line)));
                }
                line_number += lines;
            }
            NextRecord::Incomplete(_) | NextRecord::Done => break,
        }
    }
    defx!("{} records", count);

    Ok((count, None))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LgfReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Streaming reader, positioner and counter over one journal.
///
/// Holds at most one open data file. Not safe to share between threads;
/// open another `LgfReader` over the same journal instead.
pub struct LgfReader {
    files: JournalFiles,
    references: ReferencesManager,
    decoder: Box<dyn RecordDecoder>,
    observer: Box<dyn LgfReaderObserver>,
    options: LgfReaderOptions,
    /// index into `files` of the current data file, equal to `files.len()`
    /// at the end of the journal
    file_index: usize,
    /// the open current data file
    cursor: Option<TextCursor>,
    /// `before_read_file` was sent for the current data file and
    /// `after_read_file` was not
    file_announced: bool,
    /// ordinal of the last record read in the current data file
    file_event_number: Count,
    /// offset in the last data file where reading stopped, once moved past
    /// the end of the journal
    end_fileoffset: Option<FileOffset>,
    current_row: Option<RowData>,
    /// memoized result of `count`
    count: Option<Count>,
    /// a fatal error occurred, `reset` is required
    failed: bool,
    summary: SummaryLgfReader,
}

impl fmt::Debug for LgfReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LgfReader")
            .field("journal", self.files.references_file())
            .field("data_files", &self.files.len())
            .field("file_index", &self.file_index)
            .field("cursor", &self.cursor)
            .field("file_event_number", &self.file_event_number)
            .field("options", &self.options)
            .field("count", &self.count)
            .field("failed", &self.failed)
            .finish()
    }
}

impl LgfReader {
    /// Open the journal at `path`, a journal directory or its `1Cv8.lgf`,
    /// with default [`LgfReaderOptions`].
    ///
    /// Reads the reference dictionaries. Data files are not opened until the
    /// first `read`.
    pub fn new(path: &Path) -> Result<LgfReader> {
        LgfReader::with_options(path, LgfReaderOptions::default())
    }

    pub fn with_options(
        path: &Path,
        options: LgfReaderOptions,
    ) -> Result<LgfReader> {
        defn!("({:?}, {:?})", path, options);
        let files = JournalFiles::open(path)?;
        let mut references = ReferencesManager::new(files.references_file().clone());
        references.refresh()?;
        let summary = SummaryLgfReader {
            journal_path: files.references_file().clone(),
            lgfreader_data_files: files.len() as Count,
            ..Default::default()
        };
        defx!("{} data files", files.len());

        Ok(LgfReader {
            files,
            references,
            decoder: Box::new(LgfRecordDecoder::new()),
            observer: Box::new(NullObserver::default()),
            options,
            file_index: 0,
            cursor: None,
            file_announced: false,
            file_event_number: 0,
            end_fileoffset: None,
            current_row: None,
            count: None,
            failed: false,
            summary,
        })
    }

    /// Replace the [`RecordDecoder`].
    pub fn with_decoder(
        mut self,
        decoder: Box<dyn RecordDecoder>,
    ) -> LgfReader {
        self.decoder = decoder;
        self
    }

    /// Replace the [`LgfReaderObserver`] receiving notifications.
    pub fn set_observer(
        &mut self,
        observer: Box<dyn LgfReaderObserver>,
    ) {
        self.observer = observer;
    }

    pub fn set_read_delay(
        &mut self,
        read_delay_ms: u64,
    ) {
        self.options.read_delay_ms = read_delay_ms;
    }

    pub const fn read_delay_ms(&self) -> u64 {
        self.options.read_delay_ms
    }

    /// The header file of the journal.
    pub fn journal_path(&self) -> &FPath {
        self.files.references_file()
    }

    pub fn journal_directory(&self) -> &FPath {
        self.files.directory()
    }

    /// The data files in reading order.
    pub fn data_files(&self) -> &FPaths {
        self.files.data_files()
    }

    /// The current data file, `None` past the end of the journal.
    pub fn current_file(&self) -> Option<&FPath> {
        self.files.get(self.file_index)
    }

    /// The last record decoded by `read`.
    pub fn current_row(&self) -> Option<&RowData> {
        self.current_row.as_ref()
    }

    /// Ordinal of the last record read in the current data file.
    pub const fn current_file_event_number(&self) -> Count {
        self.file_event_number
    }

    pub fn references(&self) -> &ReferenceDictionaries {
        self.references.references()
    }

    /// Fingerprint of the current reference dictionaries.
    pub fn references_hash(&self) -> &str {
        self.references.hash().as_str()
    }

    /// When the reference dictionaries were last read.
    pub const fn references_read_date(&self) -> Option<NaiveDateTime> {
        self.references.read_date()
    }

    /// Re-read the reference dictionaries. Returns `true` if they changed.
    pub fn refresh_references(&mut self) -> Result<bool> {
        self.references.refresh()
    }

    /// Return an up-to-date `SummaryLgfReader` for this `LgfReader`.
    pub fn summary(&self) -> SummaryLgfReader {
        let mut summary: SummaryLgfReader = self.summary.clone();
        if let Some(cursor) = self.cursor.as_ref() {
            summary.lgfreader_lines_read += cursor.lines_read;
        }
        summary.lgfreader_references_refreshes = self.references.refreshes();

        summary
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // file handling
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Install `cursor` as the open current data file at `file_index`.
    fn set_cursor(
        &mut self,
        cursor: TextCursor,
        file_index: usize,
        file_event_number: Count,
    ) {
        debug_assert_le!(file_index, self.files.len());
        self.close();
        self.cursor = Some(cursor);
        self.file_index = file_index;
        self.file_event_number = file_event_number;
        self.file_announced = false;
        self.end_fileoffset = None;
        self.summary.lgfreader_files_opened += 1;
    }

    /// Open the current data file past its header lines. Returns `false` at
    /// the end of the journal.
    fn open_current_file(&mut self) -> Result<bool> {
        let path: FPath = match self.files.get(self.file_index) {
            Some(path) => path.clone(),
            None => return Ok(false),
        };
        defñ!("({:?})", path);
        let cursor = TextCursor::open_at_line(&path, LGP_HEADER_LINES)?;
        self.set_cursor(cursor, self.file_index, 0);

        Ok(true)
    }

    /// Close the current data file. May be called many times.
    pub fn close(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            defñ!("close {:?}", cursor.path());
            self.summary.lgfreader_lines_read += cursor.lines_read;
        }
    }

    /// Notify `after_read_file` if `before_read_file` was sent for the
    /// current data file.
    fn finish_file(&mut self) {
        if !self.file_announced {
            return;
        }
        self.file_announced = false;
        if let Some(path) = self.files.get(self.file_index) {
            let path: FPath = path.clone();
            self.observer.after_read_file(&path);
        }
    }

    /// Notify `after_read_file`, close the current data file and move to the
    /// next one.
    ///
    /// Moving past the last data file keeps its record ordinal and the offset
    /// where reading stopped, so a position taken at the end of the journal
    /// resumes there.
    pub fn next_file(&mut self) {
        defn!("file_index {}", self.file_index);
        self.finish_file();
        if self.file_index + 1 == self.files.len() {
            self.end_fileoffset = self.cursor.as_ref().map(|cursor| cursor.fileoffset());
        }
        self.close();
        if self.file_index < self.files.len() {
            self.file_index += 1;
        }
        if self.file_index < self.files.len() {
            self.file_event_number = 0;
        }
        self.file_announced = false;
        defx!("file_index {}", self.file_index);
    }

    /// Close the current data file and return to the start of the journal.
    ///
    /// Clears a prior fatal error. The memoized `count` is kept.
    pub fn reset(&mut self) {
        defñ!();
        self.close();
        self.file_index = 0;
        self.file_event_number = 0;
        self.file_announced = false;
        self.end_fileoffset = None;
        self.current_row = None;
        self.failed = false;
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // streaming
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Handle a fatal error.
    fn fail(
        &mut self,
        err: Error,
    ) -> ResultReadRecord {
        de_err!("{}", err);
        self.observer.on_error(&err, None, true);
        self.summary.error = Some(err.to_string());
        self.current_row = None;
        self.failed = true;

        ResultReadRecord::Err(err)
    }

    /// Read lines of the current data file until a record is complete.
    ///
    /// Returns the record text and the offset of its first line, or `None`
    /// at end of file. An incomplete record at end of file is left unread.
    fn assemble_record(&mut self) -> Result<Option<(String, FileOffset)>> {
        let cursor: &mut TextCursor = match self.cursor.as_mut() {
            Some(cursor) => cursor,
            None => return Ok(None),
        };
        let mut text = String::with_capacity(256);
        match next_record(cursor, Some(&mut text))? {
            NextRecord::Complete { fileoffset, .. } => Ok(Some((text, fileoffset))),
            NextRecord::Incomplete(_fileoffset) => {
                de_wrn!(
                    "incomplete record at offset {} of {:?}",
                    _fileoffset,
                    cursor.path()
                );
                Ok(None)
            }
            NextRecord::Done => Ok(None),
        }
    }

    /// Is `period` too recent to be returned?
    fn within_read_delay(
        &self,
        period: &NaiveDateTime,
    ) -> bool {
        if self.options.read_delay_ms == 0 {
            return false;
        }
        let delay_ms: i64 = i64::try_from(self.options.read_delay_ms).unwrap_or(i64::MAX);
        let delay: Duration = match Duration::try_milliseconds(delay_ms) {
            Some(delay) => delay,
            None => return true,
        };
        match Local::now()
            .naive_local()
            .checked_sub_signed(delay)
        {
            Some(stop) => *period >= stop,
            None => true,
        }
    }

    /// Decode a completed record and apply the refresh and read delay rules.
    fn produce(
        &mut self,
        text: String,
        fileoffset: FileOffset,
    ) -> ResultReadRecord {
        let path: FPath = match self.files.get(self.file_index) {
            Some(path) => path.clone(),
            None => FPath::new(),
        };
        self.file_event_number += 1;
        let event_number: Count = self.file_event_number;
        let record = LogicalRecord::new(text, path, fileoffset, event_number);
        defn!("{:?}", record);

        if self
            .observer
            .before_read_record(record.text(), event_number)
            == RecordDecision::Skip
        {
            self.current_row = None;
            self.observer.after_read_record(None, event_number);
            self.summary.lgfreader_records_skipped += 1;
            defx!("skipped by observer");
            return ResultReadRecord::Skipped(record, String::from("skipped by observer"));
        }

        let mut decoded = self
            .decoder
            .decode(record.text(), self.references.references());
        if let Ok(row) = &decoded {
            if self.references.needs_refresh(&row.period) {
                defo!("refresh references for period {}", row.period);
                if let Err(err) = self.references.refresh() {
                    defx!("refresh error {}", err);
                    return self.fail(err);
                }
                decoded = self
                    .decoder
                    .decode(record.text(), self.references.references());
            }
        }
        let row: RowData = match decoded {
            Ok(row) => row,
            Err(err) => {
                de_wrn!("decode failed for {:?}: {}", record, err);
                self.observer.on_error(&err, Some(record.text()), false);
                self.current_row = None;
                self.summary.lgfreader_records_skipped += 1;
                defx!("Skipped {}", err);
                return ResultReadRecord::Skipped(record, err.to_string());
            }
        };

        if self.within_read_delay(&row.period) {
            // retry this record on the next `read`
            if let Some(cursor) = self.cursor.as_mut() {
                if let Err(err) = cursor.seek(record.fileoffset()) {
                    return self.fail(err);
                }
            }
            self.file_event_number -= 1;
            self.current_row = None;
            defx!("within read delay, Done");
            return ResultReadRecord::Done;
        }

        self.summary.lgfreader_records_found += 1;
        self.summary.update_period(row.period);
        self.current_row = Some(row.clone());
        self.observer
            .after_read_record(Some(&row), event_number);
        defx!("Found");

        ResultReadRecord::Found(record, row)
    }

    /// Read the next record of the journal.
    pub fn read(&mut self) -> ResultReadRecord {
        defn!();
        if self.failed {
            defx!("failed");
            return ResultReadRecord::Err(Error::new(
                ErrorKind::Other,
                "reader failed, reset is required",
            ));
        }
        loop {
            if self.cursor.is_none() {
                match self.open_current_file() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.current_row = None;
                        defx!("Done");
                        return ResultReadRecord::Done;
                    }
                    Err(err) => {
                        defx!("open error {}", err);
                        return self.fail(err);
                    }
                }
            }
            let (text, fileoffset) = match self.assemble_record() {
                Ok(Some(val)) => val,
                Ok(None) => {
                    if self.file_index + 1 < self.files.len() {
                        self.next_file();
                        continue;
                    }
                    // the last data file may still be written to
                    self.finish_file();
                    self.current_row = None;
                    defx!("Done at end of last data file");
                    return ResultReadRecord::Done;
                }
                Err(err) => {
                    defx!("read error {}", err);
                    return self.fail(err);
                }
            };
            if !self.file_announced {
                self.file_announced = true;
                if let Some(path) = self.files.get(self.file_index) {
                    let path: FPath = path.clone();
                    if self.observer.before_read_file(&path) == FileReadDecision::Skip {
                        defo!("skip file {:?}", path);
                        self.summary.lgfreader_files_skipped += 1;
                        if let (Some(cursor), Some(filesz)) =
                            (self.cursor.as_mut(), path_filesz(fpath_to_path(&path)))
                        {
                            if let Err(err) = cursor.seek(filesz) {
                                return self.fail(err);
                            }
                        }
                        self.next_file();
                        continue;
                    }
                }
            }
            let result = self.produce(text, fileoffset);
            defx!("{}", result);

            return result;
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // counting and positioning
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `Count` of records in all data files. Computed once.
    pub fn count(&mut self) -> Result<Count> {
        if let Some(count) = self.count {
            defñ!("memoized {}", count);
            return Ok(count);
        }
        defn!();
        let mut total: Count = 0;
        for path in self.files.data_files().iter() {
            let (count, _) = scan_records(path, None)?;
            total += count;
        }
        self.count = Some(total);
        defx!("{}", total);

        Ok(total)
    }

    /// Move so the next `read` returns record `record_number` of the
    /// journal, counting from 1.
    ///
    /// The in-file ordinal is left one below the target's ordinal within its
    /// data file, so `get_current_position().event_number()` is the ordinal
    /// of the last record before the target in that file.
    ///
    /// Returns `false` if there is no such record; the reader is then reset.
    pub fn goto_record(
        &mut self,
        record_number: Count,
    ) -> Result<bool> {
        defn!("({})", record_number);
        self.reset();
        if record_number == 0 {
            defx!("false");
            return Ok(false);
        }
        let data_files: FPaths = self.files.data_files().clone();
        let mut seen: Count = 0;
        for (index, path) in data_files.iter().enumerate() {
            let (count, line_number) = scan_records(path, Some(record_number - seen))?;
            if let Some(line_number) = line_number {
                let cursor = TextCursor::open_at_line(path, line_number)?;
                // `count` is the in-file ordinal of the target record
                self.set_cursor(cursor, index, count - 1);
                defx!("true, {:?} line {}", path, line_number);
                return Ok(true);
            }
            seen += count;
        }
        defx!("false, only {} records", seen);

        Ok(false)
    }

    /// Snapshot of the current position. `None` if the journal has no data
    /// files.
    ///
    /// At the end of the last data file the position is the start of any
    /// record still being written there.
    pub fn get_current_position(&self) -> Option<EventLogPosition> {
        let journal: FPath = self.files.references_file().clone();
        if let Some(cursor) = self.cursor.as_ref() {
            return Some(EventLogPosition::new(
                self.file_event_number,
                journal,
                cursor.path().clone(),
                Some(cursor.fileoffset()),
            ));
        }
        if let Some(path) = self.files.get(self.file_index) {
            return Some(EventLogPosition::new(
                self.file_event_number,
                journal,
                path.clone(),
                None,
            ));
        }
        let last: &FPath = self.files.data_files().last()?;
        let fileoffset: Option<FileOffset> = self
            .end_fileoffset
            .or_else(|| path_filesz(fpath_to_path(last)));

        Some(EventLogPosition::new(self.file_event_number, journal, last.clone(), fileoffset))
    }

    /// Move to `position`, taken from this or another `LgfReader` over the
    /// same journal.
    ///
    /// A stored offset before the first record is moved up to the first
    /// record. An offset that is not at a record-initial line is corrected
    /// by stepping forward from there, then backward from the stored offset.
    pub fn restore_position(
        &mut self,
        position: &EventLogPosition,
    ) -> std::result::Result<(), PositionError> {
        defn!("({})", position);
        self.reset();
        if position.references_file_path() != self.files.references_file() {
            defx!("WrongJournal");
            return Err(PositionError::WrongJournal {
                position: position.references_file_path().clone(),
                journal: self.files.references_file().clone(),
            });
        }
        let index: usize = match self.files.index_of(position.data_file_path()) {
            Some(index) => index,
            None => {
                defx!("UnknownDataFile");
                return Err(PositionError::UnknownDataFile(position.data_file_path().clone()));
            }
        };
        let path: FPath = match self.files.get(index) {
            Some(path) => path.clone(),
            None => return Err(PositionError::UnknownDataFile(position.data_file_path().clone())),
        };
        let mut cursor = TextCursor::open_at_line(&path, LGP_HEADER_LINES)?;
        let first_offset: FileOffset = cursor.fileoffset();

        let requested: FileOffset = match position.stream_position() {
            Some(offset) => offset,
            None => {
                self.set_cursor(cursor, index, position.event_number());
                defx!("start of {:?}", path);
                return Ok(());
            }
        };
        let filesz: FileSz = match path_filesz(fpath_to_path(&path)) {
            Some(filesz) => filesz,
            None => {
                defx!("no file size for {:?}", path);
                return Err(PositionError::Io(Error::new(
                    ErrorKind::NotFound,
                    format!("cannot get size of {:?}", path),
                )));
            }
        };
        if requested > filesz {
            defx!("NoDataAtOffset, file size {}", filesz);
            return Err(PositionError::NoDataAtOffset {
                path,
                offset: requested,
            });
        }
        let clamped: FileOffset = std::cmp::max(requested, first_offset);

        let mut correction: Correction = correct_boundary(&mut cursor, clamped, true)?;
        if correction == Correction::NotFound {
            correction = correct_boundary(&mut cursor, requested, false)?;
        }
        match correction {
            Correction::Found(_offset) => {
                defo!("record at {}", _offset);
            }
            Correction::NoData(_offset) => {
                defo!("end of file at {}", _offset);
            }
            Correction::NotFound => {
                defx!("BoundaryNotFound");
                return Err(PositionError::BoundaryNotFound {
                    path,
                    offset: requested,
                });
            }
        }
        self.set_cursor(cursor, index, position.event_number());
        defx!("fileoffset {:?}", self.cursor.as_ref().map(|c| c.fileoffset()));

        Ok(())
    }
}
