// src/readers/summary.rs

//! Implements `SummaryLgfReader` statistics tracking struct.

use std::fmt;

use ::chrono::NaiveDateTime;

use crate::common::{
    Count,
    FPath,
};

/// Accumulated statistics of one [`LgfReader`].
///
/// For CLI option `--summary`.
///
/// [`LgfReader`]: crate::readers::lgfreader::LgfReader
#[allow(non_snake_case)]
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct SummaryLgfReader {
    /// the header file of the journal
    pub journal_path: FPath,
    /// `Count` of data files in the journal
    pub lgfreader_data_files: Count,
    /// `Count` of data files opened for streaming
    pub lgfreader_files_opened: Count,
    /// `Count` of data files skipped by an observer
    pub lgfreader_files_skipped: Count,
    /// `Count` of records decoded and returned
    pub lgfreader_records_found: Count,
    /// `Count` of records returned undecoded
    pub lgfreader_records_skipped: Count,
    /// `Count` of physical lines read while streaming
    pub lgfreader_lines_read: Count,
    /// `Count` of reads of the header file
    pub lgfreader_references_refreshes: Count,
    /// datetime of the first record decoded
    pub lgfreader_period_first: Option<NaiveDateTime>,
    /// datetime of the last record decoded
    pub lgfreader_period_last: Option<NaiveDateTime>,
    /// The last [`Error`] as a `String`, if any.
    ///
    /// [`Error`]: std::io::Error
    pub error: Option<String>,
}

impl SummaryLgfReader {
    /// Update the first and last periods with a newly decoded `period`.
    pub fn update_period(
        &mut self,
        period: NaiveDateTime,
    ) {
        match self.lgfreader_period_first {
            Some(first) if first <= period => {}
            _ => self.lgfreader_period_first = Some(period),
        }
        match self.lgfreader_period_last {
            Some(last) if last >= period => {}
            _ => self.lgfreader_period_last = Some(period),
        }
    }
}

fn fmt_period(period: &Option<NaiveDateTime>) -> String {
    match period {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::from("None"),
    }
}

impl fmt::Display for SummaryLgfReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        writeln!(f, "journal        : {}", self.journal_path)?;
        writeln!(f, "data files     : {}", self.lgfreader_data_files)?;
        writeln!(
            f,
            "files          : opened {}, skipped {}",
            self.lgfreader_files_opened, self.lgfreader_files_skipped
        )?;
        writeln!(
            f,
            "records        : found {}, skipped {}",
            self.lgfreader_records_found, self.lgfreader_records_skipped
        )?;
        writeln!(f, "lines          : {}", self.lgfreader_lines_read)?;
        writeln!(f, "refreshes      : {}", self.lgfreader_references_refreshes)?;
        writeln!(f, "first period   : {}", fmt_period(&self.lgfreader_period_first))?;
        writeln!(f, "last period    : {}", fmt_period(&self.lgfreader_period_last))?;
        match &self.error {
            Some(err) => write!(f, "error          : {}", err),
            None => write!(f, "error          : None"),
        }
    }
}
