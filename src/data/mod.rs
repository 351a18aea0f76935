// src/data/mod.rs

//! The `data` module is specialized data containers for
//! [`LogicalRecord`]s, [`RowData`], [`ReferenceDictionaries`] and
//! [`EventLogPosition`]s.
//!
//! ## Definitions of data
//!
//! ### Journal
//!
//! A "journal" is a directory holding:
//!
//! * one header file `1Cv8.lgf` with the reference dictionaries.
//! * zero or more rotated data files `*.lgp`, ordered by file name.
//!
//! ### Line
//!
//! A "line" is a sequence of bytes in a data file that:
//!
//! * begin after a prior "line" or the beginning of a file.
//! * end with a newline character `'\n'` or the end of a file.
//!
//! Lines are read by a [`TextCursor`].
//!
//! ### Record
//!
//! A "record" is a sequence of "lines" that:
//!
//! * begin with a record-initial line, e.g. `{20200412134348,N,`.
//! * end with the line that closes the outermost `{`.
//!
//! A record is represented by a [`LogicalRecord`] and found by a
//! [`LgfReader`]. Decoding a `LogicalRecord` yields a [`RowData`].
//!
//! ### References
//!
//! Records refer to users, computers, applications, event kinds, etc. by
//! integer codes. Codes are resolved through the [`ReferenceDictionaries`]
//! read from the header file.
//!
//! [`TextCursor`]: crate::readers::textcursor::TextCursor
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader
//! [`LogicalRecord`]: crate::data::record::LogicalRecord
//! [`RowData`]: crate::data::record::RowData
//! [`ReferenceDictionaries`]: crate::data::references::ReferenceDictionaries
//! [`EventLogPosition`]: crate::data::position::EventLogPosition

pub mod position;
pub mod record;
pub mod references;
