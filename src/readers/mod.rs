// src/readers/mod.rs

//! "Readers" for _lgflib_.
//!
//! ## Overview of readers
//!
//! * An [`LgfReader`] drives a [`TextCursor`] over each data file of a
//!   [`JournalFiles`] to derive [`LogicalRecord`s].
//! * A `TextCursor` only handles lines and byte offsets.
//! * The [`boundary`] functions decide where a record begins and ends.
//! * A [`RecordDecoder`] turns a `LogicalRecord` into a [`RowData`],
//!   resolving codes through the dictionaries of a [`ReferencesManager`].
//! * An [`LgfReaderObserver`] is notified of file switches, records, and
//!   errors.
//!
//! <br/>
//!
//! The _lgfr_ binary program uses one `LgfReader` per journal.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`LogicalRecord`s]: crate::data::record::LogicalRecord
//! [`RowData`]: crate::data::record::RowData
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader
//! [`TextCursor`]: crate::readers::textcursor::TextCursor
//! [`JournalFiles`]: crate::readers::journalfiles::JournalFiles
//! [`boundary`]: crate::readers::boundary
//! [`RecordDecoder`]: crate::readers::recorddecoder::RecordDecoder
//! [`ReferencesManager`]: crate::readers::referencesreader::ReferencesManager
//! [`LgfReaderObserver`]: crate::readers::notify::LgfReaderObserver

pub mod boundary;
pub mod helpers;
pub mod journalfiles;
pub mod lgfreader;
pub mod notify;
pub mod recorddecoder;
pub mod referencesreader;
pub mod summary;
pub mod textcursor;
