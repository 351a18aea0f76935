// src/data/position.rs

//! Implements [`EventLogPosition`], a storable "resume reading here" token.

use std::fmt;
use std::io::Result;

use ::serde::{
    Deserialize,
    Serialize,
};

use crate::common::{
    Count,
    FPath,
    FileOffset,
};

/// Snapshot of a reader position that may be saved and later replayed
/// against another reader instance over the same journal.
///
/// Serialized with camelCase names, e.g.
///
/// ```json
/// {"eventNumber":3,"referencesFilePath":"/j/1Cv8.lgf","dataFilePath":"/j/20200412000000.lgp","streamPosition":412}
/// ```
///
/// A `stream_position` of `None` means the start of the data file's records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLogPosition {
    event_number: Count,
    references_file_path: FPath,
    data_file_path: FPath,
    stream_position: Option<FileOffset>,
}

impl EventLogPosition {
    pub fn new(
        event_number: Count,
        references_file_path: FPath,
        data_file_path: FPath,
        stream_position: Option<FileOffset>,
    ) -> EventLogPosition {
        EventLogPosition {
            event_number,
            references_file_path,
            data_file_path,
            stream_position,
        }
    }

    /// Ordinal of the last record read within `data_file_path`.
    pub const fn event_number(&self) -> Count {
        self.event_number
    }

    pub fn references_file_path(&self) -> &FPath {
        &self.references_file_path
    }

    pub fn data_file_path(&self) -> &FPath {
        &self.data_file_path
    }

    pub const fn stream_position(&self) -> Option<FileOffset> {
        self.stream_position
    }

    /// Return a copy with `stream_position` replaced.
    pub fn with_stream_position(
        &self,
        stream_position: Option<FileOffset>,
    ) -> EventLogPosition {
        EventLogPosition {
            stream_position,
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<EventLogPosition> {
        Ok(serde_json::from_str(data)?)
    }
}

impl fmt::Display for EventLogPosition {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self.stream_position {
            Some(fo) => write!(f, "{}@{} (event {})", self.data_file_path, fo, self.event_number),
            None => write!(f, "{} (event {})", self.data_file_path, self.event_number),
        }
    }
}
