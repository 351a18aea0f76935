// src/readers/boundary.rs

//! The record boundary detector.
//!
//! A journal record is a bracket-delimited structure that may span many
//! physical lines, e.g.
//!
//! ```text
//! {20200412134348,N,
//! {0,0},1,1,2,2,3,I,"comment with a { and a ""quote""",0,
//! {"U"},"",1,1,0,1,0,
//! {0}
//! },
//! ```
//!
//! [`is_record_complete`] scans one physical line at a time, carrying a
//! [`BoundaryState`] between lines of the same record.
//! [`is_record_initial`] recognizes the first line of a record without any
//! state.

use ::lazy_static::lazy_static;
use ::memchr::memchr3;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::Count;

/// A line holding only this is an inter-record artifact when the following
/// line begins a record.
pub const SEPARATOR_LINE: &str = ",";

lazy_static! {
    /// First line of a record, `{` + 14 digit timestamp + `,` + transaction
    /// status letter + `,`.
    static ref REGEX_RECORD_INITIAL: Regex = Regex::new(r"^\{\d{14},\w,")
        .unwrap();
}

/// Nesting state while assembling one record.
///
/// A record is complete only when a line drives `bracket_depth` back to zero
/// while `inside_quoted_text` is `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundaryState {
    pub bracket_depth: Count,
    pub inside_quoted_text: bool,
}

impl BoundaryState {
    pub fn new() -> BoundaryState {
        BoundaryState::default()
    }

    /// Return to `{0, false}` for the start of a new record.
    pub fn reset(&mut self) {
        self.bracket_depth = 0;
        self.inside_quoted_text = false;
    }
}

/// Scan `line`, updating `state`. Return `true` if `line` completes the
/// record.
///
/// `{` and `}` inside quoted text do not count. Within quoted text a doubled
/// `""` is an escaped quote character and does not toggle quoted text. An
/// unbalanced `}` at depth zero is ignored.
pub fn is_record_complete(
    line: &str,
    state: &mut BoundaryState,
) -> bool {
    let bytes: &[u8] = line.as_bytes();
    let mut at: usize = 0;
    // the three bytes are ASCII so never match within a multi-byte UTF-8 char
    while let Some(i) = memchr3(b'{', b'}', b'"', &bytes[at..]) {
        let idx: usize = at + i;
        match bytes[idx] {
            b'"' => {
                if state.inside_quoted_text && bytes.get(idx + 1) == Some(&b'"') {
                    at = idx + 2;
                    continue;
                }
                state.inside_quoted_text = !state.inside_quoted_text;
            }
            b'{' if !state.inside_quoted_text => {
                state.bracket_depth += 1;
            }
            b'}' if !state.inside_quoted_text => {
                state.bracket_depth = state.bracket_depth.saturating_sub(1);
            }
            _ => {}
        }
        at = idx + 1;
    }
    let complete: bool = state.bracket_depth == 0 && !state.inside_quoted_text;
    defñ!("{:?} → {}", state, complete);

    complete
}

/// Is `line` the first line of a record?
pub fn is_record_initial(line: &str) -> bool {
    REGEX_RECORD_INITIAL.is_match(line)
}

/// Is `line` a lone separator (`,`)?
pub fn is_separator_line(line: &str) -> bool {
    line == SEPARATOR_LINE
}

/// Is `line` empty or only whitespace?
pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}
