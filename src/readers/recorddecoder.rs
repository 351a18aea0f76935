// src/readers/recorddecoder.rs

//! Decoding of a [`LogicalRecord`] text into a [`RowData`].
//!
//! [`parse_fields`] splits one bracketed structure, e.g.
//! `{20200412134348,N,{0,0},1,...}`, into its top-level fields. Nested
//! structures like `{0,0}` stay as one field of raw text. The same splitter
//! handles the header lines of the references file.
//!
//! [`LgfRecordDecoder`] is the default [`RecordDecoder`]. An [`LgfReader`]
//! may be given any other implementation.
//!
//! [`LogicalRecord`]: crate::data::record::LogicalRecord
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader

use std::fmt;

use ::chrono::{
    Duration,
    NaiveDate,
    NaiveDateTime,
};
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};
use ::thiserror::Error;

use crate::data::record::{
    Period,
    RowData,
    Severity,
    TransactionStatus,
};
use crate::data::references::{
    Code,
    ReferenceDictionaries,
};

/// Datetime format of a record period, e.g. `20200412134348`.
pub const PERIOD_FORMAT: &str = "%Y%m%d%H%M%S";

/// Transaction dates are counted in 1/10000 second units since
/// `0001-01-01 00:00:00`.
pub const TRANSACTION_DATE_UNITS_PER_SECOND: i64 = 10_000;

/// Index of each top-level field of a record.
pub mod field {
    pub const PERIOD: usize = 0;
    pub const TRANSACTION_STATUS: usize = 1;
    pub const TRANSACTION: usize = 2;
    pub const USER: usize = 3;
    pub const COMPUTER: usize = 4;
    pub const APPLICATION: usize = 5;
    pub const CONNECTION: usize = 6;
    pub const EVENT: usize = 7;
    pub const SEVERITY: usize = 8;
    pub const COMMENT: usize = 9;
    pub const METADATA: usize = 10;
    pub const DATA: usize = 11;
    pub const DATA_PRESENTATION: usize = 12;
    pub const WORK_SERVER: usize = 13;
    pub const PRIMARY_PORT: usize = 14;
    pub const SECONDARY_PORT: usize = 15;
    pub const SESSION: usize = 16;
    /// count of fields a record must have
    pub const COUNT_MIN: usize = 17;
}

/// Why a record text could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("text is not enclosed in {{ }}")]
    NotBracketed,
    #[error("unbalanced brackets or quotes")]
    Unbalanced,
    #[error("missing field {index}, found {found} fields")]
    MissingField { index: usize, found: usize },
    #[error("field {index} is not a number: {value:?}")]
    InvalidNumber { index: usize, value: String },
    #[error("invalid period {0:?}")]
    InvalidPeriod(String),
}

/// Split the bracketed `text` into its top-level fields.
///
/// A trailing `,` after the closing `}` is allowed. Whitespace and line
/// endings around fields are trimmed; text within quotes is kept as is.
/// Quoted fields keep their quotes, see [`unquote`].
pub fn parse_fields(text: &str) -> Result<Vec<&str>, DecodeError> {
    let mut text: &str = text.trim();
    if let Some(t) = text.strip_suffix(',') {
        text = t.trim_end();
    }
    let inner: &str = match text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
    {
        Some(inner) => inner,
        None => return Err(DecodeError::NotBracketed),
    };
    let bytes: &[u8] = inner.as_bytes();
    let mut fields: Vec<&str> = Vec::with_capacity(field::COUNT_MIN + 1);
    let mut depth: usize = 0;
    let mut quoted: bool = false;
    let mut field_beg: usize = 0;
    let mut i: usize = 0;
    // all matched bytes are ASCII so `i` is always a char boundary
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                if quoted && bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                quoted = !quoted;
            }
            b'{' if !quoted => depth += 1,
            b'}' if !quoted => {
                if depth == 0 {
                    return Err(DecodeError::Unbalanced);
                }
                depth -= 1;
            }
            b',' if !quoted && depth == 0 => {
                fields.push(inner[field_beg..i].trim());
                field_beg = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 || quoted {
        return Err(DecodeError::Unbalanced);
    }
    let last: &str = inner[field_beg..].trim();
    if !last.is_empty() || !fields.is_empty() {
        fields.push(last);
    }
    defñ!("{} fields", fields.len());

    Ok(fields)
}

/// Remove enclosing quotes from a field and collapse escaped `""` to `"`.
/// A field without enclosing quotes is returned as is.
pub fn unquote(field: &str) -> String {
    match field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => String::from(field),
    }
}

/// Return the field at `index` or `MissingField`.
pub fn field_at<'a>(
    fields: &[&'a str],
    index: usize,
) -> Result<&'a str, DecodeError> {
    match fields.get(index) {
        Some(f) => Ok(f),
        None => Err(DecodeError::MissingField {
            index,
            found: fields.len(),
        }),
    }
}

/// Parse the decimal integer field at `index`.
pub fn field_i64(
    fields: &[&str],
    index: usize,
) -> Result<i64, DecodeError> {
    let value: &str = field_at(fields, index)?;
    value
        .parse::<i64>()
        .map_err(|_| DecodeError::InvalidNumber {
            index,
            value: String::from(value),
        })
}

/// Parse a record period, e.g. `20200412134348`.
pub fn parse_period(value: &str) -> Result<Period, DecodeError> {
    NaiveDateTime::parse_from_str(value, PERIOD_FORMAT)
        .map_err(|_| DecodeError::InvalidPeriod(String::from(value)))
}

/// Convert a transaction date, hex count of 1/10000 seconds since
/// `0001-01-01`, into a datetime. Zero is no transaction.
pub fn transaction_date_from_hex(value: &str) -> Option<NaiveDateTime> {
    let units: i64 = i64::from_str_radix(value.trim(), 16).ok()?;
    if units <= 0 {
        return None;
    }
    let epoch: NaiveDateTime = NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let seconds: i64 = units / TRANSACTION_DATE_UNITS_PER_SECOND;

    epoch.checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Decode the value of the data field, e.g. `{"U"}`, `{"S","text"}`,
/// `{"R",123:abc}`.
///
/// Undefined is an empty string. Strings, numbers, booleans and dates are
/// their value. Anything else is the raw text.
fn decode_data(raw: &str) -> String {
    let fields: Vec<&str> = match parse_fields(raw) {
        Ok(fields) => fields,
        Err(_) => return unquote(raw),
    };
    match fields.as_slice() {
        [] => String::new(),
        [tag] if unquote(tag) == "U" => String::new(),
        [tag, value] => match unquote(tag).as_str() {
            "S" | "N" | "B" | "D" => unquote(value),
            _ => String::from(raw),
        },
        _ => String::from(raw),
    }
}

/// Turn the text of one record into a [`RowData`].
pub trait RecordDecoder: Send {
    fn decode(
        &self,
        text: &str,
        references: &ReferenceDictionaries,
    ) -> Result<RowData, DecodeError>;
}

/// The default [`RecordDecoder`] for `*.lgp` records.
#[derive(Clone, Copy, Default)]
pub struct LgfRecordDecoder {}

impl fmt::Debug for LgfRecordDecoder {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LgfRecordDecoder").finish()
    }
}

impl LgfRecordDecoder {
    pub fn new() -> LgfRecordDecoder {
        LgfRecordDecoder {}
    }
}

impl RecordDecoder for LgfRecordDecoder {
    fn decode(
        &self,
        text: &str,
        references: &ReferenceDictionaries,
    ) -> Result<RowData, DecodeError> {
        defn!();
        let fields: Vec<&str> = parse_fields(text)?;
        if fields.len() < field::COUNT_MIN {
            defx!("only {} fields", fields.len());
            return Err(DecodeError::MissingField {
                index: fields.len(),
                found: fields.len(),
            });
        }

        let period: Period = parse_period(field_at(&fields, field::PERIOD)?)?;
        let transaction_status =
            TransactionStatus::from_code(field_at(&fields, field::TRANSACTION_STATUS)?);
        let transaction: Vec<&str> = parse_fields(field_at(&fields, field::TRANSACTION)?)?;
        let transaction_date: Option<NaiveDateTime> = transaction
            .first()
            .and_then(|v| transaction_date_from_hex(v));
        let transaction_id: i64 = transaction
            .get(1)
            .and_then(|v| i64::from_str_radix(v.trim(), 16).ok())
            .unwrap_or(0);

        let user_code: Code = field_i64(&fields, field::USER)?;
        let computer_code: Code = field_i64(&fields, field::COMPUTER)?;
        let application_code: Code = field_i64(&fields, field::APPLICATION)?;
        let connection_id: i64 = field_i64(&fields, field::CONNECTION)?;
        let event_code: Code = field_i64(&fields, field::EVENT)?;
        let severity = Severity::from_code(field_at(&fields, field::SEVERITY)?);
        let comment: String = unquote(field_at(&fields, field::COMMENT)?);
        let metadata_code: Code = field_i64(&fields, field::METADATA)?;
        let data: String = decode_data(field_at(&fields, field::DATA)?);
        let data_presentation: String = unquote(field_at(&fields, field::DATA_PRESENTATION)?);
        let work_server_code: Code = field_i64(&fields, field::WORK_SERVER)?;
        let primary_port_code: Code = field_i64(&fields, field::PRIMARY_PORT)?;
        let secondary_port_code: Code = field_i64(&fields, field::SECONDARY_PORT)?;
        let session: i64 = field_i64(&fields, field::SESSION)?;

        let row = RowData {
            period,
            transaction_status,
            transaction_date,
            transaction_id,
            user_code,
            user: references.user_by_code(user_code).cloned(),
            computer: references.computer_by_code(computer_code).cloned(),
            application: references.application_by_code(application_code).cloned(),
            connection_id,
            event: references.event_by_code(event_code).cloned(),
            severity,
            comment,
            metadata: references.metadata_by_code(metadata_code).cloned(),
            data,
            data_presentation,
            work_server: references.work_server_by_code(work_server_code).cloned(),
            primary_port: references.primary_port_by_code(primary_port_code).cloned(),
            secondary_port: references.secondary_port_by_code(secondary_port_code).cloned(),
            session,
        };
        defx!("period {}", row.period);

        Ok(row)
    }
}
