// src/tests/recorddecoder_tests.rs

#![allow(non_snake_case)]

use ::chrono::{
    NaiveDate,
    NaiveDateTime,
};
use ::lazy_static::lazy_static;
use ::test_case::test_case;

use crate::data::record::{
    RowData,
    Severity,
    TransactionStatus,
};
use crate::data::references::{
    EventKind,
    ReferenceDictionaries,
    User,
};
use crate::readers::recorddecoder::{
    parse_fields,
    parse_period,
    transaction_date_from_hex,
    unquote,
    DecodeError,
    LgfRecordDecoder,
    RecordDecoder,
};
use crate::tests::common::{
    record_1line,
    record_5lines,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

lazy_static! {
    static ref REFERENCES: ReferenceDictionaries = {
        let mut references = ReferenceDictionaries::new();
        references.users.insert(
            1,
            User::new(1, String::from("e5ab7f42-3c09-4d3b-a6d7-0b7a4bdc0d12"), String::from("Administrator")),
        );
        references.events.insert(1, EventKind::new(1, String::from("_$Session$_.Start")));
        references.events.insert(2, EventKind::new(2, String::from("_$Session$_.Finish")));
        references
    };
}

fn ndt(
    y: i32,
    mo: u32,
    d: u32,
    h: u32,
    mi: u32,
    s: u32,
) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

#[test_case("{}", &[]; "empty")]
#[test_case("{0}", &["0"]; "one")]
#[test_case("{1,2,3}", &["1", "2", "3"]; "three")]
#[test_case("{1,2,3},", &["1", "2", "3"]; "trailing comma")]
#[test_case("  {1,2}  \n", &["1", "2"]; "whitespace around")]
#[test_case("{1,{2,3},4}", &["1", "{2,3}", "4"]; "nested")]
#[test_case("{1,\"a,b\",2}", &["1", "\"a,b\"", "2"]; "comma in quotes")]
#[test_case("{1,\"a}{b\",2}", &["1", "\"a}{b\"", "2"]; "brackets in quotes")]
#[test_case("{1,\"say \"\"hi\"\"\",2}", &["1", "\"say \"\"hi\"\"\"", "2"]; "escaped quotes")]
#[test_case("{1,\n{2},\n3\n}", &["1", "{2}", "3"]; "newlines between fields")]
#[test_case("{1,,3}", &["1", "", "3"]; "empty field")]
fn test_parse_fields(
    text: &str,
    expect: &[&str],
) {
    let fields = parse_fields(text).unwrap();
    assert_eq!(fields, expect);
}

#[test_case("1,2", DecodeError::NotBracketed; "no brackets")]
#[test_case("{1,2", DecodeError::NotBracketed; "no close")]
#[test_case("{1,{2}", DecodeError::Unbalanced; "unbalanced open")]
#[test_case("{1},2}", DecodeError::Unbalanced; "unbalanced close")]
#[test_case("{1,\"2}", DecodeError::Unbalanced; "open quote")]
fn test_parse_fields_error(
    text: &str,
    expect: DecodeError,
) {
    assert_eq!(parse_fields(text), Err(expect));
}

#[test_case("\"abc\"", "abc")]
#[test_case("\"\"", ""; "empty quoted")]
#[test_case("\"a\"\"b\"", "a\"b"; "escaped")]
#[test_case("abc", "abc"; "not quoted")]
#[test_case("\"abc", "\"abc"; "half quoted")]
fn test_unquote(
    field: &str,
    expect: &str,
) {
    assert_eq!(unquote(field), expect);
}

#[test]
fn test_parse_period() {
    assert_eq!(parse_period("20200412134348").unwrap(), ndt(2020, 4, 12, 13, 43, 48));
    assert_eq!(
        parse_period("2020041213434"),
        Err(DecodeError::InvalidPeriod(String::from("2020041213434")))
    );
    assert!(parse_period("20201312134348").is_err());
}

#[test_case("0", None; "zero")]
#[test_case("zz", None; "not hex")]
#[test_case("2435e4c2b0d40", Some((2019, 8, 24, 6, 8, 49)); "date")]
fn test_transaction_date_from_hex(
    value: &str,
    expect: Option<(i32, u32, u32, u32, u32, u32)>,
) {
    let expect = expect.map(|(y, mo, d, h, mi, s)| ndt(y, mo, d, h, mi, s));
    assert_eq!(transaction_date_from_hex(value), expect);
}

#[test]
fn test_decode_1line() {
    let text = record_1line("20200412134348", 1, "a \"\"quoted\"\" {comment}");
    let row: RowData = LgfRecordDecoder::new()
        .decode(&text, &REFERENCES)
        .unwrap();
    assert_eq!(row.period, ndt(2020, 4, 12, 13, 43, 48));
    assert_eq!(row.transaction_status, TransactionStatus::NotApplicable);
    assert_eq!(row.transaction_date, None);
    assert_eq!(row.transaction_id, 0);
    assert_eq!(row.user_code, 1);
    assert_eq!(row.user.as_ref().map(|u| u.name.as_str()), Some("Administrator"));
    assert_eq!(row.event.as_ref().map(|e| e.name.as_str()), Some("_$Session$_.Start"));
    assert_eq!(row.severity, Severity::Information);
    assert_eq!(row.comment, "a \"quoted\" {comment}");
    assert_eq!(row.data, "");
    assert_eq!(row.data_presentation, "");
    assert_eq!(row.connection_id, 1);
    assert_eq!(row.session, 0);
    // not in the dictionaries
    assert_eq!(row.computer, None);
    assert_eq!(row.metadata, None);
    assert_eq!(row.primary_port, None);
}

#[test]
fn test_decode_5lines() {
    let text = record_5lines("20200412100001", 2, "line one\nline two");
    let text = text.trim_end();
    let row: RowData = LgfRecordDecoder::new()
        .decode(text, &REFERENCES)
        .unwrap();
    assert_eq!(row.period, ndt(2020, 4, 12, 10, 0, 1));
    assert_eq!(row.transaction_status, TransactionStatus::Committed);
    assert_eq!(row.transaction_date, Some(ndt(2019, 8, 24, 6, 8, 49)));
    assert_eq!(row.transaction_id, 0x1a2b);
    assert_eq!(row.connection_id, 7);
    assert_eq!(row.event.as_ref().map(|e| e.name.as_str()), Some("_$Session$_.Finish"));
    assert_eq!(row.severity, Severity::Error);
    assert_eq!(row.comment, "line one\nline two");
    assert_eq!(row.data, "value");
    assert_eq!(row.data_presentation, "presentation");
    assert_eq!(row.session, 3);
}

#[test]
fn test_decode_empty_references() {
    let text = record_1line("20200412134348", 1, "");
    let row: RowData = LgfRecordDecoder::new()
        .decode(&text, &ReferenceDictionaries::new())
        .unwrap();
    assert_eq!(row.user, None);
    assert_eq!(row.event, None);
    assert_eq!(row.user_code, 1);
}

#[test_case("{20200412134348,N,{0,0},1}"; "too few fields")]
#[test_case("{2020041213434x,N,{0,0},1,1,1,1,1,I,\"\",1,{\"U\"},\"\",1,1,1,1,0,{0}}"; "bad period")]
#[test_case("{20200412134348,N,{0,0},x,1,1,1,1,I,\"\",1,{\"U\"},\"\",1,1,1,1,0,{0}}"; "bad user")]
#[test_case("{20200412134348,N,{0,0},1,1,1,1,1,I,\"unclosed,1}"; "unbalanced")]
#[test_case("garbage"; "garbage")]
fn test_decode_error(text: &str) {
    assert!(LgfRecordDecoder::new()
        .decode(text, &REFERENCES)
        .is_err());
}

#[test]
fn test_DecodeError_display() {
    let err = DecodeError::MissingField { index: 3, found: 2 };
    assert_eq!(err.to_string(), "missing field 3, found 2 fields");
    let err = DecodeError::InvalidNumber { index: 3, value: String::from("x") };
    assert_eq!(err.to_string(), "field 3 is not a number: \"x\"");
}
