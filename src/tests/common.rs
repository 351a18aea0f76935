// src/tests/common.rs

//! Shared journal fixtures for tests.

#![allow(non_upper_case_globals)]

use ::const_format::concatcp;

use crate::debug::helpers::{
    create_journal,
    TempJournal,
};

/// Journal GUID written on line 2 of every journal file.
pub const JOURNAL_GUID: &str = "2c5e5b8e-6fa5-4c1a-8a7e-2b2b0b1e0d63";

/// The three lines before the first entry of every journal file.
pub const JOURNAL_HEADER: &str = concatcp!("1CV8LOG(ver 2.0)\n", JOURNAL_GUID, "\n\n");

pub const USER1_UUID: &str = "e5ab7f42-3c09-4d3b-a6d7-0b7a4bdc0d12";
pub const METADATA1_UUID: &str = "7a9f2c10-1b44-4f6e-9b55-64a0c4b4a001";

/// Header file with one entry of each reference type, an unknown entry type,
/// and a user whose quoted name spans two lines.
pub const REFERENCES_LGF: &str = concatcp!(
    JOURNAL_HEADER,
    "{1,", USER1_UUID, ",\"Administrator\",1},\n",
    "{1,0b2c9a77-9e55-4a61-8e1f-6a1f3e9c2b02,\"Clerk \"\"Two\"\"\nsecond line\",2},\n",
    "{2,\"WORKSTATION-01\",1},\n",
    "{3,\"1CV8C\",1},\n",
    "{4,\"_$Session$_.Start\",1},\n",
    "{4,\"_$Session$_.Finish\",2},\n",
    "{5,", METADATA1_UUID, ",\"Catalog.Goods\",1},\n",
    "{6,\"srv-01\",1},\n",
    "{7,1541,1},\n",
    "{8,1560,1},\n",
    "{11,{1,2},3},\n",
);

/// Count of entries in `REFERENCES_LGF` that belong to a dictionary.
pub const REFERENCES_LGF_ENTRIES: usize = 10;

/// A single line record with event code `event`. `comment` must already
/// have its quotes doubled.
pub fn record_1line(
    period: &str,
    event: i64,
    comment: &str,
) -> String {
    format!(
        "{{{},N,{{0,0}},1,1,1,1,{},I,\"{}\",1,{{\"U\"}},\"\",1,1,1,0,0,{{0}}}},\n",
        period, event, comment,
    )
}

/// A record spread over five lines, the way journals are written.
pub fn record_5lines(
    period: &str,
    event: i64,
    comment: &str,
) -> String {
    format!(
        "{{{},U,\n{{2435e4c2b0d40,1a2b}},1,1,1,7,{},E,\"{}\",1,\n{{\"S\",\"value\"}},\"presentation\",1,1,1,3,0,\n{{0}}\n}},\n",
        period, event, comment,
    )
}

/// The content of a data file holding `records`.
pub fn data_file(records: &[String]) -> String {
    let mut data = String::from(JOURNAL_HEADER);
    for record in records.iter() {
        data.push_str(record);
    }

    data
}

/// Three single line records in one data file.
pub fn journal_3records() -> TempJournal {
    let records = vec![
        record_1line("20200412134348", 1, "first"),
        record_1line("20200412134349", 1, "second"),
        record_1line("20200412134350", 2, "third"),
    ];
    create_journal(REFERENCES_LGF, &[("20200412000000.lgp", &data_file(&records))])
}

/// Three data files of mixed single and multi-line records, 2 + 3 + 1.
pub fn journal_3files() -> TempJournal {
    let file1 = data_file(&[
        record_1line("20200412100000", 1, "f1 r1"),
        record_5lines("20200412100001", 2, "f1 r2 {not a bracket} \"\"quoted\"\""),
    ]);
    let file2 = data_file(&[
        record_5lines("20200413100000", 1, "f2 r1\nspans\nlines"),
        record_1line("20200413100001", 1, "f2 r2"),
        record_5lines("20200413100002", 2, "f2 r3 }}}"),
    ]);
    let file3 = data_file(&[record_1line("20200414100000", 1, "f3 r1")]);
    create_journal(
        REFERENCES_LGF,
        &[
            ("20200413000000.lgp", &file2),
            ("20200412000000.lgp", &file1),
            ("20200414000000.lgp", &file3),
        ],
    )
}

/// Comments of the records of `journal_3files` in reading order.
pub const JOURNAL_3FILES_COMMENTS: [&str; 6] = [
    "f1 r1",
    "f1 r2 {not a bracket} \"quoted\"",
    "f2 r1\nspans\nlines",
    "f2 r2",
    "f2 r3 }}}",
    "f3 r1",
];
