// src/bin/lgfr.rs

//! Driver program _lgfr_ drives the [_lgflib_].
//!
//! Processes user-passed command-line arguments, opens one journal with an
//! [`LgfReader`], optionally moves it with [`goto_record`] or
//! [`restore_position`], then prints each record read to STDOUT.
//!
//! Passing `--position-out` saves the position after the last record printed,
//! so a later run passing the same file to `--position-in` resumes there.
//!
//! `lgfr` prints records to STDOUT and everything else to STDERR.
//!
//! [_lgflib_]: lgflib
//! [`LgfReader`]: lgflib::readers::lgfreader::LgfReader
//! [`goto_record`]: lgflib::readers::lgfreader::LgfReader::goto_record
//! [`restore_position`]: lgflib::readers::lgfreader::LgfReader::restore_position

#![allow(non_camel_case_types)]

use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;
use std::process::ExitCode;

use ::anyhow::{
    bail,
    Context,
};
use ::clap::{
    Parser,
    ValueEnum,
};
use ::const_format::concatcp;
use ::lgflib::common::{
    Count,
    FPath,
};
use ::lgflib::data::position::EventLogPosition;
use ::lgflib::data::record::{
    LogicalRecord,
    RowData,
};
#[allow(unused_imports)]
use ::lgflib::debug::printers::{
    de_err,
    de_wrn,
    e_err,
    e_wrn,
};
use ::lgflib::readers::lgfreader::{
    LgfReader,
    LgfReaderOptions,
    ResultReadRecord,
    READ_DELAY_MS_DEFAULT,
};
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(debug_assertions)]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "\nDEBUG BUILD";
#[cfg(not(debug_assertions))]
const CLI_HELP_AFTER_NOTE_DEBUG: &str = "";

#[cfg(test)]
const CLI_HELP_AFTER_NOTE_TEST: &str = "\nTEST BUILD";
#[cfg(not(test))]
const CLI_HELP_AFTER_NOTE_TEST: &str = "";

/// `--help` _afterword_ message.
const CLI_HELP_AFTER: &str = concatcp!(
    "\
PATH is a journal directory holding 1Cv8.lgf and the *.lgp data files, or the
path of the 1Cv8.lgf file itself. Data files are read in file name order.

Records with a period within --read-delay milliseconds of now are not printed;
they may still be being written. Pass --read-delay=0 to print all records.

A position file holds one JSON object, e.g.
    {\"eventNumber\":3,\"referencesFilePath\":\"/j/1Cv8.lgf\",\"dataFilePath\":\"/j/20200412000000.lgp\",\"streamPosition\":412}

Exits 0 if the journal was read to the end or to --limit, 1 otherwise.",
    CLI_HELP_AFTER_NOTE_DEBUG,
    CLI_HELP_AFTER_NOTE_TEST,
);

/// How each record is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum CLI_Output_Format {
    /// period, severity, event, user and comment
    #[default]
    Line,
    /// the decoded record as one JSON object
    Json,
    /// the record text as stored in the data file
    Raw,
}

#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "lgfr",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(LGF journal reader)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Repository: ", env!("CARGO_PKG_REPOSITORY"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of a journal directory or of its 1Cv8.lgf file.
    #[clap(required = true, verbatim_doc_comment)]
    path: String,

    /// Print the count of records in the journal and exit.
    #[clap(
        short = 'c',
        long,
        conflicts_with_all = ["goto", "position_in", "position_out"],
    )]
    count: bool,

    /// Begin at record number N of the journal, counting from 1.
    /// May be decimal or hexadecimal, e.g. "1000" or "0x3E8".
    #[clap(
        short = 'g',
        long,
        value_name = "N",
        value_parser = cli_parse_count,
        conflicts_with = "position_in",
        verbatim_doc_comment,
    )]
    goto: Option<Count>,

    /// Resume at the position saved in FILE.
    #[clap(short = 'i', long, value_name = "FILE")]
    position_in: Option<String>,

    /// Save the position after the last record printed to FILE.
    #[clap(short = 'o', long, value_name = "FILE")]
    position_out: Option<String>,

    /// Do not print records with a period within MS milliseconds of now.
    #[clap(
        short = 'd',
        long,
        value_name = "MS",
        default_value_t = READ_DELAY_MS_DEFAULT,
    )]
    read_delay: u64,

    /// Stop after printing N records.
    #[clap(
        short = 'n',
        long,
        value_name = "N",
        value_parser = cli_parse_count,
    )]
    limit: Option<Count>,

    /// How each record is printed.
    #[clap(
        short = 'f',
        long,
        value_enum,
        default_value_t = CLI_Output_Format::Line,
    )]
    format: CLI_Output_Format,

    /// Print a summary of the reading to STDERR.
    #[clap(short = 's', long)]
    summary: bool,
}

/// `clap` value parser for record counts, decimal or `0x` hexadecimal.
fn cli_parse_count(count_str: &str) -> std::result::Result<Count, String> {
    let count_str = count_str.trim();
    let result = match count_str
        .strip_prefix("0x")
        .or_else(|| count_str.strip_prefix("0X"))
    {
        Some(hex) => Count::from_str_radix(hex, 16),
        None => count_str.parse::<Count>(),
    };
    match result {
        Ok(count) => Ok(count),
        Err(err) => Err(format!("Unable to parse a number from {:?}; {}", count_str, err)),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn print_record<W: Write>(
    out: &mut W,
    format: CLI_Output_Format,
    record: &LogicalRecord,
    row: &RowData,
) -> anyhow::Result<()> {
    match format {
        CLI_Output_Format::Line => writeln!(out, "{}", row)?,
        CLI_Output_Format::Json => {
            serde_json::to_writer(&mut *out, row)?;
            writeln!(out)?;
        }
        CLI_Output_Format::Raw => writeln!(out, "{}", record.text())?,
    }

    Ok(())
}

fn position_load(fpath: &FPath) -> anyhow::Result<EventLogPosition> {
    let data: String =
        std::fs::read_to_string(fpath).with_context(|| format!("reading position file {:?}", fpath))?;
    let position = EventLogPosition::from_json(data.trim())
        .with_context(|| format!("parsing position file {:?}", fpath))?;

    Ok(position)
}

fn position_save(
    fpath: &FPath,
    position: &EventLogPosition,
) -> anyhow::Result<()> {
    let data: String = position.to_json()?;
    std::fs::write(fpath, data).with_context(|| format!("writing position file {:?}", fpath))?;

    Ok(())
}

/// Open the journal, move, then print records until the end of the journal
/// or `--limit`.
fn processing_loop(args: &CLI_Args) -> anyhow::Result<()> {
    defn!();
    let options = LgfReaderOptions {
        read_delay_ms: args.read_delay,
    };
    let mut reader = LgfReader::with_options(Path::new(&args.path), options)
        .with_context(|| format!("opening journal {:?}", args.path))?;
    defo!("{:?}", reader);

    if args.count {
        let count: Count = reader.count()?;
        println!("{}", count);
        defx!("count {}", count);
        return Ok(());
    }

    if let Some(fpath) = args.position_in.as_ref() {
        let position: EventLogPosition = position_load(fpath)?;
        reader
            .restore_position(&position)
            .with_context(|| format!("restoring position {}", position))?;
    } else if let Some(record_number) = args.goto {
        if !reader.goto_record(record_number)? {
            bail!("journal {:?} has no record {}", reader.journal_path(), record_number);
        }
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut printed: Count = 0;
    loop {
        if let Some(limit) = args.limit {
            if printed >= limit {
                break;
            }
        }
        match reader.read() {
            ResultReadRecord::Found(record, row) => {
                print_record(&mut out, args.format, &record, &row)?;
                printed += 1;
            }
            ResultReadRecord::Skipped(record, reason) => {
                e_wrn!(
                    "record {} at offset {} of {:?} not decoded: {}",
                    record.file_event_number(),
                    record.fileoffset(),
                    record.data_file(),
                    reason
                );
            }
            ResultReadRecord::Done => break,
            ResultReadRecord::Err(err) => {
                out.flush()?;
                if args.summary {
                    eprintln!("{}", reader.summary());
                }
                return Err(err).context("reading journal");
            }
        }
    }
    out.flush()?;

    if let Some(fpath) = args.position_out.as_ref() {
        match reader.get_current_position() {
            Some(position) => position_save(fpath, &position)?,
            None => e_wrn!("journal has no data files, position not saved"),
        }
    }
    if args.summary {
        eprintln!("{}", reader.summary());
    }
    defx!("printed {}", printed);

    Ok(())
}

/// Process the user-passed command-line arguments.
/// Start function `processing_loop`.
/// Determine a process return code.
pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();
    let args = CLI_Args::parse();
    defo!("{:?}", args);

    let exitcode = match processing_loop(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
