// src/readers/textcursor.rs

//! Implements a [`TextCursor`], a thin line-oriented wrapper over a seekable
//! journal data file.
//!
//! A `TextCursor` always knows the byte offset of the next unread byte. That
//! offset is what an [`EventLogPosition`] stores and what the positioning
//! functions of [`LgfReader`] seek to.
//!
//! _XXX: not a rust "Reader"; does not implement trait [`Read`]._
//!
//! [`EventLogPosition`]: crate::data::position::EventLogPosition
//! [`LgfReader`]: crate::readers::lgfreader::LgfReader
//! [`Read`]: std::io::Read

use std::fmt;
use std::io::{
    BufRead,
    BufReader,
    Error,
    Result,
    Seek,
    SeekFrom,
};

use ::bstr::ByteSlice;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    Count,
    FPath,
    File,
    FileOffset,
    FileOpenOptions,
    ResultS3,
    BOM_UTF8,
    CRu8,
    NLu8,
};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

/// Return type of [`TextCursor::read_line`].
///
/// `Found` holds the line without the line ending, `Done` is end of file.
pub type ResultReadLine = ResultS3<String, Error>;

/// Line-oriented cursor over one file.
///
/// Line endings `\n` and `\r\n` are stripped from returned lines. A UTF-8
/// byte order mark at the very start of the file is stripped from the first
/// line. Invalid UTF-8 is replaced, not rejected.
pub struct TextCursor {
    path: FPath,
    reader: BufReader<File>,
    /// Byte offset of the next unread byte.
    fileoffset: FileOffset,
    /// Reusable line buffer.
    buffer: Vec<u8>,
    /// `Count` of lines returned by `read_line` or skipped by `skip_lines`.
    /// A line read again after a `seek` backward is not counted again.
    pub(crate) lines_read: Count,
    /// Highest `fileoffset` reached by reading.
    fileoffset_max: FileOffset,
}

impl fmt::Debug for TextCursor {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("TextCursor")
            .field("path", &self.path)
            .field("fileoffset", &self.fileoffset)
            .field("lines_read", &self.lines_read)
            .finish()
    }
}

impl TextCursor {
    /// Open `path` for reading, positioned at byte zero.
    pub fn open(path: &FPath) -> Result<TextCursor> {
        defñ!("({:?})", path);
        let file: File = FileOpenOptions::new()
            .read(true)
            .open(path)?;

        Ok(TextCursor {
            path: path.clone(),
            reader: BufReader::new(file),
            fileoffset: 0,
            buffer: Vec::with_capacity(512),
            lines_read: 0,
            fileoffset_max: 0,
        })
    }

    /// Open `path` and skip the first `lines_to_skip` whole lines.
    pub fn open_at_line(
        path: &FPath,
        lines_to_skip: Count,
    ) -> Result<TextCursor> {
        defn!("({:?}, {})", path, lines_to_skip);
        let mut cursor = TextCursor::open(path)?;
        let _skipped = cursor.skip_lines(lines_to_skip)?;
        defx!("skipped {} lines, fileoffset {}", _skipped, cursor.fileoffset);

        Ok(cursor)
    }

    /// The path of the file.
    pub fn path(&self) -> &FPath {
        &self.path
    }

    /// Byte offset of the next unread byte.
    pub const fn fileoffset(&self) -> FileOffset {
        self.fileoffset
    }

    /// Move `fileoffset` past a line of `read` bytes.
    fn advance(
        &mut self,
        read: usize,
    ) {
        self.fileoffset += read as FileOffset;
        if self.fileoffset > self.fileoffset_max {
            self.fileoffset_max = self.fileoffset;
            self.lines_read += 1;
        }
    }

    /// Read the next physical line.
    pub fn read_line(&mut self) -> ResultReadLine {
        self.buffer.clear();
        let read: usize = match self
            .reader
            .read_until(NLu8, &mut self.buffer)
        {
            Ok(val) => val,
            Err(err) => {
                defñ!("read_until error {}", err);
                return ResultS3::Err(err);
            }
        };
        if read == 0 {
            defñ!("Done at fileoffset {}", self.fileoffset);
            return ResultS3::Done;
        }
        let beg_fo: FileOffset = self.fileoffset;
        self.advance(read);

        let mut end: usize = self.buffer.len();
        if end > 0 && self.buffer[end - 1] == NLu8 {
            end -= 1;
            if end > 0 && self.buffer[end - 1] == CRu8 {
                end -= 1;
            }
        }
        let mut beg: usize = 0;
        if beg_fo == 0 && self.buffer[..end].starts_with(BOM_UTF8) {
            beg = BOM_UTF8.len();
        }
        let line: String = self.buffer[beg..end]
            .to_str_lossy()
            .into_owned();
        defñ!("fileoffset {}: {:?}", beg_fo, str_to_String_noraw(&line));

        ResultS3::Found(line)
    }

    /// Read the next physical line without consuming it.
    pub fn peek_line(&mut self) -> ResultReadLine {
        let fo: FileOffset = self.fileoffset;
        let fo_max: FileOffset = self.fileoffset_max;
        let lines_read: Count = self.lines_read;
        let result = self.read_line();
        if result.is_found() {
            let consumed: i64 = (self.fileoffset - fo) as i64;
            if let Err(err) = self.reader.seek_relative(-consumed) {
                return ResultS3::Err(err);
            }
            self.fileoffset = fo;
            self.fileoffset_max = fo_max;
            self.lines_read = lines_read;
        }

        result
    }

    /// Skip up to `count` whole lines. Returns the number of lines skipped,
    /// which is less than `count` only if end of file was reached.
    pub fn skip_lines(
        &mut self,
        count: Count,
    ) -> Result<Count> {
        let mut skipped: Count = 0;
        while skipped < count {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(NLu8, &mut self.buffer)?;
            if read == 0 {
                break;
            }
            self.advance(read);
            skipped += 1;
        }

        Ok(skipped)
    }

    /// Move to byte offset `fileoffset`.
    ///
    /// Seeking past the end of the file is allowed; the next `read_line`
    /// returns `Done`.
    pub fn seek(
        &mut self,
        fileoffset: FileOffset,
    ) -> Result<()> {
        defñ!("({})", fileoffset);
        self.reader
            .seek(SeekFrom::Start(fileoffset))?;
        self.fileoffset = fileoffset;

        Ok(())
    }
}
