use std::fmt;
use std::io::{BufRead, Split};
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use crate::error::{Error, RecordError, Result};

lazy_static! {
    // Leading whitespace, one kind character, an address with an optional 0x, a comma, a size
    static ref DATA_LINE: Regex =
        Regex::new(r"^\s+(?P<kind>\S)\s+(?:0[xX])?(?P<address>[^\s,]+),(?P<size>[^\s,]+)\s*$").unwrap();
}

/// The kind of a memory access
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessKind {
    Load,
    Store,
    /// A load immediately followed by a store to the same address
    Modify,
}

impl AccessKind {
    /// The character used for this kind in traces
    pub fn as_char(&self) -> char {
        match self {
            AccessKind::Load => 'L',
            AccessKind::Store => 'S',
            AccessKind::Modify => 'M',
        }
    }
}

impl TryFrom<char> for AccessKind {
    type Error = RecordError;

    fn try_from(value: char) -> std::result::Result<Self, Self::Error> {
        match value {
            'L' => Ok(AccessKind::Load),
            'S' => Ok(AccessKind::Store),
            'M' => Ok(AccessKind::Modify),
            other => Err(RecordError::UnknownKind(other)),
        }
    }
}

/// One data line of a trace
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub kind: AccessKind,
    pub address: u64,
    /// Size of the access in bytes. Only reported, it has no effect on the simulation
    pub size: u64,
}

impl fmt::Display for AccessRecord {
    /// Formats the record the way it appears in traces, without the leading space
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.kind.as_char(), self.address, self.size)
    }
}

/// Parses a single trace line
///
/// Lines that don't start with a space are annotations (instruction fetches in valgrind traces,
/// for example) and produce `Ok(None)`. Lines that do must be well formed data lines
///
/// # Arguments
///
/// * `line`: The line, with or without its line terminator
///
/// returns: Result<Option<AccessRecord>, RecordError>
///
/// # Examples
///
/// ```
/// use csimlib::trace::{parse_line, AccessKind, AccessRecord};
/// let record = parse_line(" M 7ff000398,8").unwrap();
/// assert_eq!(record, Some(AccessRecord { kind: AccessKind::Modify, address: 0x7ff000398, size: 8 }));
/// assert_eq!(parse_line("I 0400d7d4,8").unwrap(), None);
/// assert!(parse_line(" X 10,1").is_err());
/// ```
pub fn parse_line(line: &str) -> std::result::Result<Option<AccessRecord>, RecordError> {
    if !line.starts_with(' ') {
        return Ok(None);
    }
    let captures = DATA_LINE.captures(line).ok_or(RecordError::Syntax)?;
    let kind = captures["kind"].chars().next().ok_or(RecordError::Syntax)?;
    let kind = AccessKind::try_from(kind)?;
    let address_text = &captures["address"];
    let address = u64::from_str_radix(address_text, 16)
        .map_err(|_| RecordError::Address(address_text.to_string()))?;
    let size_text = &captures["size"];
    let size = size_text
        .parse::<u64>()
        .map_err(|_| RecordError::Size(size_text.to_string()))?;
    if size == 0 {
        return Err(RecordError::ZeroSize);
    }
    Ok(Some(AccessRecord { kind, address, size }))
}

/// A lazy, one pass sequence of access records read from a line source
///
/// Annotation lines are skipped on their first byte, before any decoding, so they may contain
/// anything. The first malformed data line or read failure is yielded as an error, and the
/// iterator is exhausted after that
pub struct Trace<S> {
    lines: Split<S>,
    line_number: usize,
    failed: bool,
}

impl<S: BufRead> Trace<S> {
    pub fn new(source: S) -> Self {
        Self {
            lines: source.split(b'\n'),
            line_number: 0,
            failed: false,
        }
    }

    /// The 1-based number of the last line read
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<S: BufRead> Iterator for Trace<S> {
    type Item = Result<AccessRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::Io(e)));
                }
            };
            self.line_number += 1;
            if line.first() != Some(&b' ') {
                trace!("Skipping annotation line {}: {:?}", self.line_number, String::from_utf8_lossy(&line));
                continue;
            }
            let parsed = match std::str::from_utf8(&line) {
                Ok(text) => parse_line(text),
                Err(_) => Err(RecordError::Syntax),
            };
            match parsed {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(reason) => {
                    self.failed = true;
                    return Some(Err(Error::MalformedRecord {
                        line: self.line_number,
                        content: String::from_utf8_lossy(&line).into_owned(),
                        reason,
                    }));
                }
            }
        }
    }
}
