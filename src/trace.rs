//! Memory trace reader
//!
//! One record per line: `<marker> <kind> <address> <instruction count>`,
//! where kind `0` is a load and anything else a store, and the address
//! is hexadecimal with an optional `0x` prefix.

use std::io::{BufRead, Lines};

use log::warn;
use text_io::try_scan;

use crate::error::{MalformedReason, SimulatorError, SimulatorResult, TraceError};
use crate::memory::AccessType;

/// A single memory access from the trace
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    pub marker: char,
    pub access_type: AccessType,
    pub address: u64,
    pub instruction_count: u64,
}

/// What to do with a line that cannot be parsed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Warn and treat it as the end of the trace
    #[default]
    Stop,
    /// Warn and carry on with the next line
    Skip,
    /// Fail the run
    Abort,
}

fn scan_fields(line: &str) -> Result<(char, i64, String, u64), text_io::Error> {
    let (marker, kind, address, count): (char, i64, String, u64);
    try_scan!(line.bytes() => "{} {} {} {}", marker, kind, address, count);
    Ok((marker, kind, address, count))
}

fn parse_hex(field: &str) -> Option<u64> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u64::from_str_radix(digits, 16).ok()
}

/// Parse one trace line. Blank lines yield `Ok(None)`;
/// fields past the fourth are ignored.
pub fn parse_line(
    line: &str,
) -> Result<Option<TraceRecord>, MalformedReason> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.len() {
        0 => return Ok(None),
        n @ 1..=3 => return Err(MalformedReason::FieldCount(n)),
        _ => {}
    }

    let (marker, kind, address, instruction_count) =
        scan_fields(&fields[..4].join(" "))
            .map_err(|e| MalformedReason::Scan(e.to_string()))?;
    let address = parse_hex(&address)
        .ok_or(MalformedReason::BadAddress(address))?;

    Ok(Some(TraceRecord {
        marker,
        access_type: AccessType::from_code(kind),
        address,
        instruction_count,
    }))
}

/// Iterator over the records of a trace stream
pub struct TraceReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
    policy: MalformedPolicy,
    skipped: usize,
    finished: bool,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R, policy: MalformedPolicy) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
            policy,
            skipped: 0,
            finished: false,
        }
    }

    /// Number of malformed lines passed over so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = SimulatorResult<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(SimulatorError::IoError(e)));
                }
            };
            self.line_num += 1;

            let reason = match parse_line(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(reason) => reason,
            };

            match self.policy {
                MalformedPolicy::Stop => {
                    warn!(
                        "trace line {} is malformed ({}), ending the trace",
                        self.line_num, reason
                    );
                    self.finished = true;
                }
                MalformedPolicy::Skip => {
                    warn!(
                        "skipping malformed trace line {} ({})",
                        self.line_num, reason
                    );
                    self.skipped += 1;
                }
                MalformedPolicy::Abort => {
                    self.finished = true;
                    return Some(Err(TraceError::Malformed {
                        line: self.line_num,
                        content: line,
                        reason,
                    }
                    .into()));
                }
            }
        }
        None
    }
}

/// Read a whole trace into memory
pub fn read_records<R: BufRead>(
    reader: R,
    policy: MalformedPolicy,
) -> SimulatorResult<Vec<TraceRecord>> {
    TraceReader::new(reader, policy).collect()
}
