//! Lazy iterator over raw record lines.

use std::io::BufRead;

use tracing::{debug, warn};

use super::line::{parse_line, LineError};
use super::stats::NormalizeReport;
use crate::models::CallRecord;
use crate::zones::ZoneIndex;

/// Turns a source of raw record lines into normalized records, one line at
/// a time.
///
/// Bad lines are skipped and bad fields are degraded to absent; both are
/// logged and counted in [`NormalizeReport`]. The normalizer is forward-only:
/// a second pass needs a freshly opened source.
pub struct Normalizer<'a, R> {
    reader: R,
    zones: Option<&'a ZoneIndex>,
    buf: Vec<u8>,
    line_number: u64,
    finished: bool,
    report: NormalizeReport,
}

impl<'a, R: BufRead> Normalizer<'a, R> {
    pub fn new(reader: R, zones: Option<&'a ZoneIndex>) -> Self {
        Self {
            reader,
            zones,
            buf: Vec::new(),
            line_number: 0,
            finished: false,
            report: NormalizeReport::default(),
        }
    }

    /// Counters for the lines consumed so far
    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    pub fn into_report(self) -> NormalizeReport {
        self.report
    }

    /// Per-line outcomes, including the lines that were skipped
    pub fn outcomes(&mut self) -> Outcomes<'_, 'a, R> {
        Outcomes { normalizer: self }
    }

    /// Read the next line, decoding invalid UTF-8 by dropping it
    fn read_line(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                self.report.lines_read += 1;
                let mut line = String::with_capacity(self.buf.len());
                let mut dropped = 0;
                for chunk in self.buf.utf8_chunks() {
                    line.push_str(chunk.valid());
                    dropped += chunk.invalid().len();
                }
                if dropped > 0 {
                    debug!(
                        "Line {}: dropped {} undecodable bytes",
                        self.line_number, dropped
                    );
                }
                Some(line)
            }
            Err(e) => {
                warn!("Line {}: read failed, stopping: {}", self.line_number + 1, e);
                self.report.read_error = Some(e.to_string());
                self.finished = true;
                None
            }
        }
    }

    fn next_outcome(&mut self) -> Option<Result<CallRecord, LineError>> {
        let line = self.read_line()?;

        let parsed = match parse_line(&line, self.zones) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Line {}: skipped: {}", self.line_number, e);
                self.report.record_skip(&e);
                return Some(Err(e));
            }
        };

        for issue in &parsed.issues {
            warn!("Line {}: {}", self.line_number, issue);
            self.report.record_issue(issue);
        }

        let record = parsed.record;
        match (&record.coordinate, &record.zone) {
            (None, _) => self.report.without_coordinate += 1,
            (Some(_), None) if self.zones.is_some() => self.report.unzoned += 1,
            _ => {}
        }
        self.report.records += 1;

        Some(Ok(record))
    }
}

impl<R: BufRead> Iterator for Normalizer<'_, R> {
    type Item = CallRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_outcome()? {
                Ok(record) => return Some(record),
                Err(_) => continue,
            }
        }
    }
}

/// Iterator over per-line results, see [`Normalizer::outcomes`]
pub struct Outcomes<'n, 'a, R> {
    normalizer: &'n mut Normalizer<'a, R>,
}

impl<R: BufRead> Iterator for Outcomes<'_, '_, R> {
    type Item = Result<CallRecord, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.normalizer.next_outcome()
    }
}
