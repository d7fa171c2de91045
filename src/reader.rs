//! Row parsing for admission input files and intermediate run files.
//!
//! Input rows are `id,university,department,score` with a header line that is
//! always skipped. Run-file rows are `university,department,score` with no
//! header. A row missing its university or department is skipped silently
//! (warn-logged); a score that fails to parse becomes 0.0 rather than
//! dropping the row.

use std::io::{BufRead, Lines};

use tracing::warn;

use crate::error::Result;
use crate::types::Record;

/// Parse one input row: `id,university,department,score`.
pub(crate) fn parse_input_row(line: &str) -> Option<Record> {
    let mut fields = line.splitn(4, ',');
    let _id = fields.next()?;
    let university = fields.next()?.trim();
    let department = fields.next()?.trim();
    let score_field = fields.next().unwrap_or("");
    if university.is_empty() || department.is_empty() {
        return None;
    }
    let score = score_field.trim().parse().unwrap_or(0.0);
    Some(Record::new(university, department, score))
}

/// Parse one run-file row: `university,department,score`.
pub(crate) fn parse_run_row(line: &str) -> Option<Record> {
    let mut fields = line.splitn(3, ',');
    let university = fields.next()?.trim();
    let department = fields.next()?.trim();
    let score_field = fields.next().unwrap_or("");
    if university.is_empty() || department.is_empty() {
        return None;
    }
    let score = score_field.trim().parse().unwrap_or(0.0);
    Some(Record::new(university, department, score))
}

/// Streaming reader over admission input rows.
///
/// Skips the header line and any malformed row, yielding [`Record`]s until
/// the stream ends. I/O failures surface as errors; malformed rows do not.
pub struct RowReader<R> {
    lines: Lines<R>,
    header_skipped: bool,
    skipped_rows: u64,
}

impl<R: BufRead> RowReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            header_skipped: false,
            skipped_rows: 0,
        }
    }

    /// Next well-formed record, or `None` at end of stream.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => return Ok(None),
            };
            if !self.header_skipped {
                self.header_skipped = true;
                continue;
            }
            match parse_input_row(&line) {
                Some(record) => return Ok(Some(record)),
                None => {
                    self.skipped_rows += 1;
                    warn!(row = %line, "skipping malformed input row");
                }
            }
        }
    }

    /// Rows skipped as malformed so far.
    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }
}

/// Streaming reader over one run file (no header).
pub(crate) struct RunReader<R> {
    lines: Lines<R>,
}

impl<R: BufRead> RunReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    pub(crate) fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => return Ok(None),
            };
            match parse_run_row(&line) {
                Some(record) => return Ok(Some(record)),
                None => warn!(row = %line, "skipping malformed run row"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn input_rows_parse_and_header_is_skipped() {
        let data = "id,university,department,score\n1,UniX,Math,88.5\n2,UniY,Physics,70\n";
        let mut reader = RowReader::new(Cursor::new(data));
        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.university, "UniX");
        assert_eq!(first.department, "Math");
        assert_eq!(first.score, 88.5);
        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.department, "Physics");
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let data = "header\n1,UniX,Math,80\nbroken row\n2,,Math,70\n3,UniY,,60\n4,UniZ,Math,75\n";
        let mut reader = RowReader::new(Cursor::new(data));
        assert_eq!(reader.next_record().unwrap().unwrap().university, "UniX");
        assert_eq!(reader.next_record().unwrap().unwrap().university, "UniZ");
        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(reader.skipped_rows(), 3);
    }

    #[test]
    fn unparseable_score_defaults_to_zero() {
        assert_eq!(parse_input_row("1,UniX,Math,n/a").unwrap().score, 0.0);
        assert_eq!(parse_input_row("1,UniX,Math").unwrap().score, 0.0);
    }

    #[test]
    fn run_rows_have_no_id_column() {
        let record = parse_run_row("UniX,Math,91.25").unwrap();
        assert_eq!(record.university, "UniX");
        assert_eq!(record.department, "Math");
        assert_eq!(record.score, 91.25);
        assert!(parse_run_row(",Math,50").is_none());
    }
}
