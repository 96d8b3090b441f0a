//! Parse pprof's top-down text report into typed rows.
//!
//! Layout:
//! ```text
//! <4 label lines>
//! <dropped nodes detail>
//!       flat  flat%   sum%        cum   cum%
//!      10ms  5.00%  5.00%       40ms 20.00%  pkg.Foo
//! ...
//! ```
//! Rows that do not split into the expected columns (blank lines, stray
//! formatting) are skipped rather than failing the whole report.

use super::schema::{TextItem, TextReport};
use crate::utils::error::ReportError;
use std::io::BufRead;

/// Number of label lines at the top of the report
pub const LABEL_LINES: usize = 4;

/// Lines discarded after the labels (drop detail and column header)
pub const SKIPPED_LINES: usize = 2;

/// Parse a report from an iterator of lines
pub fn parse_text_report<I>(lines: I) -> Result<TextReport, ReportError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    parse_lines(lines.into_iter().map(Ok))
}

/// Parse a report from a buffered reader
pub fn read_text_report<R: BufRead>(reader: R) -> Result<TextReport, ReportError> {
    parse_lines(reader.lines().map(|line| line.map_err(ReportError::from)))
}

fn parse_lines<I, S>(mut lines: I) -> Result<TextReport, ReportError>
where
    I: Iterator<Item = Result<S, ReportError>>,
    S: AsRef<str>,
{
    let mut labels = Vec::with_capacity(LABEL_LINES);
    while labels.len() < LABEL_LINES {
        match lines.next() {
            Some(line) => labels.push(line?.as_ref().to_string()),
            None => return Err(ReportError::MalformedReport { found: labels.len() }),
        }
    }

    for _ in 0..SKIPPED_LINES {
        if lines.next().transpose()?.is_none() {
            break;
        }
    }

    let mut items = Vec::new();
    for line in lines {
        if let Some(item) = parse_row(line?.as_ref()) {
            items.push(item);
        }
    }

    Ok(TextReport::new(labels, items))
}

/// Parse one `flat flat% sum% cum cum% symbol...` row
pub fn parse_row(line: &str) -> Option<TextItem> {
    let (_flat, rest) = split_token(line)?;
    let (flat_percent, rest) = split_token(rest)?;
    let (_sum_percent, rest) = split_token(rest)?;
    let (_cum, rest) = split_token(rest)?;
    let (cum_percent, symbol) = split_token(rest)?;

    Some(TextItem {
        symbol: symbol.to_string(),
        flat_percent: flat_percent.to_string(),
        cum_percent: cum_percent.to_string(),
    })
}

/// Split at the first whitespace run into `(token, trimmed rest)`.
/// `None` when there is nothing after the token.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let (token, rest) = s.trim().split_once(char::is_whitespace)?;
    Some((token, rest.trim()))
}
