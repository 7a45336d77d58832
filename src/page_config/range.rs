//! Page range grammar
//!
//! Comma-separated single pages and `start-end` spans, e.g. `"1-2,5-6,8"`.
//! An en dash is accepted in place of the hyphen.

use crate::error::{Result, ValidationError};
use std::collections::BTreeSet;

const EN_DASH: char = '\u{2013}';

/// One parsed token: a single page is a span with `start == end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageSpan {
    start: u32,
    end: u32,
}

/// Parse a range string into spans without expanding them
fn parse_spans(range_str: &str) -> Result<Vec<PageSpan>> {
    let normalized = range_str.replace(EN_DASH, "-");
    if normalized.trim().is_empty() {
        return Err(ValidationError::EmptyPageRange);
    }

    normalized.split(',').map(|part| parse_token(part.trim())).collect()
}

fn parse_token(part: &str) -> Result<PageSpan> {
    if part.is_empty() {
        return Err(ValidationError::InvalidPageRange(
            "empty entry between commas".to_string(),
        ));
    }

    let span = match part.split_once('-') {
        Some((start, end)) => {
            let start = parse_page(start.trim(), part)?;
            let end = parse_page(end.trim(), part)?;
            if start > end {
                return Err(ValidationError::InvalidPageRange(format!(
                    "start ({}) > end ({})",
                    start, end
                )));
            }
            PageSpan { start, end }
        }
        None => {
            let page = parse_page(part, part)?;
            PageSpan {
                start: page,
                end: page,
            }
        }
    };

    Ok(span)
}

fn parse_page(text: &str, token: &str) -> Result<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPageRange(format!(
            "'{}' is not a page or page range",
            token
        )));
    }

    let page: u32 = text
        .parse()
        .map_err(|_| ValidationError::InvalidPageRange(format!("'{}' is too large", token)))?;

    if page < 1 {
        return Err(ValidationError::InvalidPageRange(format!(
            "page numbers start at 1 (got {})",
            page
        )));
    }

    Ok(page)
}

/// Parse a range string into sorted, de-duplicated page numbers
pub fn parse_page_range(range_str: &str) -> Result<Vec<u32>> {
    let spans = parse_spans(range_str)?;
    Ok(expand_spans(&spans))
}

/// Parse a range string and require every page to lie in `1..=max_page`
///
/// Bounds are checked on the spans before expansion.
pub fn parse_page_range_within(range_str: &str, max_page: u32) -> Result<Vec<u32>> {
    let spans = parse_spans(range_str)?;

    let mut out_of_range = BTreeSet::new();
    for span in &spans {
        if span.start > max_page {
            out_of_range.insert(span.start);
        }
        if span.end > max_page {
            out_of_range.insert(span.end);
        }
    }
    if !out_of_range.is_empty() {
        return Err(ValidationError::PagesOutOfRange {
            pages: out_of_range.into_iter().collect(),
            max: max_page,
        });
    }

    Ok(expand_spans(&spans))
}

/// Validate a range string
///
/// Returns a descriptive message when the string is malformed, a value is
/// below 1 or above `max_page`, or a span is inverted; `None` when valid.
pub fn validate_page_range(range_str: &str, max_page: Option<u32>) -> Option<String> {
    let result = match max_page {
        Some(max) => parse_page_range_within(range_str, max).map(|_| ()),
        None => parse_spans(range_str).map(|_| ()),
    };
    result.err().map(|e| e.to_string())
}

fn expand_spans(spans: &[PageSpan]) -> Vec<u32> {
    let pages: BTreeSet<u32> = spans
        .iter()
        .flat_map(|span| span.start..=span.end)
        .collect();
    pages.into_iter().collect()
}
