//! Physical range strings rendered in canonical labels

use super::types::CanonicalPagesMap;
use crate::page_config::parse_page_range_within;

const EN_DASH: char = '\u{2013}';

/// Map a physical range string (e.g. `"1–3, 5"`) to canonical labels
///
/// Consecutive physical pages merge into `start–end` runs joined by `", "`.
/// Pages without a label fall back to their physical number. Input that
/// does not parse, or names pages past the end of the map, is returned
/// unchanged; blank input yields `""`.
pub fn canonical_range_string(document_range: &str, map: &CanonicalPagesMap) -> String {
    if document_range.trim().is_empty() {
        return String::new();
    }

    let max_page = map.last_page().unwrap_or(0);
    let pages = match parse_page_range_within(document_range.trim(), max_page) {
        Ok(pages) => pages,
        Err(_) => return document_range.to_string(),
    };

    let label = |page: u32| {
        map.label_for(page)
            .map(str::to_string)
            .unwrap_or_else(|| page.to_string())
    };

    let mut runs: Vec<(String, String)> = Vec::new();
    let mut previous: Option<u32> = None;
    for page in pages {
        let current = label(page);
        let consecutive = previous.and_then(|p| p.checked_add(1)) == Some(page);
        if !consecutive {
            runs.push((current.clone(), current));
        } else if let Some(run) = runs.last_mut() {
            run.1 = current;
        }
        previous = Some(page);
    }

    runs.into_iter()
        .map(|(start, end)| {
            if start == end {
                start
            } else {
                format!("{}{}{}", start, EN_DASH, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
