//! Human-readable page configuration summaries

use super::types::PageConfig;

/// One-line description of a page configuration
///
/// e.g. `"Every other page, pages 3–45, except 10, 12"`.
pub fn page_config_summary(config: &PageConfig) -> String {
    let mut summary = match config {
        PageConfig::ThisPage { page_number } => format!("Page {}", page_number),
        PageConfig::AllPages { every_other, .. } => match every_other {
            Some(_) => "Every other page".to_string(),
            None => "All pages".to_string(),
        },
        PageConfig::PageRange {
            page_range,
            every_other,
            ..
        } => match every_other {
            Some(_) => format!("Every other page of {}", page_range),
            None => format!("Pages {}", page_range),
        },
    };

    if let Some(filter) = config.every_other() {
        match filter.end_page {
            Some(end) => summary.push_str(&format!(", pages {}\u{2013}{}", filter.start_page, end)),
            None => summary.push_str(&format!(", from page {}", filter.start_page)),
        }
    }

    let except = config.except_pages();
    if !except.is_empty() {
        let pages: Vec<String> = except.iter().map(u32::to_string).collect();
        summary.push_str(&format!(", except {}", pages.join(", ")));
    }

    summary
}
