//! Page configuration expansion
//!
//! Turns a declarative [`PageConfig`] into the concrete ascending set of
//! physical pages it denotes.

use super::range::parse_page_range_within;
use super::types::{EveryOther, PageConfig};
use crate::error::{Result, ValidationError};

impl PageConfig {
    /// Expand to the ascending list of physical pages in `1..=max_page`
    ///
    /// Pages outside the document are a validation error rather than being
    /// clamped.
    pub fn applicable_pages(&self, max_page: u32) -> Result<Vec<u32>> {
        let (base, every_other, except_pages) = match self {
            PageConfig::ThisPage { page_number } => {
                if *page_number < 1 || *page_number > max_page {
                    return Err(ValidationError::PagesOutOfRange {
                        pages: vec![*page_number],
                        max: max_page,
                    });
                }
                return Ok(vec![*page_number]);
            }
            PageConfig::AllPages {
                every_other,
                except_pages,
            } => ((1..=max_page).collect::<Vec<_>>(), every_other, except_pages),
            PageConfig::PageRange {
                page_range,
                every_other,
                except_pages,
            } => (
                parse_page_range_within(page_range, max_page)?,
                every_other,
                except_pages,
            ),
        };

        let pages = match every_other {
            Some(filter) => match resolve_every_other_end(filter, max_page)? {
                Some(end) => base
                    .into_iter()
                    .filter(|&page| keeps_page(filter.start_page, end, page))
                    .collect(),
                None => Vec::new(),
            },
            None => base,
        };

        Ok(pages
            .into_iter()
            .filter(|page| !except_pages.contains(page))
            .collect())
    }

    /// Whether the configuration covers `page`
    pub fn applies_to_page(&self, page: u32, max_page: u32) -> Result<bool> {
        Ok(self.applicable_pages(max_page)?.binary_search(&page).is_ok())
    }
}

/// Last page of the every-other run
///
/// `None` when an open-ended run starts past the document, which covers no
/// pages.
fn resolve_every_other_end(filter: &EveryOther, max_page: u32) -> Result<Option<u32>> {
    if filter.start_page < 1 {
        return Err(ValidationError::InvalidEveryOther(
            "start page must be >= 1".to_string(),
        ));
    }

    let end = match filter.end_page {
        Some(end) => end,
        None if filter.start_page > max_page => return Ok(None),
        None => max_page,
    };
    if end > max_page {
        return Err(ValidationError::PagesOutOfRange {
            pages: vec![end],
            max: max_page,
        });
    }
    if end < filter.start_page {
        return Err(ValidationError::InvalidEveryOther(format!(
            "end page {} is before start page {}",
            end, filter.start_page
        )));
    }

    Ok(Some(end))
}

fn keeps_page(start: u32, end: u32, page: u32) -> bool {
    page >= start && page <= end && (page - start) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_this_page() {
        assert_eq!(PageConfig::this_page(4).applicable_pages(10).unwrap(), vec![4]);
    }

    #[test]
    fn test_this_page_out_of_range() {
        assert!(PageConfig::this_page(11).applicable_pages(10).is_err());
        assert!(PageConfig::this_page(0).applicable_pages(10).is_err());
    }

    #[test]
    fn test_all_pages() {
        assert_eq!(
            PageConfig::all_pages().applicable_pages(5).unwrap(),
            vec![1, 2, 3, 4, 5]
        );
        assert!(PageConfig::all_pages().applicable_pages(0).unwrap().is_empty());
    }

    #[test]
    fn test_all_pages_every_other_to_end() {
        let config = PageConfig::all_pages().with_every_other(EveryOther::starting_at(2));
        assert_eq!(config.applicable_pages(9).unwrap(), vec![2, 4, 6, 8]);
    }

    #[test]
    fn test_all_pages_every_other_bounded() {
        let config = PageConfig::all_pages().with_every_other(EveryOther::between(3, 9));
        assert_eq!(config.applicable_pages(20).unwrap(), vec![3, 5, 7, 9]);
    }

    #[test]
    fn test_every_other_with_exceptions() {
        let config = PageConfig::all_pages()
            .with_every_other(EveryOther::between(3, 15))
            .with_except_pages(vec![7, 11, 12]);
        assert_eq!(config.applicable_pages(20).unwrap(), vec![3, 5, 9, 13, 15]);
    }

    #[test]
    fn test_every_other_invalid() {
        let config = PageConfig::all_pages().with_every_other(EveryOther::between(8, 4));
        assert!(matches!(
            config.applicable_pages(10),
            Err(ValidationError::InvalidEveryOther(_))
        ));

        let config = PageConfig::all_pages().with_every_other(EveryOther::between(1, 40));
        assert!(matches!(
            config.applicable_pages(10),
            Err(ValidationError::PagesOutOfRange { .. })
        ));

        let config = PageConfig::all_pages().with_every_other(EveryOther::starting_at(0));
        assert!(config.applicable_pages(10).is_err());
    }

    #[test]
    fn test_every_other_open_start_past_end() {
        let config = PageConfig::all_pages().with_every_other(EveryOther::starting_at(12));
        assert!(config.applicable_pages(10).unwrap().is_empty());
        assert!(!config.applies_to_page(10, 10).unwrap());

        let config = PageConfig::page_range("1-5").with_every_other(EveryOther::starting_at(7));
        assert!(config.applicable_pages(10).unwrap().is_empty());

        // An explicit end past the document is still rejected
        let config = PageConfig::all_pages().with_every_other(EveryOther::between(12, 14));
        assert!(config.applicable_pages(10).is_err());
    }

    #[test]
    fn test_page_range_with_exceptions() {
        let config = PageConfig::page_range("1-2,5-6,8").with_except_pages(vec![5]);
        assert_eq!(config.applicable_pages(10).unwrap(), vec![1, 2, 6, 8]);
    }

    #[test]
    fn test_page_range_every_other() {
        let config = PageConfig::page_range("10-20").with_every_other(EveryOther::starting_at(11));
        assert_eq!(config.applicable_pages(30).unwrap(), vec![11, 13, 15, 17, 19]);
    }

    #[test]
    fn test_page_range_invalid() {
        assert!(PageConfig::page_range("5-1").applicable_pages(10).is_err());
        assert!(PageConfig::page_range("1-12").applicable_pages(10).is_err());
    }

    #[test]
    fn test_applies_to_page() {
        let config = PageConfig::all_pages().with_every_other(EveryOther::starting_at(1));
        assert!(config.applies_to_page(3, 10).unwrap());
        assert!(!config.applies_to_page(4, 10).unwrap());
    }
}
