//! Collection query engine: the pure search, band filter and paging rules
//! every view is derived from. Nothing here holds state; callers recompute on
//! every change.

use crate::models::{BookRecord, LevelBand};

/// Books per page in the main catalog view.
pub const CATALOG_PAGE_SIZE: usize = 15;
/// Books per page in the reading-list panel.
pub const READING_LIST_PAGE_SIZE: usize = 4;
/// Typeahead suggestions only appear once the input is longer than this.
pub const SUGGESTION_MIN_CHARS: usize = 2;

/// How a page number maps onto the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSlicing {
    /// Page `n` covers `[(n-1)*size, n*size)`.
    #[default]
    Contiguous,
    /// Legacy paging: every page after the first drops the leading record
    /// before slicing, so the record at `n*size` is never shown.
    SkipLeadingOnLaterPages,
}

/// Case-insensitive substring test against the title.
pub fn title_matches(book: &BookRecord, term: &str) -> bool {
    book.title.to_lowercase().contains(&term.to_lowercase())
}

/// Search and band filter are mutually exclusive: a non-empty search term
/// ignores the band entirely.
pub fn book_matches(book: &BookRecord, search: &str, band: LevelBand) -> bool {
    if search.is_empty() {
        band.matches(&book.reading_level)
    } else {
        title_matches(book, search)
    }
}

/// Stable filter over the catalog; relative order is preserved.
pub fn filter_books<'a>(
    catalog: &'a [BookRecord],
    search: &str,
    band: LevelBand,
) -> Vec<&'a BookRecord> {
    catalog
        .iter()
        .filter(|book| book_matches(book, search, band))
        .collect()
}

/// `ceil(count / page_size)`, with zero matches meaning zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Return the 1-based `page` of `items`. Pages past the end (and page 0)
/// come back empty rather than clamped.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize, slicing: PageSlicing) -> &[T] {
    let Some(index) = page.checked_sub(1) else {
        return &[];
    };

    let source = match slicing {
        PageSlicing::SkipLeadingOnLaterPages if page > 1 => items.get(1..).unwrap_or(&[]),
        _ => items,
    };

    let start = index.saturating_mul(page_size);
    if start >= source.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(source.len());
    &source[start..end]
}

/// Typeahead candidates for the search bar. Short inputs yield nothing so the
/// dropdown does not flood on the first keystroke.
pub fn suggestions<'a>(catalog: &'a [BookRecord], input: &str) -> Vec<&'a BookRecord> {
    if input.chars().count() <= SUGGESTION_MIN_CHARS {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|book| title_matches(book, input))
        .collect()
}

/// Clamp a page number into `1..=max(total, 1)`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.min(total.max(1)).max(1)
}
