//! View controller: owns every piece of browsing state and recomputes the
//! derived views on demand. The TUI only talks to the catalog through here.

use std::fmt;

use tracing::{debug, info};

use crate::models::{BookRecord, LevelBand};
use crate::query::{
    clamp_page, filter_books, page_slice, suggestions, total_pages, PageSlicing, CATALOG_PAGE_SIZE,
};
use crate::reading_list::{AddOutcome, ReadingList};

/// Section the presentation layer should bring into view after an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Catalog,
    ReadingList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Added,
    AlreadyPresent,
    Removed,
}

/// Transient feedback for a reading-list change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub kind: NoticeKind,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Added => write!(f, "Added \"{}\" to your reading list.", self.title),
            NoticeKind::AlreadyPresent => {
                write!(f, "\"{}\" is already on your reading list.", self.title)
            }
            NoticeKind::Removed => {
                write!(f, "Removed \"{}\" from your reading list.", self.title)
            }
        }
    }
}

/// One page of the catalog as it should be displayed right now.
#[derive(Debug, Clone)]
pub struct CatalogPage<'a> {
    pub books: Vec<&'a BookRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub matched: usize,
    pub searching: bool,
}

impl CatalogPage<'_> {
    /// Pager and "Page X of Y" only appear when there is more than one page.
    pub fn shows_pager(&self) -> bool {
        self.total_pages > 1
    }

    pub fn empty_message(&self) -> &'static str {
        if self.searching {
            "No books found."
        } else {
            "Start typing to search for books."
        }
    }
}

/// One page of the reading-list panel.
#[derive(Debug, Clone)]
pub struct ReadingListPage<'a> {
    pub books: &'a [BookRecord],
    pub page: usize,
    pub total_pages: usize,
}

impl ReadingListPage<'_> {
    pub fn shows_pager(&self) -> bool {
        self.total_pages > 1
    }

    pub fn empty_message(&self) -> &'static str {
        "No books in reading list."
    }
}

/// Browsing state over a loaded catalog: the search term, the active level
/// band, both page cursors and the session reading list.
#[derive(Debug, Clone)]
pub struct ViewController {
    catalog: Vec<BookRecord>,
    search: String,
    filter: LevelBand,
    /// 1-based catalog page.
    page: usize,
    reading_list: ReadingList,
    /// 1-based reading-list page.
    reading_list_page: usize,
    slicing: PageSlicing,
    /// Pending scroll request, drained by the UI.
    scroll: Option<ScrollTarget>,
}

impl ViewController {
    pub fn new(catalog: Vec<BookRecord>, slicing: PageSlicing) -> Self {
        info!(books = catalog.len(), ?slicing, "catalog ready");
        Self {
            catalog,
            search: String::new(),
            filter: LevelBand::All,
            page: 1,
            reading_list: ReadingList::new(),
            reading_list_page: 1,
            slicing,
            scroll: None,
        }
    }

    pub fn catalog(&self) -> &[BookRecord] {
        &self.catalog
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> LevelBand {
        self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn reading_list(&self) -> &ReadingList {
        &self.reading_list
    }

    pub fn reading_list_page(&self) -> usize {
        self.reading_list_page
    }

    pub fn in_reading_list(&self, title: &str) -> bool {
        self.reading_list.contains(title)
    }

    /// Replace the search term. The page is clamped so a narrowing search
    /// never strands the view past the last page.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.clamp_catalog_page();
        debug!(search = %self.search, page = self.page, "search term changed");
    }

    pub fn set_filter(&mut self, band: LevelBand) {
        self.filter = band;
        self.clamp_catalog_page();
        debug!(band = %band, page = self.page, "filter changed");
    }

    /// Jump to `page` as requested. Out-of-range pages are kept and render
    /// as empty.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.scroll = Some(ScrollTarget::Catalog);
        debug!(page, "catalog page changed");
    }

    pub fn set_reading_list_page(&mut self, page: usize) {
        self.reading_list_page = page;
    }

    pub fn add_to_reading_list(&mut self, book: &BookRecord) -> Notice {
        let kind = match self.reading_list.add(book.clone()) {
            AddOutcome::Added => {
                self.scroll = Some(ScrollTarget::ReadingList);
                NoticeKind::Added
            }
            AddOutcome::AlreadyPresent => NoticeKind::AlreadyPresent,
        };
        info!(title = %book.title, ?kind, "reading list add");
        Notice {
            title: book.title.clone(),
            kind,
        }
    }

    pub fn remove_from_reading_list(&mut self, title: &str) -> Option<Notice> {
        let removed = self.reading_list.remove(title)?;
        self.reading_list_page =
            clamp_page(self.reading_list_page, self.reading_list.total_pages());
        info!(title = %removed.title, "reading list remove");
        Some(Notice {
            title: removed.title,
            kind: NoticeKind::Removed,
        })
    }

    /// Filtered catalog at the current page, computed fresh on every call.
    pub fn visible_catalog_page(&self) -> CatalogPage<'_> {
        let matched = self.matched_books();
        let total = total_pages(matched.len(), CATALOG_PAGE_SIZE);
        let books = page_slice(&matched, self.page, CATALOG_PAGE_SIZE, self.slicing).to_vec();
        CatalogPage {
            books,
            page: self.page,
            total_pages: total,
            matched: matched.len(),
            searching: !self.search.is_empty(),
        }
    }

    pub fn visible_reading_list_page(&self) -> ReadingListPage<'_> {
        ReadingListPage {
            books: self.reading_list.page(self.reading_list_page),
            page: self.reading_list_page,
            total_pages: self.reading_list.total_pages(),
        }
    }

    /// Typeahead candidates for the given search input.
    pub fn suggestions(&self, input: &str) -> Vec<&BookRecord> {
        suggestions(&self.catalog, input)
    }

    /// Drain the pending scroll request, if any.
    pub fn take_scroll_request(&mut self) -> Option<ScrollTarget> {
        self.scroll.take()
    }

    fn matched_books(&self) -> Vec<&BookRecord> {
        filter_books(&self.catalog, &self.search, self.filter)
    }

    fn clamp_catalog_page(&mut self) {
        let total = total_pages(self.matched_books().len(), CATALOG_PAGE_SIZE);
        self.page = clamp_page(self.page, total);
    }
}
