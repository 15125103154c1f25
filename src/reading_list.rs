//! Session-only reading list. Entries are keyed by title and kept in the
//! order they were added; nothing is written to disk.

use crate::models::BookRecord;
use crate::query::{page_slice, total_pages, PageSlicing, READING_LIST_PAGE_SIZE};

/// Result of [`ReadingList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Books the user picked this session, in the order they were added. At
/// most one entry per title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingList {
    entries: Vec<BookRecord>,
}

impl ReadingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `book` unless an entry with the same title exists.
    pub fn add(&mut self, book: BookRecord) -> AddOutcome {
        if self.contains(&book.title) {
            return AddOutcome::AlreadyPresent;
        }
        self.entries.push(book);
        AddOutcome::Added
    }

    /// Remove the entry titled `title`, returning it. Remaining entries keep
    /// their order.
    pub fn remove(&mut self, title: &str) -> Option<BookRecord> {
        let index = self.entries.iter().position(|entry| entry.title == title)?;
        Some(self.entries.remove(index))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|entry| entry.title == title)
    }

    pub fn entries(&self) -> &[BookRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.entries.len(), READING_LIST_PAGE_SIZE)
    }

    /// The 1-based `page` of entries, four per page.
    pub fn page(&self, page: usize) -> &[BookRecord] {
        page_slice(&self.entries, page, READING_LIST_PAGE_SIZE, PageSlicing::Contiguous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> BookRecord {
        BookRecord::new(title, "Author", "A")
    }

    fn titles(list: &ReadingList) -> Vec<&str> {
        list.entries().iter().map(|entry| entry.title.as_str()).collect()
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let mut list = ReadingList::new();
        assert_eq!(list.add(book("X")), AddOutcome::Added);
        assert_eq!(titles(&list), ["X"]);

        assert_eq!(list.add(book("X")), AddOutcome::AlreadyPresent);
        assert_eq!(titles(&list), ["X"]);
    }

    #[test]
    fn duplicate_detection_uses_title_only() {
        let mut list = ReadingList::new();
        list.add(BookRecord::new("Same", "First Author", "A"));
        let outcome = list.add(BookRecord::new("Same", "Other Author", "K"));
        assert_eq!(outcome, AddOutcome::AlreadyPresent);
        assert_eq!(list.entries()[0].author, "First Author");
    }

    #[test]
    fn removing_missing_title_changes_nothing() {
        let mut list = ReadingList::new();
        list.add(book("X"));
        let before = list.clone();
        assert_eq!(list.remove("Y"), None);
        assert_eq!(list, before);
    }

    #[test]
    fn removal_preserves_insertion_order() {
        let mut list = ReadingList::new();
        for title in ["A", "B", "C", "D"] {
            list.add(book(title));
        }
        let removed = list.remove("B").expect("B was added");
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&list), ["A", "C", "D"]);
        assert!(!list.contains("B"));
        assert!(list.contains("C"));
    }

    #[test]
    fn add_then_remove_restores_previous_state() {
        let mut list = ReadingList::new();
        list.add(book("A"));
        let before = list.clone();

        list.add(book("New"));
        list.remove("New");
        assert_eq!(list, before);
    }

    #[test]
    fn pages_hold_four_entries() {
        let mut list = ReadingList::new();
        for i in 0..9 {
            list.add(book(&format!("Book {i}")));
        }
        assert_eq!(list.total_pages(), 3);
        assert_eq!(list.page(1).len(), 4);
        assert_eq!(list.page(3).len(), 1);
        assert_eq!(list.page(3)[0].title, "Book 8");
        assert!(list.page(4).is_empty());
    }
}
