//! Non-interactive output: render one catalog page as plain text.

use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::catalog::CatalogSource;
use crate::cli::Cli;
use crate::controller::ViewController;

/// Fetch the catalog, apply the print-mode filters and write the page to
/// stdout.
pub fn run(cli: &Cli, source: &dyn CatalogSource) -> Result<()> {
    let books = source
        .fetch_books()
        .map_err(|err| anyhow!("Error loading books: {err}"))?;

    let mut controller = ViewController::new(books, cli.slicing());
    controller.set_filter(cli.level);
    controller.set_search_term(cli.search.clone());
    controller.set_page(cli.page);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_page(&mut out, &controller).context("failed to write catalog page")?;
    info!(page = controller.page(), "printed catalog page");
    Ok(())
}

/// One line per book, then the page indicator when there is more than one
/// page. An empty page prints the same message the TUI shows.
pub fn write_page(out: &mut impl Write, controller: &ViewController) -> io::Result<()> {
    let view = controller.visible_catalog_page();
    if view.books.is_empty() {
        writeln!(out, "{}", view.empty_message())?;
    }
    for book in &view.books {
        writeln!(out, "{} [{}]", book.display_title(), book.level_label())?;
    }
    if view.shows_pager() {
        writeln!(out, "Page {} of {}", view.page, view.total_pages)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookRecord, LevelBand};
    use crate::query::PageSlicing;

    fn render(controller: &ViewController) -> String {
        let mut out = Vec::new();
        write_page(&mut out, controller).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_books_in_catalog_order() {
        let mut controller = ViewController::new(
            vec![
                BookRecord::new("A", "Ann", "A"),
                BookRecord::new("B", "Bo", "D"),
                BookRecord::new("C", "", "A"),
            ],
            PageSlicing::Contiguous,
        );
        controller.set_filter(LevelBand::AToC);
        assert_eq!(render(&controller), "A by Ann [Level A]\nC [Level A]\n");
    }

    #[test]
    fn page_indicator_only_when_paged() {
        let books: Vec<BookRecord> = (0..16)
            .map(|i| BookRecord::new(format!("Book {i:02}"), "", "A"))
            .collect();
        let mut controller = ViewController::new(books, PageSlicing::Contiguous);
        controller.set_page(2);
        assert_eq!(render(&controller), "Book 15 [Level A]\nPage 2 of 2\n");
    }

    #[test]
    fn empty_page_prints_message() {
        let mut controller =
            ViewController::new(vec![BookRecord::new("A", "", "A")], PageSlicing::Contiguous);
        controller.set_search_term("zzz");
        assert_eq!(render(&controller), "No books found.\n");
    }
}
