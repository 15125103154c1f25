use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;
use url::Url;

use crate::catalog::{CatalogFetch, FetchState};
use crate::controller::{Notice, ScrollTarget, ViewController};
use crate::models::{BookRecord, LevelBand};
use crate::query::{PageSlicing, READING_LIST_PAGE_SIZE};

use super::helpers::{band_bar_line, book_line, centered_rect, panel_title};
use super::search::SearchState;

const SEARCH_PROMPT: &str = "Search by Title: ";

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const SEARCH_BAR_HEIGHT: u16 = 3;
/// Four reading-list rows plus the border.
const READING_PANEL_HEIGHT: u16 = READING_LIST_PAGE_SIZE as u16 + 2;
const BAND_BAR_HEIGHT: u16 = 1;
/// Typeahead rows shown under the search bar.
const MAX_SUGGESTIONS: usize = 8;

/// Runtime options the UI needs from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub slicing: PageSlicing,
    pub asset_base: Option<Url>,
}

/// Which panel arrow keys and add/remove act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Catalog,
    ReadingList,
}

/// Fine-grained modes layered over the browser.
enum Mode {
    Normal,
    Searching(SearchState),
    Details(BookRecord),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    load: FetchState<ViewController>,
    fetch: Option<CatalogFetch>,
    config: AppConfig,
    focus: Focus,
    catalog_selected: usize,
    reading_selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Start in the loading state while `fetch` runs.
    pub fn new(fetch: CatalogFetch, config: AppConfig) -> Self {
        Self::with_state(FetchState::Pending, Some(fetch), config)
    }

    /// Start with an already loaded catalog.
    pub fn with_catalog(books: Vec<BookRecord>, config: AppConfig) -> Self {
        let controller = ViewController::new(books, config.slicing);
        Self::with_state(FetchState::Ready(controller), None, config)
    }

    fn with_state(
        load: FetchState<ViewController>,
        fetch: Option<CatalogFetch>,
        config: AppConfig,
    ) -> Self {
        Self {
            load,
            fetch,
            config,
            focus: Focus::Catalog,
            catalog_selected: 0,
            reading_selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Move from pending to ready/failed once the background fetch reports.
    pub fn poll_fetch(&mut self) {
        if !self.load.is_pending() {
            return;
        }
        let Some(fetch) = self.fetch.as_mut() else {
            return;
        };
        let Some(result) = fetch.poll() else {
            return;
        };
        self.fetch = None;
        self.load = match result {
            Ok(books) => FetchState::Ready(ViewController::new(books, self.config.slicing)),
            Err(err) => FetchState::Failed(err.to_string()),
        };
    }

    pub fn controller(&self) -> Option<&ViewController> {
        match &self.load {
            FetchState::Ready(controller) => Some(controller),
            _ => None,
        }
    }

    fn controller_mut(&mut self) -> Option<&mut ViewController> {
        match &mut self.load {
            FetchState::Ready(controller) => Some(controller),
            _ => None,
        }
    }

    /// Dispatch a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.controller().is_none() {
            return Ok(matches!(code, KeyCode::Char('q') | KeyCode::Esc));
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::Details(book) => self.handle_details(code, book),
        };

        self.apply_scroll_request();
        self.ensure_in_bounds();
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Catalog => Focus::ReadingList,
                    Focus::ReadingList => Focus::Catalog,
                };
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('[') => self.change_page(-1),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char(']') => self.change_page(1),
            KeyCode::Char(digit @ '1'..='5') => {
                let index = digit as usize - '1' as usize;
                self.select_band(LevelBand::ALL[index]);
            }
            KeyCode::Char('l') => {
                let band = self.controller().map(|c| c.filter().next()).unwrap_or_default();
                self.select_band(band);
            }
            KeyCode::Char('L') => {
                let band = self
                    .controller()
                    .map(|c| c.filter().previous())
                    .unwrap_or_default();
                self.select_band(band);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                let term = self
                    .controller()
                    .map(|c| c.search_term().to_string())
                    .unwrap_or_default();
                self.clear_status();
                return Mode::Searching(SearchState::new(&term));
            }
            KeyCode::Char('c') => {
                if let Some(controller) = self.controller_mut() {
                    controller.set_search_term("");
                }
                self.catalog_selected = 0;
                self.set_status("Search cleared.", StatusKind::Info);
            }
            KeyCode::Char('+') | KeyCode::Char('a') => match self.selected_book() {
                Some(book) => self.add_book(&book),
                None => self.set_status("No book selected to add.", StatusKind::Error),
            },
            KeyCode::Char('-') | KeyCode::Char('r') => match self.selected_book() {
                Some(book) => self.remove_book(&book),
                None => self.set_status("No book selected to remove.", StatusKind::Error),
            },
            KeyCode::Enter => match self.selected_book() {
                Some(book) => {
                    self.clear_status();
                    return Mode::Details(book);
                }
                None => self.set_status("No book selected.", StatusKind::Error),
            },
            KeyCode::Char('o') | KeyCode::Char('O') => match self.selected_book() {
                Some(book) => self.open_cover(&book),
                None => self.set_status("No book selected.", StatusKind::Error),
            },
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        let Some(controller) = self.controller_mut() else {
            return Mode::Normal;
        };

        let changed = match code {
            KeyCode::Esc => {
                controller.set_search_term("");
                self.catalog_selected = 0;
                return Mode::Normal;
            }
            KeyCode::Enter => {
                let picked = state
                    .picked(&controller.suggestions(&state.query))
                    .cloned();
                if let Some(book) = picked {
                    let notice = controller.add_to_reading_list(&book);
                    controller.set_search_term("");
                    state.clear();
                    self.catalog_selected = 0;
                    self.show_notice(&notice);
                    return Mode::Searching(state);
                }
                return Mode::Normal;
            }
            KeyCode::Up => {
                let available = controller.suggestions(&state.query).len().min(MAX_SUGGESTIONS);
                state.move_pick(-1, available);
                false
            }
            KeyCode::Down => {
                let available = controller.suggestions(&state.query).len().min(MAX_SUGGESTIONS);
                state.move_pick(1, available);
                false
            }
            KeyCode::Backspace => state.backspace(),
            KeyCode::Char(ch) => state.push_char(ch),
            _ => false,
        };

        if changed {
            controller.set_search_term(state.query.clone());
            self.catalog_selected = 0;
        }
        Mode::Searching(state)
    }

    fn handle_details(&mut self, code: KeyCode, book: BookRecord) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Mode::Normal,
            KeyCode::Enter
            | KeyCode::Char('+')
            | KeyCode::Char('-')
            | KeyCode::Char('a')
            | KeyCode::Char('r') => {
                let listed = self
                    .controller()
                    .is_some_and(|c| c.in_reading_list(&book.title));
                if listed {
                    self.remove_book(&book);
                } else {
                    self.add_book(&book);
                }
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_cover(&book),
            _ => {}
        }
        Mode::Details(book)
    }

    fn add_book(&mut self, book: &BookRecord) {
        if let Some(notice) = self
            .controller_mut()
            .map(|controller| controller.add_to_reading_list(book))
        {
            self.show_notice(&notice);
        }
    }

    fn remove_book(&mut self, book: &BookRecord) {
        let notice = self
            .controller_mut()
            .and_then(|controller| controller.remove_from_reading_list(&book.title));
        match notice {
            Some(notice) => self.show_notice(&notice),
            None => self.set_status(
                format!("\"{}\" is not on your reading list.", book.title),
                StatusKind::Error,
            ),
        }
    }

    fn open_cover(&mut self, book: &BookRecord) {
        match book.cover_location(self.config.asset_base.as_ref()) {
            None => self.set_status("This book does not have a cover image.", StatusKind::Error),
            Some(location) => match open_link(&location) {
                Ok(()) => {
                    debug!(%location, "opened cover");
                    self.set_status(
                        format!("Opened cover for {}.", book.display_title()),
                        StatusKind::Info,
                    );
                }
                Err(err) => {
                    self.set_status(format!("Failed to open cover: {err}"), StatusKind::Error)
                }
            },
        }
    }

    fn select_band(&mut self, band: LevelBand) {
        let searching = match self.controller_mut() {
            Some(controller) => {
                controller.set_filter(band);
                !controller.search_term().is_empty()
            }
            None => return,
        };
        self.catalog_selected = 0;
        if searching {
            self.set_status(
                format!("Showing {band}. Clear the search to apply it."),
                StatusKind::Info,
            );
        } else {
            self.set_status(format!("Showing {band}."), StatusKind::Info);
        }
    }

    fn change_page(&mut self, delta: isize) {
        let focus = self.focus;
        let Some(controller) = self.controller_mut() else {
            return;
        };
        let (page, total) = match focus {
            Focus::Catalog => {
                let view = controller.visible_catalog_page();
                (view.page, view.total_pages)
            }
            Focus::ReadingList => {
                let view = controller.visible_reading_list_page();
                (view.page, view.total_pages)
            }
        };
        let target = page as isize + delta;
        if target < 1 || target > total as isize {
            return;
        }
        match focus {
            Focus::Catalog => controller.set_page(target as usize),
            Focus::ReadingList => {
                controller.set_reading_list_page(target as usize);
                self.reading_selected = 0;
            }
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let selected = match self.focus {
            Focus::Catalog => &mut self.catalog_selected,
            Focus::ReadingList => &mut self.reading_selected,
        };
        let next = (*selected as isize + offset).clamp(0, len as isize - 1);
        *selected = next as usize;
    }

    fn focused_len(&self) -> usize {
        let Some(controller) = self.controller() else {
            return 0;
        };
        match self.focus {
            Focus::Catalog => controller.visible_catalog_page().books.len(),
            Focus::ReadingList => controller.visible_reading_list_page().books.len(),
        }
    }

    fn selected_book(&self) -> Option<BookRecord> {
        let controller = self.controller()?;
        match self.focus {
            Focus::Catalog => controller
                .visible_catalog_page()
                .books
                .get(self.catalog_selected)
                .map(|book| (*book).clone()),
            Focus::ReadingList => controller
                .visible_reading_list_page()
                .books
                .get(self.reading_selected)
                .cloned(),
        }
    }

    /// Translate the controller's scroll request into panel state: a new
    /// catalog page starts at the top, a fresh reading-list entry is paged
    /// into view and highlighted.
    fn apply_scroll_request(&mut self) {
        let Some(controller) = self.controller_mut() else {
            return;
        };
        match controller.take_scroll_request() {
            Some(ScrollTarget::Catalog) => self.catalog_selected = 0,
            Some(ScrollTarget::ReadingList) => {
                let len = controller.reading_list().len();
                let last_page = controller.reading_list().total_pages().max(1);
                controller.set_reading_list_page(last_page);
                self.reading_selected = len.saturating_sub(1) % READING_LIST_PAGE_SIZE;
            }
            None => {}
        }
    }

    fn ensure_in_bounds(&mut self) {
        let Some(controller) = self.controller() else {
            return;
        };
        let catalog_len = controller.visible_catalog_page().books.len();
        let reading_len = controller.visible_reading_list_page().books.len();
        self.catalog_selected = self.catalog_selected.min(catalog_len.saturating_sub(1));
        self.reading_selected = self.reading_selected.min(reading_len.saturating_sub(1));
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.set_status(notice.to_string(), StatusKind::Info);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.load {
            FetchState::Pending => self.draw_loading(frame, content_area),
            FetchState::Failed(message) => self.draw_fetch_error(frame, content_area, message),
            FetchState::Ready(controller) => self.draw_browser(frame, content_area, controller),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Some(controller) = self.controller() {
            match &self.mode {
                Mode::Searching(state) => self.draw_search_popup(frame, content_area, controller, state),
                Mode::Details(book) => self.draw_details(frame, area, controller, book),
                Mode::Normal => {}
            }
        }
    }

    fn draw_loading(&self, frame: &mut Frame, area: Rect) {
        let message = Paragraph::new("Loading catalog...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(message, centered_rect(60, 20, area));
    }

    fn draw_fetch_error(&self, frame: &mut Frame, area: Rect, message: &str) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("Error loading books: {message}"),
            Style::default().fg(Color::Red),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered_rect(80, 30, area));
    }

    fn draw_browser(&self, frame: &mut Frame, area: Rect, controller: &ViewController) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_BAR_HEIGHT),
                Constraint::Length(READING_PANEL_HEIGHT),
                Constraint::Length(BAND_BAR_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_search_line(frame, chunks[0], controller);
        self.draw_reading_list(frame, chunks[1], controller);
        frame.render_widget(Paragraph::new(band_bar_line(controller.filter())), chunks[2]);
        self.draw_catalog(frame, chunks[3], controller);
    }

    fn draw_search_line(&self, frame: &mut Frame, area: Rect, controller: &ViewController) {
        let block = Block::default().borders(Borders::ALL).title("Book Catalog");
        let line = if controller.search_term().is_empty() {
            Line::from(Span::styled(
                "Press f to search by title",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::raw("Search by Title: "),
                Span::styled(
                    controller.search_term().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_reading_list(&self, frame: &mut Frame, area: Rect, controller: &ViewController) {
        let view = controller.visible_reading_list_page();
        let name = format!("Reading List ({})", controller.reading_list().len());
        let block = self.panel_block(
            panel_title(&name, view.page, view.total_pages),
            self.focus == Focus::ReadingList,
        );

        if view.books.is_empty() {
            let message = Paragraph::new(view.empty_message()).block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = view
            .books
            .iter()
            .map(|book| ListItem::new(book_line(book, false)))
            .collect();
        self.render_list(frame, area, items, block, Focus::ReadingList, self.reading_selected);
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect, controller: &ViewController) {
        let view = controller.visible_catalog_page();
        let block = self.panel_block(
            panel_title("All Books", view.page, view.total_pages),
            self.focus == Focus::Catalog,
        );

        if view.books.is_empty() {
            let message = Paragraph::new(view.empty_message()).block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = view
            .books
            .iter()
            .map(|book| ListItem::new(book_line(book, controller.in_reading_list(&book.title))))
            .collect();
        self.render_list(frame, area, items, block, Focus::Catalog, self.catalog_selected);
    }

    fn panel_block(&self, title: String, focused: bool) -> Block<'static> {
        let block = Block::default().borders(Borders::ALL).title(title);
        if focused {
            block.border_style(Style::default().fg(Color::Yellow))
        } else {
            block
        }
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        items: Vec<ListItem<'static>>,
        block: Block<'static>,
        panel: Focus,
        selected: usize,
    ) {
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        if self.focus == panel {
            list_state.select(Some(selected));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_popup(
        &self,
        frame: &mut Frame,
        area: Rect,
        controller: &ViewController,
        state: &SearchState,
    ) {
        let height = SEARCH_BAR_HEIGHT.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("{SEARCH_PROMPT}{}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        frame.set_cursor_position((search_cursor_x(inner, &state.query), inner.y));

        let suggestions = controller.suggestions(&state.query);
        if suggestions.is_empty() {
            return;
        }
        let shown = suggestions.len().min(MAX_SUGGESTIONS);
        let below = area.height.saturating_sub(height);
        let list_area = Rect {
            x: area.x + 2,
            y: area.y + height,
            width: area.width.saturating_sub(4),
            height: (shown as u16 + 2).min(below),
        };
        if list_area.height == 0 {
            return;
        }
        frame.render_widget(Clear, list_area);

        let items: Vec<ListItem> = suggestions
            .iter()
            .take(shown)
            .map(|book| ListItem::new(book_line(book, controller.in_reading_list(&book.title))))
            .collect();
        let title = if suggestions.len() > shown {
            format!("Suggestions ({} of {})", shown, suggestions.len())
        } else {
            "Suggestions".to_string()
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default();
        list_state.select(state.picked);
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    fn draw_details(
        &self,
        frame: &mut Frame,
        area: Rect,
        controller: &ViewController,
        book: &BookRecord,
    ) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book Details").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let cover = match book.cover_location(self.config.asset_base.as_ref()) {
            Some(location) => format!("Cover: {location}"),
            None => "No cover image.".to_string(),
        };
        let (action, action_style) = if controller.in_reading_list(&book.title) {
            ("Remove from Reading List", Style::default().fg(Color::Red))
        } else {
            ("Add to Reading List", Style::default().fg(Color::Green))
        };

        let lines = vec![
            Line::from(Span::styled(
                book.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {} ", book.level_label()),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            )),
            Line::from(""),
            Line::from(format!("By: {}", book.author)),
            Line::from(Span::styled(cover, Style::default().fg(Color::Cyan))),
            Line::from(""),
            Line::from(vec![
                Span::styled("[Enter] ", Style::default().fg(Color::Cyan)),
                Span::styled(action, action_style),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.load, &self.mode) {
            (FetchState::Pending, _) | (FetchState::Failed(_), _) => Line::from(vec![
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (_, Mode::Searching(_)) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Suggestions   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Add Suggestion / Done   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear Search"),
            ]),
            (_, Mode::Details(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Add/Remove   "),
                Span::styled("[o]", key_style),
                Span::raw(" Open Cover   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]),
            _ => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Page   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Panel   "),
                Span::styled("[f]", key_style),
                Span::raw(" Search   "),
                Span::styled("[1-5/l]", key_style),
                Span::raw(" Level   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[o]", key_style),
                Span::raw(" Cover   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }
}

/// Column just past the typed query, kept inside the search box.
fn search_cursor_x(inner: Rect, query: &str) -> u16 {
    let typed = SEARCH_PROMPT.chars().count() + query.chars().count();
    let typed = u16::try_from(typed).unwrap_or(u16::MAX);
    inner.x.saturating_add(typed).min(inner.right())
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn catalog(count: usize) -> Vec<BookRecord> {
        (0..count)
            .map(|i| {
                let level = if i % 2 == 0 { "B" } else { "E" };
                BookRecord::new(format!("Book {i:02}"), "Author", level)
            })
            .collect()
    }

    fn app(count: usize) -> App {
        App::with_catalog(catalog(count), AppConfig::default())
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn status(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    #[test]
    fn quit_keys_exit() {
        let mut app = app(3);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn add_selected_book_and_ignore_duplicate() {
        let mut app = app(3);
        press(&mut app, &[KeyCode::Down, KeyCode::Char('+')]);
        let controller = app.controller().unwrap();
        assert!(controller.in_reading_list("Book 01"));
        assert_eq!(status(&app), "Added \"Book 01\" to your reading list.");

        press(&mut app, &[KeyCode::Char('+')]);
        assert_eq!(app.controller().unwrap().reading_list().len(), 1);
        assert_eq!(status(&app), "\"Book 01\" is already on your reading list.");
    }

    #[test]
    fn remove_from_reading_list_panel() {
        let mut app = app(3);
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Tab, KeyCode::Char('-')]);
        assert!(app.controller().unwrap().reading_list().is_empty());
        assert_eq!(status(&app), "Removed \"Book 00\" from your reading list.");

        press(&mut app, &[KeyCode::Char('-')]);
        assert_eq!(status(&app), "No book selected to remove.");
    }

    #[test]
    fn paging_moves_through_catalog() {
        let mut app = app(20);
        press(&mut app, &[KeyCode::Right]);
        assert_eq!(app.controller().unwrap().page(), 2);
        press(&mut app, &[KeyCode::Right]);
        assert_eq!(app.controller().unwrap().page(), 2);
        press(&mut app, &[KeyCode::Left, KeyCode::Left]);
        assert_eq!(app.controller().unwrap().page(), 1);
    }

    #[test]
    fn digits_select_bands() {
        let mut app = app(6);
        press(&mut app, &[KeyCode::Char('3')]);
        let controller = app.controller().unwrap();
        assert_eq!(controller.filter(), LevelBand::DToF);
        assert_eq!(controller.visible_catalog_page().matched, 3);

        press(&mut app, &[KeyCode::Char('l')]);
        assert_eq!(app.controller().unwrap().filter(), LevelBand::GToI);
        assert_eq!(status(&app), "Showing G-I.");
    }

    #[test]
    fn search_updates_catalog_live_and_enter_keeps_term() {
        let mut app = app(20);
        press(&mut app, &[KeyCode::Char('f')]);
        type_text(&mut app, "book 1");
        assert_eq!(app.controller().unwrap().search_term(), "book 1");
        assert_eq!(app.controller().unwrap().visible_catalog_page().matched, 10);

        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.controller().unwrap().search_term(), "book 1");

        press(&mut app, &[KeyCode::Char('c')]);
        assert_eq!(app.controller().unwrap().search_term(), "");
    }

    #[test]
    fn picking_a_suggestion_adds_it() {
        let mut app = app(20);
        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "Book 07");
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);

        let controller = app.controller().unwrap();
        assert!(controller.in_reading_list("Book 07"));
        assert_eq!(controller.search_term(), "");
        assert!(matches!(app.mode, Mode::Searching(ref state) if state.query.is_empty()));
    }

    #[test]
    fn escape_clears_search() {
        let mut app = app(5);
        press(&mut app, &[KeyCode::Char('f')]);
        type_text(&mut app, "zzz");
        assert_eq!(app.controller().unwrap().visible_catalog_page().matched, 0);
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.controller().unwrap().search_term(), "");
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn details_popup_toggles_membership() {
        let mut app = app(3);
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::Details(ref book) if book.title == "Book 00"));

        press(&mut app, &[KeyCode::Enter]);
        assert!(app.controller().unwrap().in_reading_list("Book 00"));
        press(&mut app, &[KeyCode::Enter]);
        assert!(!app.controller().unwrap().in_reading_list("Book 00"));

        press(&mut app, &[KeyCode::Char('o')]);
        assert_eq!(status(&app), "This book does not have a cover image.");
        press(&mut app, &[KeyCode::Esc]);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn adding_pages_reading_list_to_new_entry() {
        let mut app = app(10);
        for _ in 0..5 {
            press(&mut app, &[KeyCode::Char('+'), KeyCode::Down]);
        }
        let controller = app.controller().unwrap();
        assert_eq!(controller.reading_list().len(), 5);
        assert_eq!(controller.reading_list_page(), 2);
        assert_eq!(app.reading_selected, 0);
    }

    #[test]
    fn browser_screen_shows_panels_and_pager() {
        let app = app(20);
        let text = screen(&app);
        assert!(text.contains("All Books · Page 1 of 2"));
        assert!(text.contains("Reading List (0)"));
        assert!(text.contains("No books in reading list."));
        assert!(text.contains("All Levels"));
        assert!(text.contains("Book 14"));
        assert!(!text.contains("Book 15"));
    }

    #[test]
    fn empty_search_shows_message() {
        let mut app = app(3);
        press(&mut app, &[KeyCode::Char('f')]);
        type_text(&mut app, "missing");
        press(&mut app, &[KeyCode::Enter]);
        let text = screen(&app);
        assert!(text.contains("No books found."));
        assert!(!text.contains("Page 1 of"));
    }

    #[test]
    fn failed_fetch_shows_error_and_only_quits() {
        let mut app = App::with_state(
            FetchState::Failed("connection refused".to_string()),
            None,
            AppConfig::default(),
        );
        assert!(screen(&app).contains("Error loading books: connection refused"));
        assert!(!app.handle_key(KeyCode::Char('+')).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn search_cursor_stays_inside_box() {
        let inner = Rect::new(10, 5, 40, 1);
        assert_eq!(search_cursor_x(inner, "owl"), 10 + 17 + 3);
        assert_eq!(search_cursor_x(inner, &"w".repeat(100)), inner.right());
        assert_eq!(search_cursor_x(inner, &"w".repeat(70_000)), inner.right());

        let mut app = app(3);
        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, &"o".repeat(70_000));
        assert!(screen(&app).contains("Search"));
    }

    #[test]
    fn pending_fetch_shows_loading() {
        let mut app = App::with_state(FetchState::Pending, None, AppConfig::default());
        assert!(screen(&app).contains("Loading catalog..."));
        app.poll_fetch();
        assert!(app.load.is_pending());
        assert!(!self::app(3).load.is_pending());
    }
}
