use crate::models::BookRecord;

/// State for the inline search bar: the typed text plus the highlighted
/// typeahead suggestion, if any.
#[derive(Debug, Default, Clone)]
pub(crate) struct SearchState {
    pub(crate) query: String,
    pub(crate) picked: Option<usize>,
}

impl SearchState {
    /// Start editing from the term already applied to the catalog.
    pub(crate) fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            picked: None,
        }
    }

    /// Append a printable character. Returns whether the query changed.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.query.push(ch);
        self.picked = None;
        true
    }

    pub(crate) fn backspace(&mut self) -> bool {
        let changed = self.query.pop().is_some();
        if changed {
            self.picked = None;
        }
        changed
    }

    pub(crate) fn clear(&mut self) {
        self.query.clear();
        self.picked = None;
    }

    /// Move the highlight through `available` suggestions. Moving up from
    /// the first suggestion returns focus to the text input.
    pub(crate) fn move_pick(&mut self, delta: isize, available: usize) {
        if available == 0 {
            self.picked = None;
            return;
        }
        let current = self.picked.map_or(-1, |index| index as isize);
        let next = (current + delta).min(available as isize - 1);
        self.picked = if next < 0 { None } else { Some(next as usize) };
    }

    pub(crate) fn picked<'a>(&self, suggestions: &[&'a BookRecord]) -> Option<&'a BookRecord> {
        self.picked
            .and_then(|index| suggestions.get(index))
            .copied()
    }
}
