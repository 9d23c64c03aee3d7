//! Editable text of a numeric field.
//!
//! A [`DraftBuffer`] holds what the user is typing, separate from whatever
//! value the text will eventually commit to. Only text that is, or could
//! become, a plain decimal number is accepted.

/// Whether `text` is an acceptable, possibly partial, number: an optional
/// sign, digits, and at most one decimal point.
pub fn is_partial_number(text: &str) -> bool {
    let body = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let mut seen_point = false;
    body.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_point => {
            seen_point = true;
            true
        }
        _ => false,
    })
}

/// Draft text with edit tracking and a select-all flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftBuffer {
    text: String,
    /// The text holds edits not yet taken.
    dirty: bool,
    /// All text is selected; the next character replaces it.
    select_all: bool,
}

impl DraftBuffer {
    pub fn new(text: String) -> Self {
        Self {
            text,
            dirty: false,
            select_all: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_all_selected(&self) -> bool {
        self.select_all
    }

    pub fn select_all(&mut self) {
        self.select_all = true;
    }

    pub fn clear_selection(&mut self) {
        self.select_all = false;
    }

    /// Types one character, replacing the text if all of it is selected.
    /// Returns `false`, leaving the text unchanged, if the result would not
    /// be a partial number.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut candidate = if self.select_all {
            String::new()
        } else {
            self.text.clone()
        };
        candidate.push(ch);
        self.accept(candidate)
    }

    /// Replaces the whole text, subject to the same filter as typing.
    pub fn replace(&mut self, text: &str) -> bool {
        self.accept(text.to_string())
    }

    pub fn backspace(&mut self) {
        if self.select_all {
            self.text.clear();
        } else {
            self.text.pop();
        }
        self.select_all = false;
        self.dirty = true;
    }

    /// Shows `text` unless edits are pending.
    pub fn sync(&mut self, text: String) {
        if !self.dirty {
            self.text = text;
        }
    }

    /// Drops pending edits and shows `text`.
    pub fn reset(&mut self, text: String) {
        self.text = text;
        self.dirty = false;
    }

    /// Hands out the edited text for committing. `None` if nothing was edited.
    pub fn take_edit(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.text.clone())
    }

    fn accept(&mut self, candidate: String) -> bool {
        if !is_partial_number(&candidate) {
            return false;
        }
        self.text = candidate;
        self.dirty = true;
        self.select_all = false;
        true
    }
}
