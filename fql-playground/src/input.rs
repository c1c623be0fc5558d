//! The single-line input control
//!
//! Positions are character offsets. The selection is kept the way text
//! fields keep it: an anchor where it started and a focus (the cursor) where
//! it ends, so its direction is known.

use tracing::debug;

use crate::parse::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    Forward,
    Backward,
    None,
}

/// A one-off instruction to select a range in the input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRequest {
    pub start: usize,
    pub end: usize,
    pub direction: SelectionDirection,
}

impl SelectionRequest {
    pub fn forward(range: TextRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
            direction: SelectionDirection::Forward,
        }
    }

    /// Select the requested range in `input`.
    ///
    /// Offsets past the end of the current text are clamped to it. If that
    /// leaves nothing to select the request is dropped and `false` returned.
    pub fn apply(self, input: &mut InputControl) -> bool {
        let len = input.char_len();
        let range = TextRange::new(self.start, self.end).clamp_to(len);
        if range.is_empty() {
            debug!(
                requested = %TextRange::new(self.start, self.end),
                chars = len,
                "selection request dropped"
            );
            return false;
        }

        input.set_selection_range(range.start, range.end, self.direction);
        debug!(selected = %range, "selection request applied");
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputControl {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
    placeholder: Option<String>,
}

impl InputControl {
    pub fn new(placeholder: Option<String>) -> Self {
        Self {
            placeholder,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The selected range, `None` when nothing is selected
    pub fn selection(&self) -> Option<TextRange> {
        let anchor = self.anchor?;
        (anchor != self.cursor)
            .then(|| TextRange::new(anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn selection_direction(&self) -> SelectionDirection {
        match self.anchor {
            Some(anchor) if anchor < self.cursor => SelectionDirection::Forward,
            Some(anchor) if anchor > self.cursor => SelectionDirection::Backward,
            _ => SelectionDirection::None,
        }
    }

    /// Replace the whole value; the cursor goes to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_len();
        self.anchor = None;
    }

    /// Select `start..end`. Callers pass offsets within the text.
    pub fn set_selection_range(&mut self, start: usize, end: usize, direction: SelectionDirection) {
        let len = self.char_len();
        let (start, end) = (start.min(len), end.min(len));
        match direction {
            SelectionDirection::Backward => {
                self.anchor = Some(end);
                self.cursor = start;
            }
            SelectionDirection::Forward | SelectionDirection::None => {
                self.anchor = Some(start);
                self.cursor = end;
            }
        }
    }

    pub fn select_all(&mut self) {
        self.set_selection_range(0, self.char_len(), SelectionDirection::Forward);
    }

    /// Returns whether the text changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        self.delete_selection();
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend {
            if let Some(selection) = self.selection() {
                self.collapse_to(selection.start);
                return;
            }
        }
        let target = self.cursor.saturating_sub(1);
        self.move_to(target, extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend {
            if let Some(selection) = self.selection() {
                self.collapse_to(selection.end);
                return;
            }
        }
        let target = (self.cursor + 1).min(self.char_len());
        self.move_to(target, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.move_to(self.char_len(), extend);
    }

    fn move_to(&mut self, target: usize, extend: bool) {
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = target;
    }

    fn collapse_to(&mut self, position: usize) {
        self.anchor = None;
        self.cursor = position;
    }

    fn delete_selection(&mut self) -> bool {
        let Some(selection) = self.selection() else {
            self.anchor = None;
            return false;
        };
        let (start, end) = (self.byte_index(selection.start), self.byte_index(selection.end));
        self.text.replace_range(start..end, "");
        self.collapse_to(selection.start);
        true
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(index, _)| index)
    }
}
