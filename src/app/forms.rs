//! Text inputs and focus handling shared by every form view

/// A single-line text input with a byte-offset cursor
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
    /// Maximum length in characters
    pub max_len: Option<usize>,
    /// Render as asterisks
    pub masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max(max_len: usize) -> Self {
        TextInput {
            max_len: Some(max_len),
            ..Self::default()
        }
    }

    pub fn masked() -> Self {
        TextInput {
            masked: true,
            ..Self::default()
        }
    }

    /// Replace the contents (truncated to the limit) and move the cursor to the end
    pub fn set(&mut self, value: &str) {
        self.value = match self.max_len {
            Some(max) => value.chars().take(max).collect(),
            None => value.to_string(),
        };
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Text to render
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Cursor column in characters, for terminal placement
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }

    pub fn insert(&mut self, c: char) {
        if let Some(max) = self.max_len {
            if self.value.chars().count() >= max {
                return;
            }
        }
        if self.cursor <= self.value.len() {
            self.value.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev_pos = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev_pos);
            self.cursor = prev_pos;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }
}

/// A view with a list of editable inputs and one focused
pub trait Form {
    fn focus_index(&mut self) -> &mut usize;

    /// Inputs that can currently be edited, in focus order
    fn inputs_mut(&mut self) -> Vec<&mut TextInput>;

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        let focus = *self.focus_index();
        self.inputs_mut().into_iter().nth(focus)
    }

    fn next_field(&mut self) {
        let count = self.inputs_mut().len();
        if count > 0 {
            let focus = self.focus_index();
            *focus = (*focus + 1) % count;
        }
    }

    fn prev_field(&mut self) {
        let count = self.inputs_mut().len();
        if count > 0 {
            let focus = self.focus_index();
            *focus = focus.checked_sub(1).unwrap_or(count - 1).min(count - 1);
        }
    }
}
