//! Multi-line script accumulation.

/// Script text accumulated across `/pyadd` commands.
///
/// `Empty` becomes `Pending` on the first append; every append adds the line
/// followed by a newline. [`ScriptBuffer::take`] and [`ScriptBuffer::reset`]
/// always leave the buffer `Empty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScriptBuffer {
    #[default]
    Empty,
    Pending(String),
}

impl ScriptBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::Empty
    }

    /// Appends a line.
    pub fn append(&mut self, line: &str) {
        match self {
            ScriptBuffer::Empty => *self = ScriptBuffer::Pending(format!("{}\n", line)),
            ScriptBuffer::Pending(text) => {
                text.push_str(line);
                text.push('\n');
            }
        }
    }

    /// Takes the accumulated text, leaving the buffer empty.
    ///
    /// Returns `None` when nothing was accumulated.
    pub fn take(&mut self) -> Option<String> {
        match std::mem::take(self) {
            ScriptBuffer::Empty => None,
            ScriptBuffer::Pending(text) => Some(text),
        }
    }

    /// Discards any accumulated text.
    pub fn reset(&mut self) {
        *self = ScriptBuffer::Empty;
    }

    /// Returns the accumulated text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ScriptBuffer::Empty => None,
            ScriptBuffer::Pending(text) => Some(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScriptBuffer::Empty)
    }

    /// Number of lines accumulated so far.
    pub fn line_count(&self) -> usize {
        self.text().map_or(0, |text| text.lines().count())
    }
}
