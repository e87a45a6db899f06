use super::TokenType;
use crate::separators::{SeparatorKind, escape_cell};
use serde::Serialize;

/// Where a token or separator started in the source.
///
/// Lines are 1-based; `column` and `offset` are byte indexes into the line
/// and the file respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FilePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl FilePosition {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    #[must_use]
    pub fn advanced_by(self, bytes: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + bytes,
            offset: self.offset + bytes,
        }
    }
}

/// Index of a token in its file's token arena. Stable for the lifetime of the
/// file; removing a token from an element never invalidates other ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenId(pub(crate) usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotToken {
    text: String,
    raw_text: String,
    types: Vec<TokenType>,
    position: Option<FilePosition>,
    #[serde(skip)]
    dirty: bool,
}

impl RobotToken {
    /// A token read from source; `raw_text` includes any cell padding.
    pub fn parsed(raw_text: &str, position: FilePosition) -> Self {
        Self {
            text: raw_text.trim().to_string(),
            raw_text: raw_text.to_string(),
            types: vec![TokenType::Unknown],
            position: Some(position),
            dirty: false,
        }
    }

    /// A token created by a model edit; it has no source position.
    pub fn created(text: impl Into<String>, token_type: TokenType) -> Self {
        let text = text.into();
        Self {
            raw_text: text.clone(),
            text,
            types: vec![token_type],
            position: None,
            dirty: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn position(&self) -> Option<FilePosition> {
        self.position
    }

    pub fn types(&self) -> &[TokenType] {
        &self.types
    }

    pub fn primary_type(&self) -> TokenType {
        self.types.first().copied().unwrap_or(TokenType::Unknown)
    }

    pub fn has_type(&self, token_type: TokenType) -> bool {
        self.types.contains(&token_type)
    }

    /// Text changed since the last parse or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
    }

    /// Make `token_type` the primary type, keeping the others as candidates.
    pub fn set_primary_type(&mut self, token_type: TokenType) {
        self.types.retain(|t| *t != token_type && *t != TokenType::Unknown);
        self.types.insert(0, token_type);
    }

    pub fn set_types(&mut self, types: Vec<TokenType>) {
        self.types = if types.is_empty() {
            vec![TokenType::Unknown]
        } else {
            types
        };
    }

    pub fn add_type(&mut self, token_type: TokenType) {
        if !self.types.contains(&token_type) {
            self.types.push(token_type);
        }
    }

    /// Source text to emit between separators of `kind`: the raw text when
    /// unchanged, otherwise the escaped new text wrapped in the original cell
    /// padding.
    pub fn render(&self, kind: SeparatorKind) -> String {
        if !self.dirty {
            return self.raw_text.clone();
        }
        let trimmed_start = self.raw_text.trim_start();
        let leading = &self.raw_text[..self.raw_text.len() - trimmed_start.len()];
        let trailing = &trimmed_start[trimmed_start.trim_end().len()..];
        format!("{leading}{}{trailing}", escape_cell(&self.text, kind))
    }

    /// Byte range `[start, end)` within the line, when parsed.
    pub fn column_span(&self) -> Option<(usize, usize)> {
        self.position
            .map(|p| (p.column, p.column + self.raw_text.len()))
    }

    pub(crate) fn clear_dirty(&mut self, kind: SeparatorKind) {
        if self.dirty {
            self.raw_text = self.render(kind);
            self.dirty = false;
        }
    }
}
