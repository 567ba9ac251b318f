//! Source spans and offset-to-position mapping

/// Byte range in the source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// 1-based line/column pair attached to AST nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line: {}, position: {}", self.row, self.col)
    }
}

/// Precomputed position of every byte offset of one source text.
///
/// Columns count characters and restart after `\n`; `\r` does not advance
/// the column. Continuation bytes of a multi-byte character share the
/// position of its first byte.
#[derive(Debug, Clone)]
pub struct LineMap {
    positions: Vec<Position>,
    eof: Position,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut positions = Vec::with_capacity(source.len());
        let (mut row, mut col) = (1, 1);

        for ch in source.chars() {
            let here = Position::new(row, col);
            positions.extend(std::iter::repeat_n(here, ch.len_utf8()));
            match ch {
                '\n' => {
                    row += 1;
                    col = 1;
                }
                '\r' => {}
                _ => col += 1,
            }
        }

        Self {
            positions,
            eof: Position::new(row, col),
        }
    }

    /// Position of the character at `offset`; offsets past the end map to
    /// the end-of-input position
    pub fn position(&self, offset: usize) -> Position {
        self.positions.get(offset).copied().unwrap_or(self.eof)
    }
}
