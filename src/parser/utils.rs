use std::fmt;

/// A line and column in the query source
///
/// Both are counted from zero, in characters. They're turned into one-based
/// numbers when an error is serialized.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SourcePosition {
    line: usize,
    col: usize,
}

impl SourcePosition {
    #[doc(hidden)]
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    #[doc(hidden)]
    pub fn new_origin() -> Self {
        Self::new(0, 0)
    }

    /// Zero-based line of the position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Zero-based column of the position.
    pub fn column(&self) -> usize {
        self.col
    }
}

impl From<graphql_parser::Pos> for SourcePosition {
    fn from(pos: graphql_parser::Pos) -> Self {
        // `graphql-parser` counts lines and columns from one.
        Self::new(pos.line.saturating_sub(1), pos.column.saturating_sub(1))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// An AST node or error along with the position it starts at
///
/// `graphql-parser` only reports where nodes start, so that's all that is
/// kept.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Spanning<T> {
    /// The wrapped item.
    pub item: T,

    position: SourcePosition,
}

impl<T> Spanning<T> {
    #[doc(hidden)]
    pub fn at(position: SourcePosition, item: T) -> Self {
        Self { item, position }
    }

    /// Wraps an item that doesn't come from any source, placing it at the
    /// origin.
    pub fn unlocated(item: T) -> Self {
        Self::at(SourcePosition::new_origin(), item)
    }

    /// Position the item starts at.
    #[inline]
    pub fn start(&self) -> SourcePosition {
        self.position
    }

    /// Converts the item, keeping its position.
    pub fn map<O>(self, f: impl FnOnce(T) -> O) -> Spanning<O> {
        Spanning::at(self.position, f(self.item))
    }
}

impl<T: fmt::Display> fmt::Display for Spanning<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. At {}", self.item, self.position)
    }
}

impl<T: std::error::Error> std::error::Error for Spanning<T> {}

/// Maps character positions of a source back and forth to byte offsets.
pub(super) struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub(super) fn source(&self) -> &'a str {
        self.source
    }

    pub(super) fn offset_of(&self, pos: SourcePosition) -> Option<usize> {
        let line_start = *self.line_starts.get(pos.line())?;
        let line = &self.source[line_start..];
        line.char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .nth(pos.column())
            .map(|i| line_start + i)
    }

    pub(super) fn position_of(&self, offset: usize) -> SourcePosition {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or_default();
        let col = self
            .source
            .get(line_start..offset)
            .map_or(0, |s| s.chars().count());
        SourcePosition::new(line, col)
    }
}
