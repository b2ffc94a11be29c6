//! Byte ranges into an export document.

use std::ops::Range;

/// A byte range in the source text of an export document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create the span of the character at a 1-based line and column.
    ///
    /// Positions past the end of a line or of the source are clamped, and the
    /// span always lies on character boundaries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bpmnport_parser::Span;
    /// let source = "{\n  \"a\": ]\n}";
    /// let span = Span::at_line_column(source, 2, 8);
    /// assert_eq!(&source[span.start()..span.end()], "]");
    /// ```
    pub fn at_line_column(source: &str, line: usize, column: usize) -> Self {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();

        let mut start = (line_start + column.saturating_sub(1)).min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }

        let end = source[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());

        Self::new(start..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessors() {
        let span = Span::new(3..8);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::default().is_empty());
    }

    #[test]
    fn test_at_line_column_first_line() {
        let span = Span::at_line_column("abc", 1, 2);
        assert_eq!(span, Span::new(1..2));
    }

    #[test]
    fn test_at_line_column_clamps_to_end() {
        let source = "ab\ncd";
        assert_eq!(Span::at_line_column(source, 9, 9), Span::new(5..5));
    }

    #[test]
    fn test_at_line_column_multibyte() {
        let source = "é]";
        // Column 2 points into the middle of `é`
        let span = Span::at_line_column(source, 1, 2);
        assert_eq!(span, Span::new(0..2));
    }
}
