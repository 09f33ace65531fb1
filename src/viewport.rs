//! Line index and viewport mapping
//!
//! The host restyles only what is on screen. `LineIndex` maps line numbers
//! to byte offsets so a viewport given in lines can be turned into the
//! `[start, end)` byte range passed to `restyle_range`.

use std::ops::Range;

/// Byte offsets of line starts in a buffer snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of each line start; always contains 0
    starts: Vec<usize>,
    /// Total buffer length in bytes
    len: usize,
}

impl LineIndex {
    /// Index the lines of `text`
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1).filter(|&i| i < text.len()));
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Number of lines (an empty buffer has one)
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset where `line` starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Byte range of `line`, including its newline
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = self.line_start(line)?;
        let end = self.line_start(line + 1).unwrap_or(self.len);
        Some(start..end)
    }

    /// Line containing byte `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset).saturating_sub(1)
    }

    /// Byte range covering `line_count` lines from `first_line`
    ///
    /// Clamped to the buffer; a viewport past the end is empty.
    pub fn viewport_range(&self, first_line: usize, line_count: usize) -> Range<usize> {
        let Some(start) = self.line_start(first_line) else {
            return self.len..self.len;
        };
        let end = first_line
            .checked_add(line_count)
            .and_then(|last| self.line_start(last))
            .unwrap_or(self.len);
        start..end
    }
}

/// The visible window over a buffer, in lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible line
    pub first_line: usize,
    /// Number of visible lines
    pub visible_lines: usize,
}

impl Viewport {
    pub fn new(first_line: usize, visible_lines: usize) -> Self {
        Self {
            first_line,
            visible_lines,
        }
    }

    /// Scroll by `delta` lines, keeping at least one line of `index` visible
    pub fn scroll_by(&mut self, delta: isize, index: &LineIndex) {
        let max_first = index.line_count().saturating_sub(1);
        let first = self.first_line.saturating_add_signed(delta);
        self.first_line = first.min(max_first);
    }

    /// Scroll the minimum amount so `line` is visible
    pub fn ensure_visible(&mut self, line: usize) {
        if line < self.first_line {
            self.first_line = line;
        } else if self.visible_lines > 0 && line >= self.first_line + self.visible_lines {
            self.first_line = line + 1 - self.visible_lines;
        }
    }

    /// Byte range of the visible lines
    pub fn byte_range(&self, index: &LineIndex) -> Range<usize> {
        index.viewport_range(self.first_line, self.visible_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_start(1), Some(3));
        assert_eq!(index.line_range(2), Some(6..7));
        assert_eq!(index.line_range(3), Some(7..9));
        assert_eq!(index.line_range(4), None);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(2), 0);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(8), 3);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let index = LineIndex::new("a\nb\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(LineIndex::new("").line_count(), 1);
    }

    #[test]
    fn test_viewport_range() {
        let index = LineIndex::new("l0\nl1\nl2\nl3\n");
        assert_eq!(index.viewport_range(1, 2), 3..9);
        assert_eq!(index.viewport_range(2, 10), 6..12);
        assert_eq!(index.viewport_range(9, 3), 12..12);
        assert_eq!(index.viewport_range(0, usize::MAX), 0..12);
    }

    #[test]
    fn test_scroll_and_ensure_visible() {
        let index = LineIndex::new("a\nb\nc\nd\ne\n");
        let mut view = Viewport::new(0, 2);
        view.scroll_by(10, &index);
        assert_eq!(view.first_line, 4);
        view.scroll_by(-3, &index);
        assert_eq!(view.first_line, 1);
        view.ensure_visible(0);
        assert_eq!(view.first_line, 0);
        view.ensure_visible(3);
        assert_eq!(view.first_line, 2);
        assert_eq!(view.byte_range(&index), 4..8);
    }
}
