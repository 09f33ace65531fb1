//! Minimap sampling
//!
//! Folds a collected style stream into a small grid. Each cell covers a
//! block of buffer lines and display columns and shows the category that
//! covers the most display width in that block, ignoring `Default` runs and
//! whitespace.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::syntax::{StyleCategory, StyleTag};

const CATEGORY_COUNT: usize = StyleCategory::ALL.len();

/// Downsampled view of a styled buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minimap {
    rows: Vec<Vec<Option<StyleCategory>>>,
    lines_per_row: usize,
    columns_per_cell: usize,
}

impl Minimap {
    /// Build a minimap `width` cells wide
    ///
    /// `tags` must be ordered by start offset and non-overlapping, as the
    /// restyle driver emits them.
    pub fn build(text: &str, tags: &[StyleTag], width: usize, lines_per_row: usize) -> Self {
        let width = width.max(1);
        let lines_per_row = lines_per_row.max(1);
        let widest = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
        let columns_per_cell = widest.div_ceil(width).max(1);
        // One row of per-cell weights, folded as soon as its last line is done
        let mut weights = vec![[0usize; CATEGORY_COUNT]; width];
        let mut rows = Vec::new();
        let mut pending_lines = 0;

        let mut next_tag = 0;
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let mut column = 0;
            for (i, ch) in line.char_indices() {
                if ch == '\n' {
                    break;
                }
                let pos = offset + i;
                let w = ch.width().unwrap_or(0);
                while tags.get(next_tag).is_some_and(|t| t.end <= pos) {
                    next_tag += 1;
                }
                if w > 0 && !ch.is_whitespace() {
                    let covering = tags
                        .get(next_tag)
                        .filter(|t| t.start <= pos && t.category != StyleCategory::Default);
                    if let Some(tag) = covering {
                        let cell = (column / columns_per_cell).min(width - 1);
                        weights[cell][tag.category as usize] += w;
                    }
                }
                column += w;
            }
            offset += line.len();

            pending_lines += 1;
            if pending_lines == lines_per_row {
                rows.push(fold_row(&mut weights));
                pending_lines = 0;
            }
        }
        if pending_lines > 0 || rows.is_empty() {
            rows.push(fold_row(&mut weights));
        }

        Self {
            rows,
            lines_per_row,
            columns_per_cell,
        }
    }

    pub fn rows(&self) -> &[Vec<Option<StyleCategory>>] {
        &self.rows
    }

    /// Category shown at `row`, `col`
    pub fn cell(&self, row: usize, col: usize) -> Option<StyleCategory> {
        self.rows.get(row)?.get(col).copied().flatten()
    }

    /// Minimap row showing buffer `line`
    pub fn row_for_line(&self, line: usize) -> usize {
        line / self.lines_per_row
    }

    /// Display columns folded into one cell
    pub fn columns_per_cell(&self) -> usize {
        self.columns_per_cell
    }
}

/// Dominant category per cell; leaves `weights` zeroed for the next row
fn fold_row(weights: &mut [[usize; CATEGORY_COUNT]]) -> Vec<Option<StyleCategory>> {
    let row = weights.iter().map(dominant).collect();
    weights.iter_mut().for_each(|cell| *cell = [0; CATEGORY_COUNT]);
    row
}

fn dominant(weights: &[usize; CATEGORY_COUNT]) -> Option<StyleCategory> {
    let mut best: Option<(StyleCategory, usize)> = None;
    for (category, &weight) in StyleCategory::ALL.iter().zip(weights.iter()) {
        if weight > 0 && best.map_or(true, |(_, w)| weight > w) {
            best = Some((*category, weight));
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_category_per_cell() {
        let text = "aaaa bb\ncc\n";
        let tags = vec![
            StyleTag::new(StyleCategory::Keyword, 0, 4),
            StyleTag::new(StyleCategory::Default, 4, 5),
            StyleTag::new(StyleCategory::String, 5, 7),
            StyleTag::new(StyleCategory::String, 8, 10),
        ];
        let map = Minimap::build(text, &tags, 2, 2);
        assert_eq!(map.rows().len(), 1);
        assert_eq!(map.columns_per_cell(), 4);
        // Cell 0: 4 keyword + 2 string columns; cell 1: 2 string columns
        assert_eq!(map.cell(0, 0), Some(StyleCategory::Keyword));
        assert_eq!(map.cell(0, 1), Some(StyleCategory::String));
    }

    #[test]
    fn test_wide_characters_count_double() {
        let text = "日本 ab";
        let tags = vec![
            StyleTag::new(StyleCategory::Comment, 0, 6),
            StyleTag::new(StyleCategory::Number, 7, 9),
        ];
        let map = Minimap::build(text, &tags, 1, 1);
        assert_eq!(map.cell(0, 0), Some(StyleCategory::Comment));
    }

    #[test]
    fn test_rows_fold_independently() {
        let text = "kk\nkk\nss\nss\nn\n";
        let tags = vec![
            StyleTag::new(StyleCategory::Keyword, 0, 5),
            StyleTag::new(StyleCategory::String, 6, 11),
            StyleTag::new(StyleCategory::Number, 12, 13),
        ];
        let map = Minimap::build(text, &tags, 1, 2);
        assert_eq!(
            map.rows(),
            &[
                vec![Some(StyleCategory::Keyword)],
                vec![Some(StyleCategory::String)],
                vec![Some(StyleCategory::Number)],
            ]
        );
    }

    #[test]
    fn test_empty_text_has_one_row() {
        let map = Minimap::build("", &[], 4, 3);
        assert_eq!(map.rows(), &[vec![None; 4]]);
    }

    #[test]
    fn test_untagged_and_default_cells_are_empty() {
        let text = "x\ny\nz\n";
        let map = Minimap::build(text, &[StyleTag::new(StyleCategory::Default, 0, 6)], 3, 1);
        assert_eq!(map.rows().len(), 3);
        assert!(map.rows().iter().flatten().all(Option::is_none));
        assert_eq!(map.row_for_line(2), 2);
        assert_eq!(map.cell(5, 0), None);
    }
}
