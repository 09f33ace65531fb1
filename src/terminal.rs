//! Terminal output using crossterm
//!
//! Renders a buffer snapshot with its style tags as colored text, or the
//! tags themselves as plain lines, and draws the minimap.

use std::io::Write;
use std::ops::Range;

use crossterm::{
    queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};

use crate::error::Result;
use crate::minimap::Minimap;
use crate::syntax::{Color, Style, StyleTag};

/// Map a palette color to crossterm
pub fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
    }
}

/// Styled writer over any output stream
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the wrapped stream
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Apply a style to subsequent output
    pub fn set_style(&mut self, style: Style) -> Result<()> {
        if style.fg != Color::Default {
            queue!(self.out, SetForegroundColor(to_crossterm(style.fg)))?;
        }
        if style.bg != Color::Default {
            queue!(self.out, SetBackgroundColor(to_crossterm(style.bg)))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(self.out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        Ok(())
    }

    /// Reset all attributes
    pub fn reset_attributes(&mut self) -> Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }

    /// Write a string at the current position
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(self.out, Print(s))?;
        Ok(())
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Write `text[range]` colored by `tags`
    ///
    /// Bytes not covered by a tag are written unstyled.
    pub fn write_styled(&mut self, text: &str, tags: &[StyleTag], range: Range<usize>) -> Result<()> {
        let mut pos = range.start;
        for tag in tags {
            let start = tag.start.max(pos);
            let end = tag.end.min(range.end);
            if start >= end {
                continue;
            }
            if pos < start {
                self.write_str(&text[pos..start])?;
            }
            let style = tag.category.default_style();
            if style.is_default() {
                self.write_str(&text[start..end])?;
            } else {
                self.set_style(style)?;
                self.write_str(&text[start..end])?;
                self.reset_attributes()?;
            }
            pos = end;
        }
        if pos < range.end {
            self.write_str(&text[pos..range.end])?;
        }
        self.flush()
    }

    /// Write each tag as `category start..end`
    pub fn write_spans(&mut self, tags: &[StyleTag]) -> Result<()> {
        for tag in tags {
            self.write_str(&format!("{} {}..{}\n", tag.category.name(), tag.start, tag.end))?;
        }
        self.flush()
    }

    /// Draw the minimap, one block character per cell
    pub fn write_minimap(&mut self, minimap: &Minimap) -> Result<()> {
        for row in minimap.rows() {
            for cell in row {
                match cell {
                    Some(category) => {
                        let style = category.default_style();
                        queue!(self.out, SetForegroundColor(to_crossterm(style.fg)))?;
                        self.write_str("█")?;
                        queue!(self.out, ResetColor)?;
                    }
                    None => self.write_str(" ")?,
                }
            }
            self.write_str("\n")?;
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::StyleCategory;

    fn strip_ansi(bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_styled_output_keeps_text() {
        let text = "let x = 1;";
        let tags = vec![
            StyleTag::new(StyleCategory::Keyword, 0, 3),
            StyleTag::new(StyleCategory::Number, 8, 9),
        ];
        let mut term = Terminal::new(Vec::new());
        term.write_styled(text, &tags, 0..text.len()).unwrap();
        let out = term.into_inner();
        assert!(out.contains(&0x1b));
        assert_eq!(strip_ansi(&out), text);
    }

    #[test]
    fn test_styled_output_clips_to_range() {
        let text = "abc def";
        let tags = vec![StyleTag::new(StyleCategory::String, 0, 7)];
        let mut term = Terminal::new(Vec::new());
        term.write_styled(text, &tags, 2..5).unwrap();
        assert_eq!(strip_ansi(&term.into_inner()), "c d");
    }

    #[test]
    fn test_spans_output() {
        let mut term = Terminal::new(Vec::new());
        term.write_spans(&[StyleTag::new(StyleCategory::Comment, 4, 9)]).unwrap();
        assert_eq!(String::from_utf8(term.into_inner()).unwrap(), "comment 4..9\n");
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(to_crossterm(Color::Default), style::Color::Reset);
        assert_eq!(to_crossterm(Color::BrightBlue), style::Color::Blue);
    }
}
