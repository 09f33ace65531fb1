//! Markdown language profile
//!
//! Markdown is structural rather than token based, so the profile carries a
//! `SyntaxHook` that styles whole lines. Fenced code blocks are the only
//! construct that spans lines; an open fence is carried as an `InString`
//! state whose quote is the fence character.

use std::sync::Arc;

use regex::{Captures, Regex};

use crate::syntax::classifier::StyledRun;
use crate::syntax::language::{LanguageProfile, SyntaxHook};
use crate::syntax::state::ContinuationState;
use crate::syntax::tokens::StyleCategory;

/// Create the Markdown profile
pub fn markdown_profile() -> LanguageProfile {
    let mut p = LanguageProfile::new("Markdown");
    p.add_extension("md");
    p.add_extension("markdown");
    p.add_extension("mkd");
    p.set_hook(Arc::new(MarkdownHook::new()));
    p
}

#[derive(Debug, Clone, Copy)]
enum InlineKind {
    Code,
    Image,
    Link,
    Bold,
    Italic,
}

struct InlineRule {
    kind: InlineKind,
    regex: Regex,
}

/// Line styler for Markdown
pub struct MarkdownHook {
    header: Option<Regex>,
    rule: Option<Regex>,
    quote: Option<Regex>,
    list: Option<Regex>,
    /// Inline rules in priority order for matches starting at the same byte
    inline: Vec<InlineRule>,
}

impl MarkdownHook {
    pub fn new() -> Self {
        let inline = [
            (InlineKind::Code, r"`[^`]+`"),
            (InlineKind::Image, r"!\[([^\]]*)\]\(([^)]*)\)"),
            (InlineKind::Link, r"\[([^\]]+)\]\(([^)]+)\)"),
            (InlineKind::Bold, r"\*\*[^*]+\*\*|\b__[^_]+__\b"),
            (InlineKind::Italic, r"\*[^*\s][^*]*\*|\b_[^_\s][^_]*_\b"),
        ]
        .into_iter()
        .filter_map(|(kind, pattern)| Regex::new(pattern).ok().map(|regex| InlineRule { kind, regex }))
        .collect();

        Self {
            header: Regex::new(r"^( {0,3}#{1,6})(?:([ \t]+)(.*))?$").ok(),
            rule: Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").ok(),
            quote: Regex::new(r"^[ \t]*(?:>[ \t]?)+").ok(),
            list: Regex::new(r"^([ \t]*)([-*+]|\d+[.)])[ \t]").ok(),
            inline,
        }
    }

    /// Style inline spans of `body[from..]`
    ///
    /// Each rule's next match is kept until the scan passes its start, so a
    /// rule is searched again only after its cached match is consumed or
    /// overtaken.
    fn style_inline(&self, body: &str, from: usize, out: &mut Vec<StyledRun>) {
        let mut pos = from;
        let mut next: Vec<Option<Captures<'_>>> = self
            .inline
            .iter()
            .map(|rule| rule.regex.captures_at(body, pos))
            .collect();

        while pos < body.len() {
            for (rule, slot) in self.inline.iter().zip(next.iter_mut()) {
                if slot.as_ref().and_then(|c| c.get(0)).is_some_and(|m| m.start() < pos) {
                    *slot = rule.regex.captures_at(body, pos);
                }
            }
            // Earliest start wins; ties go to the rule listed first
            let best = next
                .iter()
                .enumerate()
                .filter_map(|(i, caps)| Some((caps.as_ref()?.get(0)?.start(), i)))
                .min();
            let Some((_, index)) = best else {
                break;
            };
            let rule = &self.inline[index];
            let Some(caps) = next[index].take() else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            if whole.is_empty() {
                break;
            }
            next[index] = rule.regex.captures_at(body, whole.end());

            push(out, StyleCategory::Default, pos, whole.start());
            match rule.kind {
                InlineKind::Code => push(out, StyleCategory::String, whole.start(), whole.end()),
                InlineKind::Bold => {
                    push(out, StyleCategory::DeclaredFunction, whole.start(), whole.end())
                }
                InlineKind::Italic => push(out, StyleCategory::BuiltinType, whole.start(), whole.end()),
                InlineKind::Image | InlineKind::Link => {
                    let (text, url) = match (caps.get(1), caps.get(2)) {
                        (Some(text), Some(url)) => (text, url),
                        _ => break,
                    };
                    push(out, StyleCategory::Bracket, whole.start(), text.start());
                    push(out, StyleCategory::DeclaredFunction, text.start(), text.end());
                    push(out, StyleCategory::Bracket, text.end(), url.start());
                    push(out, StyleCategory::Number, url.start(), url.end());
                    push(out, StyleCategory::Bracket, url.end(), whole.end());
                }
            }
            pos = whole.end();
        }
        push(out, StyleCategory::Default, pos, body.len());
    }
}

impl Default for MarkdownHook {
    fn default() -> Self {
        Self::new()
    }
}

fn push(out: &mut Vec<StyledRun>, category: StyleCategory, start: usize, end: usize) {
    if start < end {
        out.push(StyledRun::new(category, start..end));
    }
}

/// Opening fence: up to three spaces, then three or more '`' or '~'
fn fence_open(body: &str) -> Option<(char, u8)> {
    let trimmed = body.trim_start_matches(' ');
    if body.len() - trimmed.len() > 3 {
        return None;
    }
    let fence = trimmed.chars().next().filter(|&c| c == '`' || c == '~')?;
    let run = trimmed.chars().take_while(|&c| c == fence).count();
    if run < 3 || (fence == '`' && trimmed[run..].contains('`')) {
        return None;
    }
    Some((fence, run.min(u8::MAX as usize) as u8))
}

/// Closing fence: at least as long as the opener, nothing after but spaces
fn fence_closes(body: &str, fence: char, len: u8) -> bool {
    let trimmed = body.trim_start_matches(' ');
    if body.len() - trimmed.len() > 3 {
        return false;
    }
    let run = trimmed.chars().take_while(|&c| c == fence).count();
    run >= len as usize && trimmed[run * fence.len_utf8()..].trim().is_empty()
}

impl SyntaxHook for MarkdownHook {
    fn style_line(
        &self,
        line: &str,
        state: ContinuationState,
        out: &mut Vec<StyledRun>,
    ) -> ContinuationState {
        let body = line.trim_end_matches(['\n', '\r']);
        let body_len = body.len();
        let newline = |out: &mut Vec<StyledRun>| push(out, StyleCategory::Default, body_len, line.len());

        if let ContinuationState::InString { quote, fence_len, .. } = state {
            push(out, StyleCategory::String, 0, body_len);
            newline(out);
            return if fence_closes(body, quote, fence_len) {
                ContinuationState::Clear
            } else {
                state
            };
        }

        if let Some((fence, len)) = fence_open(body) {
            push(out, StyleCategory::String, 0, body_len);
            newline(out);
            return ContinuationState::fenced(fence, len);
        }

        if let Some(caps) = self.header.as_ref().and_then(|re| re.captures(body)) {
            if let Some(marker) = caps.get(1) {
                push(out, StyleCategory::Keyword, 0, marker.end());
                let text_start = caps.get(3).map_or(body_len, |m| m.start());
                push(out, StyleCategory::Default, marker.end(), text_start);
                push(out, StyleCategory::ClassDef, text_start, body_len);
                newline(out);
                return ContinuationState::Clear;
            }
        }

        if self.rule.as_ref().is_some_and(|re| re.is_match(body)) {
            push(out, StyleCategory::Number, 0, body_len);
            newline(out);
            return ContinuationState::Clear;
        }

        let mut pos = 0;
        if let Some(marker) = self.quote.as_ref().and_then(|re| re.find(body)) {
            push(out, StyleCategory::Comment, 0, marker.end());
            pos = marker.end();
        }
        if let Some(caps) = self.list.as_ref().and_then(|re| re.captures(&body[pos..])) {
            if let Some(bullet) = caps.get(2) {
                push(out, StyleCategory::Default, pos, pos + bullet.start());
                push(out, StyleCategory::Bracket, pos + bullet.start(), pos + bullet.end());
                pos += bullet.end();
            }
        }

        self.style_inline(body, pos, out);
        newline(out);
        ContinuationState::Clear
    }
}
