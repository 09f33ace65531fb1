//! Continuation state for resumable styling
//!
//! A `ContinuationState` captures which lexical mode is open at a given
//! offset. The restyle driver caches it in `Checkpoint`s so a later pass can
//! resume inside a multi-line string or block comment without rescanning
//! the buffer from the start.

/// Lexical mode open at the end of a styled region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContinuationState {
    /// No mode open
    #[default]
    Clear,
    /// Inside a line comment; the next newline closes it
    InLineComment,
    /// Inside a block comment; `matched` counts closer bytes already seen
    InBlockComment { matched: u8 },
    /// Inside a string literal
    InString {
        /// Quote (or fence) character
        quote: char,
        /// Number of repeats of `quote` that close the string (1 = plain quote)
        fence_len: u8,
        /// Contiguous closing quotes matched so far (fence form only)
        closing_run: u8,
        /// A `\` was the last character (plain quote form only)
        escape_pending: bool,
    },
}

impl ContinuationState {
    /// State after opening a plain quoted string
    pub fn quoted(quote: char) -> Self {
        ContinuationState::InString {
            quote,
            fence_len: 1,
            closing_run: 0,
            escape_pending: false,
        }
    }

    /// State after opening a fenced (multi-line) string
    pub fn fenced(quote: char, fence_len: u8) -> Self {
        ContinuationState::InString {
            quote,
            fence_len,
            closing_run: 0,
            escape_pending: false,
        }
    }

    /// Check if no mode is open
    pub fn is_clear(&self) -> bool {
        matches!(self, ContinuationState::Clear)
    }

    /// Check if inside any string form
    pub fn in_string(&self) -> bool {
        matches!(self, ContinuationState::InString { .. })
    }

    /// Check if inside a line or block comment
    pub fn in_comment(&self) -> bool {
        matches!(
            self,
            ContinuationState::InLineComment | ContinuationState::InBlockComment { .. }
        )
    }

    /// Check if inside a string that may span lines
    pub fn is_multiline(&self) -> bool {
        matches!(self, ContinuationState::InString { fence_len, .. } if *fence_len > 1)
    }
}

/// Result of scanning the body of an open mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeScan {
    /// Byte offset just past the consumed text
    pub end: usize,
    /// State after the consumed text (`Clear` if the mode closed)
    pub state: ContinuationState,
}

/// Continue an open mode over `text[from..]`
///
/// `block_closer` is the active profile's block comment closer. A state
/// that cannot be continued (block comment with no closer) clears
/// immediately rather than swallowing the buffer.
pub fn resume(
    state: ContinuationState,
    text: &str,
    from: usize,
    block_closer: Option<&str>,
) -> ModeScan {
    match state {
        ContinuationState::Clear => ModeScan { end: from, state },
        ContinuationState::InLineComment => scan_line_comment(text, from),
        ContinuationState::InBlockComment { matched } => match block_closer {
            Some(closer) => scan_block_comment(text, from, closer, matched),
            None => ModeScan {
                end: from,
                state: ContinuationState::Clear,
            },
        },
        ContinuationState::InString {
            quote,
            fence_len,
            closing_run,
            escape_pending,
        } => {
            if fence_len > 1 {
                scan_fence_body(text, from, quote, fence_len, closing_run)
            } else {
                scan_quoted_body(text, from, quote, escape_pending)
            }
        }
    }
}

/// Consume up to and including the next newline
pub fn scan_line_comment(text: &str, from: usize) -> ModeScan {
    match text[from..].find('\n') {
        Some(i) => ModeScan {
            end: from + i + 1,
            state: ContinuationState::Clear,
        },
        None => ModeScan {
            end: text.len(),
            state: ContinuationState::InLineComment,
        },
    }
}

/// Consume a block comment body until `closer`, carrying partial matches
pub fn scan_block_comment(text: &str, from: usize, closer: &str, matched: u8) -> ModeScan {
    let closer = closer.as_bytes();
    if closer.is_empty() {
        return ModeScan {
            end: from,
            state: ContinuationState::Clear,
        };
    }
    let mut matched = (matched as usize).min(closer.len() - 1);
    for (i, &b) in text.as_bytes()[from..].iter().enumerate() {
        if b == closer[matched] {
            matched += 1;
            if matched == closer.len() {
                return ModeScan {
                    end: from + i + 1,
                    state: ContinuationState::Clear,
                };
            }
        } else {
            matched = usize::from(b == closer[0]);
        }
    }
    ModeScan {
        end: text.len(),
        state: ContinuationState::InBlockComment {
            matched: matched as u8,
        },
    }
}

/// Consume a plain quoted string body
///
/// The escaped character is never tested against the terminator. The
/// literal runs until its quote or the end of `text`, newlines included.
pub fn scan_quoted_body(text: &str, from: usize, quote: char, escape_pending: bool) -> ModeScan {
    let mut escaped = escape_pending;
    for (i, c) in text[from..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == quote {
            return ModeScan {
                end: from + i + c.len_utf8(),
                state: ContinuationState::Clear,
            };
        }
    }
    ModeScan {
        end: text.len(),
        state: ContinuationState::InString {
            quote,
            fence_len: 1,
            closing_run: 0,
            escape_pending: escaped,
        },
    }
}

/// Consume a fenced string body until the fence repeats `fence_len` times
pub fn scan_fence_body(
    text: &str,
    from: usize,
    quote: char,
    fence_len: u8,
    closing_run: u8,
) -> ModeScan {
    let mut run = closing_run;
    for (i, c) in text[from..].char_indices() {
        if c == quote {
            run += 1;
            if run >= fence_len {
                return ModeScan {
                    end: from + i + c.len_utf8(),
                    state: ContinuationState::Clear,
                };
            }
        } else {
            run = 0;
        }
    }
    ModeScan {
        end: text.len(),
        state: ContinuationState::InString {
            quote,
            fence_len,
            closing_run: run,
            escape_pending: false,
        },
    }
}

/// Offset at which state is known to be correct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkpoint {
    /// Absolute byte offset (always a line start or the buffer end)
    pub offset: usize,
    /// State in force at `offset`
    pub state: ContinuationState,
}

impl Checkpoint {
    /// Create a checkpoint
    pub fn new(offset: usize, state: ContinuationState) -> Self {
        Self { offset, state }
    }

    /// The buffer start, where state is always `Clear`
    pub fn origin() -> Self {
        Self::default()
    }
}

/// Upper bound on cached checkpoints per buffer
pub const MAX_CHECKPOINTS: usize = 1024;

/// Ordered checkpoints for one buffer
///
/// The buffer start is an implicit checkpoint and is never stored.
#[derive(Debug, Clone, Default)]
pub struct CheckpointCache {
    /// Sorted by offset, no duplicates, no entry at offset 0
    checkpoints: Vec<Checkpoint>,
    /// Offset of the most recently recorded checkpoint
    last: Option<Checkpoint>,
}

impl CheckpointCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored checkpoints
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if only the implicit origin checkpoint is known
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// The most recently recorded checkpoint, or the origin
    pub fn last(&self) -> Checkpoint {
        self.last.unwrap_or_else(Checkpoint::origin)
    }

    /// Greatest checkpoint at or before `offset`
    pub fn nearest_at_or_before(&self, offset: usize) -> Checkpoint {
        let idx = self.checkpoints.partition_point(|c| c.offset <= offset);
        if idx == 0 {
            Checkpoint::origin()
        } else {
            self.checkpoints[idx - 1]
        }
    }

    /// Record a checkpoint, replacing any at the same offset
    pub fn record(&mut self, checkpoint: Checkpoint) {
        self.last = Some(checkpoint);
        if checkpoint.offset == 0 {
            return;
        }
        match self
            .checkpoints
            .binary_search_by_key(&checkpoint.offset, |c| c.offset)
        {
            Ok(i) => self.checkpoints[i] = checkpoint,
            Err(i) => self.checkpoints.insert(i, checkpoint),
        }
        if self.checkpoints.len() > MAX_CHECKPOINTS {
            // Halve the density; coverage of the whole buffer is kept
            let mut keep = false;
            self.checkpoints.retain(|_| {
                keep = !keep;
                keep
            });
        }
    }

    /// Drop every checkpoint at or after `offset`
    pub fn invalidate_from(&mut self, offset: usize) {
        self.checkpoints.retain(|c| c.offset < offset);
        if self.last.is_some_and(|c| c.offset >= offset) {
            self.last = self.checkpoints.last().copied();
        }
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(ContinuationState::default().is_clear());
        assert!(ContinuationState::quoted('"').in_string());
        assert!(!ContinuationState::quoted('"').is_multiline());
        assert!(ContinuationState::fenced('\'', 3).is_multiline());
        assert!(ContinuationState::InLineComment.in_comment());
        assert!(ContinuationState::InBlockComment { matched: 0 }.in_comment());
    }

    #[test]
    fn test_line_comment_includes_newline() {
        let scan = scan_line_comment("# hi\nx", 0);
        assert_eq!(scan.end, 5);
        assert!(scan.state.is_clear());

        let scan = scan_line_comment("# hi", 0);
        assert_eq!(scan.end, 4);
        assert_eq!(scan.state, ContinuationState::InLineComment);
    }

    #[test]
    fn test_block_comment_partial_closer() {
        let scan = scan_block_comment("abc *", 0, "*/", 0);
        assert_eq!(scan.end, 5);
        assert_eq!(scan.state, ContinuationState::InBlockComment { matched: 1 });

        let scan = scan_block_comment("/ rest", 0, "*/", 1);
        assert_eq!(scan.end, 1);
        assert!(scan.state.is_clear());

        let scan = scan_block_comment("x **/y", 0, "*/", 0);
        assert_eq!(scan.end, 5);
    }

    #[test]
    fn test_quoted_body_escape() {
        let scan = scan_quoted_body(r#"a\"b" rest"#, 0, '"', false);
        assert_eq!(scan.end, 5);
        assert!(scan.state.is_clear());

        let scan = scan_quoted_body(r"abc\", 0, '\'', false);
        assert_eq!(
            scan.state,
            ContinuationState::InString {
                quote: '\'',
                fence_len: 1,
                closing_run: 0,
                escape_pending: true,
            }
        );

        // Pending escape swallows the terminator
        let scan = scan_quoted_body("'x'", 0, '\'', true);
        assert_eq!(scan.end, 3);
    }

    #[test]
    fn test_quoted_body_spans_newline() {
        let scan = scan_quoted_body("abc\ndef'", 0, '\'', false);
        assert_eq!(scan.end, 8);
        assert!(scan.state.is_clear());

        let scan = scan_quoted_body("abc\n", 0, '\'', false);
        assert_eq!(scan.end, 4);
        assert_eq!(scan.state, ContinuationState::quoted('\''));
    }

    #[test]
    fn test_fence_body_run_carries() {
        let scan = scan_fence_body("abc''", 0, '\'', 3, 0);
        assert_eq!(scan.end, 5);
        assert_eq!(
            scan.state,
            ContinuationState::InString {
                quote: '\'',
                fence_len: 3,
                closing_run: 2,
                escape_pending: false,
            }
        );

        let scan = scan_fence_body("'x", 0, '\'', 3, 2);
        assert_eq!(scan.end, 1);
        assert!(scan.state.is_clear());

        let scan = scan_fence_body("''x'''", 0, '\'', 3, 0);
        assert_eq!(scan.end, 6);
    }

    #[test]
    fn test_resume_block_without_closer_clears() {
        let scan = resume(ContinuationState::InBlockComment { matched: 0 }, "abc", 0, None);
        assert_eq!(scan.end, 0);
        assert!(scan.state.is_clear());
    }

    #[test]
    fn test_checkpoint_cache_nearest() {
        let mut cache = CheckpointCache::new();
        cache.record(Checkpoint::new(10, ContinuationState::InLineComment));
        cache.record(Checkpoint::new(30, ContinuationState::quoted('"')));

        assert_eq!(cache.nearest_at_or_before(5), Checkpoint::origin());
        assert_eq!(cache.nearest_at_or_before(10).offset, 10);
        assert_eq!(cache.nearest_at_or_before(29).offset, 10);
        assert_eq!(cache.nearest_at_or_before(100).offset, 30);
        assert_eq!(cache.last().offset, 30);
    }

    #[test]
    fn test_checkpoint_cache_invalidate() {
        let mut cache = CheckpointCache::new();
        cache.record(Checkpoint::new(10, ContinuationState::Clear));
        cache.record(Checkpoint::new(30, ContinuationState::quoted('"')));

        cache.invalidate_from(30);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.last().offset, 10);

        cache.invalidate_from(0);
        assert!(cache.is_empty());
        assert_eq!(cache.last(), Checkpoint::origin());
    }

    #[test]
    fn test_checkpoint_cache_bounded() {
        let mut cache = CheckpointCache::new();
        for i in 1..=(MAX_CHECKPOINTS + 1) {
            cache.record(Checkpoint::new(i * 10, ContinuationState::Clear));
        }
        assert!(cache.len() <= MAX_CHECKPOINTS);
        assert!(cache.nearest_at_or_before(usize::MAX).offset > 0);
    }
}
