//! Restyle driver
//!
//! `BufferContext` is the per-buffer styling state: the active profile,
//! the checkpoint cache and the shared symbol index. The host calls
//! `restyle_range` with a read-only snapshot of the buffer and receives
//! style tags through a `StyleSink`.
//!
//! Styling always proceeds in whole lines. A pass starts at the line
//! containing `start`, resuming from the nearest checkpoint at or before
//! that line, and emits tags clipped to the requested range. Because every
//! pass sees exactly the lines a full-buffer pass would, a partial restyle
//! yields the same categories as restyling from offset 0.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::classifier::{Classifier, StyledRun};
use super::language::LanguageProfile;
use super::state::{self, Checkpoint, CheckpointCache, ContinuationState};
use super::style::StyleTag;
use super::symbols::{NameSnapshot, SymbolIndex};
use super::tokenizer::{tokenize, Token};
use super::tokens::StyleCategory;
use crate::error::{EngineError, Result};

/// Minimum distance in bytes between checkpoints recorded mid-pass
pub const CHECKPOINT_SPACING: usize = 4096;

/// Receiver of the engine's outbound calls
pub trait StyleSink {
    /// Apply `tag.category` to `tag.start..tag.end`
    fn style_tag(&mut self, tag: StyleTag);

    /// The symbol index changed; the visible range should be restyled
    fn names_changed(&mut self) {}
}

impl StyleSink for Vec<StyleTag> {
    fn style_tag(&mut self, tag: StyleTag) {
        self.push(tag);
    }
}

/// Summary of one restyle pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestyleStats {
    /// Tags emitted
    pub tags: usize,
    /// Lines styled
    pub lines: usize,
    /// Bytes replayed to recover the state at the first styled line
    pub resynced_bytes: usize,
    /// Checkpoint recorded at the end of the pass
    pub checkpoint: Checkpoint,
}

/// Call `f(offset, line)` for each line of `text[from..to]`
///
/// Lines keep their trailing newline. `from` should be a line start.
pub(crate) fn for_each_line(text: &str, from: usize, to: usize, mut f: impl FnMut(usize, &str)) {
    let mut offset = from;
    for line in text[from..to].split_inclusive('\n') {
        f(offset, line);
        offset += line.len();
    }
}

/// Tokens of one line after any carried-over literal body
pub(crate) struct LexedLine<'a> {
    /// Mode continued from the previous line and where its body ends
    pub resumed: Option<(ContinuationState, usize)>,
    /// Tokens after the resumed body, offsets relative to the line
    pub tokens: Vec<Token<'a>>,
    /// State at the end of the line
    pub state: ContinuationState,
}

/// Lex one line starting in `state`
pub(crate) fn lex_line<'a>(
    line: &'a str,
    state: ContinuationState,
    profile: &LanguageProfile,
) -> LexedLine<'a> {
    let mut start = 0;
    let mut resumed = None;
    if !state.is_clear() {
        let scan = state::resume(state, line, 0, profile.block_closer());
        resumed = Some((state, scan.end));
        start = scan.end;
        if !scan.state.is_clear() {
            return LexedLine {
                resumed,
                tokens: Vec::new(),
                state: scan.state,
            };
        }
    }

    let mut tokens = tokenize(&line[start..], profile);
    for token in &mut tokens {
        token.offset += start;
    }
    let state = tokens.last().map_or(ContinuationState::Clear, |t| t.trailing);
    LexedLine {
        resumed,
        tokens,
        state,
    }
}

fn mode_category(state: ContinuationState) -> StyleCategory {
    if state.in_comment() {
        StyleCategory::Comment
    } else {
        StyleCategory::String
    }
}

/// Style one line; runs are pushed with line-relative ranges
fn style_line(
    profile: &LanguageProfile,
    names: &NameSnapshot,
    line: &str,
    state: ContinuationState,
    runs: &mut Vec<StyledRun>,
) -> ContinuationState {
    if let Some(hook) = &profile.hook {
        return hook.style_line(line, state, runs);
    }

    let lexed = lex_line(line, state, profile);
    if let Some((mode, end)) = lexed.resumed {
        if end > 0 {
            runs.push(StyledRun::new(mode_category(mode), 0..end));
        }
    }
    runs.extend(Classifier::new(profile, names).classify(&lexed.tokens));
    lexed.state
}

/// State at the end of one line, without classification
fn advance_line(profile: &LanguageProfile, line: &str, state: ContinuationState) -> ContinuationState {
    match &profile.hook {
        Some(hook) => hook.style_line(line, state, &mut Vec::new()),
        None => lex_line(line, state, profile).state,
    }
}

/// Merges adjacent same-category tags before they reach the sink
struct TagEmitter<'s> {
    sink: &'s mut dyn StyleSink,
    pending: Option<StyleTag>,
    emitted: usize,
}

impl<'s> TagEmitter<'s> {
    fn new(sink: &'s mut dyn StyleSink) -> Self {
        Self {
            sink,
            pending: None,
            emitted: 0,
        }
    }

    fn push(&mut self, category: StyleCategory, start: usize, end: usize) {
        if start >= end {
            return;
        }
        if let Some(pending) = &mut self.pending {
            if pending.category == category && pending.end == start {
                pending.end = end;
                return;
            }
        }
        self.flush();
        self.pending = Some(StyleTag::new(category, start, end));
    }

    fn flush(&mut self) {
        if let Some(tag) = self.pending.take() {
            self.sink.style_tag(tag);
            self.emitted += 1;
        }
    }

    fn finish(mut self) -> usize {
        self.flush();
        self.emitted
    }
}

/// Per-buffer styling context
#[derive(Debug)]
pub struct BufferContext {
    profile: Arc<LanguageProfile>,
    checkpoints: CheckpointCache,
    names: Arc<SymbolIndex>,
}

impl BufferContext {
    /// Create a context for a buffer using `profile`
    pub fn new(profile: Arc<LanguageProfile>) -> Self {
        Self {
            profile,
            checkpoints: CheckpointCache::new(),
            names: Arc::new(SymbolIndex::new()),
        }
    }

    /// The active profile
    pub fn profile(&self) -> &Arc<LanguageProfile> {
        &self.profile
    }

    /// Shared handle to this buffer's symbol index
    pub fn symbol_index(&self) -> Arc<SymbolIndex> {
        Arc::clone(&self.names)
    }

    /// The most recently recorded checkpoint
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoints.last()
    }

    /// All cached checkpoints
    pub fn checkpoints(&self) -> &CheckpointCache {
        &self.checkpoints
    }

    /// Invalidate cached state at or after `at`
    pub fn notify_edit(&mut self, at: usize) {
        self.checkpoints.invalidate_from(at);
        trace!(at, remaining = self.checkpoints.len(), "checkpoints invalidated");
    }

    /// Reset everything for new buffer contents and profile
    ///
    /// The symbol index is rebuilt from `text` right away.
    pub fn notify_buffer_replaced(&mut self, text: &str, profile: Arc<LanguageProfile>) {
        debug!(profile = %profile.name, bytes = text.len(), "buffer replaced");
        self.profile = profile;
        self.checkpoints.clear();
        self.names.refresh(text, &self.profile);
    }

    /// Current declared-name sets
    pub fn names_snapshot(&self) -> Arc<NameSnapshot> {
        self.names.snapshot()
    }

    /// Rescan `text` for declarations; fires `names_changed` if they differ
    pub fn refresh_names(&self, text: &str, sink: &mut dyn StyleSink) -> bool {
        let changed = self.names.refresh(text, &self.profile);
        if changed {
            sink.names_changed();
        }
        changed
    }

    /// Restyle the whole buffer
    pub fn restyle_all(&mut self, text: &str, sink: &mut dyn StyleSink) -> Result<RestyleStats> {
        self.restyle_range(text, 0, text.len(), sink)
    }

    /// Restyle `text[start..end]`
    ///
    /// Rejects ranges outside the buffer or off character boundaries.
    /// Never fails on malformed guest syntax.
    pub fn restyle_range(
        &mut self,
        text: &str,
        start: usize,
        end: usize,
        sink: &mut dyn StyleSink,
    ) -> Result<RestyleStats> {
        if start > end || end > text.len() {
            warn!(start, end, len = text.len(), "restyle range rejected");
            return Err(EngineError::RangeOutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        for offset in [start, end] {
            if !text.is_char_boundary(offset) {
                warn!(offset, "restyle offset rejected");
                return Err(EngineError::NotCharBoundary(offset));
            }
        }
        if start == end {
            return Ok(RestyleStats {
                checkpoint: self.checkpoints.last(),
                ..Default::default()
            });
        }

        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let (mut state, resynced_bytes) = self.resync(text, line_start);
        let names = self.names.snapshot();
        let profile = Arc::clone(&self.profile);

        let mut emitter = TagEmitter::new(sink);
        let mut runs = Vec::new();
        let mut lines = 0;
        let mut last_recorded = line_start;
        let mut pass_end = line_start;
        let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i + 1);
        let stop = if end > line_start && text.as_bytes()[end - 1] == b'\n' {
            end
        } else {
            line_end
        };

        for_each_line(text, line_start, stop, |offset, line| {
            runs.clear();
            state = style_line(&profile, &names, line, state, &mut runs);
            for run in &runs {
                let run_start = (offset + run.range.start).max(start);
                let run_end = (offset + run.range.end).min(end);
                emitter.push(run.category, run_start, run_end);
            }
            lines += 1;
            pass_end = offset + line.len();
            if pass_end - last_recorded >= CHECKPOINT_SPACING && pass_end < stop {
                self.checkpoints.record(Checkpoint::new(pass_end, state));
                last_recorded = pass_end;
            }
        });

        let checkpoint = Checkpoint::new(pass_end, state);
        self.checkpoints.record(checkpoint);
        let tags = emitter.finish();
        trace!(start, end, tags, lines, resynced_bytes, "restyle pass");

        Ok(RestyleStats {
            tags,
            lines,
            resynced_bytes,
            checkpoint,
        })
    }

    /// Recover the state at `line_start` from the nearest checkpoint
    fn resync(&mut self, text: &str, line_start: usize) -> (ContinuationState, usize) {
        let from = self.checkpoints.nearest_at_or_before(line_start);
        if from.offset == line_start {
            return (from.state, 0);
        }

        let mut state = from.state;
        let mut last_recorded = from.offset;
        let profile = Arc::clone(&self.profile);
        let mut recorded = Vec::new();
        for_each_line(text, from.offset, line_start, |offset, line| {
            state = advance_line(&profile, line, state);
            let line_end = offset + line.len();
            if line_end - last_recorded >= CHECKPOINT_SPACING {
                recorded.push(Checkpoint::new(line_end, state));
                last_recorded = line_end;
            }
        });
        for checkpoint in recorded {
            self.checkpoints.record(checkpoint);
        }
        self.checkpoints.record(Checkpoint::new(line_start, state));

        let replayed = line_start - from.offset;
        debug!(from = from.offset, to = line_start, replayed, "continuation state resynced");
        (state, replayed)
    }
}
