//! Symbol index
//!
//! Collects the class-like and callable names declared in a buffer so the
//! classifier can style later references to them. A refresh walks the
//! whole buffer with the same tokenizer the styling path uses, so names
//! inside strings and comments are never collected. The two name sets are
//! published together as one immutable snapshot; readers see either the
//! old or the new snapshot, never a mix.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::driver::{for_each_line, lex_line};
use super::language::LanguageProfile;
use super::state::ContinuationState;
use super::tokenizer::{Token, TokenKind};

/// Default quiet period before a refresh, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Names declared in a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSnapshot {
    /// Names introduced by class-like declaration keywords
    pub types: HashSet<String>,
    /// Names introduced by function-like declaration keywords
    pub callables: HashSet<String>,
}

impl NameSnapshot {
    /// Check if no names are known
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.callables.is_empty()
    }
}

/// Scan a full buffer for declarations
///
/// Only code tokens are considered; a declaration keyword followed
/// (after same-line whitespace) by an identifier yields a name.
pub fn scan_declarations(text: &str, profile: &LanguageProfile) -> NameSnapshot {
    let mut names = NameSnapshot::default();
    if profile.hook.is_some() || !profile.has_declarations() {
        return names;
    }

    let mut state = ContinuationState::Clear;
    for_each_line(text, 0, text.len(), |_, line| {
        let lexed = lex_line(line, state, profile);
        state = lexed.state;

        // Last non-whitespace token; a literal in between breaks the pair
        let mut previous: Option<&Token<'_>> = None;
        for token in &lexed.tokens {
            if token.kind == TokenKind::Whitespace {
                continue;
            }
            if let Some(keyword) = previous {
                if keyword.kind == TokenKind::Identifier && token.kind == TokenKind::Identifier {
                    if profile.class_keywords.contains(keyword.text) {
                        names.types.insert(token.text.to_string());
                    } else if profile.function_keywords.contains(keyword.text) {
                        names.callables.insert(token.text.to_string());
                    }
                }
            }
            previous = Some(token);
        }
    });
    names
}

/// Shared, atomically replaced name sets
#[derive(Debug, Default)]
pub struct SymbolIndex {
    current: RwLock<Arc<NameSnapshot>>,
}

impl SymbolIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<NameSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish `next` if it differs from the current snapshot
    ///
    /// Returns true if the snapshot changed.
    pub fn replace(&self, next: NameSnapshot) -> bool {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if **guard == next {
            return false;
        }
        *guard = Arc::new(next);
        true
    }

    /// Drop every name
    pub fn clear(&self) -> bool {
        self.replace(NameSnapshot::default())
    }

    /// Rescan `text` and publish the result
    ///
    /// Returns true if the snapshot changed.
    pub fn refresh(&self, text: &str, profile: &LanguageProfile) -> bool {
        let started = Instant::now();
        let next = scan_declarations(text, profile);
        let (types, callables) = (next.types.len(), next.callables.len());
        let changed = self.replace(next);
        debug!(
            profile = %profile.name,
            types,
            callables,
            changed,
            elapsed_us = started.elapsed().as_micros() as u64,
            "symbol index refreshed"
        );
        changed
    }
}

/// Coalesces bursts of edits into one refresh
///
/// Pure data structure; the caller supplies the clock.
#[derive(Debug, Clone)]
pub struct RefreshDebouncer {
    last_edit: Option<Instant>,
    window: Duration,
}

impl RefreshDebouncer {
    /// Create a debouncer with the given quiet period
    pub fn new(window_ms: u64) -> Self {
        Self {
            last_edit: None,
            window: Duration::from_millis(window_ms),
        }
    }

    /// Create a debouncer with the default quiet period
    pub fn with_default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }

    /// Record an edit; restarts the quiet period
    pub fn register_edit(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// Whether an edit is waiting for its quiet period
    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    /// Returns true once per burst, when the quiet period has elapsed
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_edit {
            Some(at) if now.saturating_duration_since(at) >= self.window => {
                self.last_edit = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for RefreshDebouncer {
    fn default() -> Self {
        Self::with_default()
    }
}

/// Notification that the published names changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamesChanged {
    /// Increments on every change published by one indexer
    pub generation: u64,
}

enum Request {
    Snapshot {
        text: String,
        profile: Arc<LanguageProfile>,
    },
    Shutdown,
}

/// Background refresh worker for one buffer
///
/// Buffer snapshots submitted in quick succession are coalesced; a refresh
/// runs once no new snapshot has arrived for the debounce window. Each
/// snapshot carries the profile it is scanned with, so a buffer that
/// switches language keeps its worker.
pub struct Indexer {
    requests: Sender<Request>,
    changes: Receiver<NamesChanged>,
    handle: Option<JoinHandle<()>>,
}

impl Indexer {
    /// Start a worker publishing into `index`
    pub fn spawn(index: Arc<SymbolIndex>, debounce: Duration) -> Self {
        let (requests, request_rx) = mpsc::channel();
        let (change_tx, changes) = mpsc::channel();
        let handle = thread::spawn(move || {
            run_indexer(&index, debounce, &request_rx, &change_tx);
        });
        Self {
            requests,
            changes,
            handle: Some(handle),
        }
    }

    /// Submit the latest buffer text and the profile to scan it with
    pub fn submit(&self, text: String, profile: Arc<LanguageProfile>) {
        let _ = self.requests.send(Request::Snapshot { text, profile });
    }

    /// Next change notification, if one is waiting
    pub fn try_recv_changed(&self) -> Option<NamesChanged> {
        self.changes.try_recv().ok()
    }

    /// Wait up to `timeout` for a change notification
    pub fn recv_changed_timeout(&self, timeout: Duration) -> Option<NamesChanged> {
        self.changes.recv_timeout(timeout).ok()
    }
}

impl Drop for Indexer {
    fn drop(&mut self) {
        let _ = self.requests.send(Request::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_indexer(
    index: &SymbolIndex,
    debounce: Duration,
    requests: &Receiver<Request>,
    changes: &Sender<NamesChanged>,
) {
    let mut pending: Option<(String, Arc<LanguageProfile>)> = None;
    let mut generation = 0;
    loop {
        let received = if pending.is_some() {
            requests.recv_timeout(debounce)
        } else {
            requests.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };
        match received {
            Ok(Request::Snapshot { text, profile }) => {
                trace!(profile = %profile.name, bytes = text.len(), "indexer snapshot queued");
                pending = Some((text, profile));
            }
            Ok(Request::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if let Some((text, profile)) = pending.take() {
                    if index.refresh(&text, &profile) {
                        generation += 1;
                        if changes.send(NamesChanged { generation }).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
    debug!(generation, "indexer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> LanguageProfile {
        let mut p = LanguageProfile::new("Test");
        p.set_line_comment("#");
        p.add_quote('\'');
        p.add_quote('"');
        p.add_fence('\'');
        p.add_fence('"');
        p.add_class_keywords(&["class"]);
        p.add_function_keywords(&["def"]);
        p
    }

    #[test]
    fn test_scan_declarations() {
        let text = "class Foo:\n    def bar(self): pass\ndef  baz(): pass\n";
        let names = scan_declarations(text, &profile());
        assert!(names.types.contains("Foo"));
        assert!(names.callables.contains("bar"));
        assert!(names.callables.contains("baz"));
        assert_eq!(names.types.len(), 1);
    }

    #[test]
    fn test_scan_ignores_strings_and_comments() {
        let text = concat!(
            "# class NotMe\n",
            "s = 'def nope(): pass'\n",
            "doc = \"\"\"\nclass Hidden:\n\"\"\"\n",
            "t = \"a # class Fake\"\n",
            "class Real: pass\n",
        );
        let names = scan_declarations(text, &profile());
        assert_eq!(names.types.len(), 1);
        assert!(names.types.contains("Real"));
        assert!(names.callables.is_empty());
    }

    #[test]
    fn test_scan_without_declarations() {
        let p = LanguageProfile::new("Plain");
        assert!(scan_declarations("class Foo", &p).is_empty());
    }

    #[test]
    fn test_replace_reports_change() {
        let index = SymbolIndex::new();
        let before = index.snapshot();
        assert!(index.refresh("class A: pass", &profile()));
        assert!(!index.refresh("class A: pass\n", &profile()));
        assert!(before.is_empty());
        assert!(index.snapshot().types.contains("A"));
        assert!(index.clear());
        assert!(index.snapshot().is_empty());
    }

    #[test]
    fn test_debouncer_coalesces() {
        let mut debouncer = RefreshDebouncer::new(100);
        let now = Instant::now();
        assert!(!debouncer.ready(now));

        debouncer.register_edit(now);
        debouncer.register_edit(now + Duration::from_millis(50));
        assert!(debouncer.is_pending());
        assert!(!debouncer.ready(now + Duration::from_millis(100)));
        assert!(debouncer.ready(now + Duration::from_millis(150)));
        assert!(!debouncer.ready(now + Duration::from_millis(300)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_indexer_publishes_once_per_burst() {
        let index = Arc::new(SymbolIndex::new());
        let profile = Arc::new(profile());
        let indexer = Indexer::spawn(Arc::clone(&index), Duration::from_millis(20));
        indexer.submit("class A: pass".to_string(), Arc::clone(&profile));
        indexer.submit("class A: pass\nclass B: pass".to_string(), profile);

        let changed = indexer.recv_changed_timeout(Duration::from_secs(5));
        assert_eq!(changed, Some(NamesChanged { generation: 1 }));
        let names = index.snapshot();
        assert!(names.types.contains("A"));
        assert!(names.types.contains("B"));
        assert_eq!(indexer.recv_changed_timeout(Duration::from_millis(100)), None);
    }

    #[test]
    fn test_indexer_follows_profile_switch() {
        let index = Arc::new(SymbolIndex::new());
        let indexer = Indexer::spawn(Arc::clone(&index), Duration::from_millis(10));
        let text = "class A: pass\n";
        indexer.submit(text.to_string(), Arc::new(profile()));
        assert_eq!(
            indexer.recv_changed_timeout(Duration::from_secs(5)),
            Some(NamesChanged { generation: 1 })
        );
        assert!(index.snapshot().types.contains("A"));

        // Same text, now scanned as a language without declarations
        indexer.submit(text.to_string(), Arc::new(LanguageProfile::new("Plain")));
        assert_eq!(
            indexer.recv_changed_timeout(Duration::from_secs(5)),
            Some(NamesChanged { generation: 2 })
        );
        assert!(index.snapshot().is_empty());
    }

    #[test]
    fn test_scan_long_single_line() {
        let mut text = "a ".repeat(200_000);
        text.push_str("'class Quoted' class Tail: pass");
        let started = Instant::now();
        let names = scan_declarations(&text, &profile());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(names.types.len(), 1);
        assert!(names.types.contains("Tail"));
    }

    #[test]
    fn test_literal_breaks_declaration_pair() {
        let names = scan_declarations("class 'x' Foo\ndef # c\nbar\n", &profile());
        assert!(names.is_empty());
    }
}
