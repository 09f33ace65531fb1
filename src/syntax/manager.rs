//! Syntax highlighting manager
//!
//! This module provides the SyntaxManager that owns the profile registry,
//! maps file extensions to profiles and keeps one `BufferContext` per open
//! buffer.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::builtin;
use super::driver::{BufferContext, RestyleStats, StyleSink};
use super::language::LanguageProfile;
use super::symbols::{Indexer, DEFAULT_DEBOUNCE_MS};
use crate::config::Config;
use crate::error::{EngineError, Result};

/// Main syntax highlighting manager
pub struct SyntaxManager {
    /// Loaded profiles by name
    profiles: HashMap<String, Arc<LanguageProfile>>,
    /// Extension to profile name mapping
    extension_map: HashMap<String, String>,
    /// Per-buffer contexts (buffer id -> context)
    buffers: HashMap<usize, BufferContext>,
    /// Quiet period for background symbol indexers
    debounce: Duration,
    /// Whether syntax highlighting is enabled
    pub enabled: bool,
}

impl SyntaxManager {
    /// Create a new manager with the built-in profiles
    pub fn new() -> Self {
        let mut manager = Self {
            profiles: HashMap::new(),
            extension_map: HashMap::new(),
            buffers: HashMap::new(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            enabled: true,
        };

        for profile in builtin::all_profiles() {
            manager.add_profile(profile);
        }

        manager
    }

    /// Create a manager set up from user configuration
    ///
    /// A profile directory that cannot be read is logged and skipped.
    pub fn with_config(config: &Config) -> Self {
        let mut manager = Self::new();
        manager.enabled = config.highlighting;
        manager.set_debounce(config.debounce());
        if let Some(dir) = &config.profile_dir {
            if let Err(err) = manager.load_profile_dir(dir) {
                warn!(dir = %dir.display(), %err, "profile directory not loaded");
            }
        }
        manager
    }

    /// Quiet period used by indexers started from now on
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    /// Register a profile, replacing any profile with the same name
    pub fn add_profile(&mut self, profile: LanguageProfile) {
        let name = profile.name.clone();
        self.extension_map.retain(|_, owner| *owner != name);
        for ext in &profile.extensions {
            self.extension_map.insert(ext.to_lowercase(), name.clone());
        }
        self.profiles.insert(name, Arc::new(profile));
    }

    /// Load every `*.toml` profile in `dir`
    ///
    /// Files that fail to parse are skipped with a warning. Returns the
    /// number of profiles loaded.
    pub fn load_profile_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let profile = fs::read_to_string(&path)
                .map_err(EngineError::from)
                .and_then(|text| LanguageProfile::from_toml(&text));
            match profile {
                Ok(profile) => {
                    debug!(name = %profile.name, path = %path.display(), "profile loaded");
                    self.add_profile(profile);
                    loaded += 1;
                }
                Err(err) => warn!(path = %path.display(), %err, "profile skipped"),
            }
        }
        Ok(loaded)
    }

    /// Detect a profile from a file name
    pub fn detect_profile(&self, filename: &Path) -> Option<Arc<LanguageProfile>> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        let name = self.extension_map.get(&ext)?;
        self.profiles.get(name).cloned()
    }

    /// Get a profile by name
    pub fn profile(&self, name: &str) -> Result<Arc<LanguageProfile>> {
        self.profiles
            .get(name)
            .or_else(|| {
                self.profiles
                    .values()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
            })
            .cloned()
            .ok_or_else(|| EngineError::UnknownProfile(name.to_string()))
    }

    /// List available profile names
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Start styling a buffer with `profile`
    ///
    /// An existing context for `id` is replaced.
    pub fn open_buffer(&mut self, id: usize, text: &str, profile: Arc<LanguageProfile>) -> &mut BufferContext {
        let context = self
            .buffers
            .entry(id)
            .or_insert_with(|| BufferContext::new(Arc::clone(&profile)));
        context.notify_buffer_replaced(text, profile);
        context
    }

    /// Start styling a buffer with the profile detected from `filename`
    pub fn open_buffer_for_path(
        &mut self,
        id: usize,
        text: &str,
        filename: &Path,
    ) -> Option<&mut BufferContext> {
        let profile = self.detect_profile(filename)?;
        Some(self.open_buffer(id, text, profile))
    }

    /// Forget a buffer (when it is closed)
    pub fn close_buffer(&mut self, id: usize) -> bool {
        self.buffers.remove(&id).is_some()
    }

    pub fn buffer(&self, id: usize) -> Option<&BufferContext> {
        self.buffers.get(&id)
    }

    pub fn buffer_mut(&mut self, id: usize) -> Option<&mut BufferContext> {
        self.buffers.get_mut(&id)
    }

    /// Restyle part of a buffer
    ///
    /// Emits nothing when highlighting is disabled or the buffer has no
    /// context.
    pub fn restyle_range(
        &mut self,
        id: usize,
        text: &str,
        start: usize,
        end: usize,
        sink: &mut dyn StyleSink,
    ) -> Result<RestyleStats> {
        if !self.enabled {
            return Ok(RestyleStats::default());
        }
        match self.buffers.get_mut(&id) {
            Some(context) => context.restyle_range(text, start, end, sink),
            None => Ok(RestyleStats::default()),
        }
    }

    /// Invalidate cached state for a buffer from `at` onwards
    pub fn notify_edit(&mut self, id: usize, at: usize) {
        if let Some(context) = self.buffers.get_mut(&id) {
            context.notify_edit(at);
        }
    }

    /// Start a background symbol indexer for a buffer
    ///
    /// The indexer publishes into the buffer's symbol index and waits for
    /// the manager's debounce window after the last submitted snapshot.
    pub fn spawn_indexer(&self, id: usize) -> Option<Indexer> {
        let context = self.buffers.get(&id)?;
        debug!(id, debounce_ms = self.debounce.as_millis() as u64, "indexer started");
        Some(Indexer::spawn(context.symbol_index(), self.debounce))
    }

    /// Queue a buffer's latest text on its indexer, scanned with the
    /// buffer's current profile
    pub fn submit_to_indexer(&self, indexer: &Indexer, id: usize, text: &str) -> bool {
        match self.buffers.get(&id) {
            Some(context) => {
                indexer.submit(text.to_string(), Arc::clone(context.profile()));
                true
            }
            None => false,
        }
    }

    /// Toggle syntax highlighting on/off
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }
}

impl Default for SyntaxManager {
    fn default() -> Self {
        Self::new()
    }
}
