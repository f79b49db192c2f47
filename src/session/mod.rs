//! Reader preferences and chat history persisted between runs.
//!
//! Owned by the front end (the CLI here); search and chat never read it.

use crate::domain::{ChatMessage, ChatRole};
use crate::error::{BookError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const MIN_FONT_SCALE: u32 = 80;
pub const MAX_FONT_SCALE: u32 = 150;
pub const FONT_SCALE_STEP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineSpacing {
    Compact,
    #[default]
    Normal,
    Relaxed,
}

impl LineSpacing {
    pub fn as_str(self) -> &'static str {
        match self {
            LineSpacing::Compact => "compact",
            LineSpacing::Normal => "normal",
            LineSpacing::Relaxed => "relaxed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Everything the reader remembers between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderState {
    #[serde(default)]
    pub current_chapter: usize,

    /// Percentage, 80 to 150 in steps of 10
    #[serde(default = "default_font_scale")]
    pub font_scale: u32,

    #[serde(default)]
    pub line_spacing: LineSpacing,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub sidebar_collapsed: bool,

    #[serde(default)]
    pub chat_history: ChatHistory,
}

impl Default for ReaderState {
    fn default() -> Self {
        Self {
            current_chapter: 0,
            font_scale: default_font_scale(),
            line_spacing: LineSpacing::default(),
            theme: Theme::default(),
            sidebar_collapsed: false,
            chat_history: ChatHistory::default(),
        }
    }
}

fn default_font_scale() -> u32 {
    100
}

fn snap_font_scale(percent: i32) -> u32 {
    let half = FONT_SCALE_STEP / 2;
    let snapped = percent.saturating_add(half).div_euclid(FONT_SCALE_STEP) * FONT_SCALE_STEP;
    snapped.clamp(MIN_FONT_SCALE as i32, MAX_FONT_SCALE as i32) as u32
}

impl ReaderState {
    /// Load saved state; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no reader state at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| BookError::State(format!("failed to read {}: {e}", path.display())))?;
        let mut state: ReaderState = serde_json::from_str(&raw)
            .map_err(|e| BookError::State(format!("failed to parse {}: {e}", path.display())))?;
        state.font_scale = snap_font_scale(i32::try_from(state.font_scale).unwrap_or(i32::MAX));
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                BookError::State(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| BookError::State(format!("failed to serialize state: {e}")))?;
        fs::write(path, raw)
            .map_err(|e| BookError::State(format!("failed to write {}: {e}", path.display())))
    }

    /// Jump to a chapter; out-of-range indexes are ignored.
    pub fn go_to(&mut self, index: usize, chapter_count: usize) -> bool {
        if index >= chapter_count {
            return false;
        }
        self.current_chapter = index;
        true
    }

    pub fn next_chapter(&mut self, chapter_count: usize) -> bool {
        self.go_to(self.current_chapter + 1, chapter_count)
    }

    pub fn prev_chapter(&mut self, chapter_count: usize) -> bool {
        match self.current_chapter.checked_sub(1) {
            Some(index) => self.go_to(index, chapter_count),
            None => false,
        }
    }

    /// Change the font scale by `delta` percent. The result is rounded to
    /// the nearest step of 10 and clamped to 80..=150.
    pub fn adjust_font_scale(&mut self, delta: i32) -> u32 {
        let current = i32::try_from(self.font_scale).unwrap_or(i32::MAX);
        self.font_scale = snap_font_scale(current.saturating_add(delta));
        self.font_scale
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.theme
    }
}

/// Chat transcript, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    /// Append a message, keeping at most `limit` of the newest.
    pub fn push(
        &mut self,
        role: ChatRole,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        limit: usize,
    ) {
        self.messages.push(ChatMessage { role, content: content.into(), timestamp });
        if self.messages.len() > limit {
            let excess = self.messages.len() - limit;
            self.messages.drain(..excess);
        }
    }

    /// Drop messages not newer than `now - max_age`.
    pub fn prune(&mut self, now: DateTime<Utc>, max_age: Duration) {
        let cutoff = now - max_age;
        self.messages.retain(|m| m.timestamp > cutoff);
    }

    /// The last `count` messages
    pub fn recent(&self, count: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
