//! Vim editing modes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The current vim editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    /// Normal mode - navigation and commands.
    #[default]
    Normal,
    /// Visual mode - character-wise selection.
    Visual,
    /// Visual line mode - line-wise selection.
    VisualLine,
    /// Insert mode - text input.
    Insert,
    /// Replace mode - typed text overwrites.
    Replace,
}

impl ModeId {
    pub const ALL: [ModeId; 5] = [
        ModeId::Normal,
        ModeId::Visual,
        ModeId::VisualLine,
        ModeId::Insert,
        ModeId::Replace,
    ];

    /// Returns true for Insert and Replace, the modes that take typed text.
    pub fn is_insert_like(&self) -> bool {
        matches!(self, ModeId::Insert | ModeId::Replace)
    }

    /// Returns true for Visual and VisualLine.
    pub fn is_visual_like(&self) -> bool {
        matches!(self, ModeId::Visual | ModeId::VisualLine)
    }

    /// The mode reported to the host. Replace is an Insert variant there.
    pub fn external(&self) -> ModeId {
        match self {
            ModeId::Replace => ModeId::Insert,
            other => *other,
        }
    }

    /// Returns the mode name for display.
    pub fn label(&self) -> &'static str {
        match self {
            ModeId::Normal => "NORMAL",
            ModeId::Visual => "VISUAL",
            ModeId::VisualLine => "VISUAL LINE",
            ModeId::Insert => "INSERT",
            ModeId::Replace => "REPLACE",
        }
    }

    /// The name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeId::Normal => "normal",
            ModeId::Visual => "visual",
            ModeId::VisualLine => "visual_line",
            ModeId::Insert => "insert",
            ModeId::Replace => "replace",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeId::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown mode: {}", s))
    }
}
