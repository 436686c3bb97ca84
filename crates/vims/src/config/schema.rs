//! Configuration schema definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::VimError;
use crate::vim::ModeId;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Editor settings
    pub editor: EditorConfig,
    /// Register storage
    pub clipboard: ClipboardConfig,
    /// Chord suggestion list
    pub suggestions: SuggestionsConfig,
}

/// Shape of the cursor shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Block,
    Line,
    Underline,
    LineThin,
    BlockOutline,
    UnderlineThin,
}

impl CursorStyle {
    pub const ALL: [CursorStyle; 6] = [
        CursorStyle::Block,
        CursorStyle::Line,
        CursorStyle::Underline,
        CursorStyle::LineThin,
        CursorStyle::BlockOutline,
        CursorStyle::UnderlineThin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CursorStyle::Block => "block",
            CursorStyle::Line => "line",
            CursorStyle::Underline => "underline",
            CursorStyle::LineThin => "line-thin",
            CursorStyle::BlockOutline => "block-outline",
            CursorStyle::UnderlineThin => "underline-thin",
        }
    }
}

impl fmt::Display for CursorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CursorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CursorStyle::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown cursor style: {}", s))
    }
}

/// Editor-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Mode entered at startup and when the active document changes
    #[serde(deserialize_with = "default_mode")]
    pub default_mode: ModeId,
    /// Cursor style outside of insert-like modes
    #[serde(deserialize_with = "cursor_style")]
    pub cursor_style: CursorStyle,
    /// Cursor style in insert-like modes
    #[serde(deserialize_with = "insert_cursor_style")]
    pub insert_cursor_style: CursorStyle,
    /// Relative line numbers outside of insert-like modes
    pub smart_relative_line_numbers: bool,
    /// Tab size in spaces
    pub tab_size: u8,
    /// Indent with spaces instead of tabs
    pub insert_spaces: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_mode: ModeId::Normal,
            cursor_style: CursorStyle::Block,
            insert_cursor_style: CursorStyle::Line,
            smart_relative_line_numbers: false,
            tab_size: 4,
            insert_spaces: true,
        }
    }
}

impl EditorConfig {
    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(usize::from(self.tab_size.max(1)))
        } else {
            "\t".to_string()
        }
    }
}

/// Where yanked text is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardBackend {
    /// In-process register
    #[default]
    Internal,
    /// System clipboard via arboard
    System,
}

impl fmt::Display for ClipboardBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClipboardBackend::Internal => "internal",
            ClipboardBackend::System => "system",
        })
    }
}

impl FromStr for ClipboardBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(ClipboardBackend::Internal),
            "system" => Ok(ClipboardBackend::System),
            other => Err(format!("unknown clipboard backend: {}", other)),
        }
    }
}

/// Register storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClipboardConfig {
    #[serde(deserialize_with = "clipboard_backend")]
    pub backend: ClipboardBackend,
}

/// Chord suggestion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Show the list of chords that can complete the typed keys
    pub enabled: bool,
}

/// Parses an enum setting, falling back to `fallback` on unknown values.
fn lenient<'de, D, T>(deserializer: D, field: &str, fallback: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    match raw.parse::<T>() {
        Ok(value) => Ok(value),
        Err(_) => {
            let err = VimError::InvalidConfiguration {
                field: field.to_string(),
                value: raw,
                fallback: fallback.to_string(),
            };
            tracing::warn!(error = %err, "invalid configuration value");
            Ok(fallback)
        }
    }
}

fn default_mode<'de, D: Deserializer<'de>>(d: D) -> Result<ModeId, D::Error> {
    lenient(d, "editor.default_mode", EditorConfig::default().default_mode)
}

fn cursor_style<'de, D: Deserializer<'de>>(d: D) -> Result<CursorStyle, D::Error> {
    lenient(d, "editor.cursor_style", EditorConfig::default().cursor_style)
}

fn insert_cursor_style<'de, D: Deserializer<'de>>(d: D) -> Result<CursorStyle, D::Error> {
    lenient(
        d,
        "editor.insert_cursor_style",
        EditorConfig::default().insert_cursor_style,
    )
}

fn clipboard_backend<'de, D: Deserializer<'de>>(d: D) -> Result<ClipboardBackend, D::Error> {
    lenient(d, "clipboard.backend", ClipboardBackend::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_style_names() {
        assert_eq!("line-thin".parse::<CursorStyle>(), Ok(CursorStyle::LineThin));
        assert_eq!(CursorStyle::BlockOutline.to_string(), "block-outline");
        assert!("blinky".parse::<CursorStyle>().is_err());
    }

    #[test]
    fn test_indent_unit() {
        let mut editor = EditorConfig::default();
        assert_eq!(editor.indent_unit(), "    ");
        editor.insert_spaces = false;
        assert_eq!(editor.indent_unit(), "\t");
    }

    #[test]
    fn test_invalid_enum_values_fall_back() {
        let toml = r#"
[editor]
default_mode = "command"
cursor_style = "blinky"
insert_cursor_style = "also-bad"
tab_size = 2

[clipboard]
backend = "floppy"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.editor.default_mode, ModeId::Normal);
        assert_eq!(config.editor.cursor_style, CursorStyle::Block);
        assert_eq!(config.editor.insert_cursor_style, CursorStyle::Line);
        assert_eq!(config.editor.tab_size, 2);
        assert_eq!(config.clipboard.backend, ClipboardBackend::Internal);
    }

    #[test]
    fn test_valid_enum_values() {
        let toml = r#"
[editor]
default_mode = "insert"
cursor_style = "underline"

[clipboard]
backend = "system"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.editor.default_mode, ModeId::Insert);
        assert_eq!(config.editor.cursor_style, CursorStyle::Underline);
        assert_eq!(config.clipboard.backend, ClipboardBackend::System);
    }
}
