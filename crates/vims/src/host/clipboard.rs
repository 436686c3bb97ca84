//! Yank register storage.

use anyhow::{Context, Result};

use crate::config::{ClipboardBackend, ClipboardConfig};

/// Text held in the register and whether it was yanked linewise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterContent {
    pub text: String,
    pub linewise: bool,
}

impl RegisterContent {
    pub fn new(text: impl Into<String>, linewise: bool) -> Self {
        Self {
            text: text.into(),
            linewise,
        }
    }
}

/// The unnamed register.
pub trait Registers {
    fn yank(&mut self, content: RegisterContent) -> Result<()>;

    /// Current register content, or `None` when nothing was yanked.
    fn put(&mut self) -> Result<Option<RegisterContent>>;
}

/// A register that lives in the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegisters {
    content: Option<RegisterContent>,
}

impl MemoryRegisters {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registers for MemoryRegisters {
    fn yank(&mut self, content: RegisterContent) -> Result<()> {
        self.content = Some(content);
        Ok(())
    }

    fn put(&mut self) -> Result<Option<RegisterContent>> {
        Ok(self.content.clone())
    }
}

/// The system clipboard. Remembers whether the last yank was linewise so
/// that putting it back keeps line semantics.
#[derive(Debug, Clone, Default)]
pub struct SystemClipboard {
    last: Option<RegisterContent>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registers for SystemClipboard {
    fn yank(&mut self, content: RegisterContent) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
        clipboard
            .set_text(content.text.clone())
            .context("Failed to copy to clipboard")?;
        self.last = Some(content);
        Ok(())
    }

    fn put(&mut self) -> Result<Option<RegisterContent>> {
        let mut clipboard = arboard::Clipboard::new().context("Failed to open clipboard")?;
        let text = match clipboard.get_text() {
            Ok(text) => text,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(e).context("Failed to read clipboard"),
        };
        let linewise = match &self.last {
            Some(last) if last.text == text => last.linewise,
            _ => text.ends_with('\n'),
        };
        Ok(Some(RegisterContent { text, linewise }))
    }
}

/// Builds the register storage selected in the configuration.
pub fn registers_for(config: &ClipboardConfig) -> Box<dyn Registers> {
    match config.backend {
        ClipboardBackend::Internal => Box::new(MemoryRegisters::new()),
        ClipboardBackend::System => match arboard::Clipboard::new() {
            Ok(_) => Box::new(SystemClipboard::new()),
            Err(e) => {
                tracing::warn!(error = %e, "system clipboard unavailable, using internal register");
                Box::new(MemoryRegisters::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_register() {
        let mut registers = MemoryRegisters::new();
        assert_eq!(registers.put().unwrap(), None);
        registers
            .yank(RegisterContent::new("line\n", true))
            .unwrap();
        let content = registers.put().unwrap().unwrap();
        assert_eq!(content.text, "line\n");
        assert!(content.linewise);
    }
}
