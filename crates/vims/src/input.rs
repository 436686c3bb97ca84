//! Translation between crossterm key events and chord tokens.
//!
//! Characters are their own token (`d`, `D`, `$`). Named keys use lowercase
//! names (`escape`, `enter`, `pageup`) and modifiers are written as prefixes
//! joined with `+`, as in `ctrl+r` or `alt+shift+left`. Shift is never written
//! for a character; the character itself carries it.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The token for a key press, or `None` for keys the engine has no name for.
pub fn key_token(key: &KeyEvent) -> Option<String> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let mut modifiers = key.modifiers;
    let name = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => {
            modifiers.remove(KeyModifiers::SHIFT);
            c.to_string()
        }
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => {
            modifiers.insert(KeyModifiers::SHIFT);
            "tab".to_string()
        }
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };

    let mut token = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        token.push_str("ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        token.push_str("alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        token.push_str("shift+");
    }
    token.push_str(&name);
    Some(token)
}

/// Parses a token such as `ctrl+s`, `escape` or `G` back into a key event.
pub fn parse_key(token: &str) -> Option<KeyEvent> {
    let token = token.trim();
    let parts: Vec<&str> = token.split('+').collect();

    let mut modifiers = KeyModifiers::NONE;
    let key_part = match parts.split_last() {
        // A bare `+` splits into two empty parts.
        _ if token == "+" => "+",
        Some((last, rest)) => {
            for part in rest {
                match part.to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" | "meta" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return None,
                }
            }
            *last
        }
        None => return None,
    };

    let mut chars = key_part.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => KeyCode::Char(c),
        _ => match key_part.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "esc" | "escape" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "insert" | "ins" => KeyCode::Insert,
            name => {
                let n = name.strip_prefix('f')?.parse::<u8>().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                KeyCode::F(n)
            }
        },
    };

    Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
        key_token(&KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_characters_are_their_own_token() {
        assert_eq!(token(KeyCode::Char('d'), KeyModifiers::NONE).as_deref(), Some("d"));
        assert_eq!(token(KeyCode::Char('G'), KeyModifiers::SHIFT).as_deref(), Some("G"));
        assert_eq!(token(KeyCode::Char('$'), KeyModifiers::SHIFT).as_deref(), Some("$"));
        assert_eq!(token(KeyCode::Char(' '), KeyModifiers::NONE).as_deref(), Some("space"));
    }

    #[test]
    fn test_modifiers_become_prefixes() {
        assert_eq!(
            token(KeyCode::Char('r'), KeyModifiers::CONTROL).as_deref(),
            Some("ctrl+r")
        );
        assert_eq!(
            token(KeyCode::Left, KeyModifiers::ALT | KeyModifiers::SHIFT).as_deref(),
            Some("alt+shift+left")
        );
        assert_eq!(token(KeyCode::BackTab, KeyModifiers::SHIFT).as_deref(), Some("shift+tab"));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(token(KeyCode::Esc, KeyModifiers::NONE).as_deref(), Some("escape"));
        assert_eq!(token(KeyCode::PageDown, KeyModifiers::NONE).as_deref(), Some("pagedown"));
        assert_eq!(token(KeyCode::F(5), KeyModifiers::NONE).as_deref(), Some("f5"));
        assert_eq!(token(KeyCode::Null, KeyModifiers::NONE), None);
    }

    #[test]
    fn test_parse_key() {
        let key = parse_key("ctrl+s").unwrap();
        assert_eq!(key.code, KeyCode::Char('s'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);

        assert_eq!(parse_key("G").unwrap().code, KeyCode::Char('G'));
        assert_eq!(parse_key("esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key("Escape").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key("+").unwrap().code, KeyCode::Char('+'));
        assert_eq!(parse_key("f12").unwrap().code, KeyCode::F(12));
        assert!(parse_key("hyper+x").is_none());
        assert!(parse_key("f13").is_none());
    }

    #[test]
    fn test_tokens_survive_parsing() {
        for t in ["x", "ctrl+r", "escape", "enter", "shift+tab", "pageup", "alt+left"] {
            let key = parse_key(t).unwrap();
            assert_eq!(key_token(&key).as_deref(), Some(t));
        }
    }
}
