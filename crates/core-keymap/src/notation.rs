//! Vim key notation.
//!
//! ```text
//! sequence  = ( special | char )+
//! special   = "<" modifier* name ">"
//! modifier  = ("C" | "A" | "M" | "S") "-"
//! name      = "Esc" | "CR" | "Tab" | "Del" | "lt" | "F" digit+ | ... | char
//! ```
//!
//! Names are case-insensitive. A `<` that is not closed is an error; type a
//! literal `<` as `<lt>`.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty key sequence")]
    Empty,
    #[error("unterminated `<` at byte {position}")]
    Unterminated { position: usize },
    #[error("unknown key name `<{name}>` at byte {position}")]
    UnknownKey { name: String, position: usize },
}

/// Parse a notation string such as `d2w`, `<C-w>j` or `<Esc>`.
pub fn parse_keys(input: &str) -> Result<Vec<KeyEvent>, NotationError> {
    if input.is_empty() {
        return Err(NotationError::Empty);
    }
    let mut out = Vec::with_capacity(input.len());
    let mut rest = input;
    let mut position = 0usize;
    while let Some(ch) = rest.chars().next() {
        if ch != '<' {
            out.push(KeyEvent::char(ch));
            position += ch.len_utf8();
            rest = &rest[ch.len_utf8()..];
            continue;
        }
        let Some(close) = rest.find('>') else {
            return Err(NotationError::Unterminated { position });
        };
        let body = &rest[1..close];
        let key = parse_special(body).ok_or_else(|| NotationError::UnknownKey {
            name: body.to_string(),
            position,
        })?;
        out.push(key);
        position += close + 1;
        rest = &rest[close + 1..];
    }
    Ok(out)
}

/// Render keys back into notation.
pub fn format_keys(keys: &[KeyEvent]) -> String {
    keys.iter().map(ToString::to_string).collect()
}

fn parse_special(body: &str) -> Option<KeyEvent> {
    let mut mods = KeyModifiers::empty();
    let mut name = body;
    // A trailing "-" is a key name (`<C-->`), so at least one char must follow the prefix.
    while name.len() > 2 && name.as_bytes()[1] == b'-' {
        let flag = match name.as_bytes()[0].to_ascii_uppercase() {
            b'C' => KeyModifiers::CTRL,
            b'A' | b'M' => KeyModifiers::ALT,
            b'S' => KeyModifiers::SHIFT,
            _ => break,
        };
        mods |= flag;
        name = &name[2..];
    }
    let code = named_code(name).or_else(|| {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeyCode::Char(c)),
            _ => None,
        }
    })?;
    Some(normalize(code, mods))
}

fn named_code(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bar" => KeyCode::Char('|'),
        "bslash" => KeyCode::Char('\\'),
        _ => {
            let n = lower.strip_prefix('f')?.parse::<u8>().ok()?;
            if (1..=24).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
    };
    Some(code)
}

/// Fold SHIFT into printable characters and lowercase CTRL letters so that
/// `<C-W>` and `<C-w>` name the same key.
fn normalize(code: KeyCode, mut mods: KeyModifiers) -> KeyEvent {
    let code = match code {
        KeyCode::Char(c) if mods.contains(KeyModifiers::SHIFT) && c.is_alphabetic() => {
            mods.remove(KeyModifiers::SHIFT);
            KeyCode::Char(c.to_ascii_uppercase())
        }
        KeyCode::Char(c) if mods.contains(KeyModifiers::CTRL) => {
            KeyCode::Char(c.to_ascii_lowercase())
        }
        other => other,
    };
    KeyEvent::new(code, mods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_characters() {
        let keys = parse_keys("d2w").unwrap();
        assert_eq!(
            keys,
            vec![KeyEvent::char('d'), KeyEvent::char('2'), KeyEvent::char('w')]
        );
    }

    #[test]
    fn special_keys_and_modifiers() {
        let keys = parse_keys("<Esc><C-w>j<lt><Del>").unwrap();
        assert_eq!(
            keys,
            vec![
                KeyEvent::named(KeyCode::Esc),
                KeyEvent::ctrl('w'),
                KeyEvent::char('j'),
                KeyEvent::char('<'),
                KeyEvent::named(KeyCode::Delete),
            ]
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(
            parse_keys("<esc><C-W><cr>").unwrap(),
            vec![
                KeyEvent::named(KeyCode::Esc),
                KeyEvent::ctrl('w'),
                KeyEvent::named(KeyCode::Enter),
            ]
        );
    }

    #[test]
    fn ctrl_bracket_and_function_keys() {
        assert_eq!(parse_keys("<C-[>").unwrap(), vec![KeyEvent::ctrl('[')]);
        assert_eq!(
            parse_keys("<F12>").unwrap(),
            vec![KeyEvent::named(KeyCode::F(12))]
        );
        assert_eq!(
            parse_keys("<C-\\><C-n>").unwrap(),
            vec![KeyEvent::ctrl('\\'), KeyEvent::ctrl('n')]
        );
    }

    #[test]
    fn shift_letter_folds_to_uppercase() {
        assert_eq!(parse_keys("<S-a>").unwrap(), vec![KeyEvent::char('A')]);
        assert_eq!(
            parse_keys("<S-Up>").unwrap(),
            vec![KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT)]
        );
    }

    #[test]
    fn errors_carry_positions() {
        assert_eq!(parse_keys(""), Err(NotationError::Empty));
        assert_eq!(
            parse_keys("ab<Esc"),
            Err(NotationError::Unterminated { position: 2 })
        );
        assert_eq!(
            parse_keys("x<Nope>"),
            Err(NotationError::UnknownKey {
                name: "Nope".into(),
                position: 1
            })
        );
        assert_eq!(
            parse_keys("<F99>"),
            Err(NotationError::UnknownKey {
                name: "F99".into(),
                position: 0
            })
        );
    }

    #[test]
    fn format_round_trips_mixed_sequence() {
        let text = "\"ad<C-w><Esc><lt>";
        assert_eq!(format_keys(&parse_keys(text).unwrap()), text);
    }
}
