//! Core key event types shared by the keymap, interpreter and front-ends.
//!
//! A `KeyEvent` is one physical keystroke after platform normalization: a
//! logical key code plus a modifier set. Front-ends (terminal, tests, the
//! notation parser) construct them; the interpreter only reads them.

use std::fmt;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// KeyCode enumerates normalized logical key representations consumed by higher layers.
/// Printable keys always travel as `Char`, including space and `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified printable key.
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    /// `<C-x>` chord.
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// Unmodified named key.
    pub const fn named(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// The literal character this keystroke types, if any.
    ///
    /// Chords with CTRL or ALT type nothing. SHIFT is already folded into the
    /// character by the front-end so it is ignored here.
    pub fn typed_char(&self) -> Option<char> {
        if self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            return None;
        }
        match self.code {
            KeyCode::Char(c) if !c.is_control() => Some(c),
            KeyCode::Tab => Some('\t'),
            _ => None,
        }
    }

    /// Decimal digit value for unmodified `0`..=`9`.
    pub fn digit(&self) -> Option<u32> {
        self.typed_char().and_then(|c| c.to_digit(10))
    }

    /// `<Esc>`, `<C-c>` or `<C-[>`.
    pub fn is_cancel(&self) -> bool {
        match self.code {
            KeyCode::Esc => true,
            KeyCode::Char('c') | KeyCode::Char('[') => self.mods.contains(KeyModifiers::CTRL),
            _ => false,
        }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        KeyEvent::char(c)
    }
}

fn named_key(code: KeyCode) -> Option<&'static str> {
    let name = match code {
        KeyCode::Enter => "CR",
        KeyCode::Esc => "Esc",
        KeyCode::Backspace => "BS",
        KeyCode::Tab => "Tab",
        KeyCode::Delete => "Del",
        KeyCode::Insert => "Insert",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Char(' ') => "Space",
        KeyCode::Char('<') => "lt",
        KeyCode::Char('|') => "Bar",
        KeyCode::Char('\\') => "Bslash",
        KeyCode::Char(_) | KeyCode::F(_) => return None,
    };
    Some(name)
}

/// Renders the key in Vim notation (`w`, `<Esc>`, `<C-w>`, `<lt>`).
impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let named = named_key(self.code);
        if self.mods.is_empty() {
            return match (self.code, named) {
                (_, Some(name)) => write!(f, "<{name}>"),
                (KeyCode::F(n), None) => write!(f, "<F{n}>"),
                (KeyCode::Char(c), None) => write!(f, "{c}"),
                _ => Ok(()),
            };
        }
        f.write_str("<")?;
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("A-")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("S-")?;
        }
        match (self.code, named) {
            (_, Some(name)) => f.write_str(name)?,
            (KeyCode::F(n), None) => write!(f, "F{n}")?,
            (KeyCode::Char(c), None) => write!(f, "{c}")?,
            _ => {}
        }
        f.write_str(">")
    }
}
