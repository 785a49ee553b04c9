//! Raw-mode terminal guard and crossterm key translation.

use anyhow::Result;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Keeps the terminal in raw mode until dropped.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self { active: true })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            self.active = false;
        }
    }
}

/// `Ctrl-Q` ends an interactive session.
pub fn is_quit(event: &CKeyEvent) -> bool {
    event.modifiers.contains(CKeyModifiers::CONTROL)
        && matches!(event.code, CKeyCode::Char('q') | CKeyCode::Char('Q'))
}

/// Translate a terminal key event into an interpreter keystroke.
///
/// Releases and keys without a Vim notation (media, lock keys) map to `None`.
pub fn translate_key(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let mut mods = map_mods(event.modifiers);
    let code = match event.code {
        CKeyCode::Char(c) => {
            // Shift is already applied to the character.
            mods.remove(KeyModifiers::SHIFT);
            KeyCode::Char(legacy_control_char(c, mods))
        }
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Tab
        }
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Insert => KeyCode::Insert,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::F(n) => KeyCode::F(n),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(KeyEvent::new(code, mods))
}

fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

// Legacy terminals send Ctrl-\ and Ctrl-] as 0x1c/0x1d, which crossterm
// reports as Ctrl-4 and Ctrl-5.
fn legacy_control_char(c: char, mods: KeyModifiers) -> char {
    if !mods.contains(KeyModifiers::CTRL) {
        return c;
    }
    match c {
        '4' => '\\',
        '5' => ']',
        other => other,
    }
}
