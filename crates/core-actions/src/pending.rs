use std::fmt;

use core_events::KeyEvent;
use core_keymap::{ArgumentKind, NodeId, format_keys};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for the first key of a command (counts accepted).
    #[default]
    NewCommand,
    /// Inside a multi-key sequence.
    InSequence,
    /// The stack holds a complete command.
    Ready,
    Error,
}

/// Cross-keystroke state of the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingState {
    pub count: u32,
    pub expected: ArgumentKind,
    pub cursor: NodeId,
    /// Keys fed to the trie since the last partial reset.
    pub keys: SmallVec<[KeyEvent; 4]>,
    pub phase: Phase,
}

impl PendingState {
    pub fn new(root: NodeId) -> Self {
        Self {
            count: 0,
            expected: ArgumentKind::None,
            cursor: root,
            keys: SmallVec::new(),
            phase: Phase::NewCommand,
        }
    }

    pub(crate) fn partial_reset(&mut self, root: NodeId) {
        self.count = 0;
        self.keys.clear();
        self.cursor = root;
    }

    pub(crate) fn reset(&mut self, root: NodeId) {
        self.partial_reset(root);
        self.phase = Phase::NewCommand;
        self.expected = ArgumentKind::None;
    }

    /// Append a decimal digit, saturating at `max`.
    pub(crate) fn push_digit(&mut self, digit: u32, max: u32) {
        self.count = self
            .count
            .saturating_mul(10)
            .saturating_add(digit)
            .min(max);
    }

    pub(crate) fn drop_digit(&mut self) {
        self.count /= 10;
    }

    pub fn key_log(&self) -> String {
        format_keys(&self.keys)
    }
}

/// Read-only view for status display ("showcmd").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSnapshot {
    pub phase: Phase,
    pub count: u32,
    pub expected: ArgumentKind,
    pub stack_depth: usize,
    pub keys: String,
}

impl PendingSnapshot {
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::NewCommand
            && self.count == 0
            && self.expected == ArgumentKind::None
            && self.stack_depth == 0
            && self.keys.is_empty()
    }
}

/// `3d`, `"a`, or empty when idle.
impl fmt::Display for PendingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 0 {
            write!(f, "{}", self.count)?;
        }
        f.write_str(&self.keys)
    }
}
