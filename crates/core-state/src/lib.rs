//! Editor mode bookkeeping and register selection.
//!
//! `ModeState` tracks the editing mode, the temporary-mode stack used by
//! commands that briefly switch modes (e.g. `<C-o>` from insert), the
//! operator-pending mapping override, and the last command handed to an
//! action. `RegisterState` tracks which register the next command targets.
//!
//! Both are plain in-memory stores; the interpreter reaches them through the
//! host traits defined in `core-actions`.

use core_keymap::{Command, MappingMode};
use tracing::trace;

mod registers;
pub use registers::{DEFAULT_REGISTER, RegisterState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Normal command/navigation mode.
    #[default]
    Command,
    /// Insert text mode.
    Insert,
    /// Overwrite text mode.
    Replace,
    /// Character-wise selection mode.
    Visual,
}

impl Mode {
    /// Mapping used for lookups when no operator is pending.
    pub const fn mapping(self) -> MappingMode {
        match self {
            Mode::Command => MappingMode::Normal,
            Mode::Visual => MappingMode::Visual,
            Mode::Insert | Mode::Replace => MappingMode::Insert,
        }
    }

    pub const fn is_text_entry(self) -> bool {
        matches!(self, Mode::Insert | Mode::Replace)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ModeState {
    mode: Mode,
    /// Modes to return to when a temporary switch ends (top = most recent).
    previous: Vec<Mode>,
    operator_pending: bool,
    last_command: Option<Command>,
}

impl ModeState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Replace the current mode without remembering it.
    pub fn set_mode(&mut self, mode: Mode) {
        trace!(target: "state.mode", from = ?self.mode, to = ?mode, "set_mode");
        self.mode = mode;
    }

    /// Switch to `mode`, remembering the current one for [`ModeState::restore_mode`].
    pub fn push_mode(&mut self, mode: Mode) {
        trace!(target: "state.mode", from = ?self.mode, to = ?mode, "push_mode");
        self.previous.push(self.mode);
        self.mode = mode;
    }

    /// Return to the mode active before the last `push_mode`; no-op when none.
    pub fn restore_mode(&mut self) {
        if let Some(prev) = self.previous.pop() {
            trace!(target: "state.mode", from = ?self.mode, to = ?prev, "restore_mode");
            self.mode = prev;
        }
    }

    pub fn depth(&self) -> usize {
        self.previous.len()
    }

    /// OperatorPending while an operator waits for its motion, otherwise the
    /// mapping that belongs to the current mode.
    pub fn mapping_mode(&self) -> MappingMode {
        if self.operator_pending {
            MappingMode::OperatorPending
        } else {
            self.mode.mapping()
        }
    }

    /// Only the operator-pending override is stored; any other value clears it.
    pub fn set_mapping_mode(&mut self, mapping: MappingMode) {
        self.operator_pending = mapping == MappingMode::OperatorPending;
    }

    pub fn set_last_command(&mut self, cmd: &Command) {
        self.last_command = Some(cmd.clone());
    }

    pub fn last_command(&self) -> Option<&Command> {
        self.last_command.as_ref()
    }
}
