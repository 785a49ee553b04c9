//! Seams between the interpreter and the editor it drives.
//!
//! Each trait is one responsibility; a host implements all of them on a single
//! value and gets [`EditorHost`] for free. `core-state` types cover the mode and
//! register contracts, so a host can delegate those.

use core_events::KeyEvent;
use core_keymap::{ActionId, Command, MappingMode};
use core_state::{Mode, ModeState, RegisterState};

use crate::ActionError;

pub trait ModeController {
    fn mode(&self) -> Mode;
    fn mapping_mode(&self) -> MappingMode;
    fn set_mapping_mode(&mut self, mapping: MappingMode);
    /// Record the command about to run.
    fn set_command(&mut self, cmd: &Command);
    /// Leave a temporary mode.
    fn restore_mode(&mut self);
}

pub trait ActionInvoker {
    fn invoke(&mut self, action: &ActionId, cmd: &Command) -> Result<(), ActionError>;
}

pub trait RegisterStore {
    fn current_register_is_default(&self) -> bool;
    fn reset_register(&mut self);
}

/// Text-entry bookkeeping for insert and replace modes.
pub trait ChangeProcessor {
    /// A key with no mapping typed in insert/replace mode.
    fn process_raw_key(&mut self, key: &KeyEvent);
    /// A command that completed while in insert/replace mode.
    fn process_completed_command(&mut self, cmd: &Command);
}

pub trait Document {
    fn is_writable(&self) -> bool;
}

pub trait ErrorIndicator {
    fn indicate_error(&mut self);
}

/// Read/write scopes around command execution. Read-only commands run in
/// `run_read`, everything else in `run_write`. Both default to running the
/// job inline.
pub trait ExecutionScope {
    fn run_read(&mut self, job: &mut dyn FnMut(&mut Self)) {
        job(self)
    }

    fn run_write(&mut self, job: &mut dyn FnMut(&mut Self)) {
        job(self)
    }
}

pub trait EditorHost:
    ModeController
    + ActionInvoker
    + RegisterStore
    + ChangeProcessor
    + Document
    + ErrorIndicator
    + ExecutionScope
{
}

impl<T> EditorHost for T where
    T: ModeController
        + ActionInvoker
        + RegisterStore
        + ChangeProcessor
        + Document
        + ErrorIndicator
        + ExecutionScope
{
}

impl ModeController for ModeState {
    fn mode(&self) -> Mode {
        ModeState::mode(self)
    }

    fn mapping_mode(&self) -> MappingMode {
        ModeState::mapping_mode(self)
    }

    fn set_mapping_mode(&mut self, mapping: MappingMode) {
        ModeState::set_mapping_mode(self, mapping)
    }

    fn set_command(&mut self, cmd: &Command) {
        self.set_last_command(cmd)
    }

    fn restore_mode(&mut self) {
        ModeState::restore_mode(self)
    }
}

impl RegisterStore for RegisterState {
    fn current_register_is_default(&self) -> bool {
        self.is_default()
    }

    fn reset_register(&mut self) {
        self.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_keymap::{CommandFlags, CommandKind};

    #[test]
    fn mode_state_satisfies_controller() {
        let mut st = ModeState::new(Mode::Command);
        let ctl: &mut dyn ModeController = &mut st;
        ctl.set_mapping_mode(MappingMode::OperatorPending);
        assert_eq!(ctl.mapping_mode(), MappingMode::OperatorPending);
        let cmd = Command::new(0, Some("VimUndo".into()), CommandKind::OtherWritable, CommandFlags::empty());
        ctl.set_command(&cmd);
        ctl.set_mapping_mode(MappingMode::Normal);
        assert_eq!(ctl.mapping_mode(), MappingMode::Normal);
        assert_eq!(st.last_command(), Some(&cmd));
    }

    #[test]
    fn register_state_satisfies_store() {
        let mut regs = RegisterState::new();
        assert!(regs.current_register_is_default());
        regs.select('q');
        assert!(!regs.current_register_is_default());
        regs.reset_register();
        assert!(regs.current_register_is_default());
    }
}
