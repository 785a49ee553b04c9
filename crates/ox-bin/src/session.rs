//! In-memory editor host used by the CLI.
//!
//! There is no buffer: actions are looked up in the registry built from the
//! trie and only the handful that change modes or registers have an effect,
//! so the transcript shows the interpreter's mode round trips.

use std::collections::BTreeSet;
use std::io::Write;

use core_actions::{
    ActionError, ActionInvoker, ChangeProcessor, Document, ErrorIndicator, ExecutionScope,
    ModeController, RegisterStore,
};
use core_events::KeyEvent;
use core_keymap::{ActionId, Command, CommandKind, MappingMode};
use core_state::{Mode, ModeState, RegisterState};
use tracing::{debug, trace};

pub struct Session {
    modes: ModeState,
    registers: RegisterState,
    writable: bool,
    bell: bool,
    actions: BTreeSet<ActionId>,
    /// Raw text typed since the last drain.
    inserted: String,
    errors: usize,
}

impl Session {
    pub fn new(mode: Mode, actions: BTreeSet<ActionId>) -> Self {
        Self {
            modes: ModeState::new(mode),
            registers: RegisterState::new(),
            writable: true,
            bell: false,
            actions,
            inserted: String::new(),
            errors: 0,
        }
    }

    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn register(&self) -> char {
        self.registers.current()
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn take_inserted(&mut self) -> String {
        std::mem::take(&mut self.inserted)
    }

    fn leave_all_modes(&mut self) {
        while self.modes.depth() > 0 {
            self.modes.restore_mode();
        }
        self.modes.set_mode(Mode::Command);
    }
}

impl ModeController for Session {
    fn mode(&self) -> Mode {
        self.modes.mode()
    }

    fn mapping_mode(&self) -> MappingMode {
        self.modes.mapping_mode()
    }

    fn set_mapping_mode(&mut self, mapping: MappingMode) {
        self.modes.set_mapping_mode(mapping);
    }

    fn set_command(&mut self, cmd: &Command) {
        self.modes.set_last_command(cmd);
    }

    fn restore_mode(&mut self) {
        self.modes.restore_mode();
    }
}

impl ActionInvoker for Session {
    fn invoke(&mut self, action: &ActionId, cmd: &Command) -> Result<(), ActionError> {
        if !self.actions.contains(action) {
            return Err(ActionError::Unknown(action.clone()));
        }
        trace!(target: "runtime", action = %action, register = ?self.registers.current(), "invoke");
        match action.as_str() {
            "VimSelectRegister" => {
                let Some(name) = cmd.character() else {
                    return Err(ActionError::Failed {
                        action: action.clone(),
                        reason: "missing register name".into(),
                    });
                };
                if !self.registers.select(name) {
                    return Err(ActionError::Failed {
                        action: action.clone(),
                        reason: format!("invalid register {name:?}"),
                    });
                }
            }
            "VimInsertExitMode" | "VimVisualExit" | "VimDeleteVisual" | "VimCopyYankVisual" => {
                self.modes.restore_mode()
            }
            "VimChangeVisual" => {
                self.modes.restore_mode();
                self.modes.push_mode(Mode::Insert);
            }
            "VimChangeMotion" | "VimChangeLine" => self.modes.push_mode(Mode::Insert),
            "VimVisualToggleCharacterMode" => self.modes.push_mode(Mode::Visual),
            "VimResetMode" => self.leave_all_modes(),
            _ if cmd.kind() == CommandKind::Insert => self.modes.push_mode(Mode::Insert),
            _ => {}
        }
        Ok(())
    }
}

impl RegisterStore for Session {
    fn current_register_is_default(&self) -> bool {
        self.registers.is_default()
    }

    fn reset_register(&mut self) {
        self.registers.reset();
    }
}

impl ChangeProcessor for Session {
    fn process_raw_key(&mut self, key: &KeyEvent) {
        match key.typed_char() {
            Some(ch) => self.inserted.push(ch),
            None => self.inserted.push_str(&key.to_string()),
        }
    }

    fn process_completed_command(&mut self, cmd: &Command) {
        debug!(target: "runtime", command = %cmd, "insert_mode_command");
    }
}

impl Document for Session {
    fn is_writable(&self) -> bool {
        self.writable
    }
}

impl ErrorIndicator for Session {
    fn indicate_error(&mut self) {
        self.errors += 1;
        if self.bell {
            let mut err = std::io::stderr();
            let _ = err.write_all(b"\x07");
            let _ = err.flush();
        }
    }
}

impl ExecutionScope for Session {}
