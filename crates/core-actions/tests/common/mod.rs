#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use core_actions::{
    ActionError, ActionInvoker, ChangeProcessor, Document, ErrorIndicator, ExecutionScope,
    Interpreter, KeyOutcome, ModeController, RegisterStore,
};
use core_events::KeyEvent;
use core_keymap::{ActionId, Argument, Command, KeyTrie, MappingMode, MappingSpec, baseline_specs, parse_keys};
use core_state::{Mode, ModeState, RegisterState};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

/// Host that records every interaction and mimics a few mode-changing actions.
#[derive(Debug)]
pub struct MockHost {
    pub modes: ModeState,
    pub registers: RegisterState,
    pub writable: bool,
    /// Commands handed to the invoker, in order.
    pub invoked: Vec<Command>,
    /// Register selected at the time of each invocation.
    pub invoked_registers: Vec<char>,
    pub raw_keys: Vec<KeyEvent>,
    pub completed: Vec<Command>,
    pub errors: usize,
    pub register_resets: usize,
    pub restores: usize,
    /// "read" / "write" per executed command.
    pub scopes: Vec<&'static str>,
    /// Action names the invoker reports as unknown.
    pub unknown: BTreeSet<String>,
}

impl MockHost {
    pub fn new(mode: Mode) -> Self {
        Self {
            modes: ModeState::new(mode),
            registers: RegisterState::new(),
            writable: true,
            invoked: Vec::new(),
            invoked_registers: Vec::new(),
            raw_keys: Vec::new(),
            completed: Vec::new(),
            errors: 0,
            register_resets: 0,
            restores: 0,
            scopes: Vec::new(),
            unknown: BTreeSet::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn invoked_names(&self) -> Vec<String> {
        self.invoked
            .iter()
            .map(|c| c.action().map(ToString::to_string).unwrap_or_default())
            .collect()
    }
}

impl ModeController for MockHost {
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
        self.restores += 1;
        self.modes.restore_mode();
    }
}

impl ActionInvoker for MockHost {
    fn invoke(&mut self, action: &ActionId, cmd: &Command) -> Result<(), ActionError> {
        if self.unknown.contains(action.as_str()) {
            return Err(ActionError::Unknown(action.clone()));
        }
        self.invoked.push(cmd.clone());
        self.invoked_registers.push(self.registers.current());
        match action.as_str() {
            "VimInsertBeforeCursor" | "VimInsertAfterCursor" | "VimInsertLineStart"
            | "VimInsertAfterLineEnd" | "VimInsertNewLineBelow" | "VimInsertNewLineAbove" => {
                self.modes.push_mode(Mode::Insert)
            }
            "VimChangeMotion" | "VimChangeLine" => self.modes.push_mode(Mode::Insert),
            "VimInsertExitMode" | "VimVisualExit" | "VimDeleteVisual" | "VimCopyYankVisual" => {
                self.modes.restore_mode()
            }
            "VimVisualToggleCharacterMode" => self.modes.push_mode(Mode::Visual),
            "VimSelectRegister" => {
                if let Some(Argument::Character(c)) = cmd.argument() {
                    self.registers.select(*c);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl RegisterStore for MockHost {
    fn current_register_is_default(&self) -> bool {
        self.registers.is_default()
    }

    fn reset_register(&mut self) {
        self.register_resets += 1;
        self.registers.reset();
    }
}

impl ChangeProcessor for MockHost {
    fn process_raw_key(&mut self, key: &KeyEvent) {
        self.raw_keys.push(*key);
    }

    fn process_completed_command(&mut self, cmd: &Command) {
        self.completed.push(cmd.clone());
    }
}

impl Document for MockHost {
    fn is_writable(&self) -> bool {
        self.writable
    }
}

impl ErrorIndicator for MockHost {
    fn indicate_error(&mut self) {
        self.errors += 1;
    }
}

impl ExecutionScope for MockHost {
    fn run_read(&mut self, job: &mut dyn FnMut(&mut Self)) {
        self.scopes.push("read");
        job(self)
    }

    fn run_write(&mut self, job: &mut dyn FnMut(&mut Self)) {
        self.scopes.push("write");
        job(self)
    }
}

pub fn interpreter() -> Interpreter {
    Interpreter::new(Arc::new(KeyTrie::build(baseline_specs())))
}

pub fn interpreter_with(extra: Vec<MappingSpec>) -> Interpreter {
    let mut specs = baseline_specs();
    specs.extend(extra);
    Interpreter::new(Arc::new(KeyTrie::build(specs)))
}

pub fn keys(notation: &str) -> Vec<KeyEvent> {
    parse_keys(notation).expect("valid key notation")
}

/// Feed a notation string key by key, collecting every outcome.
pub fn feed(interp: &mut Interpreter, host: &mut MockHost, notation: &str) -> Vec<KeyOutcome> {
    keys(notation)
        .into_iter()
        .map(|key| interp.handle_key(host, key))
        .collect()
}

/// Outcomes that are not `Pending`.
pub fn settled(outcomes: Vec<KeyOutcome>) -> Vec<KeyOutcome> {
    outcomes
        .into_iter()
        .filter(|o| *o != KeyOutcome::Pending)
        .collect()
}

/// The single command dispatched by `notation`; panics otherwise.
pub fn dispatch_one(interp: &mut Interpreter, host: &mut MockHost, notation: &str) -> Command {
    let outcomes = settled(feed(interp, host, notation));
    match outcomes.as_slice() {
        [KeyOutcome::Dispatched(cmd)] => cmd.clone(),
        other => panic!("expected one dispatched command for {notation:?}, got {other:?}"),
    }
}

/// Interpreter state is back to its initial value.
pub fn assert_idle(interp: &Interpreter, host: &MockHost) {
    let snap = interp.snapshot();
    assert!(snap.is_idle(), "interpreter not idle: {snap:?}");
    assert_eq!(host.modes.mapping_mode(), host.modes.mode().mapping());
    assert_eq!(
        interp.pending().cursor,
        interp.trie().root(host.modes.mapping_mode())
    );
}

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` under a DEBUG-level fmt subscriber and return what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter { inner: buf.clone() };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    let out = with_default(subscriber, f);
    let text = String::from_utf8(buf.lock().expect("log buffer poisoned").clone())
        .expect("utf8 log output");
    (out, text)
}
