//! Key-event state machine.
//!
//! Rules are tried in order for every key:
//!
//! 1. cancel (`<Esc>`, `<C-c>`, `<C-[>`; command mode only)
//! 2. count digit / count delete (command or visual mode, start of a command)
//! 3. character argument
//! 4. trie resolution (branch, command leaf, argument node, no match)
//!
//! An argument node completes the command under construction and then feeds
//! the same key again as the first key of its argument. That second pass is
//! bounded: a key may resolve to an argument node only once.

use std::sync::Arc;

use core_events::{KeyCode, KeyEvent};
use core_keymap::{
    Argument, ArgumentKind, Command, CommandFlags, CommandKind, CommandSpec, KeyTrie, Lookup,
    MappingMode,
};
use core_state::Mode;
use tracing::{debug, error, trace};

use crate::host::{EditorHost, ModeController, RegisterStore};
use crate::pending::{PendingSnapshot, PendingState, Phase};
use crate::stack::{CommandStack, normalize_counts};
use crate::{InterpretError, dispatcher};

/// Counts saturate here unless configured otherwise.
pub const DEFAULT_MAX_COUNT: u32 = 999_999;

/// What a single keystroke did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; the command is not complete yet.
    Pending,
    /// Forwarded as raw text (insert/replace mode, no mapping).
    Inserted,
    /// Pending state discarded by a cancel key.
    Cancelled,
    /// A complete command was executed.
    Dispatched(Command),
    /// The pending command was discarded.
    Rejected(InterpretError),
}

enum Flow {
    Consumed,
    Cancelled,
    Inserted,
    /// Feed the same key again after an argument node.
    Redispatch,
}

/// Incremental key-sequence interpreter.
///
/// One instance per editing session. It is not synchronized: a host that
/// receives keys on several threads must serialize them into one interpreter.
#[derive(Debug)]
pub struct Interpreter {
    trie: Arc<KeyTrie>,
    state: PendingState,
    stack: CommandStack,
    max_count: u32,
}

impl Interpreter {
    pub fn new(trie: Arc<KeyTrie>) -> Self {
        let root = trie.root(MappingMode::Normal);
        Self {
            trie,
            state: PendingState::new(root),
            stack: CommandStack::new(),
            max_count: DEFAULT_MAX_COUNT,
        }
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count.max(1);
        self
    }

    pub fn trie(&self) -> &Arc<KeyTrie> {
        &self.trie
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn count(&self) -> u32 {
        self.state.count
    }

    pub fn expected_argument(&self) -> ArgumentKind {
        self.state.expected
    }

    pub fn key_log(&self) -> String {
        self.state.key_log()
    }

    pub fn pending(&self) -> &PendingState {
        &self.state
    }

    pub fn snapshot(&self) -> PendingSnapshot {
        PendingSnapshot {
            phase: self.state.phase,
            count: self.state.count,
            expected: self.state.expected,
            stack_depth: self.stack.len(),
            keys: self.state.key_log(),
        }
    }

    /// Process one keystroke to completion.
    pub fn handle_key<H: EditorHost>(&mut self, host: &mut H, key: KeyEvent) -> KeyOutcome {
        let mut redispatched = false;
        loop {
            match self.step(host, &key) {
                Ok(Flow::Consumed) => break,
                Ok(Flow::Redispatch) if !redispatched => {
                    trace!(target: "input.interp", key = %key, "redispatch");
                    redispatched = true;
                }
                Ok(Flow::Redispatch) => return self.fail(host, InterpretError::NestedArgument),
                Ok(Flow::Cancelled) => return KeyOutcome::Cancelled,
                Ok(Flow::Inserted) => return KeyOutcome::Inserted,
                Err(err) => return self.fail(host, err),
            }
        }
        if self.state.phase == Phase::Ready {
            self.complete(host)
        } else {
            KeyOutcome::Pending
        }
    }

    /// Partial reset: count, key log and trie cursor.
    fn partial_reset<H: ModeController + ?Sized>(&mut self, host: &H) {
        let root = self.trie.root(host.mapping_mode());
        self.state.partial_reset(root);
    }

    /// Discard the command under construction.
    pub fn reset<H: ModeController + ?Sized>(&mut self, host: &H) {
        let root = self.trie.root(host.mapping_mode());
        self.state.reset(root);
        self.stack.clear();
        debug!(target: "input.interp", "reset");
    }

    /// [`Interpreter::reset`] plus leaving operator-pending and dropping the
    /// selected register.
    pub fn full_reset<H: ModeController + RegisterStore + ?Sized>(&mut self, host: &mut H) {
        host.set_mapping_mode(MappingMode::Normal);
        self.reset(host);
        host.reset_register();
        debug!(target: "input.interp", "full_reset");
    }

    fn step<H: EditorHost>(&mut self, host: &mut H, key: &KeyEvent) -> Result<Flow, InterpretError> {
        let mode = host.mode();

        if mode == Mode::Command && key.is_cancel() {
            let idle = self.state.count == 0
                && self.state.expected == ArgumentKind::None
                && self.stack.is_empty()
                && host.current_register_is_default();
            if idle {
                host.indicate_error();
            }
            debug!(target: "input.interp", idle, "cancel");
            self.full_reset(host);
            return Ok(Flow::Cancelled);
        }

        let counting = matches!(mode, Mode::Command | Mode::Visual)
            && self.state.phase == Phase::NewCommand
            && self.state.expected != ArgumentKind::Character;
        if counting {
            // A leading 0 is the line-start motion, not a count.
            if let Some(digit) = key.digit().filter(|d| *d != 0 || self.state.count != 0) {
                self.state.push_digit(digit, self.max_count);
                trace!(target: "input.interp", count = self.state.count, "count");
                return Ok(Flow::Consumed);
            }
            if key.code == KeyCode::Delete && self.state.count != 0 {
                self.state.drop_digit();
                trace!(target: "input.interp", count = self.state.count, "count_delete");
                return Ok(Flow::Consumed);
            }
        }

        if self.state.expected == ArgumentKind::Character {
            let Some(ch) = key.typed_char() else {
                return Err(InterpretError::ExpectedCharacter {
                    key: key.to_string(),
                });
            };
            let top = self.stack.top_mut().ok_or(InterpretError::NoCommand)?;
            top.set_argument(Argument::Character(ch));
            self.state.phase = Phase::Ready;
            return Ok(Flow::Consumed);
        }

        // A fresh sequence always starts at the root of the current mapping,
        // even if the host switched modes since the last reset.
        if self.state.keys.is_empty() {
            self.state.cursor = self.trie.root(host.mapping_mode());
        }
        self.state.keys.push(*key);
        trace!(target: "input.interp", keys = %self.state.key_log(), "key");

        let trie = Arc::clone(&self.trie);
        match trie.lookup(self.state.cursor, key) {
            Some(Lookup::Branch(next)) => {
                self.state.phase = Phase::InSequence;
                self.state.cursor = next;
                Ok(Flow::Consumed)
            }
            Some(Lookup::Command(spec)) => self.on_command(spec),
            Some(Lookup::Argument(spec)) => self.on_argument(host, spec),
            None if mode.is_text_entry() => {
                host.process_raw_key(key);
                self.reset(host);
                Ok(Flow::Inserted)
            }
            None => Err(InterpretError::UnknownSequence {
                keys: self.state.key_log(),
            }),
        }
    }

    fn on_command(&mut self, spec: &CommandSpec) -> Result<Flow, InterpretError> {
        if self.state.expected == ArgumentKind::Motion {
            match spec.kind {
                CommandKind::Motion => self.stack.push(Command::from_spec(self.state.count, spec)),
                CommandKind::Reset => {
                    self.stack.clear();
                    self.stack.push(Command::from_spec(1, spec));
                }
                kind => return Err(InterpretError::NotAMotion { kind }),
            }
        } else {
            self.stack.push(Command::from_spec(self.state.count, spec));
            if spec.action.is_none() {
                let keys = self.state.key_log();
                error!(target: "input.interp", keys = %keys, kind = ?spec.kind, "mapping_without_action");
                return Err(InterpretError::MissingAction { keys });
            }
        }
        self.state.phase = Phase::Ready;
        Ok(Flow::Consumed)
    }

    fn on_argument<H: EditorHost>(
        &mut self,
        host: &mut H,
        spec: &CommandSpec,
    ) -> Result<Flow, InterpretError> {
        self.stack.push(Command::from_spec(self.state.count, spec));
        match spec.argument {
            kind @ (ArgumentKind::Character | ArgumentKind::Motion) => {
                self.state.phase = Phase::NewCommand;
                self.state.expected = kind;
                if kind == ArgumentKind::Motion && spec.flags.contains(CommandFlags::OP_PEND) {
                    host.set_mapping_mode(MappingMode::OperatorPending);
                }
                debug!(target: "input.interp", action = ?spec.action, expected = ?kind, "await_argument");
                self.partial_reset(host);
                Ok(Flow::Redispatch)
            }
            ArgumentKind::None => {
                error!(target: "input.interp", action = ?spec.action, "argument_mapping_without_kind");
                Err(InterpretError::InvalidArgument {
                    kind: ArgumentKind::None,
                })
            }
        }
    }

    fn complete<H: EditorHost>(&mut self, host: &mut H) -> KeyOutcome {
        let Some(mut cmd) = self.stack.merge() else {
            return self.fail(host, InterpretError::NoCommand);
        };
        normalize_counts(&mut cmd, self.max_count);

        if host.mapping_mode() == MappingMode::OperatorPending {
            host.set_mapping_mode(MappingMode::Normal);
        }
        host.set_command(&cmd);

        if !host.is_writable() && !cmd.kind().is_read_only() {
            debug!(target: "input.interp", command = %cmd, "read_only_refused");
            host.indicate_error();
            self.full_reset(host);
            return KeyOutcome::Rejected(InterpretError::ReadOnly { kind: cmd.kind() });
        }

        debug!(target: "input.interp", command = %cmd, "command_ready");
        dispatcher::execute(self, host, &cmd);
        KeyOutcome::Dispatched(cmd)
    }

    fn fail<H: EditorHost>(&mut self, host: &mut H, err: InterpretError) -> KeyOutcome {
        self.state.phase = Phase::Error;
        debug!(target: "input.interp", error = %err, keys = %self.state.key_log(), "rejected");
        host.indicate_error();
        self.full_reset(host);
        KeyOutcome::Rejected(err)
    }
}
