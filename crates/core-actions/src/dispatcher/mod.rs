//! Execution of completed commands.
//!
//! The interpreter hands every finished command to [`execute`], which picks
//! the host scope (read for read-only kinds, write otherwise) and runs
//! [`run_command`] inside it. Post-execution bookkeeping (insert-mode change
//! tracking, register reset, interpreter reset, temporary-mode restore) happens
//! inside the same scope so the host observes it as one unit.

use core_keymap::{Command, CommandFlags, CommandKind};
use core_state::Mode;
use tracing::{debug, warn};

use crate::host::EditorHost;
use crate::{ActionError, Interpreter};

/// Which host scope a command ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Read,
    Write,
}

impl Scope {
    pub(crate) fn for_kind(kind: CommandKind) -> Self {
        if kind.is_read_only() {
            Scope::Read
        } else {
            Scope::Write
        }
    }
}

pub(crate) fn execute<H: EditorHost>(interp: &mut Interpreter, host: &mut H, cmd: &Command) {
    let scope = Scope::for_kind(cmd.kind());
    debug!(target: "input.dispatch", command = %cmd, scope = ?scope, "execute");
    let mut job = |h: &mut H| run_command(interp, h, cmd);
    match scope {
        Scope::Read => host.run_read(&mut job),
        Scope::Write => host.run_write(&mut job),
    }
}

fn run_command<H: EditorHost>(interp: &mut Interpreter, host: &mut H, cmd: &Command) {
    match cmd.action() {
        Some(action) => match host.invoke(action, cmd) {
            Ok(()) => debug!(target: "input.dispatch", action = %action, "invoked"),
            Err(ActionError::Unknown(name)) => {
                warn!(target: "input.dispatch", action = %name, "unknown_action")
            }
            Err(err) => warn!(target: "input.dispatch", error = %err, "action_failed"),
        },
        None => warn!(target: "input.dispatch", kind = ?cmd.kind(), "command_without_action"),
    }

    let mode = host.mode();
    if mode.is_text_entry() {
        host.process_completed_command(cmd);
    }

    // The selected register applies to one command, except the selection itself.
    if cmd.kind() != CommandKind::SelectRegister {
        host.reset_register();
    }

    interp.reset(host);

    let mode = host.mode();
    let keeps_mode = matches!(mode, Mode::Insert | Mode::Replace | Mode::Visual);
    if !keeps_mode && !cmd.flags().contains(CommandFlags::EXPECT_MORE) {
        host.restore_mode();
    }
}
