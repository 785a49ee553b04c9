use std::fmt;

use crate::{ActionId, CommandFlags, CommandKind, CommandSpec};

/// Argument attached to a command once its own keys are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Character(char),
    Motion(Box<Command>),
}

/// A command as assembled by the interpreter.
///
/// `count` is the raw count typed by the user; 0 means "not given" and
/// reads back as 1 through [`Command::count`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    count: u32,
    action: Option<ActionId>,
    kind: CommandKind,
    flags: CommandFlags,
    argument: Option<Argument>,
}

impl Command {
    pub fn new(
        count: u32,
        action: Option<ActionId>,
        kind: CommandKind,
        flags: CommandFlags,
    ) -> Self {
        Self {
            count,
            action,
            kind,
            flags,
            argument: None,
        }
    }

    pub fn from_spec(count: u32, spec: &CommandSpec) -> Self {
        Self::new(count, spec.action.clone(), spec.kind, spec.flags)
    }

    /// Effective repeat count (unset counts as 1).
    pub fn count(&self) -> u32 {
        self.count.max(1)
    }

    pub fn raw_count(&self) -> u32 {
        self.count
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count;
    }

    pub fn action(&self) -> Option<&ActionId> {
        self.action.as_ref()
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    pub fn argument(&self) -> Option<&Argument> {
        self.argument.as_ref()
    }

    pub fn set_argument(&mut self, argument: Argument) {
        self.argument = Some(argument);
    }

    /// Nested motion command, if the argument is a motion.
    pub fn motion(&self) -> Option<&Command> {
        match &self.argument {
            Some(Argument::Motion(cmd)) => Some(cmd.as_ref()),
            _ => None,
        }
    }

    pub fn motion_mut(&mut self) -> Option<&mut Command> {
        match &mut self.argument {
            Some(Argument::Motion(cmd)) => Some(cmd.as_mut()),
            _ => None,
        }
    }

    pub fn character(&self) -> Option<char> {
        match self.argument {
            Some(Argument::Character(c)) => Some(c),
            _ => None,
        }
    }
}

/// `3 VimMotionDown`, `VimDeleteMotion { 6 VimMotionWordRight }`, `VimReplaceCharacter 'x'`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 0 {
            write!(f, "{} ", self.count)?;
        }
        match &self.action {
            Some(action) => write!(f, "{action}")?,
            None => f.write_str("<unbound>")?,
        }
        match &self.argument {
            Some(Argument::Character(c)) => write!(f, " {c:?}"),
            Some(Argument::Motion(motion)) => write!(f, " {{ {motion} }}"),
            None => Ok(()),
        }
    }
}
