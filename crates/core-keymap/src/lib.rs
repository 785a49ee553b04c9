//! core-keymap: command descriptors and the key trie they are reached through.
//!
//! Design principles:
//! - The trie is built once and is read-only afterwards; lookup is a pure
//!   function of `(cursor, key)`.
//! - One root per `MappingMode`; operator-pending has its own restricted root.
//! - Nodes are a closed sum type (`Branch` / `Command`); a branch may carry an
//!   argument descriptor that resolves when the next key is not an explicit
//!   child.
//! - No side effects: logging only at TRACE for traversal steps, DEBUG/WARN
//!   while building.

use std::fmt;
use std::sync::Arc;

use core_events::KeyEvent;
use serde::Deserialize;

mod baseline;
mod command;
pub mod notation;
mod trie;

pub use baseline::baseline_specs;
pub use command::{Argument, Command};
pub use notation::{NotationError, format_keys, parse_keys};
pub use trie::{KeyTrie, Lookup, NodeId};

// -------------------------------------------------------------------------------------------------
// Mapping modes
// -------------------------------------------------------------------------------------------------
/// Which trie root is active for lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    #[default]
    Normal,
    Visual,
    OperatorPending,
    Insert,
}

impl MappingMode {
    pub const ALL: [MappingMode; 4] = [
        MappingMode::Normal,
        MappingMode::Visual,
        MappingMode::OperatorPending,
        MappingMode::Insert,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            MappingMode::Normal => 0,
            MappingMode::Visual => 1,
            MappingMode::OperatorPending => 2,
            MappingMode::Insert => 3,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Command classification
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Motion,
    Insert,
    Delete,
    Change,
    Copy,
    Paste,
    Reset,
    SelectRegister,
    OtherReadOnly,
    OtherWritable,
}

impl CommandKind {
    /// Kinds that never mutate the document and may run on read-only buffers.
    pub const fn is_read_only(self) -> bool {
        matches!(
            self,
            CommandKind::Motion
                | CommandKind::Copy
                | CommandKind::Reset
                | CommandKind::SelectRegister
                | CommandKind::OtherReadOnly
        )
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CommandFlags: u16 {
        /// Operator: switch to the operator-pending mapping while its motion is typed.
        const OP_PEND       = 1 << 0;
        /// Keep a temporary mode alive after execution (e.g. register selection).
        const EXPECT_MORE   = 1 << 1;
        const LINEWISE      = 1 << 2;
        const CHARACTERWISE = 1 << 3;
        const INCLUSIVE     = 1 << 4;
        const EXCLUSIVE     = 1 << 5;
        const SAVE_JUMP     = 1 << 6;
    }
}

/// Kind of argument a command waits for after its own keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    #[default]
    None,
    Character,
    Motion,
}

// -------------------------------------------------------------------------------------------------
// Action identifiers
// -------------------------------------------------------------------------------------------------
/// Opaque name of an editing action; cloning shares the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(Arc<str>);

impl ActionId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ActionId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// -------------------------------------------------------------------------------------------------
// Descriptors
// -------------------------------------------------------------------------------------------------
/// What a trie node resolves to. `action == None` is a configuration defect
/// that the interpreter reports when the node is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub action: Option<ActionId>,
    pub kind: CommandKind,
    pub flags: CommandFlags,
    /// Declared argument kind; only meaningful on argument nodes.
    pub argument: ArgumentKind,
}

impl CommandSpec {
    pub fn new(action: impl Into<ActionId>, kind: CommandKind, flags: CommandFlags) -> Self {
        Self {
            action: Some(action.into()),
            kind,
            flags,
            argument: ArgumentKind::None,
        }
    }

    /// Descriptor without a bound action.
    pub fn unbound(kind: CommandKind, flags: CommandFlags) -> Self {
        Self {
            action: None,
            kind,
            flags,
            argument: ArgumentKind::None,
        }
    }
}

/// One mapping to insert into the trie.
#[derive(Debug, Clone)]
pub struct MappingSpec {
    pub mode: MappingMode,
    pub sequence: Vec<KeyEvent>,
    pub command: CommandSpec,
    /// `None` maps `sequence` to a command leaf. `Some(kind)` attaches an
    /// argument descriptor to the branch reached by `sequence`.
    pub argument: Option<ArgumentKind>,
}

impl MappingSpec {
    pub fn command(mode: MappingMode, sequence: Vec<KeyEvent>, command: CommandSpec) -> Self {
        Self {
            mode,
            sequence,
            command,
            argument: None,
        }
    }

    pub fn with_argument(
        mode: MappingMode,
        sequence: Vec<KeyEvent>,
        command: CommandSpec,
        argument: ArgumentKind,
    ) -> Self {
        Self {
            mode,
            sequence,
            command,
            argument: Some(argument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_kinds() {
        assert!(CommandKind::Motion.is_read_only());
        assert!(CommandKind::Copy.is_read_only());
        assert!(CommandKind::SelectRegister.is_read_only());
        assert!(!CommandKind::Delete.is_read_only());
        assert!(!CommandKind::Insert.is_read_only());
        assert!(!CommandKind::OtherWritable.is_read_only());
    }

    #[test]
    fn flag_names_resolve_for_config() {
        assert_eq!(CommandFlags::from_name("OP_PEND"), Some(CommandFlags::OP_PEND));
        assert_eq!(
            CommandFlags::from_name("EXPECT_MORE"),
            Some(CommandFlags::EXPECT_MORE)
        );
        assert_eq!(CommandFlags::from_name("nope"), None);
    }

    #[test]
    fn action_id_shares_and_displays() {
        let a = ActionId::from("VimMotionLeft");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.to_string(), "VimMotionLeft");
        assert_eq!(a.as_str(), "VimMotionLeft");
    }
}
