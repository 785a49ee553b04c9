use core_keymap::{ActionId, ArgumentKind, CommandKind};
use thiserror::Error;

/// Why a keystroke ended the pending command. Every variant has already
/// triggered the error indicator and a full reset by the time the caller
/// sees it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("no mapping for `{keys}`")]
    UnknownSequence { keys: String },
    #[error("{kind:?} command cannot be used as a motion")]
    NotAMotion { kind: CommandKind },
    #[error("`{key}` is not a character argument")]
    ExpectedCharacter { key: String },
    #[error("mapping `{keys}` has no action")]
    MissingAction { keys: String },
    #[error("argument mapping declares argument kind {kind:?}")]
    InvalidArgument { kind: ArgumentKind },
    #[error("{kind:?} command refused on a read-only document")]
    ReadOnly { kind: CommandKind },
    #[error("no command to complete")]
    NoCommand,
    #[error("key resolved to an argument twice")]
    NestedArgument,
}

/// Failure reported by an [`crate::ActionInvoker`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action `{0}`")]
    Unknown(ActionId),
    #[error("action `{action}` failed: {reason}")]
    Failed { action: ActionId, reason: String },
}
