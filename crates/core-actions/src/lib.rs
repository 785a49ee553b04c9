//! core-actions: turns keystrokes into executable commands.
//!
//! The [`Interpreter`] walks the [`core_keymap::KeyTrie`] one key at a time,
//! accumulating counts and partially built commands. Once a command is complete
//! it is handed to the host's [`ActionInvoker`] inside a read or write scope.
//!
//! Everything the interpreter needs from the surrounding editor is expressed
//! by the small traits in [`host`], combined as [`EditorHost`].

mod dispatcher;
mod error;
pub mod host;
mod interpreter;
mod pending;
mod stack;

pub use error::{ActionError, InterpretError};
pub use host::{
    ActionInvoker, ChangeProcessor, Document, EditorHost, ErrorIndicator, ExecutionScope,
    ModeController, RegisterStore,
};
pub use interpreter::{Interpreter, KeyOutcome};
pub use pending::{PendingSnapshot, PendingState, Phase};
pub use stack::{CommandStack, normalize_counts};
