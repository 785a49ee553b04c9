// -------------------------------------------------------------------------------------------------
// Baseline mapping table (representative Vim subset)
// -------------------------------------------------------------------------------------------------

use core_events::{KeyCode, KeyEvent};

use crate::{ArgumentKind, CommandFlags as F, CommandKind as K, CommandSpec, MappingMode, MappingSpec};

fn keys(s: &str) -> Vec<KeyEvent> {
    s.chars().map(KeyEvent::char).collect()
}

struct Table {
    specs: Vec<MappingSpec>,
}

impl Table {
    fn map(&mut self, modes: &[MappingMode], seq: Vec<KeyEvent>, action: &str, kind: K, flags: F) {
        for mode in modes {
            self.specs.push(MappingSpec::command(
                *mode,
                seq.clone(),
                CommandSpec::new(action, kind, flags),
            ));
        }
    }

    fn map_arg(
        &mut self,
        modes: &[MappingMode],
        seq: Vec<KeyEvent>,
        action: &str,
        kind: K,
        flags: F,
        argument: ArgumentKind,
    ) {
        for mode in modes {
            self.specs.push(MappingSpec::with_argument(
                *mode,
                seq.clone(),
                CommandSpec::new(action, kind, flags),
                argument,
            ));
        }
    }
}

/// Mapping specs for all four mapping modes.
///
/// Counts are not part of the table: digits are consumed by the interpreter
/// before lookup, except a leading `0` which resolves to the line-start motion.
pub fn baseline_specs() -> Vec<MappingSpec> {
    use MappingMode::{Insert, Normal, OperatorPending, Visual};
    const MOTION_MODES: &[MappingMode] = &[Normal, Visual, OperatorPending];

    let mut t = Table { specs: Vec::new() };

    // Motions
    let motions: &[(&str, &str, F)] = &[
        ("h", "VimMotionLeft", F::EXCLUSIVE),
        ("l", "VimMotionRight", F::EXCLUSIVE),
        ("j", "VimMotionDown", F::LINEWISE),
        ("k", "VimMotionUp", F::LINEWISE),
        ("w", "VimMotionWordRight", F::EXCLUSIVE),
        ("b", "VimMotionWordLeft", F::EXCLUSIVE),
        ("e", "VimMotionWordEndRight", F::INCLUSIVE),
        ("0", "VimMotionFirstColumn", F::EXCLUSIVE),
        ("^", "VimMotionFirstNonSpace", F::EXCLUSIVE),
        ("$", "VimMotionLastColumn", F::INCLUSIVE),
        ("G", "VimMotionGotoLineLast", F::LINEWISE.union(F::SAVE_JUMP)),
        ("gg", "VimMotionGotoLineFirst", F::LINEWISE.union(F::SAVE_JUMP)),
    ];
    for (seq, action, flags) in motions {
        t.map(MOTION_MODES, keys(seq), action, K::Motion, *flags);
    }
    let named_motions: &[(KeyCode, &str)] = &[
        (KeyCode::Left, "VimMotionLeft"),
        (KeyCode::Right, "VimMotionRight"),
        (KeyCode::Up, "VimMotionUp"),
        (KeyCode::Down, "VimMotionDown"),
    ];
    for (code, action) in named_motions {
        t.map(
            MOTION_MODES,
            vec![KeyEvent::named(*code)],
            action,
            K::Motion,
            F::EXCLUSIVE,
        );
    }

    // Character searches: motion + literal character
    let finds: &[(&str, &str, F)] = &[
        ("f", "VimMotionRightMatchChar", F::INCLUSIVE),
        ("t", "VimMotionRightTillMatchChar", F::INCLUSIVE),
        ("F", "VimMotionLeftMatchChar", F::EXCLUSIVE),
        ("T", "VimMotionLeftTillMatchChar", F::EXCLUSIVE),
    ];
    for (seq, action, flags) in finds {
        t.map_arg(
            MOTION_MODES,
            keys(seq),
            action,
            K::Motion,
            *flags,
            ArgumentKind::Character,
        );
    }

    // Text objects are motions that only make sense after an operator.
    t.map(&[OperatorPending, Visual], keys("iw"), "VimMotionInnerWord", K::Motion, F::CHARACTERWISE);
    t.map(&[OperatorPending, Visual], keys("aw"), "VimMotionOuterWord", K::Motion, F::CHARACTERWISE);

    // Operators (normal mode): wait for a motion in operator-pending mapping.
    let operators: &[(&str, &str, K)] = &[
        ("d", "VimDeleteMotion", K::Delete),
        ("c", "VimChangeMotion", K::Change),
        ("y", "VimCopyYankMotion", K::Copy),
        (">", "VimShiftRightMotion", K::Change),
        ("<", "VimShiftLeftMotion", K::Change),
    ];
    for (seq, action, kind) in operators {
        t.map_arg(&[Normal], keys(seq), action, *kind, F::OP_PEND, ArgumentKind::Motion);
    }
    t.map(&[Normal], keys("dd"), "VimDeleteLine", K::Delete, F::LINEWISE);
    t.map(&[Normal], keys("cc"), "VimChangeLine", K::Change, F::LINEWISE);
    t.map(&[Normal], keys("yy"), "VimCopyYankLine", K::Copy, F::LINEWISE);
    t.map(&[Normal], keys(">>"), "VimShiftRightLines", K::Change, F::LINEWISE);
    t.map(&[Normal], keys("<<"), "VimShiftLeftLines", K::Change, F::LINEWISE);

    // Visual operators act on the selection directly.
    t.map(&[Visual], keys("d"), "VimDeleteVisual", K::Delete, F::empty());
    t.map(&[Visual], keys("c"), "VimChangeVisual", K::Change, F::empty());
    t.map(&[Visual], keys("y"), "VimCopyYankVisual", K::Copy, F::empty());
    t.map(&[Visual], keys("v"), "VimVisualExit", K::OtherReadOnly, F::empty());
    t.map(
        &[Visual],
        vec![KeyEvent::named(KeyCode::Esc)],
        "VimVisualExit",
        K::OtherReadOnly,
        F::empty(),
    );

    // Simple edits
    t.map(&[Normal], keys("x"), "VimDeleteCharacterRight", K::Delete, F::empty());
    t.map(&[Normal], keys("X"), "VimDeleteCharacterLeft", K::Delete, F::empty());
    t.map(
        &[Normal],
        vec![KeyEvent::named(KeyCode::Delete)],
        "VimDeleteCharacter",
        K::Delete,
        F::empty(),
    );
    t.map(&[Normal], keys("p"), "VimPutTextAfterCursor", K::Paste, F::empty());
    t.map(&[Normal], keys("P"), "VimPutTextBeforeCursor", K::Paste, F::empty());
    t.map(&[Normal], keys("u"), "VimUndo", K::OtherWritable, F::empty());
    t.map(&[Normal], vec![KeyEvent::ctrl('r')], "VimRedo", K::OtherWritable, F::empty());
    t.map_arg(
        &[Normal],
        keys("r"),
        "VimChangeReplaceCharacter",
        K::Change,
        F::empty(),
        ArgumentKind::Character,
    );

    // Insert entry
    let inserts: &[(&str, &str)] = &[
        ("i", "VimInsertBeforeCursor"),
        ("a", "VimInsertAfterCursor"),
        ("I", "VimInsertLineStart"),
        ("A", "VimInsertAfterLineEnd"),
        ("o", "VimInsertNewLineBelow"),
        ("O", "VimInsertNewLineAbove"),
    ];
    for (seq, action) in inserts {
        t.map(&[Normal], keys(seq), action, K::Insert, F::empty());
    }
    t.map(&[Normal], keys("v"), "VimVisualToggleCharacterMode", K::OtherReadOnly, F::empty());

    // Register selection keeps the temporary mode alive for the command that follows.
    t.map_arg(
        &[Normal, Visual],
        keys("\""),
        "VimSelectRegister",
        K::SelectRegister,
        F::EXPECT_MORE,
        ArgumentKind::Character,
    );

    // Insert mapping: everything else is literal text.
    t.map(
        &[Insert],
        vec![KeyEvent::named(KeyCode::Esc)],
        "VimInsertExitMode",
        K::OtherWritable,
        F::empty(),
    );
    t.map(
        &[Insert],
        vec![KeyEvent::ctrl('w')],
        "VimInsertDeletePreviousWord",
        K::Delete,
        F::empty(),
    );
    t.map(
        &[Insert],
        vec![KeyEvent::named(KeyCode::Backspace)],
        "VimInsertBackspace",
        K::Delete,
        F::empty(),
    );

    // <C-\><C-n> resets to normal mode from anywhere.
    t.map(
        &MappingMode::ALL,
        vec![KeyEvent::ctrl('\\'), KeyEvent::ctrl('n')],
        "VimResetMode",
        K::Reset,
        F::empty(),
    );

    t.specs
}
