mod common;
use common::*;

use core_actions::{InterpretError, KeyOutcome};
use core_keymap::CommandKind;
use core_state::Mode;

#[test]
fn mutating_commands_never_reach_the_invoker() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command).read_only();
    for (notation, kind) in [
        ("x", CommandKind::Delete),
        ("d2w", CommandKind::Delete),
        ("p", CommandKind::Paste),
        ("i", CommandKind::Insert),
        ("rx", CommandKind::Change),
    ] {
        let outcomes = settled(feed(&mut interp, &mut host, notation));
        assert_eq!(
            outcomes,
            vec![KeyOutcome::Rejected(InterpretError::ReadOnly { kind })],
            "{notation}"
        );
        assert_idle(&interp, &host);
    }
    assert!(host.invoked.is_empty());
    assert!(host.scopes.is_empty());
    assert_eq!(host.errors, 5);
    assert_eq!(host.mode(), Mode::Command);
}

#[test]
fn read_only_commands_still_dispatch() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command).read_only();
    dispatch_one(&mut interp, &mut host, "5j");
    dispatch_one(&mut interp, &mut host, "y$");
    dispatch_one(&mut interp, &mut host, "v");
    assert_eq!(
        host.invoked_names(),
        vec!["VimMotionDown", "VimCopyYankMotion", "VimVisualToggleCharacterMode"]
    );
    assert_eq!(host.scopes, vec!["read", "read", "read"]);
    assert_eq!(host.errors, 0);
    assert_eq!(host.mode(), Mode::Visual);
}

#[test]
fn refused_command_drops_the_selected_register() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command).read_only();
    let outcomes = settled(feed(&mut interp, &mut host, "\"add"));
    assert!(matches!(
        outcomes.as_slice(),
        [
            KeyOutcome::Dispatched(_),
            KeyOutcome::Rejected(InterpretError::ReadOnly { .. })
        ]
    ));
    assert_eq!(host.invoked_names(), vec!["VimSelectRegister"]);
    assert!(host.registers.is_default());
    // The refused command was still recorded as the one about to run.
    assert_eq!(
        host.modes.last_command().and_then(|c| c.action()).map(|a| a.as_str()),
        Some("VimDeleteLine")
    );
}
