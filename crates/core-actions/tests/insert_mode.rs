//! Text-entry and visual modes: raw key forwarding, completed-command
//! tracking and mode round trips driven by actions.

mod common;
use common::*;

use core_actions::KeyOutcome;
use core_keymap::MappingMode;
use core_state::Mode;

#[test]
fn unmapped_keys_are_forwarded_as_text() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Insert);
    let outcomes = feed(&mut interp, &mut host, "hi<Space>5");
    assert!(outcomes.iter().all(|o| *o == KeyOutcome::Inserted));
    assert_eq!(host.raw_keys, keys("hi<Space>5"));
    assert!(host.invoked.is_empty());
    assert_eq!(host.errors, 0);
    assert_idle(&interp, &host);
}

#[test]
fn replace_mode_forwards_like_insert() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Replace);
    assert_eq!(
        feed(&mut interp, &mut host, "xy"),
        vec![KeyOutcome::Inserted, KeyOutcome::Inserted]
    );
    assert_eq!(host.modes.mapping_mode(), MappingMode::Insert);
}

#[test]
fn broken_sequence_forwards_only_the_last_key() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Insert);
    let outcomes = feed(&mut interp, &mut host, "<C-\\>x");
    assert_eq!(outcomes, vec![KeyOutcome::Pending, KeyOutcome::Inserted]);
    assert_eq!(host.raw_keys, keys("x"));
    assert_idle(&interp, &host);
}

#[test]
fn insert_round_trip() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command);

    let enter = dispatch_one(&mut interp, &mut host, "i");
    assert_eq!(host.mode(), Mode::Insert);
    assert_eq!(host.completed, vec![enter], "entry command seen in insert mode");

    feed(&mut interp, &mut host, "ab");
    assert_eq!(host.raw_keys, keys("ab"));

    let word = dispatch_one(&mut interp, &mut host, "<C-w>");
    assert_eq!(word.action().unwrap().as_str(), "VimInsertDeletePreviousWord");
    assert_eq!(host.completed.len(), 2);

    // <Esc> is an ordinary mapping outside command mode.
    let exit = dispatch_one(&mut interp, &mut host, "<Esc>");
    assert_eq!(exit.action().unwrap().as_str(), "VimInsertExitMode");
    assert_eq!(host.mode(), Mode::Command);
    assert_eq!(host.errors, 0);
    assert_eq!(host.completed.len(), 2, "exit ran after leaving insert");
    assert_eq!(host.scopes, vec!["write", "write", "write"]);
    assert_idle(&interp, &host);

    let motion = dispatch_one(&mut interp, &mut host, "2l");
    assert_eq!(motion.raw_count(), 2);
}

#[test]
fn visual_mode_round_trip() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command);
    dispatch_one(&mut interp, &mut host, "v");
    assert_eq!(host.mode(), Mode::Visual);
    assert_eq!(host.modes.mapping_mode(), MappingMode::Visual);

    let motion = dispatch_one(&mut interp, &mut host, "3w");
    assert_eq!(motion.raw_count(), 3);
    let word = dispatch_one(&mut interp, &mut host, "iw");
    assert_eq!(word.action().unwrap().as_str(), "VimMotionInnerWord");
    assert_eq!(host.mode(), Mode::Visual);

    let delete = dispatch_one(&mut interp, &mut host, "d");
    assert_eq!(delete.action().unwrap().as_str(), "VimDeleteVisual");
    assert_eq!(host.mode(), Mode::Command);
    assert_idle(&interp, &host);
}

#[test]
fn escape_leaves_visual_through_its_mapping() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command);
    dispatch_one(&mut interp, &mut host, "v");
    let exit = dispatch_one(&mut interp, &mut host, "<Esc>");
    assert_eq!(exit.action().unwrap().as_str(), "VimVisualExit");
    assert_eq!(host.mode(), Mode::Command);
    assert_eq!(host.errors, 0);
}

#[test]
fn visual_register_prefix() {
    let mut interp = interpreter();
    let mut host = MockHost::new(Mode::Command);
    dispatch_one(&mut interp, &mut host, "v");
    let outcomes = settled(feed(&mut interp, &mut host, "\"zy"));
    assert_eq!(outcomes.len(), 2);
    assert_eq!(host.invoked_registers.last(), Some(&'z'));
    assert!(host.registers.is_default());
    assert_eq!(host.mode(), Mode::Command);
}
