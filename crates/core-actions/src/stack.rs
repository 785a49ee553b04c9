use core_keymap::{Argument, Command};

/// Partially built commands, bottom = operator, top = most recent.
#[derive(Debug, Default, Clone)]
pub struct CommandStack {
    items: Vec<Command>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: Command) {
        self.items.push(cmd);
    }

    pub fn top_mut(&mut self) -> Option<&mut Command> {
        self.items.last_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drain the stack into one command: each entry becomes the motion
    /// argument of the entry below it, so the bottom command is the root.
    pub fn merge(&mut self) -> Option<Command> {
        let mut cmd = self.items.pop()?;
        while let Some(mut below) = self.items.pop() {
            below.set_argument(Argument::Motion(Box::new(cmd)));
            cmd = below;
        }
        Some(cmd)
    }
}

/// Move an operator's count onto its motion: `3c2w` runs as `c6w`.
///
/// Nothing changes when neither count was typed. Otherwise the motion gets the
/// product of both effective counts (capped at `max`) and the operator count
/// is cleared.
pub fn normalize_counts(cmd: &mut Command, max: u32) {
    let op_raw = cmd.raw_count();
    let op_eff = cmd.count();
    let Some(motion) = cmd.motion_mut() else {
        return;
    };
    if op_raw == 0 && motion.raw_count() == 0 {
        return;
    }
    let total = op_eff.saturating_mul(motion.count()).min(max);
    motion.set_count(total);
    cmd.set_count(0);
}
