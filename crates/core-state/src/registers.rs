use tracing::debug;

/// The unnamed register used when none is selected.
pub const DEFAULT_REGISTER: char = '"';

/// Register selection for the next command (`"a`, `"+`, ...).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegisterState {
    selected: Option<char>,
}

impl RegisterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `name` for the next command. Returns false (and leaves the
    /// selection untouched) for names that are not registers.
    pub fn select(&mut self, name: char) -> bool {
        if !Self::is_valid(name) {
            debug!(target: "state.register", register = ?name, "invalid_register");
            return false;
        }
        self.selected = if name == DEFAULT_REGISTER {
            None
        } else {
            Some(name)
        };
        true
    }

    pub fn current(&self) -> char {
        self.selected.unwrap_or(DEFAULT_REGISTER)
    }

    pub fn is_default(&self) -> bool {
        self.selected.is_none()
    }

    pub fn reset(&mut self) {
        self.selected = None;
    }

    /// Named (`a-z`, `A-Z`), numbered (`0-9`) and the special registers.
    pub fn is_valid(name: char) -> bool {
        name.is_ascii_alphanumeric() || matches!(name, '"' | '-' | '*' | '+' | '_' | '/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_and_reset() {
        let mut regs = RegisterState::new();
        assert!(regs.is_default());
        assert!(regs.select('a'));
        assert_eq!(regs.current(), 'a');
        assert!(!regs.is_default());
        regs.reset();
        assert_eq!(regs.current(), DEFAULT_REGISTER);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut regs = RegisterState::new();
        assert!(regs.select('+'));
        assert!(!regs.select('!'));
        assert_eq!(regs.current(), '+');
    }

    #[test]
    fn selecting_unnamed_is_default() {
        let mut regs = RegisterState::new();
        assert!(regs.select('"'));
        assert!(regs.is_default());
    }
}
