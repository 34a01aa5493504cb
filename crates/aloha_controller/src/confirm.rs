/// Asks the operator to approve a destructive action
#[cfg_attr(test, mockall::automock)]
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt with yes, for `--yes` style invocations
#[derive(Debug, Clone, Copy, Default)]
pub struct Preconfirmed;

impl Confirm for Preconfirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
