//! Operator confirmation capability.

/// Blocking yes/no decision used at the unexpected-initial-state checkpoint.
///
/// The CLI wires this to a terminal prompt; embedders and tests supply a
/// programmatic answer.
pub trait Confirm {
    /// Ask `prompt`; `true` means continue.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Answers every prompt with a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        log::info!("{prompt} {}", if self.0 { "y" } else { "n" });
        self.0
    }
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}
