//! Operator-facing alert and confirmation seam.

/// Blocking alert/confirm prompts shown to the operator.
pub trait Notifier {
    /// Show a message the operator has to dismiss.
    fn alert(&self, message: &str);

    /// Ask a yes/no question; `true` means the operator confirmed.
    fn confirm(&self, message: &str) -> bool;
}
