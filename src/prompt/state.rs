//! Retry state machine for the mandatory update prompt

/// User response to a single prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// User chose to update
    Accepted,
    /// User explicitly chose not to update now
    Declined,
    /// Prompt closed without an explicit choice (back action and similar)
    Dismissed,
}

/// Terminal state of a prompt loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Declined,
    DismissedWithCancelAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Prompting,
    Resolved(Resolution),
}

impl RetryState {
    pub fn initial() -> Self {
        RetryState::Prompting
    }

    /// Transition on a prompt response.
    ///
    /// A dismissal with `allow_cancel == false` returns to `Prompting`; it is
    /// the only non-terminal transition.
    pub fn on_outcome(self, outcome: PromptOutcome, allow_cancel: bool) -> Self {
        match (self, outcome) {
            (RetryState::Resolved(resolution), _) => RetryState::Resolved(resolution),
            (RetryState::Prompting, PromptOutcome::Accepted) => {
                RetryState::Resolved(Resolution::Accepted)
            }
            (RetryState::Prompting, PromptOutcome::Declined) => {
                RetryState::Resolved(Resolution::Declined)
            }
            (RetryState::Prompting, PromptOutcome::Dismissed) if allow_cancel => {
                RetryState::Resolved(Resolution::DismissedWithCancelAllowed)
            }
            (RetryState::Prompting, PromptOutcome::Dismissed) => RetryState::Prompting,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Resolved(_))
    }
}
