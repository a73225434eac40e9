//! Confirmation seam for destructive actions.
//!
//! Views ask before every delete or revoke; a declined prompt sends no request.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;

pub trait Confirm: Debug + Send + Sync {
    /// `true` to proceed.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Skips every prompt (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Pre-recorded answers, consumed in order. Runs out as "no".
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: Arc<Mutex<VecDeque<bool>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirm {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            asked: Arc::default(),
        }
    }

    /// Prompts shown so far.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.asked.lock().push(prompt.to_owned());
        self.answers.lock().pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_run_out_as_no() {
        let confirm = ScriptedConfirm::new([true, false]);
        assert!(confirm.confirm("Delete member?"));
        assert!(!confirm.confirm("Delete contact?"));
        assert!(!confirm.confirm("Revoke token?"));
        assert_eq!(confirm.asked().len(), 3);
    }
}
