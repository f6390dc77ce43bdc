//! Deferred install prompt passthrough.
//!
//! A platform integration may offer an install action at any time. The meter
//! only remembers the offer, shows a button while it is held, and relays the
//! user's choice back to the prompt.

use tracing::info;

/// User's answer to an install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// An install action offered by the host platform
pub trait InstallPrompt {
    /// Show the platform prompt and report the user's choice
    fn prompt(&mut self) -> InstallOutcome;
}

/// Holds the most recently offered prompt until it is accepted.
///
/// This is the platform hook; desktop hosts never offer a prompt, so the
/// install button stays hidden there.
#[derive(Default)]
pub struct DeferredInstall {
    prompt: Option<Box<dyn InstallPrompt>>,
}

impl DeferredInstall {
    /// Store an offered prompt, replacing any earlier one
    pub fn offer(&mut self, prompt: Box<dyn InstallPrompt>) {
        self.prompt = Some(prompt);
    }

    pub fn is_available(&self) -> bool {
        self.prompt.is_some()
    }

    /// Relay the prompt; `None` when nothing has been offered
    pub fn install(&mut self) -> Option<InstallOutcome> {
        let outcome = self.prompt.as_mut()?.prompt();
        info!("Install prompt outcome: {:?}", outcome);
        if outcome == InstallOutcome::Accepted {
            self.prompt = None;
        }
        Some(outcome)
    }
}
