//! Trigger-side state for profile refreshes.
//!
//! A refresh (detect profile → synthesize → commit) can be fired by several
//! triggers in quick succession: startup, a workspace change, an explicit
//! command.  Committing on every trigger would churn the live slot and keep
//! prompting the host editor to reload, so refreshes are rate-limited by a
//! cooldown.
//!
//! The cooldown lives in [`RefreshGuard`], a plain struct *owned by the
//! caller* and passed in by `&mut`, so two hosts embedding the engine never
//! share hidden module state and tests can construct a guard with any
//! cooldown they like.

use std::time::{Duration, Instant};

/// Minimum wall-clock time between unforced refresh commits.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Caller-owned cooldown state for refresh triggers.
#[derive(Debug, Clone)]
pub struct RefreshGuard {
    cooldown: Duration,
    last_refresh: Option<Instant>,
}

impl Default for RefreshGuard {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_COOLDOWN)
    }
}

impl RefreshGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_refresh: None,
        }
    }

    /// `true` when enough time has passed since the last recorded refresh.
    pub fn ready(&self) -> bool {
        match self.last_refresh {
            None => true,
            Some(at) => at.elapsed() >= self.cooldown,
        }
    }

    /// Marks a completed refresh; the cooldown restarts from now.
    pub fn record(&mut self) {
        self.last_refresh = Some(Instant::now());
    }
}

/// What one refresh attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A profile was detected and the synthesized document was committed.
    Updated { profile: String },
    /// No profile was detected; the live slot was left alone.
    NoProfile,
    /// The cooldown suppressed this (unforced) attempt.
    CoolingDown,
    /// Synthesis succeeded but the commit failed.
    Failed,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_ready_before_first_refresh() {
        assert!(RefreshGuard::default().ready());
    }

    #[test]
    fn test_guard_blocks_within_cooldown() {
        let mut guard = RefreshGuard::new(Duration::from_secs(3600));
        guard.record();
        assert!(!guard.ready());
    }

    #[test]
    fn test_guard_reopens_after_cooldown_elapses() {
        let mut guard = RefreshGuard::new(Duration::ZERO);
        guard.record();
        assert!(guard.ready());
    }
}
