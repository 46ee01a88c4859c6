//! Cancellable timer slots
//!
//! The core never sleeps. It asks the shell to start or cancel a timer and
//! hands out a token with every start. When the shell reports a timer firing,
//! the token must still be the current one for that key or the firing is
//! ignored, so a cancelled timer that fires anyway has no effect.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::time::Duration;

use crate::form::Effect;

/// One slot per element the form owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKey {
    /// Re-enables the submit control after a submission
    SubmitRestore,
    /// Removes the page-level error banner
    BannerDismiss,
}

impl TimerKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKey::SubmitRestore => "submit-restore",
            TimerKey::BannerDismiss => "banner-dismiss",
        }
    }
}

#[derive(Debug, Default)]
pub struct TimerSlots {
    next_token: u64,
    armed: BTreeMap<TimerKey, u64>,
}

impl TimerSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer for `key`, cancelling whatever was armed there
    pub fn arm(&mut self, key: TimerKey, delay: Duration) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);

        if self.armed.contains_key(&key) {
            effects.push(Effect::CancelTimer { key });
        }

        self.next_token += 1;
        let token = self.next_token;
        self.armed.insert(key, token);
        effects.push(Effect::StartTimer { key, token, delay });

        effects
    }

    /// Consume a firing. Returns false for stale or unknown tokens.
    pub fn fire(&mut self, key: TimerKey, token: u64) -> bool {
        match self.armed.get(&key) {
            Some(&current) if current == token => {
                self.armed.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Cancel `key` if armed
    pub fn cancel(&mut self, key: TimerKey) -> Option<Effect> {
        self.armed.remove(&key).map(|_| Effect::CancelTimer { key })
    }

    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.armed.contains_key(&key)
    }
}
