//! Latest-call guard for overlapping checks
//!
//! When a field changes faster than the endpoint answers, several checks
//! for the same field can be in flight at once and resolve in any order.
//! [`SequencedRule`] numbers every call and only reports a verdict for the
//! most recent one.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::{RuleError, RuleResult};
use crate::rule::ValidationRule;

/// Result of a sequenced check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The call was the latest one when it resolved
    Settled(bool),
    /// A newer call started before this one resolved
    Superseded,
}

impl CheckOutcome {
    pub fn verdict(self) -> Option<bool> {
        match self {
            Self::Settled(valid) => Some(valid),
            Self::Superseded => None,
        }
    }
}

/// Wraps a rule so that stale results are discarded
pub struct SequencedRule<R> {
    inner: R,
    latest: AtomicU64,
}

impl<R: ValidationRule> SequencedRule<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            latest: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Run the wrapped check, reporting [`CheckOutcome::Superseded`] if a
    /// newer call started while this one was waiting. A superseded call's
    /// error is dropped along with its verdict.
    ///
    /// # Errors
    ///
    /// Propagates the wrapped rule's error for the latest call.
    pub async fn check_latest(&self, value: &Value) -> RuleResult<CheckOutcome> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        let result = self.inner.check(value).await;

        let current = self.latest.load(Ordering::SeqCst);
        if current != ticket {
            debug!(
                rule = self.inner.index_name(),
                ticket,
                current,
                "Discarding superseded check result"
            );
            return Ok(CheckOutcome::Superseded);
        }

        result.map(CheckOutcome::Settled)
    }
}

#[async_trait]
impl<R: ValidationRule> ValidationRule for SequencedRule<R> {
    fn index_name(&self) -> &'static str {
        self.inner.index_name()
    }

    fn allow_trigger(&self) -> bool {
        self.inner.allow_trigger()
    }

    /// Sequenced like [`SequencedRule::check_latest`]; a stale call yields
    /// [`RuleError::Superseded`] rather than a verdict.
    async fn check(&self, value: &Value) -> RuleResult<bool> {
        match self.check_latest(value).await? {
            CheckOutcome::Settled(valid) => Ok(valid),
            CheckOutcome::Superseded => Err(RuleError::Superseded),
        }
    }
}
