use async_trait::async_trait;
use serde_json::Value;

use crate::error::RuleResult;

/// Capabilities a form validation host expects from a rule
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Identifier the host's rule registry maps declared rule types to
    fn index_name(&self) -> &'static str;

    /// Whether the host should re-run this rule when the field value changes
    fn allow_trigger(&self) -> bool;

    /// Validate `value`.
    ///
    /// `Ok(false)` means the value is invalid; an `Err` means the rule could
    /// not reach a verdict.
    async fn check(&self, value: &Value) -> RuleResult<bool>;
}
