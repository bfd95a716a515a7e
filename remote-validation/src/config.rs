use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::time::Duration;

use crate::error::{RuleError, RuleResult};

/// Trigger value that turns off re-validation on value change
pub const TRIGGER_DISABLED: &str = "no";

/// Rule options as declared in the host's form configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleOptions {
    /// Endpoint queried for every check
    pub url: String,
    /// Static URL-encoded parameters sent along with the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    /// Response body (as a string) that marks the value as valid
    pub valid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

impl RuleOptions {
    pub fn new(url: impl Into<String>, valid: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: None,
            valid: valid.into(),
            trigger: None,
        }
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Build options from the host-supplied mapping. Keys the rule does not
    /// know about are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Config`] when a required key is missing, a
    /// recognized key is not a string, or [`RuleOptions::validate`] fails.
    pub fn from_value(value: serde_json::Value) -> RuleResult<Self> {
        let options: RuleOptions = serde_json::from_value(value)
            .map_err(|e| RuleError::Config(format!("Invalid rule options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Fail fast on options that could never produce a meaningful check.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Config`] for an empty or non-absolute `url`.
    pub fn validate(&self) -> RuleResult<()> {
        if self.url.trim().is_empty() {
            return Err(RuleError::Config("url must not be empty".to_string()));
        }
        url::Url::parse(&self.url)
            .map_err(|e| RuleError::Config(format!("url '{}' is not absolute: {}", self.url, e)))?;
        Ok(())
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger.as_deref() != Some(TRIGGER_DISABLED)
    }
}

/// HTTP client settings for [`crate::ReqwestTransport`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Whole-request timeout; `None` leaves requests unbounded
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            connect_timeout_ms: None,
            user_agent: format!("remote-validation/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Config`] when a timeout variable is set but is
    /// not valid unicode or not a whole number of milliseconds.
    pub fn from_env() -> RuleResult<Self> {
        let defaults = Self::default();

        let timeout_ms = env_millis("REMOTE_RULE_TIMEOUT_MS")?;
        let connect_timeout_ms = env_millis("REMOTE_RULE_CONNECT_TIMEOUT_MS")?;
        let user_agent = std::env::var("REMOTE_RULE_USER_AGENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        Ok(Self {
            timeout_ms,
            connect_timeout_ms,
            user_agent,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

fn env_millis(name: &str) -> RuleResult<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RuleError::Config(format!("{} must be milliseconds, got '{}'", name, raw))),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(RuleError::Config(format!(
            "{} is not valid unicode: {:?}",
            name, raw
        ))),
    }
}
