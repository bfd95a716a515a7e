//! Server-side validation rule
//!
//! Sends the field value to a remote endpoint as the `v` query parameter
//! and compares the response body with the configured `valid` string.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RuleOptions;
use crate::error::RuleResult;
use crate::query::{parse_query, QueryParams};
use crate::rule::ValidationRule;
use crate::transport::{HttpMethod, RawResponse, RequestOptions, Transport};
use crate::value::{coerce_to_string, value_to_string};

/// Query parameter carrying the validated value
pub const VALUE_PARAMETER_NAME: &str = "v";

pub struct RemoteValidationRule<T> {
    options: RuleOptions,
    transport: T,
}

impl<T: Transport> RemoteValidationRule<T> {
    pub const INDEX_NAME: &'static str = "remote";

    /// # Errors
    ///
    /// Returns [`crate::RuleError::Config`] when `options` fail validation.
    pub fn new(options: RuleOptions, transport: T) -> RuleResult<Self> {
        options.validate()?;
        Ok(Self { options, transport })
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    pub fn value_parameter_name(&self) -> &'static str {
        VALUE_PARAMETER_NAME
    }

    /// Build the request for `value`. Static `params` are sent too, but
    /// never override the value parameter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RuleError::Stringify`] when `value` is `null`.
    pub fn get_ajax_options(&self, value: &Value) -> RuleResult<RequestOptions> {
        let mut params = QueryParams::new();
        params.insert(self.value_parameter_name(), value_to_string(value)?);

        if let Some(static_params) = self.options.params.as_deref() {
            let mut merged = parse_query(static_params);
            merged.extend(params);
            params = merged;
        }

        Ok(RequestOptions {
            method: HttpMethod::Get,
            url: self.options.url.clone(),
            params,
        })
    }

    pub fn extract_response_value(&self, response: RawResponse) -> Value {
        response.into_body()
    }

    /// Loose comparison: the response is stringified before being matched
    /// against `valid`, so `42` passes for `"42"` but `"42.0"` does not.
    pub fn validate_response_value(&self, value: &Value) -> bool {
        coerce_to_string(value) == self.options.valid
    }
}

#[async_trait]
impl<T: Transport> ValidationRule for RemoteValidationRule<T> {
    fn index_name(&self) -> &'static str {
        Self::INDEX_NAME
    }

    fn allow_trigger(&self) -> bool {
        self.options.trigger_enabled()
    }

    async fn check(&self, value: &Value) -> RuleResult<bool> {
        let options = self.get_ajax_options(value)?;
        debug!(
            rule = Self::INDEX_NAME,
            url = %options.url,
            params = options.params.len(),
            "Starting remote check"
        );

        let response = self.transport.send(&options).await.map_err(|e| {
            warn!(rule = Self::INDEX_NAME, url = %options.url, error = %e, "Remote check failed");
            e
        })?;

        let response_value = self.extract_response_value(response);
        let valid = self.validate_response_value(&response_value);
        debug!(rule = Self::INDEX_NAME, valid, "Remote check resolved");

        Ok(valid)
    }
}
