//! Remote validation rule for form validation hosts
//!
//! Validates a field value on the server: the value is sent to a configured
//! endpoint as a query parameter and the response body decides whether it
//! is valid.
//!
//! # Pipeline
//!
//! 1. **Build request**: the value becomes the `v` parameter, merged over
//!    the static `params` from the rule options
//! 2. **Send**: one `GET` through a [`Transport`]
//! 3. **Extract**: the response body is taken as is
//! 4. **Compare**: the stringified body must equal the `valid` option
//!
//! Transport failures are returned as errors, never as "invalid", so the
//! host can decide how to treat an unreachable endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use remote_validation::{
//!     RemoteValidationRule, ReqwestTransport, RuleOptions, TransportConfig, ValidationRule,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RuleOptions::from_value(json!({
//!     "url": "https://example.com/api/username-available",
//!     "params": "scope=signup",
//!     "valid": "true"
//! }))?;
//! let transport = ReqwestTransport::new(&TransportConfig::from_env()?)?;
//! let rule = RemoteValidationRule::new(options, transport)?;
//!
//! if rule.check(&json!("alice")).await? {
//!     println!("username is available");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod remote;
pub mod rule;
pub mod sequencer;
pub mod transport;
pub mod value;

pub use config::*;
pub use error::*;
pub use query::*;
pub use remote::*;
pub use rule::*;
pub use sequencer::*;
pub use transport::*;
pub use value::*;
