//! Remote Check Tool
//!
//! Runs a remote validation rule once against a value, the same way a form
//! host would, and reports the verdict.
//!
//! Usage:
//!   remote-check --url https://example.com/check --valid ok alice
//!   remote-check --options rule.json --json '{"id": 7}'
//!
//! Exit status is 0 when the value is valid, 1 when it is invalid and
//! non-zero with an error message when the check could not complete.

use anyhow::Context;
use clap::Parser;
use remote_validation::{
    RemoteValidationRule, ReqwestTransport, RuleOptions, TransportConfig, ValidationRule,
};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "remote-check")]
#[command(about = "Validate a value against a remote validation endpoint")]
struct Args {
    /// JSON file holding the rule options (url, valid, params, trigger)
    #[arg(long, conflicts_with_all = ["url", "valid", "params", "trigger"])]
    options: Option<PathBuf>,

    /// Endpoint queried with the value
    #[arg(long, required_unless_present = "options")]
    url: Option<String>,

    /// Response body that marks the value as valid
    #[arg(long, required_unless_present = "options")]
    valid: Option<String>,

    /// Static URL-encoded parameters, e.g. "scope=signup&lang=en"
    #[arg(long)]
    params: Option<String>,

    /// Trigger policy as declared in the form configuration
    #[arg(long)]
    trigger: Option<String>,

    /// Parse VALUE as JSON instead of sending it as a plain string
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Value to validate
    value: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = load_options(&args)?;
    debug!(url = %options.url, trigger_enabled = options.trigger_enabled(), "Loaded rule options");

    let value: Value = if args.json {
        serde_json::from_str(&args.value).context("VALUE is not valid JSON")?
    } else {
        Value::String(args.value.clone())
    };

    let transport = ReqwestTransport::new(&TransportConfig::from_env()?)?;
    let rule = RemoteValidationRule::new(options, transport)?;

    let valid = rule
        .check(&value)
        .await
        .context("Remote check could not be completed")?;

    info!(rule = rule.index_name(), valid, "Remote check finished");
    if valid {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("invalid");
        Ok(ExitCode::from(1))
    }
}

fn load_options(args: &Args) -> anyhow::Result<RuleOptions> {
    if let Some(path) = &args.options {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule options from {:?}", path))?;
        let mapping: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Rule options in {:?} are not valid JSON", path))?;
        return Ok(RuleOptions::from_value(mapping)?);
    }

    let (Some(url), Some(valid)) = (args.url.clone(), args.valid.clone()) else {
        anyhow::bail!("--url and --valid are required without --options");
    };
    let mut options = RuleOptions::new(url, valid);
    options.params = args.params.clone();
    options.trigger = args.trigger.clone();
    options.validate()?;
    Ok(options)
}
