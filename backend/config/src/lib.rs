//! `truthlens-config`: TruthLens runtime configuration.
//!
//! Provides:
//! - Typed config schema (OCR, classifier, gateway, logging, capture)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and environment overrides
//! - Config redaction for safe display
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, collect_referenced_vars, resolve_env_vars,
    resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, load_config_value, write_config};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{
    CaptureConfig, ClassifierConfig, GatewayConfig, LoggingConfig, OcrConfig, TruthLensConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors abort; warnings are logged.
pub async fn load_and_prepare(path: &Path) -> Result<TruthLensConfig> {
    let (config, report) = load_with_report(path).await?;
    log_report(&report);
    ensure_valid(&report, path)?;
    Ok(config)
}

/// Load and validate without logging or aborting.
///
/// Callers that install their logger from the config itself use this, then
/// call [`log_report`] and [`ensure_valid`] once logging is up.
pub async fn load_with_report(path: &Path) -> Result<(TruthLensConfig, ValidationReport)> {
    let value = load_config_value(path).await?;

    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: TruthLensConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure at: {}", path.display()))?;

    let config = apply_all_defaults(apply_env_overrides(config));
    let report = validate(&config);
    Ok((config, report))
}

/// Emit every warning and error in the report through `tracing`.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

/// Fail on the first validation error.
pub fn ensure_valid(report: &ValidationReport, path: &Path) -> Result<()> {
    if let Some(first) = report.errors.first() {
        bail!(
            "{first} ({} config error(s) in {})",
            report.errors.len(),
            path.display()
        );
    }
    Ok(())
}
