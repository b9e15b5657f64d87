//! Runner configuration.
//!
//! All settings can be overridden via WASM_RUNNER_* environment variables.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;

use crate::invocation::{default_invocations, Invocation};

/// Configuration for the engine and the export calls.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Fuel budget per instance. None disables fuel metering.
    pub max_fuel: Option<u64>,
    /// TOML file listing the exports to invoke. None uses the defaults.
    pub invocations_file: Option<PathBuf>,
}

/// TOML structure for invocation files.
#[derive(Deserialize)]
struct InvocationsToml {
    #[serde(default)]
    invoke: Vec<Invocation>,
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            max_fuel: env_u64("WASM_RUNNER_MAX_FUEL").filter(|&fuel| fuel > 0),
            invocations_file: std::env::var_os("WASM_RUNNER_INVOCATIONS").map(PathBuf::from),
        }
    }

    /// The invocations to run: from the configured file, or the defaults.
    pub fn invocations(&self) -> anyhow::Result<Vec<Invocation>> {
        match &self.invocations_file {
            Some(path) => load_invocations(path),
            None => Ok(default_invocations()),
        }
    }
}

/// Parse an invocation file.
pub fn load_invocations(path: &Path) -> anyhow::Result<Vec<Invocation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_invocations(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse invocation TOML. At least one `[[invoke]]` entry is required.
pub fn parse_invocations(content: &str) -> anyhow::Result<Vec<Invocation>> {
    let parsed: InvocationsToml = toml::from_str(content)?;
    if parsed.invoke.is_empty() {
        bail!("no [[invoke]] entries");
    }
    Ok(parsed.invoke)
}

/// Read a u64 from an env var. Unset or unparsable yields None.
fn env_u64(key: &str) -> Option<u64> {
    parse_u64_var(key, std::env::var(key).ok().as_deref())
}

fn parse_u64_var(key: &str, value: Option<&str>) -> Option<u64> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(key, value, "ignoring invalid setting: {e}");
            None
        }
    }
}
