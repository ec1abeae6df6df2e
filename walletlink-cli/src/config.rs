//! Configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use walletlink::rpc::{presets, ProviderConfig, RateLimitConfig};

use crate::types::Engine;

/// Default configuration file name
pub const CONFIG_FILE: &str = "walletlink.json";

/// Environment variable overriding the endpoint
pub const ENV_RPC_URL: &str = "WALLETLINK_RPC_URL";

/// Environment variable overriding the engine
pub const ENV_ENGINE: &str = "WALLETLINK_ENGINE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Endpoint used when neither `--rpc-url` nor `--chain` is given
    pub rpc_url: String,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_watch_interval_ms() -> u64 {
    4_000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            rpc_url: ProviderConfig::default().url,
            engine: Engine::default(),
            timeout_secs: default_timeout_secs(),
            watch_interval_ms: default_watch_interval_ms(),
            rate_limit: None,
        }
    }
}

impl CliConfig {
    /// Reads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Applies `WALLETLINK_*` overrides from the process environment
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(
            std::env::var(ENV_RPC_URL).ok(),
            std::env::var(ENV_ENGINE).ok(),
        )
    }

    fn apply_overrides(&mut self, rpc_url: Option<String>, engine: Option<String>) -> anyhow::Result<()> {
        if let Some(rpc_url) = rpc_url.filter(|url| !url.is_empty()) {
            self.rpc_url = rpc_url;
        }
        if let Some(engine) = engine.filter(|engine| !engine.is_empty()) {
            self.engine = engine.parse().map_err(anyhow::Error::msg)?;
        }
        Ok(())
    }

    /// Endpoint configuration. A known `chain` selects its preset endpoint.
    pub fn provider_config(&self, chain: Option<u64>) -> anyhow::Result<ProviderConfig> {
        let base = match chain {
            Some(chain_id) => presets::for_chain(chain_id)
                .with_context(|| format!("no public endpoint known for chain {chain_id}"))?,
            None => ProviderConfig::new(self.rpc_url.clone()),
        };
        let mut config = base.with_timeout(self.timeout_secs);
        config.rate_limit = self.rate_limit;
        config.validate()?;
        Ok(config)
    }
}
