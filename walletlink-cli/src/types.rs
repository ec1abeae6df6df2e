//! CLI Types

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Backend that answers chain queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// Built-in JSON-RPC client
    #[default]
    JsonRpc,
    /// alloy provider
    Alloy,
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json-rpc" | "jsonrpc" | "rpc" => Ok(Engine::JsonRpc),
            "alloy" => Ok(Engine::Alloy),
            other => Err(format!("unknown engine '{other}'")),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::JsonRpc => write!(f, "json-rpc"),
            Engine::Alloy => write!(f, "alloy"),
        }
    }
}
