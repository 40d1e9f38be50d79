use alloy_primitives::Address;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utils::{config::CliEnvExt, serde::deserialize_vec_string};

/// This struct is used for both args and environment variables
/// the basic idea is that every env var can be overriden by a cli arg
/// and these override the config file
/// env vars follow the pattern of ORACLE_{UPPERCASE_ARG_NAME}
#[derive(Debug, Parser, Serialize, Deserialize, Default, Clone)]
#[command(version, about, long_about = None)]
#[serde(default)]
pub struct CliArgs {
    /// The home directory of the application, where the oracle.toml configuration file is stored
    /// if not provided, a series of default directories will be tried
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,

    /// The path to an optional dotenv file to try and load
    /// if not set, will be the current working directory's .env
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<PathBuf>,

    /// The port to bind the server to.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    /// Log level, in the format of tracing directives
    #[arg(long)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub log_level: Vec<String>,

    /// The host to bind the server to
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// The allowed cors origins, wildcards are allowed
    #[arg(long)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub cors_allowed_origins: Vec<String>,

    /// Jaeger collector to send trace data
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jaeger: Option<String>,

    /// JSON-RPC endpoint of the chain the price feed is deployed on (http(s) or ws(s))
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_endpoint: Option<String>,

    /// Address of the deployed price feed contract
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_contract_address: Option<Address>,

    /// Oracle gateways, in order of preference
    #[arg(long)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub gateway_urls: Vec<String>,

    /// Data service whose signers are used by the legacy fallback
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_service_id: Option<String>,

    /// Number of unique signers required per data package
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_signer_count: Option<u32>,

    /// Data feeds to read, e.g. `ETH,BTC`
    #[arg(long)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub data_feeds: Vec<String>,

    /// Upper bound on a single attempt (payload fetch + contract read), in milliseconds
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,
}

impl CliEnvExt for CliArgs {
    const ENV_VAR_PREFIX: &'static str = "ORACLE";
    const TOML_IDENTIFIER: &'static str = "oracle";

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn dotenv_path(&self) -> Option<PathBuf> {
        self.dotenv.clone()
    }
}
