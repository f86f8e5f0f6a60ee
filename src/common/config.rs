use std::path::PathBuf;
use std::time::Duration;

/// Application configuration constants
pub struct AppConfig;

impl AppConfig {
    // Health sidecar
    pub const DEFAULT_HEALTH_PORT: u16 = 1251;
    pub const DEFAULT_RPC_HOST: &'static str = "http://localhost:26657";
    pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
    pub const DEFAULT_DATA_DIR: &'static str = "/home/operator/cosmos";

    // Network Configuration
    pub const MAX_CONCURRENT_PROBES: usize = 64;
    pub const CONNECTION_TIMEOUT_SECS: u64 = 5;
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 60;
    pub const POOL_MAX_IDLE_PER_HOST: usize = 200;
    pub const TCP_KEEPALIVE_SECS: u64 = 30;

    // Logging
    pub const DEFAULT_LOG_FILTER: &'static str = "fullnode_operator=info,tower_http=info";
}

/// Values derived from the fleet being worked on
pub struct EnvConfig;

impl EnvConfig {
    pub fn max_concurrent_probes(total_hosts: usize) -> usize {
        total_hosts.clamp(1, AppConfig::MAX_CONCURRENT_PROBES)
    }
}

/// Runtime settings for the health sidecar.
#[derive(Debug, Clone)]
pub struct HealthCheckConfig {
    /// CometBFT RPC address of the node this sidecar watches
    pub rpc_host: String,
    pub port: u16,
    pub timeout: Duration,
    /// Directory whose backing disk is reported on `/disk`
    pub data_dir: PathBuf,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            rpc_host: AppConfig::DEFAULT_RPC_HOST.to_string(),
            port: AppConfig::DEFAULT_HEALTH_PORT,
            timeout: Duration::from_secs(AppConfig::DEFAULT_PROBE_TIMEOUT_SECS),
            data_dir: PathBuf::from(AppConfig::DEFAULT_DATA_DIR),
        }
    }
}
