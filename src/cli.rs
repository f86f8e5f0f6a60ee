// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::common::config::{AppConfig, HealthCheckConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the health check sidecar next to a full node.
    Healthcheck(HealthcheckArgs),
    /// Probe a list of nodes once and print one JSON result per line.
    Probe(ProbeArgs),
    /// Derive PersistentVolumeClaim manifests that restore a job from a snapshot.
    Restore(RestoreArgs),
}

#[derive(Parser)]
pub struct HealthcheckArgs {
    /// CometBFT RPC address of the node to watch.
    #[arg(long, default_value = AppConfig::DEFAULT_RPC_HOST)]
    pub rpc_host: String,
    /// The port to listen on for health requests.
    #[arg(short, long, default_value_t = AppConfig::DEFAULT_HEALTH_PORT)]
    pub port: u16,
    /// Seconds to wait for the node before reporting it unavailable.
    #[arg(
        short,
        long,
        default_value_t = AppConfig::DEFAULT_PROBE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
    /// Node data directory reported on the /disk endpoint.
    #[arg(long, default_value = AppConfig::DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

impl HealthcheckArgs {
    pub fn to_config(&self) -> HealthCheckConfig {
        HealthCheckConfig {
            rpc_host: self.rpc_host.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout),
            data_dir: self.data_dir.clone(),
        }
    }
}

#[derive(Parser, Clone)]
pub struct ProbeArgs {
    /// A list of node RPC addresses to probe.
    #[arg(long, num_args = 1..)]
    pub hosts: Option<Vec<String>>,
    /// A file containing node RPC addresses, one per line.
    #[arg(long)]
    pub hostfile: Option<PathBuf>,
    /// Seconds to wait for each node.
    #[arg(
        short,
        long,
        default_value_t = AppConfig::DEFAULT_PROBE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

#[derive(Parser, Clone)]
pub struct RestoreArgs {
    /// JSON file with the job's volume settings.
    #[arg(long)]
    pub job: PathBuf,
    /// JSON file with the VolumeSnapshot to restore from.
    #[arg(long)]
    pub snapshot: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthcheck_defaults() {
        let cli = Cli::parse_from(["fullnode-operator", "healthcheck"]);
        let Commands::Healthcheck(args) = cli.command else {
            panic!("expected healthcheck");
        };
        let config = args.to_config();
        assert_eq!(config.port, 1251);
        assert_eq!(config.rpc_host, "http://localhost:26657");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_probe_hosts() {
        let cli = Cli::parse_from([
            "fullnode-operator",
            "probe",
            "--hosts",
            "node-a:26657",
            "node-b:26657",
            "--timeout",
            "2",
        ]);
        let Commands::Probe(args) = cli.command else {
            panic!("expected probe");
        };
        assert_eq!(
            args.hosts,
            Some(vec!["node-a:26657".to_string(), "node-b:26657".to_string()])
        );
        assert_eq!(args.timeout, 2);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        for command in ["healthcheck", "probe"] {
            let result = Cli::try_parse_from(["fullnode-operator", command, "--timeout", "0"]);
            assert!(result.is_err(), "{command} accepted a zero timeout");
        }
        assert!(Cli::try_parse_from(["fullnode-operator", "healthcheck", "--timeout", "1"]).is_ok());
    }

    #[test]
    fn test_restore_requires_both_files() {
        assert!(Cli::try_parse_from(["fullnode-operator", "restore", "--job", "j.json"]).is_err());
    }
}
