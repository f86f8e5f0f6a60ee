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

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fullnode_operator::api::run_healthcheck;
use fullnode_operator::cli::{Cli, Commands, ProbeArgs, RestoreArgs};
use fullnode_operator::common::config::AppConfig;
use fullnode_operator::network::CometClient;
use fullnode_operator::provision::manifests_from_files;
use fullnode_operator::sweep::{exit_code, load_hosts_from_file, probe_hosts};

/// Exit code for a restore whose snapshot has no size yet; callers retry later.
const EXIT_NOT_READY: i32 = 3;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine readable for probe/restore.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| AppConfig::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let shutdown = install_shutdown_handler();

    let code = match cli.command {
        Commands::Healthcheck(args) => match run_healthcheck(&args.to_config(), shutdown).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
        Commands::Probe(args) => run_probe(args, shutdown).await,
        Commands::Restore(args) => run_restore(args).await,
    };

    std::process::exit(code);
}

/// Cancels the returned token on Ctrl+C or SIGTERM.
fn install_shutdown_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to listen for SIGTERM: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }
        trigger.cancel();
    });

    token
}

async fn run_probe(args: ProbeArgs, shutdown: CancellationToken) -> i32 {
    let mut hosts = args.hosts.unwrap_or_default();
    if let Some(path) = &args.hostfile {
        match load_hosts_from_file(path).await {
            Ok(from_file) => hosts.extend(from_file),
            Err(e) => {
                eprintln!("Error: failed to read hostfile {}: {e}", path.display());
                return 1;
            }
        }
    }

    if hosts.is_empty() {
        eprintln!("Error: probe requires --hosts or --hostfile");
        eprintln!("Usage: fullnode-operator probe --hosts <URL>... or --hostfile <FILE>");
        return 1;
    }

    let client = match CometClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to build RPC client: {e}");
            return 1;
        }
    };

    let results = probe_hosts(
        Arc::new(client),
        &hosts,
        Duration::from_secs(args.timeout),
        &shutdown,
    )
    .await;

    for result in &results {
        match serde_json::to_string(result) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Error: failed to encode result for {}: {e}", result.address),
        }
    }

    exit_code(&results)
}

async fn run_restore(args: RestoreArgs) -> i32 {
    let manifests = match manifests_from_files(&args.job, &args.snapshot).await {
        Ok(manifests) => manifests,
        Err(e) if e.is_not_ready() => {
            eprintln!("{e}; try again once the snapshot is ready");
            return EXIT_NOT_READY;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    match serde_json::to_string_pretty(&manifests) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}
