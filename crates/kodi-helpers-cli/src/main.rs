mod cli;
mod logging;
mod output;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use kodi_helpers_api::Scheme;
use kodi_helpers_core::config::AppConfig;
use kodi_helpers_core::error::CoreError;
use kodi_helpers_runtime::{Runtime, RuntimeError};

use cli::{Cli, Command};
use output::StatusReport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("could not encode output: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_dir.as_deref());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "kodi-helpers failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let path = cli.config_path();
    let mut config = AppConfig::load_from(&path)?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Command::Config { init } => show_config(&path, &config, init),
        Command::Ping => {
            let runtime = Runtime::new(&config)?;
            let url = runtime.context().await.connection.base_url();
            if runtime.is_reachable().await {
                println!("{url}: pong");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{url}: unreachable");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Status { json } => {
            let runtime = Runtime::new(&config)?;
            let snapshot = runtime.run_poll_tick().await;
            let report = StatusReport {
                device: runtime.device_info().await,
                sensors: runtime.sensors().await,
                switch: runtime.scheme_switch().await,
                available: snapshot.available,
                updated_at: snapshot.updated_at.to_rfc3339(),
            };

            if json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::Output(e.to_string()))?;
                println!("{out}");
            } else {
                print!("{}", report.render_text());
            }

            Ok(if snapshot.available {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Watch { .. } => {
            let runtime = Runtime::new(&config)?;
            let interval = config.poll_interval();
            tracing::info!(
                endpoint = %runtime.context().await.connection.endpoint(),
                interval_secs = interval.as_secs(),
                "polling Kodi"
            );

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            };
            runtime
                .run_until(interval, shutdown, |snapshot| {
                    println!("{}", output::snapshot_line(snapshot));
                })
                .await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Scheme { scheme } => set_scheme(&path, &config, scheme).await,
    }
}

async fn set_scheme(
    path: &Path,
    config: &AppConfig,
    scheme: Scheme,
) -> Result<ExitCode, CliError> {
    let runtime = Runtime::new(config)?;
    runtime.set_scheme(scheme).await?;

    stored_with_scheme(path, config, scheme)?.save_to(path)?;

    let switch = runtime.scheme_switch().await;
    println!(
        "{}: {}",
        switch.name,
        if switch.is_on { "on" } else { "off" }
    );
    if !runtime.is_reachable().await {
        tracing::warn!(%scheme, "Kodi does not answer with the new scheme");
    }
    Ok(ExitCode::SUCCESS)
}

/// Config to write after a scheme change.
///
/// An existing file only gets the new scheme; other overrides stay per-run.
/// A new file starts from the effective config so it carries `--host`.
fn stored_with_scheme(
    path: &Path,
    effective: &AppConfig,
    scheme: Scheme,
) -> Result<AppConfig, CoreError> {
    let mut stored = if path.exists() {
        AppConfig::load_from(path)?
    } else {
        effective.clone()
    };
    stored.connection.scheme = scheme;
    Ok(stored)
}

fn show_config(path: &Path, config: &AppConfig, init: bool) -> Result<ExitCode, CliError> {
    if init {
        if path.exists() {
            println!("{} already exists", path.display());
        } else {
            config.save_to(path)?;
            println!("wrote {}", path.display());
        }
    } else {
        println!("{}", path.display());
    }
    println!("# log files: --log-dir, e.g. {}", AppConfig::log_dir().display());

    let mut shown = config.clone();
    if shown.connection.password.is_some() {
        shown.connection.password = Some("********".into());
    }
    if shown.omdb.api_key.is_some() {
        shown.omdb.api_key = Some("********".into());
    }
    let rendered =
        toml::to_string_pretty(&shown).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{rendered}");

    if let Err(e) = config.validate() {
        println!("warning: {e}");
    }
    Ok(ExitCode::SUCCESS)
}
