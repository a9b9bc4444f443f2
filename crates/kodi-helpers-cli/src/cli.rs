use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kodi_helpers_api::Scheme;
use kodi_helpers_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "kodi-helpers", version, about = "Report what a Kodi instance is playing")]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Kodi host, overrides `connection.host`.
    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[arg(long, global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Connect over HTTPS for this run.
    #[arg(long, global = true)]
    pub https: bool,

    /// Also write daily log files into this directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll on a fixed interval until interrupted.
    Watch {
        /// Seconds between polls, overrides `polling.interval_secs`.
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Poll once and print the sensors.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Check that Kodi answers `JSONRPC.Ping`.
    Ping,
    /// Set the connection scheme and save it to the config file.
    Scheme { scheme: Scheme },
    /// Show the config file location and effective settings.
    Config {
        /// Write the built-in defaults if no config file exists yet.
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(AppConfig::config_path)
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.connection.host = host.clone();
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(username) = &self.username {
            config.connection.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.connection.password = Some(password.clone());
        }
        if self.https {
            config.connection.scheme = Scheme::Https;
        }
        if let Command::Watch {
            interval: Some(secs),
        } = self.command
        {
            config.polling.interval_secs = secs;
        }
    }
}
