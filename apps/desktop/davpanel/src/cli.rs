//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "davpanel", version, about = "Control panel for a WebDAV file server backend")]
pub struct Cli {
    /// Backend RPC endpoint, overriding the settings file
    #[arg(long, global = true, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Directory holding settings.json
    #[arg(long, global = true, value_name = "DIR")]
    pub settings_dir: Option<PathBuf>,

    /// Directory for davpanel.log
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Show info/debug logs on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show whether the DAV server is running and where
    Status,

    /// Show the configuration held by the backend
    Config,

    /// Push configuration changes and start the DAV server
    Start(StartArgs),

    /// Stop the DAV server
    Stop,

    /// Send TLS certificate and/or key paths to the backend
    ImportCert(ImportCertArgs),

    /// Follow server status until Ctrl-C
    Watch,

    /// Show the effective panel settings
    Settings(SettingsArgs),
}

#[derive(Debug, Default, Args)]
pub struct StartArgs {
    /// Bind address (empty for any)
    #[arg(long)]
    pub ip: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Directory to serve
    #[arg(long, conflicts_with = "pick_root")]
    pub root: Option<String>,

    /// Prompt for the directory to serve
    #[arg(long)]
    pub pick_root: bool,

    /// Enable login with this user (requires --password)
    #[arg(long, conflicts_with = "no_auth")]
    pub user: Option<String>,

    #[arg(long, conflicts_with = "no_auth")]
    pub password: Option<String>,

    /// Disable login
    #[arg(long)]
    pub no_auth: bool,

    /// Serve over HTTPS
    #[arg(long, conflicts_with = "no_tls")]
    pub tls: bool,

    /// Serve over plain HTTP
    #[arg(long)]
    pub no_tls: bool,
}

impl StartArgs {
    /// `Some(true)` to enable login, `Some(false)` to disable it, `None` to keep it.
    pub fn auth_change(&self) -> Option<bool> {
        if self.no_auth {
            Some(false)
        } else if self.user.is_some() || self.password.is_some() {
            Some(true)
        } else {
            None
        }
    }

    pub fn tls_change(&self) -> Option<bool> {
        match (self.tls, self.no_tls) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct ImportCertArgs {
    /// PEM certificate file
    #[arg(long, value_name = "PATH")]
    pub cert: Option<String>,

    /// PEM private key file
    #[arg(long, value_name = "PATH")]
    pub key: Option<String>,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Persist the effective settings (including command line overrides)
    #[arg(long)]
    pub write: bool,
}
