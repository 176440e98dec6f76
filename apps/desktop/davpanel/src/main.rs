use davpanel::cli::{Cli, Command};
use davpanel::commands::{self, config, server, settings};
use davpanel::error::PanelError;
use davpanel::logger::{default_log_dir, initialize as LoggerInitialize};
use davpanel::picker::PromptPicker;
use davpanel::state::AppState;

use control_core::config::PanelSettings;

use common::ErrorLocation;

use std::fmt::Display;
use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use serde::Serialize;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            if json {
                print_json(&e);
            } else {
                eprintln!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), PanelError> {
    let log_dir = cli.log_dir.clone().unwrap_or_else(default_log_dir);
    create_dir_all(&log_dir).map_err(|e| PanelError::Panel {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir, cli.verbose)?;
    info!("davpanel starting, log directory: {}", log_dir.display());

    let settings_dir = match cli.settings_dir.clone() {
        Some(dir) => dir,
        None => PanelSettings::default_dir()?,
    };
    let panel_settings = settings::resolve(&settings_dir, cli.backend_url.as_deref())?;

    if let Command::Settings(args) = &cli.command {
        let effective = settings::show(&panel_settings, &settings_dir, args.write)?;
        print_json(&effective);
        return Ok(());
    }

    let app = AppState::connect(panel_settings)?;

    match &cli.command {
        Command::Status => emit(cli.json, &server::status(&app).await?),
        Command::Config => emit(cli.json, &config::show(&app).await?),
        Command::Start(args) => {
            let picker = PromptPicker::stdin();
            emit(cli.json, &server::start(&app, args, &picker).await?)
        }
        Command::Stop => emit(cli.json, &server::stop(&app).await?),
        Command::ImportCert(args) => emit(cli.json, &config::import_cert(&app, args).await?),
        Command::Watch => {
            let json = cli.json;
            server::watch(&app, ctrl_c(), |state, config| {
                emit(json, &commands::StatusReport::new(state.liveness, config));
            })
            .await?
        }
        Command::Settings(_) => {}
    }

    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
    }
}

fn emit<T: Serialize + Display>(json: bool, report: &T) {
    if json {
        print_json(report);
    } else {
        println!("{report}");
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => error!("Failed to render JSON output: {e}"),
    }
}
