//! Logging for the davpanel CLI.
//!
//! Two sinks: colored stderr (stdout is reserved for command output, which
//! may be JSON) and a plain `davpanel.log`. Setting up twice is a no-op.

use crate::error::PanelError;

use control_core::PANEL_APP_NAME;

use common::ErrorLocation;

use std::fmt::{Arguments, Display};
use std::io::stderr;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::colors::Color::{Blue, Cyan, Green, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use fern::{Dispatch, FormatCallback};
use humantime::format_rfc3339;
use log::{LevelFilter, Record, info, warn};

static LOGGER_ONCE: Once = Once::new();
static LOGGER_REQUESTED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "davpanel.log";

#[cfg(debug_assertions)]
const FILE_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const FILE_LEVEL: LevelFilter = LevelFilter::Info;

/// Console level without `--verbose`.
const QUIET_CONSOLE_LEVEL: LevelFilter = LevelFilter::Warn;

/// `{platform data dir}/davpanel/logs`, or the temp dir when there is none.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(PANEL_APP_NAME)
        .join("logs")
}

/// Install the global logger writing to stderr and `{log_dir}/davpanel.log`.
///
/// Later calls only log a warning and return `Ok`.
///
/// # Errors
///
/// [`PanelError::Panel`] if the log file cannot be opened or another logger
/// is already installed.
pub fn initialize(log_dir: &Path, verbose: bool) -> Result<(), PanelError> {
    if LOGGER_REQUESTED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized, ignoring");
        return Ok(());
    }

    let mut outcome = Ok(());
    LOGGER_ONCE.call_once(|| {
        outcome = build_dispatch(log_dir, verbose).and_then(install);
        if outcome.is_ok() {
            info!("Logging to {} at {FILE_LEVEL:?}", log_dir.display());
        }
    });
    outcome
}

/// Assemble both sinks without installing them.
#[track_caller]
pub(crate) fn build_dispatch(log_dir: &Path, verbose: bool) -> Result<Dispatch, PanelError> {
    let log_path = log_dir.join(LOG_FILE_NAME);
    let log_file = fern::log_file(&log_path).map_err(|e| PanelError::Panel {
        message: format!("Cannot open log file {}: {e}", log_path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let colors = ColoredLevelConfig::new()
        .trace(Cyan)
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red);

    let console = Dispatch::new()
        .level(if verbose { FILE_LEVEL } else { QUIET_CONSOLE_LEVEL })
        .format(move |out, message, record| {
            write_line(out, message, record, colors.color(record.level()), false);
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| {
            write_line(out, message, record, record.level(), true);
        })
        .chain(log_file);

    Ok(Dispatch::new()
        .level(FILE_LEVEL)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info)
        .chain(console)
        .chain(file))
}

/// `[rfc3339 - LEVEL] message`, plus `[file:line]` for the log file.
fn write_line(
    out: FormatCallback<'_>,
    message: &Arguments<'_>,
    record: &Record<'_>,
    level: impl Display,
    with_source: bool,
) {
    let now = format_rfc3339(SystemTime::now());
    if with_source {
        out.finish(format_args!(
            "[{now} - {level}] {message} [{}:{}]",
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0)
        ));
    } else {
        out.finish(format_args!("[{now} - {level}] {message}"));
    }
}

#[track_caller]
fn install(dispatch: Dispatch) -> Result<(), PanelError> {
    dispatch.apply().map_err(|e| PanelError::Panel {
        message: format!("Cannot install logger: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
