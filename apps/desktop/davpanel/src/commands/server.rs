use crate::cli::StartArgs;
use crate::commands::StatusReport;
use crate::error::PanelError;
use crate::state::AppState;

use control_core::controller::ServerState;
use control_core::model::Config;
use control_core::picker::DirectoryPicker;
use control_core::rpc::BackendRpc;

use std::future::Future;

use log::{debug, info, warn};

/// Report the server's liveness as the backend sees it now.
///
/// # Errors
///
/// - [`PanelError::Core`] if the backend cannot be reached.
pub async fn status<R: BackendRpc>(app: &AppState<R>) -> Result<StatusReport, PanelError> {
    app.load_config().await?;
    app.controller().poll_once().await;

    Ok(StatusReport::new(
        app.controller().state().liveness,
        &app.store().get_config(),
    ))
}

/// Apply the requested edits to the draft, push it and start the server.
///
/// # Errors
///
/// - [`PanelError::Core`] if the backend cannot be reached for the initial config.
/// - [`PanelError::Notice`] with a warning when the login edit is incomplete
///   (nothing is sent), or with the backend's message when it rejects the start.
pub async fn start<R, P>(
    app: &AppState<R>,
    args: &StartArgs,
    picker: &P,
) -> Result<StatusReport, PanelError>
where
    R: BackendRpc,
    P: DirectoryPicker,
{
    app.load_config().await?;
    apply_edits(app, args)?;

    if args.pick_root && !app.store().choose_root(picker).await {
        info!("No directory picked, keeping the current root");
    }

    let config = app.store().get_config();
    // The controller records the failure; the notice carries it out.
    if app.controller().start(config.clone()).await.is_err() {
        app.notice_as_error()?;
    }

    Ok(StatusReport::new(app.controller().state().liveness, &config))
}

/// Stop the server.
///
/// # Errors
///
/// - [`PanelError::Notice`] with the backend's message when it refuses.
pub async fn stop<R: BackendRpc>(app: &AppState<R>) -> Result<StatusReport, PanelError> {
    if app.controller().stop().await.is_err() {
        app.notice_as_error()?;
    }

    // The address is informational only, so a failed refresh is not fatal.
    if let Err(e) = app.load_config().await {
        debug!("Could not refresh config after stop: {e}");
    }

    Ok(StatusReport::new(
        app.controller().state().liveness,
        &app.store().get_config(),
    ))
}

/// Poll until `shutdown` resolves, calling `on_change` with each new state.
///
/// The first call reports the state after the initial poll.
pub async fn watch<R, S, F>(
    app: &AppState<R>,
    shutdown: S,
    mut on_change: F,
) -> Result<(), PanelError>
where
    R: BackendRpc,
    S: Future<Output = ()>,
    F: FnMut(&ServerState, &Config),
{
    if let Err(e) = app.load_config().await {
        warn!("Watching without backend config: {e}");
    }

    let mut states = app.controller().subscribe();
    app.controller().poll_once().await;
    on_change(&states.borrow_and_update(), &app.store().get_config());

    let poller = app
        .controller()
        .spawn_poller(app.settings().poll_interval());
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                on_change(&state, &app.store().get_config());
            }
        }
    }

    info!("Watch ending");
    poller.shutdown().await;
    Ok(())
}

fn apply_edits<R: BackendRpc>(app: &AppState<R>, args: &StartArgs) -> Result<(), PanelError> {
    let store = app.store();

    if let Some(enabled) = args.auth_change() {
        let username = args.user.clone().unwrap_or_default();
        let password = args.password.clone().unwrap_or_default();
        if let Err(refusal) = store.set_auth(enabled, username, password) {
            app.controller().warn(refusal);
            return app.notice_as_error();
        }
    }

    let ip = args.ip.clone();
    let port = args.port;
    let root = args.root.clone();
    let tls = args.tls_change();
    store.update_config(move |config| Config {
        ip: ip.or(config.ip),
        port: port.or(config.port),
        root: root.or(config.root),
        enable_tls: tls.or(config.enable_tls),
        ..config
    });

    Ok(())
}
