use crate::cli::ImportCertArgs;
use crate::commands::ConfigReport;
use crate::error::PanelError;
use crate::state::AppState;

use control_core::model::CertConfig;
use control_core::rpc::BackendRpc;

use log::info;

/// Show the configuration held by the backend.
pub async fn show<R: BackendRpc>(app: &AppState<R>) -> Result<ConfigReport, PanelError> {
    app.load_config().await?;
    Ok(ConfigReport::new(
        &app.store().get_config(),
        &app.store().cert_config(),
    ))
}

/// Merge the given TLS paths into the draft and send them to the backend.
///
/// # Errors
///
/// [`PanelError::Notice`] with a warning when neither path is given, or with
/// the backend's message when it rejects the import.
pub async fn import_cert<R: BackendRpc>(
    app: &AppState<R>,
    args: &ImportCertArgs,
) -> Result<ConfigReport, PanelError> {
    let patch = CertConfig::new(args.cert.clone(), args.key.clone());

    if let Err(refusal) = app.store().set_cert_path(patch) {
        app.controller().warn(refusal);
        app.notice_as_error()?;
    }

    if app
        .controller()
        .import_cert(app.store().cert_config())
        .await
        .is_err()
    {
        app.notice_as_error()?;
    }

    info!("TLS material imported");
    Ok(ConfigReport::new(
        &app.store().get_config(),
        &app.store().cert_config(),
    ))
}
