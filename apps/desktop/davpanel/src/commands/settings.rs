use crate::error::PanelError;

use control_core::config::PanelSettings;

use std::path::Path;

/// Return the effective settings, persisting them first when `write` is set.
pub fn show(
    settings: &PanelSettings,
    settings_dir: &Path,
    write: bool,
) -> Result<PanelSettings, PanelError> {
    if write {
        settings.save(settings_dir)?;
    }
    Ok(settings.clone())
}

/// Load `settings.json` from `settings_dir` and apply command line overrides.
///
/// # Errors
///
/// [`PanelError::Settings`] if the file is unreadable or the result is invalid.
pub fn resolve(
    settings_dir: &Path,
    backend_url: Option<&str>,
) -> Result<PanelSettings, PanelError> {
    let mut settings = PanelSettings::load(settings_dir)?;

    if let Some(url) = backend_url {
        settings.backend.base_url = url.to_string();
        settings.validate()?;
    }

    Ok(settings)
}
