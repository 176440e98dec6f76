//! Directory selection, provided by whatever front end hosts the panel.

use std::future::Future;
use std::path::PathBuf;

pub trait DirectoryPicker: Send + Sync {
    /// Ask the operator for a directory.
    ///
    /// Returns the chosen absolute path, or `None` when the prompt was cancelled.
    fn pick_directory(&self, title: &str) -> impl Future<Output = Option<PathBuf>> + Send;
}
