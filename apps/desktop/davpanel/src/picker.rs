//! Terminal directory prompt.

use control_core::picker::DirectoryPicker;

use std::path::{PathBuf, absolute};

use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin, stdin};
use tokio::sync::Mutex;

/// Prompts on stderr and reads one line. An empty line (or end of input)
/// cancels.
pub struct PromptPicker<I> {
    input: Mutex<I>,
}

impl PromptPicker<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(stdin()))
    }
}

impl<I> PromptPicker<I>
where
    I: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: I) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl<I> DirectoryPicker for PromptPicker<I>
where
    I: AsyncBufRead + Unpin + Send,
{
    async fn pick_directory(&self, title: &str) -> Option<PathBuf> {
        eprint!("{title}: ");

        let mut line = String::new();
        let mut input = self.input.lock().await;
        if let Err(e) = input.read_line(&mut line).await {
            warn!("Failed to read directory from terminal: {e}");
            return None;
        }

        let entered = line.trim();
        if entered.is_empty() {
            debug!("Directory prompt left empty");
            return None;
        }

        let path = match absolute(entered) {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot resolve '{entered}': {e}");
                return None;
            }
        };

        if !path.is_dir() {
            warn!("'{}' is not a directory", path.display());
            return None;
        }

        Some(path)
    }
}
