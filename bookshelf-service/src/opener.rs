//! Handing a book file to the desktop's default viewer.

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Failed to launch viewer for {path}: {source}")]
    Launch {
        path: String,
        source: std::io::Error,
    },
    #[error("Viewer exited with {status} for {path}")]
    Failed { path: String, status: ExitStatus },
}

/// Opens a file outside the process.
pub trait BookOpener {
    fn open(&mut self, path: &Path) -> Result<(), OpenError>;
}

/// Opens files with the platform launcher (`xdg-open`, `open`, or `start`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl BookOpener for SystemOpener {
    fn open(&mut self, path: &Path) -> Result<(), OpenError> {
        let status = launcher(path).status().map_err(|e| OpenError::Launch {
            path: path.display().to_string(),
            source: e,
        })?;
        if !status.success() {
            return Err(OpenError::Failed {
                path: path.display().to_string(),
                status,
            });
        }
        Ok(())
    }
}

fn launcher(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
