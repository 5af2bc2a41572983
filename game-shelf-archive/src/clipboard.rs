//! Copying text to the system clipboard through the platform's helper tool.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ArchiveError;

pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), ArchiveError>;
}

/// Pipes text into `clip` (Windows), `pbcopy` (macOS) or
/// `xclip -selection clipboard` (everything else).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn command() -> Command {
        if cfg!(target_os = "windows") {
            Command::new("clip")
        } else if cfg!(target_os = "macos") {
            Command::new("pbcopy")
        } else {
            let mut cmd = Command::new("xclip");
            cmd.args(["-selection", "clipboard"]);
            cmd
        }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ArchiveError> {
        let mut cmd = Self::command();
        let program = cmd.get_program().to_string_lossy().into_owned();
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ArchiveError::clipboard(format!("could not run {program}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(ArchiveError::clipboard(format!("{program} exited with {status}")));
        }
        Ok(())
    }
}
