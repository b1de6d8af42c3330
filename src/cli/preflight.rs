//! Checks run before commands that would otherwise fail halfway through a
//! download or a paid model call.

use crate::error::{Result, YoyakuError};
use std::process::{Command, Stdio};

/// What a command needs from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Full pipeline: yt-dlp and an OpenAI key.
    Summarize,
    /// Rendering or validating local files.
    Offline,
}

impl Operation {
    fn needs_network_tools(self) -> bool {
        matches!(self, Operation::Summarize)
    }
}

/// Fail fast with a readable error when a requirement of `operation` is missing.
pub fn check(operation: Operation) -> Result<()> {
    if operation.needs_network_tools() {
        crate::openai::require_api_key().map_err(|_| {
            YoyakuError::Config("OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string())
        })?;
        require_tool("yt-dlp")?;
    }
    Ok(())
}

fn require_tool(name: &str) -> Result<()> {
    let status = Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => Err(YoyakuError::ToolFailed(format!("{} --version exited with {}", name, s))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(YoyakuError::ToolNotFound(name.to_string())),
        Err(e) => Err(YoyakuError::ToolFailed(format!("{}: {}", name, e))),
    }
}
