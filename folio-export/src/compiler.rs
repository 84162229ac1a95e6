//! Running external compilers as subprocesses.

use crate::error::ExportError;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

/// A configured external tool: a program plus any arguments that always
/// precede the per-call ones (`docker run --rm pandoc/latex`, `npx vivliostyle`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    program: String,
    leading_args: Vec<String>,
}

impl Tool {
    /// Split a configured command on whitespace.
    pub fn parse(command: &str) -> Self {
        let mut words = command.split_whitespace().map(str::to_string);
        Self {
            program: words.next().unwrap_or_default(),
            leading_args: words.collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        cmd
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.leading_args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Availability of one configured tool, as reported by `--version`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    pub role: &'static str,
    pub command: String,
    pub version: Option<String>,
    pub error: Option<String>,
}

impl ToolStatus {
    pub fn available(&self) -> bool {
        self.version.is_some()
    }
}

/// Runs tools with a working directory and a wall-clock limit.
#[derive(Debug, Clone)]
pub struct CompilerRunner {
    timeout: Option<Duration>,
}

impl CompilerRunner {
    /// `timeout` of zero disables the limit.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: (!timeout.is_zero()).then_some(timeout),
        }
    }

    /// Run `tool` with `args` in `cwd` and return its combined output.
    ///
    /// A non-zero exit becomes [`ExportError::CompilerFailed`] carrying
    /// stdout followed by stderr. On timeout the process is killed.
    pub async fn run(&self, tool: &Tool, args: &[String], cwd: &Path) -> Result<String, ExportError> {
        let mut cmd = tool.command();
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(program = %tool, args = ?args, cwd = %cwd.display(), "running compiler");

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    error!(program = %tool, after = ?limit, "compiler timed out");
                    return Err(ExportError::Timeout {
                        program: tool.program().to_string(),
                        after: limit,
                    });
                }
            },
            None => cmd.output().await,
        };

        let output = result.map_err(|source| ExportError::Spawn {
            program: tool.program().to_string(),
            source,
        })?;

        let combined = combine_output(&output.stdout, &output.stderr);
        for line in combined.lines() {
            debug!(program = %tool.program(), "{}", line);
        }

        if !output.status.success() {
            error!(
                program = %tool,
                code = ?output.status.code(),
                "compiler failed"
            );
            return Err(ExportError::CompilerFailed {
                program: tool.program().to_string(),
                code: output.status.code(),
                output: combined,
            });
        }

        Ok(combined)
    }

    /// Ask `tool` for its version.
    pub async fn probe(&self, role: &'static str, tool: &Tool, cwd: &Path) -> ToolStatus {
        let args = vec!["--version".to_string()];
        match self.run(tool, &args, cwd).await {
            Ok(output) => ToolStatus {
                role,
                command: tool.to_string(),
                version: Some(
                    output
                        .lines()
                        .map(str::trim)
                        .find(|line| !line.is_empty())
                        .unwrap_or_default()
                        .to_string(),
                ),
                error: None,
            },
            Err(err) => ToolStatus {
                role,
                command: tool.to_string(),
                version: None,
                error: Some(err.to_string()),
            },
        }
    }
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined
}
