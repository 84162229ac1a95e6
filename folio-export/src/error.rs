//! Export errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create export workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed (exit {code:?}):\n{output}")]
    CompilerFailed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error(
        "{program} exited successfully but did not produce {}{}",
        path.display(),
        diagnostics(output)
    )]
    MissingOutput {
        program: String,
        path: PathBuf,
        output: String,
    },

    #[error("{program} did not finish within {after:?}")]
    Timeout { program: String, after: Duration },

    #[error("Failed to render article page: {0}")]
    Template(#[from] askama::Error),
}

impl ExportError {
    /// Whether running the same export again may succeed.
    ///
    /// No partial artifact is ever returned, so compiler failures, missing
    /// outputs and timeouts can always be retried. A tool that cannot be
    /// started or a page that cannot be rendered will fail the same way.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ExportError::Spawn { .. } | ExportError::Template(_))
    }

    /// Diagnostic text captured from the compiler, if any.
    pub fn compiler_output(&self) -> Option<&str> {
        match self {
            ExportError::CompilerFailed { output, .. }
            | ExportError::MissingOutput { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn diagnostics(output: &str) -> String {
    if output.trim().is_empty() {
        String::new()
    } else {
        format!(":\n{}", output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_failures_are_retryable() {
        let failed = ExportError::CompilerFailed {
            program: "xelatex".into(),
            code: Some(1),
            output: "! Undefined control sequence.".into(),
        };
        assert!(failed.is_retryable());
        assert_eq!(failed.compiler_output(), Some("! Undefined control sequence."));
        assert!(failed.to_string().contains("xelatex failed (exit Some(1))"));

        let missing = ExportError::MissingOutput {
            program: "pandoc".into(),
            path: PathBuf::from("article.tex"),
            output: String::new(),
        };
        assert!(missing.is_retryable());
        assert_eq!(
            missing.to_string(),
            "pandoc exited successfully but did not produce article.tex"
        );
    }

    #[test]
    fn test_missing_output_keeps_compiler_diagnostics() {
        let missing = ExportError::MissingOutput {
            program: "xelatex".into(),
            path: PathBuf::from("article.pdf"),
            output: "No pages of output.\n".into(),
        };
        assert_eq!(missing.compiler_output(), Some("No pages of output.\n"));
        assert_eq!(
            missing.to_string(),
            "xelatex exited successfully but did not produce article.pdf:\nNo pages of output.\n"
        );
    }

    #[test]
    fn test_missing_tool_is_not_retryable() {
        let err = ExportError::Spawn {
            program: "vivliostyle".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(!err.is_retryable());
        assert!(err.compiler_output().is_none());
    }
}
