//! Scratch directories for a single export.

use crate::error::ExportError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Isolated directory holding one export's sources and outputs.
///
/// Call [`ScratchWorkspace::close`] when done so removal failures are
/// logged. If the workspace is dropped instead (for example when the export
/// future is cancelled) the directory is still removed, silently.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create a fresh directory under `root`, or under the OS temp dir.
    pub fn create(root: Option<&Path>) -> Result<Self, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("folio-export-");

        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(ExportError::Workspace)?;
                let root = std::path::absolute(root).map_err(ExportError::Workspace)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(ExportError::Workspace)?;

        debug!(path = %dir.path().display(), "created export workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` inside the workspace.
    pub async fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf, ExportError> {
        let path = self.join(name);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    /// Read an output `program` was expected to produce.
    ///
    /// A missing or empty file is reported as [`ExportError::MissingOutput`]
    /// carrying `compiler_output`, the text the run printed.
    pub async fn read_output(
        &self,
        name: &str,
        program: &str,
        compiler_output: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let path = self.join(name);
        let missing = |path: PathBuf| ExportError::MissingOutput {
            program: program.to_string(),
            path,
            output: compiler_output.to_string(),
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Err(missing(path)),
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(missing(path)),
            Err(err) => Err(ExportError::Io(err)),
        }
    }

    /// Remove the workspace. Failures are logged, never returned.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "removed export workspace"),
            Err(err) => warn!(path = %path.display(), "failed to remove export workspace: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_workspace_is_removed_on_close() {
        let root = tempfile::tempdir().unwrap();
        let ws = ScratchWorkspace::create(Some(root.path())).unwrap();
        let path = ws.path().to_path_buf();
        assert!(path.starts_with(root.path()));

        ws.write("article.md", "# Title\n").await.unwrap();
        assert!(path.join("article.md").exists());

        ws.close();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_workspace_is_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let ws = ScratchWorkspace::create(Some(root.path())).unwrap();
            ws.write("x", "y").await.unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_and_empty_outputs() {
        let ws = ScratchWorkspace::create(None).unwrap();

        let err = ws
            .read_output("article.pdf", "xelatex", "No pages of output.")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingOutput { ref program, .. } if program == "xelatex"));
        assert_eq!(err.compiler_output(), Some("No pages of output."));

        ws.write("article.tex", "").await.unwrap();
        let err = ws.read_output("article.tex", "pandoc", "").await.unwrap_err();
        assert!(matches!(err, ExportError::MissingOutput { .. }));

        ws.write("article.tex", "\\documentclass{article}").await.unwrap();
        assert_eq!(
            ws.read_output("article.tex", "pandoc", "").await.unwrap(),
            b"\\documentclass{article}"
        );
        ws.close();
    }

    #[test]
    fn test_root_is_created_when_missing() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("exports").join("scratch");
        let ws = ScratchWorkspace::create(Some(&nested)).unwrap();
        assert!(ws.path().starts_with(&nested));
        ws.close();
    }
}
