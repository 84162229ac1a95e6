//! Run the export pipeline and write the artifact to disk.

use super::{load_article, load_config};
use anyhow::{Context, Result};
use folio_export::{Exporter, OutputKind};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub async fn export_article(
    config_path: &Path,
    article_path: &Path,
    kind: OutputKind,
    lang: &str,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let article = load_article(article_path)?;
    let exporter = Exporter::new(config);

    let artifact = match exporter.export(&article, lang, kind).await {
        Ok(artifact) => artifact,
        Err(err) => {
            error!(article = %article.id, retryable = err.is_retryable(), "export failed");
            return Err(err).with_context(|| format!("Failed to export {} as {}", article.id, kind));
        }
    };

    let destination = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    std::fs::write(&destination, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", destination.display()))?;

    info!(
        path = %destination.display(),
        bytes = artifact.bytes.len(),
        content_type = artifact.content_type,
        "wrote artifact"
    );
    println!("{}", destination.display());
    Ok(())
}
