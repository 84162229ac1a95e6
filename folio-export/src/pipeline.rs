//! The export pipeline: article in, artifact bytes out.

use crate::compiler::{CompilerRunner, Tool, ToolStatus};
use crate::error::ExportError;
use crate::workspace::ScratchWorkspace;
use folio_core::bibliography::Bibliography;
use folio_core::config::ExportConfig;
use folio_core::frontmatter::{FrontMatterBuilder, BIBLIOGRAPHY_FILE};
use folio_core::models::Article;
use folio_core::render::{render, RenderTarget};
use folio_render::{render_article_page, render_jats, render_text, PageStyle, ARTICLE_CSS};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

const MARKDOWN_SOURCE: &str = "article.md";
const LATEX_SOURCE: &str = "article.tex";
const PDF_OUTPUT: &str = "article.pdf";
const HTML_PAGE: &str = "article.html";
const STYLESHEET: &str = "style.css";
const DOCX_OUTPUT: &str = "article.docx";

/// PDF back-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdfBackend {
    /// Converter to LaTeX, then the TeX engine
    Latex,
    /// Article page plus stylesheet through the paged-media engine
    PagedMedia,
}

/// What an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    LatexSource,
    Pdf(PdfBackend),
    Html,
    Docx,
    /// JATS XML record
    Jats,
    /// Plain text
    Text,
}

impl OutputKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "latex" | "tex" | "latex-source" => Some(OutputKind::LatexSource),
            "pdf" => Some(OutputKind::Pdf(PdfBackend::Latex)),
            "paged-pdf" | "paged" => Some(OutputKind::Pdf(PdfBackend::PagedMedia)),
            "html" => Some(OutputKind::Html),
            "docx" => Some(OutputKind::Docx),
            "jats" | "xml" => Some(OutputKind::Jats),
            "text" | "txt" => Some(OutputKind::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::LatexSource => "latex",
            OutputKind::Pdf(PdfBackend::Latex) => "pdf",
            OutputKind::Pdf(PdfBackend::PagedMedia) => "paged-pdf",
            OutputKind::Html => "html",
            OutputKind::Docx => "docx",
            OutputKind::Jats => "jats",
            OutputKind::Text => "text",
        }
    }

    /// Whether the export runs external tools (and so needs a workspace).
    pub fn needs_compiler(&self) -> bool {
        !matches!(self, OutputKind::Html | OutputKind::Jats | OutputKind::Text)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::LatexSource => "tex",
            OutputKind::Pdf(_) => "pdf",
            OutputKind::Html => "html",
            OutputKind::Docx => "docx",
            OutputKind::Jats => "xml",
            OutputKind::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputKind::LatexSource => "text/plain",
            OutputKind::Pdf(_) => "application/pdf",
            OutputKind::Html => "text/html",
            OutputKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputKind::Jats => "application/xml",
            OutputKind::Text => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

/// Deterministic download name, e.g. `article_42_en.pdf` or `article_42_en_paged.pdf`.
pub fn artifact_file_name(id: &str, lang: &str, kind: OutputKind) -> String {
    let suffix = match kind {
        OutputKind::Pdf(PdfBackend::PagedMedia) => "_paged",
        _ => "",
    };
    format!(
        "article_{}_{}{}.{}",
        file_name_safe(id),
        file_name_safe(lang),
        suffix,
        kind.extension()
    )
}

fn file_name_safe(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Turns articles into artifacts using the configured external tools.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
    front_matter: FrontMatterBuilder,
    runner: CompilerRunner,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            front_matter: FrontMatterBuilder::from_config(&config),
            runner: CompilerRunner::new(config.timeout()),
            config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `article` in `lang` as `kind`.
    ///
    /// Kinds that run external tools get their own scratch workspace, which
    /// is removed before this returns whether or not the export succeeded.
    /// `Html`, `Jats` and `Text` are rendered in memory.
    #[instrument(skip(self, article), fields(article = %article.id))]
    pub async fn export(
        &self,
        article: &Article,
        lang: &str,
        kind: OutputKind,
    ) -> Result<Artifact, ExportError> {
        info!("exporting article");

        let bytes = if kind.needs_compiler() {
            let workspace = ScratchWorkspace::create(self.config.workspace_root_dir().as_deref())?;
            let result = self.export_in(&workspace, article, lang, kind).await;
            workspace.close();
            result?
        } else {
            self.render_in_memory(article, lang, kind).await?
        };

        info!(bytes = bytes.len(), "export finished");
        Ok(Artifact {
            bytes,
            file_name: artifact_file_name(article.id.as_str(), lang, kind),
            content_type: kind.content_type(),
        })
    }

    /// Front matter followed by the Markdown body: the converter's input.
    pub fn markdown_source(&self, article: &Article, lang: &str) -> String {
        let front_matter = self.front_matter.build(
            article.metadata_for(lang),
            article.doi(),
            article.first_page,
            article.last_page,
            lang,
        );
        let body = article
            .content
            .as_ref()
            .map(|node| render(node, RenderTarget::Markdown, lang))
            .unwrap_or_default();
        format!("{}\n{}", front_matter, body)
    }

    /// Check every configured tool with `--version`.
    pub async fn probe(&self) -> Vec<ToolStatus> {
        let cwd = std::env::temp_dir();
        let tools = [
            ("converter", &self.config.converter),
            ("tex-engine", &self.config.tex_engine),
            ("paged-media-engine", &self.config.paged_media_engine),
        ];

        let mut statuses = Vec::with_capacity(tools.len());
        for (role, command) in tools {
            statuses.push(self.runner.probe(role, &Tool::parse(command), &cwd).await);
        }
        statuses
    }

    async fn export_in(
        &self,
        workspace: &ScratchWorkspace,
        article: &Article,
        lang: &str,
        kind: OutputKind,
    ) -> Result<Vec<u8>, ExportError> {
        match kind {
            OutputKind::LatexSource => self.latex_source(workspace, article, lang).await,
            OutputKind::Pdf(PdfBackend::Latex) => {
                self.latex_source(workspace, article, lang).await?;
                self.latex_pdf(workspace).await
            }
            OutputKind::Pdf(PdfBackend::PagedMedia) => {
                self.paged_pdf(workspace, article, lang).await
            }
            OutputKind::Docx => self.docx(workspace, article, lang).await,
            OutputKind::Html | OutputKind::Jats | OutputKind::Text => {
                self.render_in_memory(article, lang, kind).await
            }
        }
    }

    async fn render_in_memory(
        &self,
        article: &Article,
        lang: &str,
        kind: OutputKind,
    ) -> Result<Vec<u8>, ExportError> {
        let rendered = match kind {
            OutputKind::Jats => render_jats(article, lang)?,
            OutputKind::Text => render_text(article, lang)?,
            _ => {
                let css = self.stylesheet().await?;
                render_article_page(article, lang, PageStyle::Inline(css))?
            }
        };
        Ok(rendered.into_bytes())
    }

    async fn latex_source(
        &self,
        workspace: &ScratchWorkspace,
        article: &Article,
        lang: &str,
    ) -> Result<Vec<u8>, ExportError> {
        workspace
            .write(MARKDOWN_SOURCE, self.markdown_source(article, lang))
            .await?;

        let bibliography = Bibliography::from_references(&article.references);
        if !bibliography.is_empty() {
            if let Err(err) = bibliography.validate() {
                warn!(article = %article.id, "{}", err);
            }
            workspace
                .write(BIBLIOGRAPHY_FILE, bibliography.to_bibtex())
                .await?;
        }

        let mut args = vec![
            MARKDOWN_SOURCE.to_string(),
            "-o".to_string(),
            LATEX_SOURCE.to_string(),
        ];
        match self.latex_template()? {
            Some(template) => args.push(format!("--template={}", template.display())),
            None => args.push("--standalone".to_string()),
        }
        // only the program: the converter takes a single word here
        let tex_engine = Tool::parse(&self.config.tex_engine);
        args.push(format!("--pdf-engine={}", tex_engine.program()));
        if !bibliography.is_empty() {
            args.push(format!("--bibliography={}", BIBLIOGRAPHY_FILE));
            args.push("--citeproc".to_string());
        }

        let converter = Tool::parse(&self.config.converter);
        let output = self.runner.run(&converter, &args, workspace.path()).await?;
        workspace
            .read_output(LATEX_SOURCE, converter.program(), &output)
            .await
    }

    async fn latex_pdf(&self, workspace: &ScratchWorkspace) -> Result<Vec<u8>, ExportError> {
        let engine = Tool::parse(&self.config.tex_engine);
        let args = vec![
            "-interaction=nonstopmode".to_string(),
            format!("-output-directory={}", workspace.path().display()),
            LATEX_SOURCE.to_string(),
        ];
        let output = self.runner.run(&engine, &args, workspace.path()).await?;
        workspace
            .read_output(PDF_OUTPUT, engine.program(), &output)
            .await
    }

    async fn paged_pdf(
        &self,
        workspace: &ScratchWorkspace,
        article: &Article,
        lang: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let page = render_article_page(article, lang, PageStyle::Linked(STYLESHEET.to_string()))?;
        workspace.write(HTML_PAGE, page).await?;
        workspace.write(STYLESHEET, self.stylesheet().await?).await?;

        let engine = Tool::parse(&self.config.paged_media_engine);
        let args: Vec<String> = [
            "build",
            HTML_PAGE,
            "--style",
            STYLESHEET,
            "--output",
            PDF_OUTPUT,
            "--size",
            "A4",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let output = self.runner.run(&engine, &args, workspace.path()).await?;
        workspace
            .read_output(PDF_OUTPUT, engine.program(), &output)
            .await
    }

    async fn docx(
        &self,
        workspace: &ScratchWorkspace,
        article: &Article,
        lang: &str,
    ) -> Result<Vec<u8>, ExportError> {
        let css = self.stylesheet().await?;
        let page = render_article_page(article, lang, PageStyle::Inline(css))?;
        workspace.write(HTML_PAGE, page).await?;

        let converter = Tool::parse(&self.config.converter);
        let args: Vec<String> = [
            HTML_PAGE,
            "-o",
            DOCX_OUTPUT,
            "--from",
            "html",
            "--to",
            "docx",
            "--standalone",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let output = self.runner.run(&converter, &args, workspace.path()).await?;
        workspace
            .read_output(DOCX_OUTPUT, converter.program(), &output)
            .await
    }

    /// Configured stylesheet, or the built-in one.
    async fn stylesheet(&self) -> Result<String, ExportError> {
        match self.config.stylesheet_path() {
            Some(path) => Ok(tokio::fs::read_to_string(&path).await?),
            None => Ok(ARTICLE_CSS.to_string()),
        }
    }

    /// Converter template as an absolute path; the converter runs inside the workspace.
    fn latex_template(&self) -> Result<Option<PathBuf>, ExportError> {
        self.config
            .latex_template_path()
            .map(std::path::absolute)
            .transpose()
            .map_err(ExportError::Io)
    }
}
