//! # folio CLI
//!
//! Command-line interface for the folio article export engine.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use folio_core::render::RenderTarget;
use folio_export::{OutputKind, PdfBackend};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "folio.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document tree (JSON) to Markdown or HTML
    Render {
        /// Document JSON file
        document: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = TargetArg::Markdown)]
        target: TargetArg,

        /// Language code
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Print the YAML front matter for an article
    FrontMatter {
        /// Article JSON file
        article: PathBuf,

        /// Language code
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Print the BibTeX database for an article's references
    Bibliography {
        /// Article JSON file
        article: PathBuf,
    },

    /// Export an article through the external compilers
    Export {
        /// Article JSON file
        article: PathBuf,

        /// Artifact format
        #[arg(long, value_enum)]
        format: FormatArg,

        /// Language code
        #[arg(long, default_value = "en")]
        lang: String,

        /// Output path (defaults to the artifact's name in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Report which external tools are available
    Check {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TargetArg {
    Markdown,
    Html,
}

impl From<TargetArg> for RenderTarget {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Markdown => RenderTarget::Markdown,
            TargetArg::Html => RenderTarget::Html,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Latex,
    Pdf,
    PagedPdf,
    Html,
    Docx,
    Jats,
    Text,
}

impl From<FormatArg> for OutputKind {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Latex => OutputKind::LatexSource,
            FormatArg::Pdf => OutputKind::Pdf(PdfBackend::Latex),
            FormatArg::PagedPdf => OutputKind::Pdf(PdfBackend::PagedMedia),
            FormatArg::Html => OutputKind::Html,
            FormatArg::Docx => OutputKind::Docx,
            FormatArg::Jats => OutputKind::Jats,
            FormatArg::Text => OutputKind::Text,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr; stdout carries rendered output.
    // RUST_LOG, when set, takes precedence over --verbose.
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level.to_string()));
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render {
            document,
            target,
            lang,
        } => commands::render_document(&document, target.into(), &lang),
        Commands::FrontMatter { article, lang } => {
            commands::print_front_matter(&cli.config, &article, &lang)
        }
        Commands::Bibliography { article } => commands::print_bibliography(&article),
        Commands::Export {
            article,
            format,
            lang,
            output,
        } => {
            commands::export_article(&cli.config, &article, format.into(), &lang, output.as_deref())
                .await
        }
        Commands::Check { json } => commands::check_tools(&cli.config, json).await,
    }
}
