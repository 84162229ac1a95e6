//! # folio-core
//!
//! Core library for the folio article export engine.
//!
//! This crate holds the editor document model and its Markdown/HTML
//! renderers, the front matter and bibliography builders fed to the
//! converter, export configuration, and the edit-lock coordinator.
//! Nothing here spawns processes or touches the network.

pub mod bibliography;
pub mod config;
pub mod document;
pub mod frontmatter;
pub mod lock;
pub mod models;
pub mod render;

pub use bibliography::{BibEntry, Bibliography, BibliographyError};
pub use config::{ConfigError, ExportConfig};
pub use document::{Mark, Node};
pub use frontmatter::FrontMatterBuilder;
pub use lock::{Clock, EditLock, EditLockCoordinator, InMemoryLockStore, LockStore, SystemClock};
pub use models::{Article, ArticleError, ArticleMetadata, LocalizedText, ReferenceEntry};
pub use render::{render, RenderTarget, Renderer};
