//! Folio - render a source tree into paginated, standalone HTML documents.
//!
//! Folio walks a directory (usually a freshly cloned repository), keeps the
//! files whose extensions pass an allow/deny policy, and writes their content
//! into one or more HTML pages. Each page holds at most a configured amount
//! of file content; whatever does not fit spills into the next page.
//!
//! # Quick Start
//!
//! ```no_run
//! use folio::builder::Folio;
//!
//! let (report, summary) = Folio::new("./my-project")
//!     .whitelist(&["txt", "md", "rs"])
//!     .max_length(500_000)
//!     .write("my-project.html")
//!     .unwrap();
//!
//! println!("{} files skipped with a warning", report.warned);
//! for page in &summary.pages {
//!     println!("wrote {}", page.display());
//! }
//! ```
//!
//! # Modules
//!
//! - [`filter`] - Extension allow/deny lists and the hidden-file rule
//! - [`tree`] - Folder/file nodes, path lookup, outline rendering
//! - [`walker`] - Recursive directory traversal
//! - [`builder`] - Tree construction and the fluent API
//! - [`output`] - Paginated HTML rendering
//! - [`config`] - JSON configuration file
//! - [`source`] - Cloning remote repositories
//! - [`logging`] - `tracing` subscriber setup

pub mod filter;
pub mod errors;
pub mod tree;
pub mod walker;
pub mod builder;
pub mod output;
pub mod config;
pub mod source;
pub mod logging;

// Re-export key types at crate root for convenience
pub use builder::{build_tree, BuildReport, Folio, TreeBuilder};
pub use config::{Config, ConfigError};
pub use errors::FolioError;
pub use filter::{FilterPolicy, FilterResult, RejectReason};
pub use output::{render_once, render_pages, write_pages, Budget, OutputError, RenderSummary};
pub use source::SourceError;
pub use tree::{resolve, FileEntry, Node, NodeKind};
pub use walker::{walk_files, FileVisitor, WalkError, WalkOptions};
