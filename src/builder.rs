//! Tree construction and the fluent entry point.
//!
//! [`TreeBuilder`] is the accumulator handed to the walker: it owns the root
//! folder and grows it one file at a time. [`Folio`] strings the walk, the
//! build and the paginated output together.

use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::errors::FolioError;
use crate::filter::{extension_of, FilterPolicy, FilterResult, DEFAULT_WHITELIST};
use crate::output::{render_pages, write_pages, Budget, RenderSummary};
use crate::tree::{FileEntry, Node};
use crate::walker::{walk_files, FileVisitor, WalkOptions};

/// A file that passed the filter but could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// What happened to the files seen during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Files added to the tree.
    pub included: usize,
    /// Files left out because their extension is not whitelisted.
    pub warned: usize,
    /// Hidden or blacklisted files, left out silently.
    pub skipped: usize,
    /// Files that passed the filter but failed to read.
    pub read_failures: Vec<ReadFailure>,
}

/// Accumulates walked files into a folder/file tree.
///
/// # Examples
///
/// ```no_run
/// use folio::builder::TreeBuilder;
/// use folio::filter::FilterPolicy;
/// use folio::walker::{walk_files, WalkOptions};
/// use std::path::Path;
///
/// let root = Path::new("./project");
/// let mut builder = TreeBuilder::new(root, FilterPolicy::default());
/// walk_files(root, &WalkOptions::default(), &mut builder).unwrap();
/// let (tree, report) = builder.finish();
/// println!("{} files, {} warnings", tree.file_count(), report.warned);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    base: PathBuf,
    policy: FilterPolicy,
    root: Node,
    report: BuildReport,
}

impl TreeBuilder {
    /// Create a builder for files found under `base`.
    ///
    /// The root folder is named after the last component of `base`.
    pub fn new(base: impl Into<PathBuf>, policy: FilterPolicy) -> Self {
        let base = base.into();
        let name = root_name(&base);
        Self {
            root: Node::folder(name.clone(), name),
            base,
            policy,
            report: BuildReport::default(),
        }
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Consume the builder, returning the tree and the build report.
    pub fn finish(self) -> (Node, BuildReport) {
        (self.root, self.report)
    }

    /// Add one file to the tree if the policy accepts it.
    pub fn add_file(&mut self, path: &Path) {
        let relative = path.strip_prefix(&self.base).unwrap_or(path);
        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let Some(filename) = segments.pop() else {
            return;
        };
        let extension = extension_of(path);

        match self.policy.evaluate_path(path) {
            FilterResult::Accept => {}
            result if result.is_warning() => {
                warn!("did not include {} ({})", path.display(), extension);
                self.report.warned += 1;
                return;
            }
            FilterResult::Reject(reason) => {
                debug!("skipped {} ({})", path.display(), reason);
                self.report.skipped += 1;
                return;
            }
        }

        // Invalid UTF-8 is replaced, not rejected.
        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                error!("failed to read {}: {}", path.display(), e);
                self.report.read_failures.push(ReadFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        if let Some(folder) = descend(&mut self.root, &segments) {
            let file_path = folder.path.join(&filename);
            if let Some(children) = folder.children_mut() {
                children.push(Node::file(filename, file_path, FileEntry::new(extension, content)));
                self.report.included += 1;
            }
        }
    }
}

impl FileVisitor for TreeBuilder {
    fn visit_file(&mut self, path: &Path, metadata: &Metadata) {
        if metadata.is_file() {
            self.add_file(path);
        }
    }
}

/// Walk down `segments` from `node`, creating missing folders on the way.
fn descend<'a>(mut node: &'a mut Node, segments: &[String]) -> Option<&'a mut Node> {
    for segment in segments {
        let path = node.path.join(segment);
        let children = node.children_mut()?;
        let index = match children
            .iter()
            .position(|c| c.is_folder() && c.name == *segment)
        {
            Some(index) => index,
            None => {
                children.push(Node::folder(segment.clone(), path));
                children.len() - 1
            }
        };
        node = &mut children[index];
    }
    Some(node)
}

fn root_name(base: &Path) -> String {
    if let Some(name) = base.file_name() {
        return name.to_string_lossy().into_owned();
    }
    // `.` and `..` have no file name of their own
    base.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| base.to_string_lossy().into_owned())
}

/// Build a tree from every file under `root` that `policy` accepts.
pub fn build_tree(
    root: &Path,
    policy: &FilterPolicy,
    options: &WalkOptions,
) -> Result<(Node, BuildReport), FolioError> {
    let mut builder = TreeBuilder::new(root, policy.clone());
    let visited = walk_files(root, options, &mut builder)?;
    let (tree, report) = builder.finish();
    info!(
        "walked {} files, included {}, {} not whitelisted",
        visited, report.included, report.warned
    );
    Ok((tree, report))
}

/// Builder for rendering a directory into paginated HTML.
///
/// # Examples
///
/// ```no_run
/// use folio::builder::Folio;
///
/// let (report, summary) = Folio::new("./repo")
///     .whitelist(&["txt", "md"])
///     .max_length(500_000)
///     .write("repo.html")
///     .unwrap();
/// println!("{} files in {} pages", summary.files_rendered, summary.pages.len());
/// ```
pub struct Folio {
    root: PathBuf,
    whitelist: Vec<String>,
    blacklist: Vec<String>,
    include_hidden: bool,
    budget: Budget,
    walk_options: WalkOptions,
}

impl Folio {
    /// Create a new builder for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            whitelist: DEFAULT_WHITELIST.iter().map(|e| e.to_string()).collect(),
            blacklist: Vec::new(),
            include_hidden: false,
            budget: Budget::Unbounded,
            walk_options: WalkOptions::default(),
        }
    }

    /// Extensions to include.
    pub fn whitelist<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.whitelist = extensions.iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    /// Extensions to exclude, even if whitelisted.
    pub fn blacklist<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.blacklist = extensions.iter().map(|e| e.as_ref().to_string()).collect();
        self
    }

    /// Include dotfiles.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Take lists and hidden flag from an existing policy.
    pub fn policy(mut self, policy: &FilterPolicy) -> Self {
        self.whitelist = policy.whitelist().to_vec();
        self.blacklist = policy.blacklist().to_vec();
        self.include_hidden = policy.include_hidden();
        self
    }

    /// Cap the content length per document.
    pub fn max_length(mut self, limit: usize) -> Self {
        self.budget = Budget::Limit(limit);
        self
    }

    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Visit directory entries in name order rather than OS listing order.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.walk_options.sort_by_name = sorted;
        self
    }

    fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::new(
            self.whitelist.as_slice(),
            self.blacklist.as_slice(),
            self.include_hidden,
        )
    }

    /// Walk and build the tree only.
    pub fn tree(&self) -> Result<(Node, BuildReport), FolioError> {
        build_tree(&self.root, &self.filter_policy(), &self.walk_options)
    }

    /// Build the tree and render every page in memory.
    pub fn render(&self) -> Result<Vec<String>, FolioError> {
        let (mut tree, _) = self.tree()?;
        Ok(render_pages(&mut tree, self.budget))
    }

    /// Build the tree and write numbered pages derived from `html_path`.
    pub fn write(
        &self,
        html_path: impl AsRef<Path>,
    ) -> Result<(BuildReport, RenderSummary), FolioError> {
        let (mut tree, report) = self.tree()?;
        let summary = write_pages(&mut tree, self.budget, html_path.as_ref())?;
        Ok((report, summary))
    }
}
