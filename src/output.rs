//! Paginated HTML rendering.
//!
//! A tree is serialized in passes. Each pass walks the whole tree, emits
//! every folder and as many unrendered files as fit in the content budget,
//! and marks those files rendered. A pass that emits no file signals that
//! rendering is complete.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::tree::{Node, NodeKind};

/// Errors that can occur while writing output documents.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Maximum cumulative content length per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Budget {
    /// Everything fits in one document.
    #[default]
    Unbounded,
    /// At most this many characters of file content per document.
    Limit(usize),
}

impl Budget {
    /// Whether a file of `len` characters must wait for a later pass.
    ///
    /// A file considered while nothing has been accumulated yet is never
    /// blocked, so a file larger than the budget still gets a pass of its own.
    pub fn defers(&self, cumulative_length: usize, len: usize) -> bool {
        match self {
            Budget::Unbounded => false,
            Budget::Limit(limit) => {
                cumulative_length > 0 && cumulative_length.saturating_add(len) >= *limit
            }
        }
    }
}

impl From<Option<usize>> for Budget {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(Budget::Unbounded, Budget::Limit)
    }
}

/// Replace the five HTML-reserved characters with character references.
///
/// # Examples
///
/// ```
/// use folio::output::escape_html;
///
/// assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// State of a single rendering pass.
struct Pass {
    budget: Budget,
    cumulative_length: usize,
    emitted: usize,
}

impl Pass {
    fn new(budget: Budget) -> Self {
        Self {
            budget,
            cumulative_length: 0,
            emitted: 0,
        }
    }

    fn produced_any(&self) -> bool {
        self.emitted > 0
    }

    fn node(&mut self, out: &mut String, node: &mut Node, depth: usize) {
        let indent = "  ".repeat(depth + 1);
        let Node { name, kind, .. } = node;

        match kind {
            NodeKind::Folder { children } => {
                out.push_str(&format!("{indent}<div class=\"folder\">\n"));
                out.push_str(&format!(
                    "{indent}  <div class=\"folder-name\">{}</div>\n",
                    escape_html(name)
                ));
                out.push_str(&format!("{indent}  <div class=\"folder-children\">\n"));
                for child in children.iter_mut() {
                    self.node(out, child, depth + 2);
                }
                out.push_str(&format!("{indent}  </div>\n"));
                out.push_str(&format!("{indent}</div>\n"));
            }
            NodeKind::File(entry) => {
                if entry.is_rendered() {
                    return;
                }
                let len = entry.content_length();
                if self.budget.defers(self.cumulative_length, len) {
                    return;
                }

                out.push_str(&format!(
                    "{indent}<div class=\"file\" data-extension=\"{}\">\n",
                    escape_html(&entry.extension)
                ));
                out.push_str(&format!(
                    "{indent}  <div class=\"file-name\">{}</div>\n",
                    escape_html(name)
                ));
                out.push_str(&format!(
                    "{indent}  <div class=\"file-content\">{}</div>\n",
                    escape_html(&entry.content)
                ));
                out.push_str(&format!("{indent}</div>\n"));

                entry.mark_rendered();
                self.cumulative_length += len;
                self.emitted += 1;
            }
        }
    }
}

const STYLE: &str = r#"    body {
      font-family: Arial, sans-serif;
      line-height: 1.6;
      margin: 0;
      padding: 20px;
    }
    .folder {
      margin-left: 20px;
      padding: 5px;
    }
    .file {
      margin-left: 20px;
      padding: 5px;
      border-left: 2px solid #ccc;
    }
    .folder-name {
      font-weight: bold;
      color: #2c3e50;
    }
    .file-name {
      font-weight: bold;
      color: #16a085;
    }
    .file-content {
      margin-left: 20px;
      margin-top: 5px;
      color: #34495e;
      font-family: monospace;
      white-space: pre-wrap;
    }
    .folder-children {
      margin-left: 20px;
    }
"#;

fn wrap_document(title: &str, body: &str) -> String {
    let mut doc = String::with_capacity(body.len() + STYLE.len() + 256);
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    doc.push_str("  <meta charset=\"utf-8\">\n");
    doc.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    doc.push_str("  <style>\n");
    doc.push_str(STYLE);
    doc.push_str("  </style>\n</head>\n<body>\n");
    doc.push_str(body);
    doc.push_str("</body>\n</html>\n");
    doc
}

/// Render one pass over the tree.
///
/// Emits every folder and the unrendered files that fit in `budget`, marking
/// them rendered. Returns `None` once a pass emits no file, which means every
/// file is already in some earlier document.
pub fn render_once(root: &mut Node, budget: Budget) -> Option<String> {
    let mut pass = Pass::new(budget);
    let mut body = String::with_capacity(8192);
    pass.node(&mut body, root, 0);

    if !pass.produced_any() {
        return None;
    }

    debug!(
        files = pass.emitted,
        length = pass.cumulative_length,
        "rendered pass"
    );
    Some(wrap_document(&root.name, &body))
}

/// Render the tree into as many documents as the budget requires.
///
/// # Examples
///
/// ```
/// use folio::output::{render_pages, Budget};
/// use folio::tree::{FileEntry, Node};
///
/// let mut root = Node::folder("repo", "repo");
/// let files = root.children_mut().unwrap();
/// files.push(Node::file("a.txt", "repo/a.txt", FileEntry::new("txt", "0123456789")));
/// files.push(Node::file("b.txt", "repo/b.txt", FileEntry::new("txt", "0123456789")));
///
/// let pages = render_pages(&mut root, Budget::Limit(15));
/// assert_eq!(pages.len(), 2);
/// ```
pub fn render_pages(root: &mut Node, budget: Budget) -> Vec<String> {
    std::iter::from_fn(|| render_once(root, budget)).collect()
}

/// Insert a zero-based page index before the extension of `path`.
///
/// `out/repo.html` becomes `out/repo0.html`, `out/repo1.html`, and so on.
pub fn numbered_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}{}", stem, index),
    };
    path.with_file_name(file_name)
}

/// Outcome of writing a tree to disk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderSummary {
    /// Documents written, in page order.
    pub pages: Vec<PathBuf>,
    /// Files emitted across all pages.
    pub files_rendered: usize,
}

/// Render the tree and write each page to a numbered file next to `html_path`.
///
/// Pages are written as soon as their pass completes; pages already on disk
/// stay there if a later write fails.
pub fn write_pages(
    root: &mut Node,
    budget: Budget,
    html_path: &Path,
) -> Result<RenderSummary, OutputError> {
    if let Some(parent) = html_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let already_rendered = root.rendered_count();
    let mut summary = RenderSummary::default();

    while let Some(page) = render_once(root, budget) {
        let path = numbered_path(html_path, summary.pages.len());
        std::fs::write(&path, page).map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
        info!("wrote {}", path.display());
        summary.pages.push(path);
    }

    summary.files_rendered = root.rendered_count() - already_rendered;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FileEntry;

    fn file(parent: &str, name: &str, content: &str) -> Node {
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Node::file(name, format!("{}/{}", parent, name), FileEntry::new(ext, content))
    }

    fn two_file_tree() -> Node {
        let mut root = Node::folder("repo", "repo");
        let children = root.children_mut().unwrap();
        children.push(file("repo", "a.txt", "aaaaaaaaaa"));
        children.push(file("repo", "b.txt", "bbbbbbbbbb"));
        root
    }

    fn is_rendered(root: &Node, name: &str) -> bool {
        root.child(name)
            .and_then(Node::file_entry)
            .is_some_and(FileEntry::is_rendered)
    }

    #[test]
    fn test_unbounded_single_page() {
        let mut root = two_file_tree();
        let pages = render_pages(&mut root, Budget::Unbounded);

        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("a.txt"));
        assert!(pages[0].contains("b.txt"));
        assert!(is_rendered(&root, "a.txt"));
        assert!(is_rendered(&root, "b.txt"));
    }

    #[test]
    fn test_budget_spills_to_second_page() {
        let mut root = two_file_tree();

        let first = render_once(&mut root, Budget::Limit(15)).unwrap();
        assert!(first.contains("aaaaaaaaaa"));
        assert!(!first.contains("bbbbbbbbbb"));
        assert!(is_rendered(&root, "a.txt"));
        assert!(!is_rendered(&root, "b.txt"));

        let second = render_once(&mut root, Budget::Limit(15)).unwrap();
        assert!(!second.contains("aaaaaaaaaa"));
        assert!(second.contains("bbbbbbbbbb"));

        assert!(render_once(&mut root, Budget::Limit(15)).is_none());
    }

    #[test]
    fn test_budget_reached_exactly_defers() {
        // 10 + 10 >= 20, so the second file waits.
        let mut root = two_file_tree();
        assert_eq!(render_pages(&mut root, Budget::Limit(20)).len(), 2);

        let mut root = two_file_tree();
        assert_eq!(render_pages(&mut root, Budget::Limit(21)).len(), 1);
    }

    #[test]
    fn test_oversized_file_is_still_emitted() {
        let mut root = Node::folder("repo", "repo");
        let children = root.children_mut().unwrap();
        children.push(file("repo", "small.txt", "abc"));
        children.push(file("repo", "huge.txt", &"x".repeat(100)));
        children.push(file("repo", "tail.txt", "def"));

        let pages = render_pages(&mut root, Budget::Limit(10));

        assert!(pages.iter().any(|p| p.contains(&"x".repeat(100))));
        assert_eq!(root.rendered_count(), 3);
    }

    #[test]
    fn test_zero_budget_terminates() {
        let mut root = two_file_tree();
        let pages = render_pages(&mut root, Budget::Limit(0));
        assert_eq!(pages.len(), 2);
        assert_eq!(root.rendered_count(), 2);
    }

    #[test]
    fn test_every_file_in_exactly_one_page() {
        let mut root = Node::folder("repo", "repo");
        let mut src = Node::folder("src", "repo/src");
        for i in 0..7 {
            let name = format!("f{i}.txt");
            let content = format!("content-{i}-{}", "y".repeat(i * 3));
            src.children_mut().unwrap().push(file("repo/src", &name, &content));
        }
        root.children_mut().unwrap().push(src);

        let pages = render_pages(&mut root, Budget::Limit(25));

        for i in 0..7 {
            let marker = format!("content-{i}-");
            let hits = pages.iter().filter(|p| p.contains(&marker)).count();
            assert_eq!(hits, 1, "file {i} appeared {hits} times");
        }
        assert_eq!(root.rendered_count(), 7);
    }

    #[test]
    fn test_folders_emitted_every_pass() {
        let mut root = Node::folder("repo", "repo");
        let mut docs = Node::folder("docs", "repo/docs");
        docs.children_mut().unwrap().push(file("repo/docs", "a.txt", "0123456789"));
        docs.children_mut().unwrap().push(file("repo/docs", "b.txt", "0123456789"));
        root.children_mut().unwrap().push(docs);

        let pages = render_pages(&mut root, Budget::Limit(15));
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.contains("<div class=\"folder-name\">docs</div>")));
    }

    #[test]
    fn test_empty_tree_produces_nothing() {
        let mut root = Node::folder("repo", "repo");
        root.children_mut().unwrap().push(Node::folder("empty", "repo/empty"));
        assert!(render_once(&mut root, Budget::Unbounded).is_none());
    }

    #[test]
    fn test_content_is_escaped_once() {
        let mut root = Node::folder("repo", "repo");
        root.children_mut()
            .unwrap()
            .push(file("repo", "x.txt", "if a < b && c > d { \"q\" 'r' }"));

        let page = render_once(&mut root, Budget::Unbounded).unwrap();

        assert!(page.contains("if a &lt; b &amp;&amp; c &gt; d { &quot;q&quot; &#39;r&#39; }"));
        assert!(!page.contains("&amp;lt;"));
        assert!(!page.contains("a < b"));
    }

    #[test]
    fn test_document_shape() {
        let mut root = two_file_tree();
        let page = render_once(&mut root, Budget::Unbounded).unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<style>"));
        assert!(page.contains("<title>repo</title>"));
        assert!(page.contains("data-extension=\"txt\""));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_deterministic() {
        let a = render_pages(&mut two_file_tree(), Budget::Limit(15));
        let b = render_pages(&mut two_file_tree(), Budget::Limit(15));
        assert_eq!(a, b);
    }

    #[test]
    fn test_budget_defers() {
        assert!(!Budget::Unbounded.defers(usize::MAX, usize::MAX));
        assert!(!Budget::Limit(5).defers(0, 100));
        assert!(Budget::Limit(5).defers(1, 4));
        assert!(!Budget::Limit(5).defers(1, 3));
        assert_eq!(Budget::from(None), Budget::Unbounded);
        assert_eq!(Budget::from(Some(3)), Budget::Limit(3));
    }

    #[test]
    fn test_numbered_path() {
        assert_eq!(numbered_path(Path::new("out/repo.html"), 0), PathBuf::from("out/repo0.html"));
        assert_eq!(numbered_path(Path::new("repo.html"), 12), PathBuf::from("repo12.html"));
        assert_eq!(numbered_path(Path::new("repo"), 1), PathBuf::from("repo1"));
        assert_eq!(numbered_path(Path::new("my.repo.html"), 2), PathBuf::from("my.repo2.html"));
    }

    #[test]
    fn test_write_pages() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("nested/out.html");
        let mut root = two_file_tree();

        let summary = write_pages(&mut root, Budget::Limit(15), &html).unwrap();

        assert_eq!(summary.files_rendered, 2);
        assert_eq!(
            summary.pages,
            vec![dir.path().join("nested/out0.html"), dir.path().join("nested/out1.html")]
        );
        assert!(summary.pages.iter().all(|p| p.exists()));
        assert!(!dir.path().join("nested/out2.html").exists());

        let first = std::fs::read_to_string(&summary.pages[0]).unwrap();
        assert!(first.contains("aaaaaaaaaa"));
    }
}
