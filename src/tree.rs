//! Folder/file tree representation.
//!
//! Provides the node types built from a directory walk, path lookup,
//! and a box-drawing outline renderer for previewing what will be paginated.

use std::path::PathBuf;

/// A file's payload: extension, full content, and rendering state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Lowercased extension without the leading dot (empty if none).
    pub extension: String,
    /// Full UTF-8 text of the file, unescaped.
    pub content: String,
    content_length: usize,
    rendered: bool,
}

impl FileEntry {
    /// Create an unrendered entry. The content length is counted in characters.
    pub fn new(extension: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let content_length = content.chars().count();
        Self {
            extension: extension.into(),
            content,
            content_length,
            rendered: false,
        }
    }

    /// Character count of the content, fixed at construction.
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    /// Whether this file has been emitted into an output document.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Mark the file as emitted. There is no way back.
    pub fn mark_rendered(&mut self) {
        self.rendered = true;
    }
}

/// The type of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder { children: Vec<Node> },
    File(FileEntry),
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Single path segment (file names keep their extension).
    pub name: String,
    /// Accumulated path from the root.
    pub path: PathBuf,
    pub kind: NodeKind,
}

impl Node {
    /// Create an empty folder node.
    pub fn folder(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Folder {
                children: Vec::new(),
            },
        }
    }

    /// Create a file node.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, entry: FileEntry) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File(entry),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File(_))
    }

    /// Child nodes (empty for files).
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File(_) => &[],
        }
    }

    /// Mutable access to a folder's child list. `None` for files.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File(_) => None,
        }
    }

    /// Find a direct child by exact name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name == name)
    }

    /// File payload, if this is a file.
    pub fn file_entry(&self) -> Option<&FileEntry> {
        match &self.kind {
            NodeKind::File(entry) => Some(entry),
            NodeKind::Folder { .. } => None,
        }
    }

    /// Count files in this subtree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File(_) => 1,
            NodeKind::Folder { children } => children.iter().map(Node::file_count).sum(),
        }
    }

    /// Count folders in this subtree, including this one.
    pub fn folder_count(&self) -> usize {
        match &self.kind {
            NodeKind::File(_) => 0,
            NodeKind::Folder { children } => {
                1 + children.iter().map(Node::folder_count).sum::<usize>()
            }
        }
    }

    /// Count files already emitted into some document.
    pub fn rendered_count(&self) -> usize {
        match &self.kind {
            NodeKind::File(entry) => usize::from(entry.is_rendered()),
            NodeKind::Folder { children } => children.iter().map(Node::rendered_count).sum(),
        }
    }

    /// Sum of content lengths in this subtree.
    pub fn total_content_length(&self) -> usize {
        match &self.kind {
            NodeKind::File(entry) => entry.content_length(),
            NodeKind::Folder { children } => {
                children.iter().map(Node::total_content_length).sum()
            }
        }
    }
}

/// Look up a node by slash-delimited path.
///
/// A leading segment equal to the root's name is dropped, so both
/// `"repo/src/a.txt"` and `"src/a.txt"` resolve from a root named `repo`.
/// Every other segment must name a child; an empty segment never does.
///
/// # Examples
///
/// ```
/// use folio::tree::{resolve, FileEntry, Node};
///
/// let mut root = Node::folder("repo", "repo");
/// root.children_mut()
///     .unwrap()
///     .push(Node::file("a.txt", "repo/a.txt", FileEntry::new("txt", "hi")));
///
/// assert!(resolve(&root, "repo/a.txt").is_some());
/// assert!(resolve(&root, "a.txt").is_some());
/// assert!(resolve(&root, "b.txt").is_none());
/// assert!(resolve(&root, "a.txt/").is_none());
/// ```
pub fn resolve<'a>(root: &'a Node, slash_path: &str) -> Option<&'a Node> {
    let mut segments = slash_path.split('/').peekable();
    if segments.peek() == Some(&root.name.as_str()) {
        segments.next();
    }

    let mut node = root;
    for segment in segments {
        node = node.child(segment)?;
    }
    Some(node)
}

/// Box-drawing characters for outline rendering.
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const VERTICAL: &str = "│   ";
const SPACE: &str = "    ";

/// Render the tree as a box-drawing outline, one node per line.
///
/// Files carry their content length in characters.
pub fn render_outline(root: &Node) -> String {
    let mut output = String::with_capacity(4096);
    outline_node(&mut output, root, "", true, true);
    output
}

fn outline_node(output: &mut String, node: &Node, prefix: &str, is_last: bool, is_root: bool) {
    let branch = if is_root {
        ""
    } else if is_last {
        LAST_BRANCH
    } else {
        BRANCH
    };

    output.push_str(prefix);
    output.push_str(branch);
    output.push_str(&node.name);

    match &node.kind {
        NodeKind::Folder { .. } => output.push('/'),
        NodeKind::File(entry) => {
            output.push_str(&format!(" [{} chars]", format_number(entry.content_length())));
        }
    }
    output.push('\n');

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let new_prefix = if is_root {
            String::new()
        } else {
            let continuation = if is_last { SPACE } else { VERTICAL };
            format!("{}{}", prefix, continuation)
        };
        outline_node(output, child, &new_prefix, i == children.len() - 1, false);
    }
}

/// Format number with thousands separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
