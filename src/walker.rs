//! Recursive directory traversal.
//!
//! Uses the `ignore` crate's walker with every standard filter switched off:
//! hidden files, `.gitignore` and friends are all reported, and inclusion is
//! left to the [`FilterPolicy`](crate::filter::FilterPolicy) applied by the
//! tree builder.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// Errors that can occur during directory walking.
///
/// All of them are fatal: the walk stops at the first one.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

/// Options for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Sort each directory listing by file name instead of using the
    /// order the OS returns.
    pub sort_by_name: bool,
}

impl WalkOptions {
    /// Create options that sort directory listings by name.
    pub fn sorted() -> Self {
        Self {
            sort_by_name: true,
            ..Default::default()
        }
    }
}

/// Entry from directory walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path to the entry.
    pub path: PathBuf,
    /// Depth from root (root = 0).
    pub depth: usize,
    /// Whether this is a regular file.
    pub is_file: bool,
    /// Metadata (only for files).
    pub metadata: Option<Metadata>,
}

/// Receives every regular file found by [`walk_files`].
pub trait FileVisitor {
    fn visit_file(&mut self, path: &Path, metadata: &Metadata);
}

impl<F> FileVisitor for F
where
    F: FnMut(&Path, &Metadata),
{
    fn visit_file(&mut self, path: &Path, metadata: &Metadata) {
        self(path, metadata)
    }
}

/// Walk a directory tree with default options, yielding entries.
///
/// # Examples
///
/// ```no_run
/// use folio::walker::walk;
/// use std::path::Path;
///
/// for entry in walk(Path::new(".")).flatten() {
///     println!("{}", entry.path.display());
/// }
/// ```
pub fn walk(root: &Path) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    walk_with_options(root, &WalkOptions::default())
}

/// Walk a directory tree with custom options.
///
/// Traversal is depth-first. The first item is the root itself.
pub fn walk_with_options(
    root: &Path,
    options: &WalkOptions,
) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    let root = root.to_path_buf();

    if let Err(e) = check_root(&root) {
        return itertools_lite::Either::Left(std::iter::once(Err(e)));
    }

    let mut builder = WalkBuilder::new(&root);
    builder
        .standard_filters(false)
        .follow_links(options.follow_symlinks);

    if options.sort_by_name {
        builder.sort_by_file_name(|a, b| a.cmp(b));
    }

    let walker = builder.build();

    itertools_lite::Either::Right(walker.filter_map(|result| match result {
        Ok(entry) => {
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            let metadata = if is_file {
                match entry.metadata() {
                    Ok(m) => Some(m),
                    Err(e) => return convert_error(e, Some(entry.path().to_path_buf())).map(Err),
                }
            } else {
                None
            };

            Some(Ok(WalkEntry {
                path: entry.path().to_path_buf(),
                depth: entry.depth(),
                is_file,
                metadata,
            }))
        }
        Err(e) => convert_error(e, None).map(Err),
    }))
}

/// Feed every regular file under `root` to `visitor`, in walk order.
///
/// Directories are traversed but never visited. Returns the number of files
/// visited, or the first walk error.
pub fn walk_files<V>(root: &Path, options: &WalkOptions, visitor: &mut V) -> Result<usize, WalkError>
where
    V: FileVisitor + ?Sized,
{
    let mut visited = 0;
    for entry in walk_with_options(root, options) {
        let entry = entry?;
        if let (true, Some(metadata)) = (entry.is_file, entry.metadata.as_ref()) {
            visitor.visit_file(&entry.path, metadata);
            visited += 1;
        }
    }
    Ok(visited)
}

fn check_root(root: &Path) -> Result<(), WalkError> {
    let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WalkError::NotFound {
            path: root.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => WalkError::PermissionDenied {
            path: root.to_path_buf(),
        },
        _ => WalkError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Convert an `ignore` error, unwrapping the path/depth context it carries.
///
/// Errors that do not come from the filesystem (ignore-file parsing and the
/// like) cannot occur with standard filters off and are dropped.
fn convert_error(err: ignore::Error, path: Option<PathBuf>) -> Option<WalkError> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, Some(path)),
        ignore::Error::WithDepth { err, .. } => convert_error(*err, path),
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) => {
            let path = path.unwrap_or_else(|| PathBuf::from("<walk error>"));
            if source.kind() == std::io::ErrorKind::PermissionDenied {
                Some(WalkError::PermissionDenied { path })
            } else {
                Some(WalkError::Io { path, source })
            }
        }
        _ => None,
    }
}

/// Simple Either type to avoid adding itertools dependency.
mod itertools_lite {
    pub enum Either<L, R> {
        Left(L),
        Right(R),
    }

    impl<L, R, T> Iterator for Either<L, R>
    where
        L: Iterator<Item = T>,
        R: Iterator<Item = T>,
    {
        type Item = T;

        fn next(&mut self) -> Option<Self::Item> {
            match self {
                Either::Left(l) => l.next(),
                Either::Right(r) => r.next(),
            }
        }
    }
}
