//! Locating the directory to render.
//!
//! A source is either a local directory or a repository URL. URLs are cloned
//! with the `git` executable and stripped of their `.git` directory so the
//! history does not end up in the tree.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::info;

/// Errors from cloning or cleaning up a repository.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("git clone {url} failed: {stderr}")]
    Clone { url: String, stderr: String },

    #[error("failed to remove {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory name for a repository URL or path.
///
/// Trailing slashes and a `.git` suffix are dropped, matching the directory
/// `git clone` creates.
///
/// # Examples
///
/// ```
/// use folio::source::repo_name;
///
/// assert_eq!(repo_name("https://github.com/user/project.git"), "project");
/// assert_eq!(repo_name("git@github.com:user/project"), "project");
/// ```
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim_end_matches(['/', '\\']);
    let last = trimmed
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}

/// Whether `source` looks like something to clone rather than a local path.
pub fn is_remote(source: &str) -> bool {
    source.contains("://") || source.starts_with("git@")
}

/// Clone `url` into `dest` with `git clone`.
pub fn clone_repo(url: &str, dest: &Path) -> Result<(), SourceError> {
    info!("cloning {}...", url);
    let output = Command::new("git")
        .args(["clone", "--quiet", url])
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .output()
        .map_err(SourceError::Spawn)?;

    if !output.status.success() {
        return Err(SourceError::Clone {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Remove the `.git` directory under `dir`, if there is one.
pub fn remove_git_dir(dir: &Path) -> Result<(), SourceError> {
    let git_dir = dir.join(".git");
    match std::fs::remove_dir_all(&git_dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SourceError::Cleanup {
            path: git_dir,
            source,
        }),
    }
}

/// Resolve `source` to a local directory, cloning it into `workdir` if needed.
///
/// Local paths are returned unchanged (and unchecked; the walk reports a
/// missing root). A remote source whose directory already exists in
/// `workdir` is reused without cloning again.
pub fn prepare(source: &str, workdir: &Path) -> Result<PathBuf, SourceError> {
    if !is_remote(source) {
        return Ok(PathBuf::from(source));
    }

    let dest = workdir.join(repo_name(source));
    if dest.exists() {
        info!("using existing {}", dest.display());
        return Ok(dest);
    }

    clone_repo(source, &dest)?;
    remove_git_dir(&dest)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("https://github.com/user/project"), "project");
        assert_eq!(repo_name("https://github.com/user/project.git"), "project");
        assert_eq!(repo_name("https://github.com/user/project/"), "project");
        assert_eq!(repo_name("git@github.com:project.git"), "project");
        assert_eq!(repo_name("local/dir"), "dir");
        assert_eq!(repo_name(""), "repo");
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://github.com/user/project"));
        assert!(is_remote("file:///tmp/project"));
        assert!(is_remote("git@github.com:user/project.git"));
        assert!(!is_remote("./project"));
        assert!(!is_remote("/abs/project"));
    }

    #[test]
    fn test_remove_git_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();
        fs::write(dir.path().join("keep.txt"), "keep").unwrap();

        remove_git_dir(dir.path()).unwrap();

        assert!(!dir.path().join(".git").exists());
        assert!(dir.path().join("keep.txt").exists());

        // Second call: nothing to remove.
        remove_git_dir(dir.path()).unwrap();
    }

    #[test]
    fn test_prepare_local_path_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = prepare("some/local/dir", dir.path()).unwrap();
        assert_eq!(path, PathBuf::from("some/local/dir"));
    }

    #[test]
    fn test_prepare_reuses_existing_clone() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("project")).unwrap();

        let path = prepare("https://example.invalid/user/project.git", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("project"));
    }

    #[test]
    fn test_clone_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-repo");
        let url = format!("file://{}", missing.display());

        let err = clone_repo(&url, &dir.path().join("dest")).unwrap_err();
        assert!(matches!(err, SourceError::Clone { .. } | SourceError::Spawn(_)));
    }

    #[test]
    fn test_prepare_clones_and_strips_git_dir() {
        let upstream = TempDir::new().unwrap();
        if !git(upstream.path(), &["init", "--quiet"]) {
            // git is not installed
            return;
        }
        fs::write(upstream.path().join("hello.txt"), "hello").unwrap();
        assert!(git(upstream.path(), &["add", "."]));
        assert!(git(
            upstream.path(),
            &[
                "-c",
                "user.email=test@test.com",
                "-c",
                "user.name=Test",
                "commit",
                "--quiet",
                "-m",
                "init",
            ]
        ));

        let work = TempDir::new().unwrap();
        let url = format!("file://{}", upstream.path().display());
        let dest = prepare(&url, work.path()).unwrap();

        assert_eq!(dest, work.path().join(repo_name(&url)));
        assert!(dest.join("hello.txt").exists());
        assert!(!dest.join(".git").exists());
    }
}
