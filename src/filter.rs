//! File inclusion policy.
//!
//! Decides whether a walked file belongs in the tree, based on its name,
//! its lowercased extension, and the configured allow/deny lists.

use std::path::Path;

/// Extensions included when no whitelist is configured.
pub const DEFAULT_WHITELIST: &[&str] = &["txt"];

/// Why a file was left out of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Dotfile while hidden files are excluded.
    Hidden,
    /// Extension is on the blacklist.
    Blacklisted,
    /// Extension is missing from the whitelist.
    NotWhitelisted,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Hidden => write!(f, "hidden file"),
            RejectReason::Blacklisted => write!(f, "blacklisted extension"),
            RejectReason::NotWhitelisted => write!(f, "extension not whitelisted"),
        }
    }
}

/// Outcome of evaluating a file against a [`FilterPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Accept,
    Reject(RejectReason),
}

impl FilterResult {
    /// Check if the file is included.
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterResult::Accept)
    }

    /// True when the rejection should be reported to the user.
    ///
    /// Only an extension missing from the whitelist warns; hidden and
    /// blacklisted files are dropped silently.
    pub fn is_warning(&self) -> bool {
        matches!(self, FilterResult::Reject(RejectReason::NotWhitelisted))
    }
}

/// Allow/deny lists plus the hidden-file switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    whitelist: Vec<String>,
    blacklist: Vec<String>,
    include_hidden: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_WHITELIST, &[] as &[&str], false)
    }
}

impl FilterPolicy {
    /// Create a policy. Extensions are stored lowercased and without a leading dot.
    pub fn new<W, B>(whitelist: &[W], blacklist: &[B], include_hidden: bool) -> Self
    where
        W: AsRef<str>,
        B: AsRef<str>,
    {
        Self {
            whitelist: whitelist.iter().map(|e| normalize_extension(e.as_ref())).collect(),
            blacklist: blacklist.iter().map(|e| normalize_extension(e.as_ref())).collect(),
            include_hidden,
        }
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Evaluate a file by name and lowercased extension.
    ///
    /// The hidden check runs first, then the blacklist, then the whitelist.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio::filter::{FilterPolicy, FilterResult, RejectReason};
    ///
    /// let policy = FilterPolicy::default();
    /// assert_eq!(policy.evaluate("notes.txt", "txt"), FilterResult::Accept);
    /// assert_eq!(
    ///     policy.evaluate("notes.md", "md"),
    ///     FilterResult::Reject(RejectReason::NotWhitelisted)
    /// );
    /// ```
    pub fn evaluate(&self, filename: &str, extension: &str) -> FilterResult {
        if is_hidden(filename) && !self.include_hidden {
            return FilterResult::Reject(RejectReason::Hidden);
        }
        if self.blacklist.iter().any(|e| e == extension) {
            return FilterResult::Reject(RejectReason::Blacklisted);
        }
        if !self.whitelist.iter().any(|e| e == extension) {
            return FilterResult::Reject(RejectReason::NotWhitelisted);
        }
        FilterResult::Accept
    }

    /// Evaluate a path, deriving name and extension from its last component.
    pub fn evaluate_path(&self, path: &Path) -> FilterResult {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.evaluate(&filename, &extension_of(path))
    }
}

/// Check if a file name marks a hidden file.
pub fn is_hidden(filename: &str) -> bool {
    filename.starts_with('.')
}

/// Lowercased extension of a path, without the dot. Empty if there is none.
///
/// Dotfiles like `.env` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(white: &[&str], black: &[&str], hidden: bool) -> FilterPolicy {
        FilterPolicy::new(white, black, hidden)
    }

    #[test]
    fn test_accepts_whitelisted() {
        let p = policy(&["txt"], &[], false);
        assert!(p.evaluate("a.txt", "txt").is_accepted());
    }

    #[test]
    fn test_unlisted_extension_warns() {
        let p = policy(&["txt"], &[], false);
        let result = p.evaluate("notes.md", "md");
        assert_eq!(result, FilterResult::Reject(RejectReason::NotWhitelisted));
        assert!(result.is_warning());
    }

    #[test]
    fn test_hidden_rejected_silently() {
        let p = policy(&["txt", ""], &[], false);
        let result = p.evaluate(".env", "");
        assert_eq!(result, FilterResult::Reject(RejectReason::Hidden));
        assert!(!result.is_warning());
    }

    #[test]
    fn test_blacklist_checked_before_whitelist() {
        let p = policy(&["txt"], &["txt"], false);
        let result = p.evaluate("a.txt", "txt");
        assert_eq!(result, FilterResult::Reject(RejectReason::Blacklisted));
        assert!(!result.is_warning());
    }

    #[test]
    fn test_hidden_inclusion_law() {
        // A hidden file is in iff hidden files are on, it is not blacklisted,
        // and it is whitelisted.
        for include_hidden in [false, true] {
            for blacklisted in [false, true] {
                for whitelisted in [false, true] {
                    let white: &[&str] = if whitelisted { &["txt"] } else { &["rs"] };
                    let black: &[&str] = if blacklisted { &["txt"] } else { &[] };
                    let p = policy(white, black, include_hidden);
                    let expected = include_hidden && !blacklisted && whitelisted;
                    assert_eq!(
                        p.evaluate(".secret.txt", "txt").is_accepted(),
                        expected,
                        "hidden={include_hidden} black={blacklisted} white={whitelisted}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_lists_are_normalized() {
        let p = policy(&[".TXT", " Md "], &[".LOG"], false);
        assert_eq!(p.whitelist(), &["txt".to_string(), "md".to_string()]);
        assert_eq!(p.blacklist(), &["log".to_string()]);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b/File.TXT")), "txt");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(extension_of(Path::new(".env")), "");
    }

    #[test]
    fn test_evaluate_path() {
        let p = FilterPolicy::default();
        assert!(p.evaluate_path(Path::new("repo/src/Notes.TXT")).is_accepted());
        assert!(p.evaluate_path(Path::new("repo/README")).is_warning());
    }
}
