//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path relativi e di output, così walker e
//! reporter usano le stesse etichette. Il confronto tra radici sorgente e
//! output avviene sempre su path risolti, mai sul testo.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// `path` relative to `root`; empty for the root itself
    pub fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
        path.strip_prefix(root).unwrap_or_else(|_| Path::new(""))
    }

    /// Output file for `source`, placed inside the mirrored `output_dir`
    pub fn output_path(output_dir: &Path, source: &Path) -> PathBuf {
        output_dir.join(source.file_name().unwrap_or_default())
    }

    /// Absolute form of `path`: `.` and `..` folded lexically, symlinks
    /// resolved as far as the filesystem allows. Missing trailing
    /// components are appended unchanged, so the output root can be
    /// checked before it exists.
    pub fn resolve(path: &Path) -> PathBuf {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }

        let mut existing = normalized.as_path();
        let mut missing: Vec<OsString> = Vec::new();

        loop {
            if let Ok(canonical) = existing.canonicalize() {
                return missing
                    .iter()
                    .rev()
                    .fold(canonical, |acc, part| acc.join(part));
            }
            match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_os_string());
                    existing = parent;
                }
                _ => return normalized,
            }
        }
    }

    /// True when `inner` is `outer` or lives below it
    pub fn contains(outer: &Path, inner: &Path) -> bool {
        Self::resolve(inner).starts_with(Self::resolve(outer))
    }

    /// Batch label for a relative directory, `.` for the root
    pub fn label(relative_dir: &Path) -> String {
        if relative_dir.as_os_str().is_empty() {
            ".".to_string()
        } else {
            relative_dir.display().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to() {
        let root = Path::new("/src");
        assert_eq!(PathResolver::relative_to(root, Path::new("/src/a/b")), Path::new("a/b"));
        assert_eq!(PathResolver::relative_to(root, Path::new("/src")), Path::new(""));
    }

    #[test]
    fn test_output_path_keeps_file_name() {
        let output = PathResolver::output_path(Path::new("/out/sub"), Path::new("/src/sub/c.gif"));
        assert_eq!(output, PathBuf::from("/out/sub/c.gif"));
    }

    #[test]
    fn test_contains_sees_through_spelling() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let sources = temp_dir.path().join("sources");
        std::fs::create_dir(&sources).unwrap();

        let dotted = temp_dir.path().join(".").join("sources");
        let nested = temp_dir.path().join("sources").join("..").join("sources").join("out");
        assert!(PathResolver::contains(&dotted, &nested));
        assert!(PathResolver::contains(&sources, &sources.join("a").join("b")));
        assert!(!PathResolver::contains(&sources, &temp_dir.path().join("outputs")));
        assert!(!PathResolver::contains(&sources, &temp_dir.path().join("sources-out")));
    }

    #[test]
    fn test_resolve_missing_path_keeps_tail() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let resolved = PathResolver::resolve(&temp_dir.path().join("x").join("y"));
        let root = temp_dir.path().canonicalize().unwrap();
        assert_eq!(resolved, root.join("x").join("y"));
    }

    #[test]
    fn test_label() {
        assert_eq!(PathResolver::label(Path::new("")), ".");
        assert_eq!(PathResolver::label(Path::new("sub")), "sub");
    }
}
