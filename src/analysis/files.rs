//! File classification: which files of a working copy get analyzed

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, FilterEntry, WalkDir};

/// Directory names never descended into (version control, caches, build output)
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "__pycache__",
    "build",
    "dist",
    "venv",
    "env",
    ".venv",
];

const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "java", "cs", "go", "rb", "php", "cpp", "c", "h", "swift",
    "kt", "rs",
];

const TESTABLE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "java", "cs", "go", "rb", "php",
];

/// Exclude-list plus extension allow-list
#[derive(Debug, Clone, Copy)]
pub struct FileFilter {
    pub excluded_dirs: &'static [&'static str],
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    /// Files scanned by the pattern analyzer and sampled for the language model
    pub const SOURCE: FileFilter = FileFilter {
        excluded_dirs: EXCLUDED_DIRS,
        extensions: SOURCE_EXTENSIONS,
    };

    /// Files considered by test coverage classification
    pub const TESTABLE: FileFilter = FileFilter {
        excluded_dirs: EXCLUDED_DIRS,
        extensions: TESTABLE_EXTENSIONS,
    };

    /// Exact segment match, so `builders/` or `my-env/` are not excluded
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(&name)
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e))
            .unwrap_or(false)
    }
}

type Prune = Box<dyn FnMut(&DirEntry) -> bool + Send>;

/// Lazy, single-pass traversal yielding absolute paths of accepted files
///
/// Excluded directories are pruned before descent, so nothing beneath them
/// is ever visited. Unreadable entries are skipped.
pub struct SourceFiles {
    root: PathBuf,
    filter: FileFilter,
    entries: FilterEntry<walkdir::IntoIter, Prune>,
}

impl SourceFiles {
    pub fn new(root: &Path, filter: FileFilter) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

        // The root itself is never pruned, whatever its name
        let prune: Prune = Box::new(move |entry: &DirEntry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .map(|name| filter.is_excluded_dir(name))
                    .unwrap_or(false))
        });

        let entries = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(prune);

        Self {
            root,
            filter,
            entries,
        }
    }

    /// Source files, per the default allow-list
    pub fn source(root: &Path) -> Self {
        Self::new(root, FileFilter::SOURCE)
    }

    /// Absolute root every yielded path lives under
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for SourceFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.entries.next()? {
                Ok(entry) if entry.file_type().is_file() && self.filter.accepts(entry.path()) => {
                    return Some(entry.into_path());
                }
                Ok(_) | Err(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_excluded_dirs_pruned_at_any_depth() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "src/main.py");
        touch(root, ".git/hooks/pre-commit.py");
        touch(root, "node_modules/lib/index.js");
        touch(root, "pkg/a/b/node_modules/deep/index.js");
        touch(root, "web/dist/bundle.js");
        touch(root, "web/app.ts");

        let walker = SourceFiles::source(root);
        let walk_root = walker.root().to_path_buf();
        let files: Vec<PathBuf> = walker.collect();

        assert_eq!(files.len(), 2, "unexpected files: {:?}", files);
        assert!(files.iter().all(|p| p.is_absolute()));
        for path in &files {
            for component in path.strip_prefix(&walk_root).unwrap().components() {
                let name = component.as_os_str().to_string_lossy();
                assert!(!EXCLUDED_DIRS.contains(&name.as_ref()));
            }
        }
    }

    #[test]
    fn test_exclusion_is_by_exact_segment() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "builders/make.go");
        touch(root, "my-env/setup.py");
        touch(root, "build/out.go");

        let files: Vec<PathBuf> = SourceFiles::source(root).collect();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("builders/make.go")));
        assert!(files.iter().any(|p| p.ends_with("my-env/setup.py")));
    }

    #[test]
    fn test_extension_allow_list() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "README.md");
        touch(root, "data.json");
        touch(root, "Makefile");
        touch(root, "lib.rs");
        touch(root, "view.tsx");

        let files: Vec<PathBuf> = SourceFiles::source(root).collect();
        assert_eq!(files.len(), 2);
        for path in &files {
            assert!(FileFilter::SOURCE.accepts(path));
        }
    }

    #[test]
    fn test_root_named_like_excluded_dir_is_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("build");
        touch(&root, "main.c");

        assert_eq!(SourceFiles::source(&root).count(), 1);
    }

    #[test]
    fn test_testable_filter_is_narrower() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "main.rs");
        touch(root, "main.py");

        assert_eq!(SourceFiles::new(root, FileFilter::TESTABLE).count(), 1);
        assert_eq!(SourceFiles::source(root).count(), 2);
    }
}
