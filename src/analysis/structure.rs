//! Structure analyzer: conventional project files and directory depth

use super::Analysis;
use super::files::FileFilter;
use crate::record::RepoStructure;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    File,
    Dir,
    Any,
}

const README: &[&str] = &["README.md", "README", "readme.md", "README.rst", "README.txt"];
const LICENSE: &[&str] = &["LICENSE", "LICENSE.md", "LICENSE.txt", "license.txt", "COPYING"];
const GITIGNORE: &[&str] = &[".gitignore"];
const CI_FILES: &[&str] = &[
    ".travis.yml",
    ".gitlab-ci.yml",
    "Jenkinsfile",
    "azure-pipelines.yml",
    "bitbucket-pipelines.yml",
];
const CI_DIRS: &[&str] = &[".github/workflows", ".circleci"];
const DEPENDENCY_MANIFESTS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "Gemfile",
    "composer.json",
    "pyproject.toml",
    "Pipfile",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
];
const DOCKER: &[&str] = &[
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    ".dockerignore",
];
const CONTRIBUTING: &[&str] = &[
    "CONTRIBUTING.md",
    "CONTRIBUTE.md",
    ".github/CONTRIBUTING.md",
    "docs/CONTRIBUTING.md",
];
const CODE_OF_CONDUCT: &[&str] = &["CODE_OF_CONDUCT.md", ".github/CODE_OF_CONDUCT.md"];
const SECURITY: &[&str] = &["SECURITY.md", ".github/SECURITY.md", "security.md"];

pub struct StructureAnalyzer {
    root: PathBuf,
}

impl StructureAnalyzer {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Case-sensitive lookup, one directory listing per path component,
    /// so `readme.md` never satisfies `README.md` on case-folding filesystems.
    fn exists(&self, relative: &str, kind: Kind) -> bool {
        let mut current = self.root.clone();
        for component in relative.split('/') {
            let Ok(entries) = fs::read_dir(&current) else {
                return false;
            };
            let found = entries
                .filter_map(|entry| entry.ok())
                .any(|entry| entry.file_name().to_str() == Some(component));
            if !found {
                return false;
            }
            current.push(component);
        }

        match kind {
            Kind::File => current.is_file(),
            Kind::Dir => current.is_dir(),
            Kind::Any => true,
        }
    }

    fn any_exists(&self, names: &[&str], kind: Kind) -> bool {
        names.iter().any(|name| self.exists(name, kind))
    }

    /// Deepest directory below the root, excluded directories pruned
    fn folder_depth(&self) -> u64 {
        WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| FileFilter::SOURCE.is_excluded_dir(name))
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .map(|entry| entry.depth() as u64)
            .max()
            .unwrap_or(0)
    }

    pub fn analyze(&self) -> Analysis<RepoStructure> {
        let mut reasons = Vec::new();
        if !self.root.is_dir() {
            reasons.push(format!("{} is not a directory", self.root.display()));
        }

        let mut section = RepoStructure {
            has_readme: self.any_exists(README, Kind::File),
            has_license: self.any_exists(LICENSE, Kind::File),
            has_gitignore: self.any_exists(GITIGNORE, Kind::File),
            has_ci_config: self.any_exists(CI_FILES, Kind::File)
                || self.any_exists(CI_DIRS, Kind::Dir),
            has_dependency_manager: self.any_exists(DEPENDENCY_MANIFESTS, Kind::Any),
            has_docker: self.any_exists(DOCKER, Kind::Any),
            has_contribution_guide: self.any_exists(CONTRIBUTING, Kind::File),
            has_code_of_conduct: self.any_exists(CODE_OF_CONDUCT, Kind::File),
            has_security_policy: self.any_exists(SECURITY, Kind::File),
            folder_depth: self.folder_depth(),
            dependency_count: DEPENDENCY_MANIFESTS
                .iter()
                .filter(|name| self.exists(name, Kind::Any))
                .count() as u64,
            architecture_score: 0.0,
        };
        section.architecture_score = section.compute_architecture_score();

        Analysis::from_parts(section, reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_readme_license_gitignore_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "LICENSE");
        touch(dir.path(), ".gitignore");

        let section = StructureAnalyzer::new(dir.path()).analyze().section().clone();

        assert!(section.has_readme && section.has_license && section.has_gitignore);
        let flags = section.flags();
        assert_eq!(flags.iter().filter(|f| **f).count(), 3);
        assert!((section.architecture_score - 3.0 / 9.0).abs() < 1e-9);
        assert_eq!(section.folder_depth, 0);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Readme.MD");
        touch(dir.path(), "dockerfile");

        let section = StructureAnalyzer::new(dir.path()).analyze().section().clone();
        assert!(!section.has_readme);
        assert!(!section.has_docker);
        assert_eq!(section.architecture_score, 0.0);
    }

    #[test]
    fn test_ci_directory_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".circleci");
        assert!(!StructureAnalyzer::new(dir.path()).analyze().section().has_ci_config);

        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".github/workflows/ci.yml");
        assert!(StructureAnalyzer::new(dir.path()).analyze().section().has_ci_config);
    }

    #[test]
    fn test_nested_policy_files_and_manifests() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".github/CONTRIBUTING.md");
        touch(dir.path(), ".github/SECURITY.md");
        touch(dir.path(), "docs/CODE_OF_CONDUCT.md");
        touch(dir.path(), "package.json");
        touch(dir.path(), "requirements.txt");

        let section = StructureAnalyzer::new(dir.path()).analyze().section().clone();
        assert!(section.has_contribution_guide);
        assert!(section.has_security_policy);
        assert!(!section.has_code_of_conduct);
        assert!(section.has_dependency_manager);
        assert_eq!(section.dependency_count, 2);
    }

    #[test]
    fn test_folder_depth_skips_excluded_dirs() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/app/core/lib.py");
        touch(dir.path(), ".git/objects/ab/cd/ef/object");
        touch(dir.path(), "node_modules/a/b/c/d/e/index.js");

        let section = StructureAnalyzer::new(dir.path()).analyze().section().clone();
        assert_eq!(section.folder_depth, 3);
    }
}
