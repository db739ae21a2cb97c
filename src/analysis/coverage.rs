//! Test coverage analyzer: test file classification and framework detection

use super::Analysis;
use super::files::{FileFilter, SourceFiles};
use crate::record::TestCoverage;
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const TEST_DIRS: &[&str] = &[
    "tests",
    "test",
    "__tests__",
    "spec",
    "unit_tests",
    "integration_tests",
    "e2e",
];

const TEST_NAME_PATTERNS: &[&str] = &[
    "*_test.py",
    "*_spec.js",
    "test_*.py",
    "*Test.java",
    "*Spec.js",
    "*_test.go",
    "*_test.rb",
];

const FRAMEWORK_PATTERNS: &[(&str, &str)] = &[
    ("pytest", r"import\s+pytest"),
    ("jest", r#"import\s+.*\s+from\s+['"]@testing-library"#),
    ("mocha", r"(describe|it)\s*\("),
    ("junit", r#"import\s+.*\s+from\s+['"]junit"#),
    ("unittest", r"import\s+unittest"),
    ("rspec", r"RSpec\."),
    ("go_test", r"func\s+Test\w+\("),
];

const COVERAGE_CONFIGS: &[&str] = &[
    ".coveragerc",
    "coverage.xml",
    "coverage.json",
    "jest.config.js",
    "cypress.json",
    "codecov.yml",
    ".nycrc",
];

const CASE_SENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn name_patterns() -> &'static [Pattern] {
    static PATTERNS: OnceLock<Vec<Pattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TEST_NAME_PATTERNS
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    })
}

fn framework_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FRAMEWORK_PATTERNS
            .iter()
            .filter_map(|(name, p)| Regex::new(p).ok().map(|re| (*name, re)))
            .collect()
    })
}

/// Whether `relative` (a path below the repository root) is a test file
pub fn is_test_file(relative: &Path) -> bool {
    let in_test_dir = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|c| c.as_os_str().to_str().is_some_and(|s| TEST_DIRS.contains(&s)));
    if in_test_dir {
        return true;
    }

    relative
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name_patterns()
                .iter()
                .any(|p| p.matches_with(name, CASE_SENSITIVE))
        })
}

pub struct TestCoverageAnalyzer {
    root: PathBuf,
}

impl TestCoverageAnalyzer {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn analyze(&self) -> Analysis<TestCoverage> {
        let mut section = TestCoverage::default();
        let mut reasons = Vec::new();
        let mut code_files: u64 = 0;

        let walker = SourceFiles::new(&self.root, FileFilter::TESTABLE);
        let walk_root = walker.root().to_path_buf();

        for path in walker {
            let relative = path.strip_prefix(&walk_root).unwrap_or(&path);
            if !is_test_file(relative) {
                code_files += 1;
                continue;
            }

            section.test_files += 1;
            match fs::read(&path) {
                Ok(bytes) => {
                    let content = String::from_utf8_lossy(&bytes);
                    section.test_lines += content.lines().count() as u64;
                    for (framework, re) in framework_patterns() {
                        if re.is_match(&content) {
                            section.test_frameworks.insert(framework.to_string());
                        }
                    }
                }
                Err(e) => reasons.push(format!("Failed to read {}: {}", relative.display(), e)),
            }
        }

        section.has_tests = section.test_files > 0;
        if code_files > 0 {
            section.test_to_code_ratio = section.test_files as f64 / code_files as f64;
        }
        section.has_coverage_config = COVERAGE_CONFIGS
            .iter()
            .any(|name| self.root.join(name).exists());

        Analysis::from_parts(section, reasons)
    }
}
