//! Pattern analyzer: catalog hits and basic size metrics over source files

use super::Analysis;
use super::catalog::{Catalogs, PatternCatalog, catalogs};
use crate::record::CodeAnalysis;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn comment_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(#|//|/\*|\*)").expect("valid comment regex"))
}

fn function_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"function\s+\w+|def\s+\w+").expect("valid function regex"))
}

fn class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class\s+\w+").expect("valid class regex"))
}

fn zeroed(catalog: &PatternCatalog) -> BTreeMap<String, u64> {
    catalog
        .category_names()
        .map(|name| (name.to_string(), 0))
        .collect()
}

fn accumulate(counts: &mut BTreeMap<String, u64>, catalog: &PatternCatalog, content: &str) {
    for category in &catalog.categories {
        *counts.entry(category.name.to_string()).or_insert(0) += category.count_matches(content);
    }
}

/// Extension with its leading dot, empty when the file has none
fn extension_key(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

pub struct PatternAnalyzer {
    catalogs: &'static Catalogs,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self {
            catalogs: catalogs(),
        }
    }

    pub fn analyze(&self, files: &[PathBuf]) -> Analysis<CodeAnalysis> {
        let mut section = CodeAnalysis {
            sustainable: zeroed(&self.catalogs.sustainable),
            unsustainable: zeroed(&self.catalogs.unsustainable),
            environmental: zeroed(&self.catalogs.environmental),
            social: zeroed(&self.catalogs.social),
            ..CodeAnalysis::default()
        };
        let mut reasons = Vec::new();
        let mut total_size: u64 = 0;
        let mut comment_lines: u64 = 0;

        for path in files {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    reasons.push(format!("skipped {}: {}", path.display(), e));
                    continue;
                }
            };
            let content = String::from_utf8_lossy(&bytes);

            section.file_count += 1;
            total_size += bytes.len() as u64;

            for line in content.lines() {
                section.total_lines += 1;
                if comment_line_regex().is_match(line) {
                    comment_lines += 1;
                }
            }

            section.function_count += function_regex().find_iter(&content).count() as u64;
            section.class_count += class_regex().find_iter(&content).count() as u64;
            *section.file_types.entry(extension_key(path)).or_insert(0) += 1;

            accumulate(&mut section.sustainable, &self.catalogs.sustainable, &content);
            accumulate(&mut section.unsustainable, &self.catalogs.unsustainable, &content);
            accumulate(&mut section.environmental, &self.catalogs.environmental, &content);
            accumulate(&mut section.social, &self.catalogs.social, &content);
        }

        if section.file_count > 0 {
            section.avg_file_size = total_size as f64 / section.file_count as f64;
        }
        if section.total_lines > 0 {
            section.comment_ratio = comment_lines as f64 / section.total_lines as f64;
        }

        Analysis::from_parts(section, reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_energy_indicator_counted_once() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "main.py", b"battery\n");

        let analysis = PatternAnalyzer::new().analyze(&[file]);
        let section = analysis.section();

        assert!(!analysis.is_degraded());
        assert_eq!(section.environmental["energy_awareness"], 1);
        assert_eq!(section.environmental["high_computation"], 0);
        assert_eq!(section.file_count, 1);
        assert_eq!(section.total_lines, 1);
    }

    #[test]
    fn test_category_counts_grow_only_with_matching_files() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "totals.py",
            b"def compute_total(values):\n    return sum(values)\n",
        );
        let blank = write(&dir, "blank.py", b"");
        let energy = write(&dir, "energy.py", b"battery\n");

        let analyzer = PatternAnalyzer::new();
        let alone = analyzer.analyze(std::slice::from_ref(&base)).section().clone();
        let with_blank = analyzer.analyze(&[base.clone(), blank]).section().clone();
        let with_energy = analyzer.analyze(&[base, energy]).section().clone();

        assert_eq!(alone.sustainable["modularity"], 1);
        assert_eq!(with_blank.sustainable, alone.sustainable);
        assert_eq!(with_blank.unsustainable, alone.unsustainable);
        assert_eq!(with_blank.environmental, alone.environmental);
        assert_eq!(with_blank.social, alone.social);

        assert_eq!(with_energy.sustainable, alone.sustainable);
        assert_eq!(with_energy.unsustainable, alone.unsustainable);
        assert_eq!(with_energy.social, alone.social);
        for (name, count) in &with_energy.environmental {
            let expected = alone.environmental[name] + u64::from(name == "energy_awareness");
            assert_eq!(*count, expected, "category {}", name);
        }
    }

    #[test]
    fn test_every_category_present_when_empty() {
        let section = PatternAnalyzer::new().analyze(&[]).section().clone();

        assert_eq!(section.sustainable.len(), 8);
        assert_eq!(section.unsustainable.len(), 7);
        assert_eq!(section.environmental.len(), 3);
        assert_eq!(section.social.len(), 3);
        assert!(section.sustainable.values().all(|&n| n == 0));
        assert_eq!(section.avg_file_size, 0.0);
        assert_eq!(section.comment_ratio, 0.0);
    }

    #[test]
    fn test_size_metrics() {
        let dir = TempDir::new().unwrap();
        let py = write(
            &dir,
            "app.py",
            b"# entry point\ndef main():\n    pass\n\nclass Service:\n    pass\n",
        );
        let js = write(&dir, "index.js", b"// helper\nfunction run() {}\n");

        let section = PatternAnalyzer::new().analyze(&[py, js]).section().clone();

        assert_eq!(section.file_count, 2);
        assert_eq!(section.total_lines, 8);
        assert_eq!(section.function_count, 2);
        assert_eq!(section.class_count, 1);
        assert_eq!(section.file_types[".py"], 1);
        assert_eq!(section.file_types[".js"], 1);
        assert!((section.comment_ratio - 2.0 / 8.0).abs() < 1e-9);
        assert!((section.avg_file_size - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "bin.c", b"\xff\xfe sleep\n");

        let analysis = PatternAnalyzer::new().analyze(&[file]);
        assert!(!analysis.is_degraded());
        assert_eq!(analysis.section().environmental["energy_awareness"], 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "ok.go", b"package main\n");
        let missing = dir.path().join("gone.go");

        let analysis = PatternAnalyzer::new().analyze(&[good, missing]);
        assert!(analysis.is_degraded());
        assert_eq!(analysis.reasons().len(), 1);
        assert_eq!(analysis.section().file_count, 1);
    }
}
