//! Dependency analyzer: manifest counts and the lock-file graph

use super::Analysis;
use crate::record::{DependencyAnalysis, DependencyGraphSummary};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const PACKAGE_MANIFEST: &str = "package.json";
const PACKAGE_LOCK: &str = "package-lock.json";
const REQUIREMENTS: &str = "requirements.txt";

/// Directed graph of locked packages with unique edges
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DependencyGraph {
    nodes: BTreeSet<String>,
    edges: BTreeSet<(String, String)>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str) {
        self.nodes.insert(name.to_string());
    }

    /// Both endpoints become nodes
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from);
        self.add_node(to);
        self.edges.insert((from.to_string(), to.to_string()));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn summary(&self) -> DependencyGraphSummary {
        let nodes = self.node_count() as u64;
        let edges = self.edge_count() as u64;
        DependencyGraphSummary {
            nodes,
            edges,
            avg_degree: if nodes > 0 {
                edges as f64 / nodes as f64
            } else {
                0.0
            },
        }
    }

    /// Build from `package-lock.json` content, lockfile v1 or v2/v3
    pub fn from_lockfile(content: &str) -> Result<Self> {
        let lock: Value = serde_json::from_str(content).context("Invalid lock file JSON")?;
        let mut graph = Self::new();

        if let Some(packages) = lock.get("packages").and_then(Value::as_object) {
            for (key, info) in packages {
                // "" is the root project itself
                let Some(name) = package_name(key) else {
                    continue;
                };
                graph.add_node(name);
                for field in ["dependencies", "optionalDependencies"] {
                    for required in object_keys(info.get(field)) {
                        graph.add_edge(name, required);
                    }
                }
            }
        } else if let Some(dependencies) = lock.get("dependencies").and_then(Value::as_object) {
            graph.add_v1_dependencies(dependencies);
        }

        Ok(graph)
    }

    fn add_v1_dependencies(&mut self, dependencies: &Map<String, Value>) {
        for (name, info) in dependencies {
            self.add_node(name);
            for required in object_keys(info.get("requires")) {
                self.add_edge(name, required);
            }
            if let Some(nested) = info.get("dependencies").and_then(Value::as_object) {
                self.add_v1_dependencies(nested);
            }
        }
    }
}

/// `node_modules/a/node_modules/@scope/b` -> `@scope/b`
fn package_name(key: &str) -> Option<&str> {
    let name = match key.rfind("node_modules/") {
        Some(index) => &key[index + "node_modules/".len()..],
        None => key,
    };
    (!name.is_empty()).then_some(name)
}

fn object_keys(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|map| map.keys().map(String::as_str))
}

fn object_len(value: &Value, field: &str) -> u64 {
    value
        .get(field)
        .and_then(Value::as_object)
        .map(|map| map.len() as u64)
        .unwrap_or(0)
}

/// Requirement lines, skipping blanks, comments and pip options
pub fn count_requirements(content: &str) -> u64 {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .count() as u64
}

pub struct DependencyAnalyzer {
    root: PathBuf,
}

impl DependencyAnalyzer {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn analyze(&self) -> Analysis<DependencyAnalysis> {
        let mut section = DependencyAnalysis::default();
        let mut reasons = Vec::new();

        let manifest = self.root.join(PACKAGE_MANIFEST);
        let requirements = self.root.join(REQUIREMENTS);

        if manifest.is_file() {
            match read_package_manifest(&manifest) {
                Ok((direct, dev)) => {
                    section.direct_dependencies = direct;
                    section.dev_dependencies = dev;
                    section.total_dependencies = direct + dev;
                }
                Err(e) => reasons.push(format!("{:#}", e)),
            }

            let lock = self.root.join(PACKAGE_LOCK);
            if lock.is_file() {
                match read_lockfile(&lock) {
                    Ok(graph) => section.dependency_graph = graph.summary(),
                    Err(e) => reasons.push(format!("{:#}", e)),
                }
            }
        } else if requirements.is_file() {
            match fs::read(&requirements) {
                Ok(bytes) => {
                    let count = count_requirements(&String::from_utf8_lossy(&bytes));
                    section.direct_dependencies = count;
                    section.total_dependencies = count;
                }
                Err(e) => reasons.push(format!("Failed to read {}: {}", REQUIREMENTS, e)),
            }
        }

        Analysis::from_parts(section, reasons)
    }
}

fn read_package_manifest(path: &Path) -> Result<(u64, u64)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", PACKAGE_MANIFEST))?;
    let manifest: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", PACKAGE_MANIFEST))?;
    Ok((
        object_len(&manifest, "dependencies"),
        object_len(&manifest, "devDependencies"),
    ))
}

fn read_lockfile(path: &Path) -> Result<DependencyGraph> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", PACKAGE_LOCK))?;
    DependencyGraph::from_lockfile(&content).with_context(|| format!("Failed to parse {}", PACKAGE_LOCK))
}
