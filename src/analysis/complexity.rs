//! Complexity analyzer backed by an external tool
//!
//! The default tool is radon, which only understands Python sources. For
//! repositories without Python code every metric stays zero; that is an
//! accepted limitation of the tool, not a parsing failure.

use super::Analysis;
use crate::record::{ComplexityAnalysis, HalsteadMetrics};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Radon grades at or beyond this letter mark a block as complex (CC > 10)
const COMPLEX_GRADES: &[char] = &['C', 'D', 'E', 'F'];

/// Values extracted from the cyclomatic-complexity report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CyclomaticSummary {
    pub average: f64,
    pub max: u64,
    pub complex_functions: u64,
}

/// External producer of complexity metrics for a source tree
pub trait ComplexityTool: Send + Sync {
    fn cyclomatic(&self, root: &Path) -> Result<CyclomaticSummary>;

    /// Mean maintainability index over all analyzed files
    fn maintainability(&self, root: &Path) -> Result<f64>;

    fn halstead(&self, root: &Path) -> Result<HalsteadMetrics>;
}

/// The radon command line tool
#[derive(Debug, Clone)]
pub struct Radon {
    program: String,
}

impl Radon {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, subcommand: &str, root: &Path, flags: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(subcommand)
            .arg(root)
            .args(flags)
            .output()
            .with_context(|| format!("Failed to execute {} {}", self.program, subcommand))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} {} exited with {}: {}",
                self.program,
                subcommand,
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ComplexityTool for Radon {
    fn cyclomatic(&self, root: &Path) -> Result<CyclomaticSummary> {
        let stdout = self.run("cc", root, &["--average", "--total-average", "-s"])?;
        Ok(parse_cyclomatic(&stdout))
    }

    fn maintainability(&self, root: &Path) -> Result<f64> {
        let stdout = self.run("mi", root, &["-s"])?;
        Ok(parse_maintainability(&stdout))
    }

    fn halstead(&self, root: &Path) -> Result<HalsteadMetrics> {
        let stdout = self.run("hal", root, &[])?;
        Ok(parse_halstead(&stdout))
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Parse `radon cc -s --average` output
pub fn parse_cyclomatic(output: &str) -> CyclomaticSummary {
    static AVERAGE: OnceLock<Regex> = OnceLock::new();
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    let average = AVERAGE.get_or_init(|| {
        Regex::new(r"Average complexity: (?:[A-F] )?\(?([0-9.]+)").expect("valid average regex")
    });
    let block = BLOCK.get_or_init(|| Regex::new(r" - ([A-F]) \((\d+)\)").expect("valid block regex"));

    let mut summary = CyclomaticSummary {
        average: average
            .captures(output)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0.0),
        ..CyclomaticSummary::default()
    };

    for caps in block.captures_iter(output) {
        if let Ok(value) = caps[2].parse::<u64>() {
            summary.max = summary.max.max(value);
        }
        if caps[1].chars().next().is_some_and(|g| COMPLEX_GRADES.contains(&g)) {
            summary.complex_functions += 1;
        }
    }

    summary
}

/// Parse `radon mi -s` output: one `path - GRADE (value)` line per file
pub fn parse_maintainability(output: &str) -> f64 {
    static LINE: OnceLock<Regex> = OnceLock::new();
    let line = LINE.get_or_init(|| {
        Regex::new(r"(?m) - [A-C] \(([0-9.]+)\)\s*$").expect("valid maintainability regex")
    });

    let values: Vec<f64> = line
        .captures_iter(output)
        .filter_map(|c| c[1].parse().ok())
        .collect();
    mean(&values)
}

/// Parse `radon hal` output, averaging each metric over the reported files
pub fn parse_halstead(output: &str) -> HalsteadMetrics {
    static METRIC: OnceLock<Regex> = OnceLock::new();
    let metric = METRIC.get_or_init(|| {
        Regex::new(r"(?m)^\s*(volume|difficulty|effort):\s*([0-9.eE+-]+)\s*$")
            .expect("valid halstead regex")
    });

    let mut volume = Vec::new();
    let mut difficulty = Vec::new();
    let mut effort = Vec::new();
    for caps in metric.captures_iter(output) {
        let Ok(value) = caps[2].parse::<f64>() else {
            continue;
        };
        match &caps[1] {
            "volume" => volume.push(value),
            "difficulty" => difficulty.push(value),
            _ => effort.push(value),
        }
    }

    HalsteadMetrics {
        volume: mean(&volume),
        difficulty: mean(&difficulty),
        effort: mean(&effort),
    }
}

pub struct ComplexityAnalyzer<'a> {
    tool: &'a dyn ComplexityTool,
}

impl<'a> ComplexityAnalyzer<'a> {
    pub fn new(tool: &'a dyn ComplexityTool) -> Self {
        Self { tool }
    }

    /// Cyclomatic and maintainability failures reset the whole section to
    /// zero; Halstead metrics are best effort and fail silently.
    pub fn analyze(&self, root: &Path) -> Analysis<ComplexityAnalysis> {
        let measured = self.tool.cyclomatic(root).and_then(|cyclomatic| {
            let maintainability_index = self.tool.maintainability(root)?;
            Ok((cyclomatic, maintainability_index))
        });

        match measured {
            Ok((cyclomatic, maintainability_index)) => Analysis::Complete(ComplexityAnalysis {
                average: cyclomatic.average,
                max: cyclomatic.max,
                complex_functions: cyclomatic.complex_functions,
                maintainability_index,
                halstead_metrics: self.tool.halstead(root).unwrap_or_default(),
            }),
            Err(e) => Analysis::Degraded {
                section: ComplexityAnalysis::default(),
                reasons: vec![format!("{:#}", e)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC_OUTPUT: &str = "\
app/service.py
    F 1:0 main - A (1)
    C 5:0 Service - B (6)
    M 8:4 Service.run - C (12)
    M 30:4 Service.stop - E (33)

4 blocks (classes, functions, methods) analyzed.
Average complexity: C (13.0)
";

    const MI_OUTPUT: &str = "\
app/service.py - A (60.50)
app/util.py - A (80.50)
app/legacy.py - C (0.00)
";

    const HAL_OUTPUT: &str = "\
app/service.py:
    h1: 3
    h2: 6
    N1: 3
    N2: 6
    vocabulary: 9
    length: 9
    calculated_length: 20.26
    volume: 30.0
    difficulty: 1.5
    effort: 45.0
    time: 2.5
    bugs: 0.01
app/util.py:
    h1: 1
    h2: 2
    volume: 10.0
    difficulty: 0.5
    effort: 5.0
";

    #[test]
    fn test_parse_cyclomatic() {
        let summary = parse_cyclomatic(CC_OUTPUT);
        assert_eq!(summary.average, 13.0);
        assert_eq!(summary.max, 33);
        assert_eq!(summary.complex_functions, 2);
    }

    #[test]
    fn test_parse_cyclomatic_without_grade() {
        let summary = parse_cyclomatic("Average complexity: 2.5\n");
        assert_eq!(summary.average, 2.5);
        assert_eq!(summary.max, 0);
    }

    #[test]
    fn test_parse_empty_reports() {
        assert_eq!(parse_cyclomatic(""), CyclomaticSummary::default());
        assert_eq!(parse_maintainability(""), 0.0);
        assert_eq!(parse_halstead(""), HalsteadMetrics::default());
    }

    #[test]
    fn test_parse_maintainability() {
        let mi = parse_maintainability(MI_OUTPUT);
        assert!((mi - 47.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_halstead() {
        let metrics = parse_halstead(HAL_OUTPUT);
        assert_eq!(metrics.volume, 20.0);
        assert_eq!(metrics.difficulty, 1.0);
        assert_eq!(metrics.effort, 25.0);
    }

    struct StubTool {
        maintainability: Option<f64>,
    }

    impl ComplexityTool for StubTool {
        fn cyclomatic(&self, _root: &Path) -> Result<CyclomaticSummary> {
            Ok(parse_cyclomatic(CC_OUTPUT))
        }

        fn maintainability(&self, _root: &Path) -> Result<f64> {
            self.maintainability
                .ok_or_else(|| anyhow::anyhow!("mi crashed"))
        }

        fn halstead(&self, _root: &Path) -> Result<HalsteadMetrics> {
            anyhow::bail!("hal unavailable")
        }
    }

    #[test]
    fn test_halstead_failure_is_silent() {
        let tool = StubTool {
            maintainability: Some(70.0),
        };
        let analysis = ComplexityAnalyzer::new(&tool).analyze(Path::new("."));

        assert!(!analysis.is_degraded());
        assert_eq!(analysis.section().max, 33);
        assert_eq!(analysis.section().maintainability_index, 70.0);
        assert_eq!(analysis.section().halstead_metrics, HalsteadMetrics::default());
    }

    #[test]
    fn test_tool_failure_yields_zero_default() {
        let tool = StubTool {
            maintainability: None,
        };
        let analysis = ComplexityAnalyzer::new(&tool).analyze(Path::new("."));

        assert!(analysis.is_degraded());
        assert_eq!(*analysis.section(), ComplexityAnalysis::default());
        assert!(analysis.reasons()[0].contains("mi crashed"));
    }

    #[test]
    fn test_missing_program() {
        let radon = Radon::new("radon-does-not-exist-on-this-host");
        let analysis = ComplexityAnalyzer::new(&radon).analyze(Path::new("."));

        assert!(analysis.is_degraded());
        assert_eq!(*analysis.section(), ComplexityAnalysis::default());
    }
}
