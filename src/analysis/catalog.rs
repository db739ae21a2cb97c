//! Pattern catalogs: category name -> regular expressions
//!
//! The catalogs are immutable, compiled once and shared read-only by every
//! analysis. The expressions are language-agnostic heuristics.

use colored::*;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

type CatalogSource = &'static [(&'static str, &'static [&'static str])];

const SUSTAINABLE: CatalogSource = &[
    (
        "documentation",
        &[
            r#""""[\s\S]*?""""#,
            r"/\*\*[\s\S]*?\*/",
            r"/// <summary>[\s\S]*?</summary>",
            r"#\s*@param",
            r"#\s*@return",
        ],
    ),
    (
        "testing",
        &[
            r#"import\s+['"]testing['"]"#,
            r#"import\s+['"]pytest['"]"#,
            r#"import\s+['"]unittest['"]"#,
            r"@Test",
            r"test\w*\([^)]*\)\s*\{",
            r"assert\w*\(",
            r"expect\(",
            r"mock\w*\(",
        ],
    ),
    (
        "modularity",
        &[
            r"import\s+",
            r"from\s+[\w.]+\s+import",
            r#"require\(['"]"#,
            r"export\s+",
            r"class\s+\w+",
            r"interface\s+\w+",
            r"function\s+\w+",
            r"def\s+\w+",
        ],
    ),
    (
        "error_handling",
        &[
            r"try\s*\{",
            r"try:",
            r"catch\s*\(",
            r"except",
            r"finally",
            r"throw\s+new\s+\w+",
            r"raise\s+",
            r"error\w*\s*=",
            r#"log\w*\s*\(\s*['"]error"#,
            r"console\.error",
        ],
    ),
    (
        "config_management",
        &[
            r"\.env",
            r"config\.",
            r"process\.env",
            r"os\.environ",
            r"settings\.",
            r"constants\.",
            r"getenv\(",
        ],
    ),
    (
        "adaptability",
        &[
            r"interface\s+\w+",
            r"abstract\s+class",
            r"extends\s+\w+",
            r"implements\s+\w+",
            r"@Override",
            r"super\(",
            r"factory\.",
        ],
    ),
    (
        "security",
        &[
            "sanitize",
            "validate",
            "escape",
            "authenticate",
            "authorize",
            "encrypt",
            "decrypt",
            "hash",
            "token",
            "permission",
        ],
    ),
    (
        "scalability",
        &[
            "cache",
            "pool",
            "queue",
            "async",
            "await",
            "parallel",
            "concurrent",
            "thread",
            "worker",
        ],
    ),
];

const UNSUSTAINABLE: CatalogSource = &[
    (
        "code_smells",
        &[
            "TODO",
            "FIXME",
            "HACK",
            "XXX",
            "WTF",
            "NOSONAR",
            "CHECKSTYLE:OFF",
        ],
    ),
    (
        "hard_coding",
        &[
            r#"API_KEY\s*=\s*['"][^'"]+['"]"#,
            r#"password\s*=\s*['"][^'"]+['"]"#,
            r#"SECRET\s*=\s*['"][^'"]+['"]"#,
            r#"https?://[^\s<>"']+"#,
            r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}",
        ],
    ),
    (
        "long_methods",
        &[
            r"function\s+\w+\([^)]*\)\s*\{[\s\S]{1000,}\}",
            r"def\s+\w+\([^)]*\)[\s\S]{1000,}return",
            r"public\s+\w+\s+\w+\([^)]*\)\s*\{[\s\S]{1000,}\}",
        ],
    ),
    (
        "deep_nesting",
        &[
            r"if\s*\([^)]+\)\s*\{\s*if\s*\([^)]+\)\s*\{\s*if",
            r"for\s*\([^)]+\)\s*\{\s*for\s*\([^)]+\)\s*\{\s*for",
            r"while\s*\([^)]+\)\s*\{\s*while\s*\([^)]+\)\s*\{\s*while",
        ],
    ),
    ("large_classes", &[r"class\s+\w+[^{]*\{[\s\S]{3000,}\}"]),
    ("naming_issues", &[r"\b[a-z]{1,2}\b", r"\b[A-Z0-9_]+\b"]),
    (
        "commented_code",
        &[
            r"//\s*[a-zA-Z0-9]+\s*\([^)]*\)",
            r"//\s*if\s*\(",
            r"//\s*for\s*\(",
            r"#\s*[a-zA-Z0-9]+\s*\([^)]*\)",
        ],
    ),
];

const ENVIRONMENTAL: CatalogSource = &[
    (
        "high_computation",
        &[
            r"train\(",
            r"fit\(",
            r"\.cuda",
            "gpu",
            "tensorflow",
            "torch",
            r"while\s*\(\s*true",
        ],
    ),
    (
        "resource_efficient",
        &["yield", "streaming", "lazy", "throttle", "debounce"],
    ),
    ("energy_awareness", &["power", "battery", "energy", "sleep"]),
];

const SOCIAL: CatalogSource = &[
    (
        "inclusive_design",
        &["a11y", "accessibility", "aria-", "alt=", "i18n", "l10n"],
    ),
    (
        "privacy_focused",
        &["gdpr", "consent", "privacy", "anonymize", "pseudonymize"],
    ),
    (
        "ethical_considerations",
        &["ethic", "bias", "fairness", "diversity", "inclusion"],
    ),
];

/// Room for the long bounded repetitions in `long_methods`/`large_classes`
const REGEX_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// One sub-category and its compiled expressions
#[derive(Debug)]
pub struct Category {
    pub name: &'static str,
    pub patterns: Vec<Regex>,
}

impl Category {
    /// Non-overlapping matches of every expression, summed
    pub fn count_matches(&self, content: &str) -> u64 {
        self.patterns
            .iter()
            .map(|re| re.find_iter(content).count() as u64)
            .sum()
    }
}

#[derive(Debug)]
pub struct PatternCatalog {
    pub categories: Vec<Category>,
}

impl PatternCatalog {
    fn compile(source: CatalogSource) -> Self {
        let categories = source
            .iter()
            .map(|(name, patterns)| Category {
                name,
                patterns: patterns
                    .iter()
                    .filter_map(|pattern| {
                        match RegexBuilder::new(pattern)
                            .size_limit(REGEX_SIZE_LIMIT)
                            .dfa_size_limit(REGEX_SIZE_LIMIT)
                            .build()
                        {
                            Ok(re) => Some(re),
                            Err(e) => {
                                eprintln!(
                                    "{}",
                                    format!("pattern '{}' in '{}' disabled: {}", pattern, name, e)
                                        .yellow()
                                );
                                None
                            }
                        }
                    })
                    .collect(),
            })
            .collect();

        Self { categories }
    }

    pub fn category_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categories.iter().map(|c| c.name)
    }
}

/// The four catalogs scanned by the pattern analyzer
#[derive(Debug)]
pub struct Catalogs {
    pub sustainable: PatternCatalog,
    pub unsustainable: PatternCatalog,
    pub environmental: PatternCatalog,
    pub social: PatternCatalog,
}

/// Compiled catalogs, built on first use
pub fn catalogs() -> &'static Catalogs {
    static CATALOGS: OnceLock<Catalogs> = OnceLock::new();
    CATALOGS.get_or_init(|| Catalogs {
        sustainable: PatternCatalog::compile(SUSTAINABLE),
        unsustainable: PatternCatalog::compile(UNSUSTAINABLE),
        environmental: PatternCatalog::compile(ENVIRONMENTAL),
        social: PatternCatalog::compile(SOCIAL),
    })
}
