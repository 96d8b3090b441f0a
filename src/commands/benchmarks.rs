//! Discovery of Go benchmark functions.
//!
//! Scans every `*_test.go` file below a directory for `func BenchmarkXxx(`
//! declarations, the names accepted by `--bench`.

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use walkdir::WalkDir;

fn benchmark_decl() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"(?m)^func\s+(?:\([^)]*\)\s*)?(Benchmark\w*)\s*[\[(]")
            .expect("benchmark pattern must compile")
    })
}

/// Benchmark function names declared in Go source text, in order
pub fn benchmark_names(source: &str) -> Vec<String> {
    benchmark_decl()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Every benchmark below `root`, files visited in lexical path order
pub fn find_benchmarks(root: &Path) -> Result<Vec<String>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Cannot walk {}", root.display()))?;
        if !entry.file_type().is_file() || !is_go_test_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let source =
            fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
        let names = benchmark_names(&source);
        debug!("{}: {} benchmark(s)", path.display(), names.len());
        found.extend(names);
    }

    Ok(found)
}

fn is_go_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_names() {
        let source = r#"
package fib

func BenchmarkFib10(b *testing.B) {}

func TestFib(t *testing.T) {}

func benchmarkHelper(b *testing.B) {}

func (s *suite) BenchmarkMethod(b *testing.B) {}
func BenchmarkGeneric[T any](b *testing.B) {}
"#;
        assert_eq!(
            benchmark_names(source),
            vec!["BenchmarkFib10", "BenchmarkMethod", "BenchmarkGeneric"]
        );
    }
}
