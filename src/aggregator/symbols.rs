//! Shortening of fully-qualified symbol names for display.
//!
//! Handles the naming conventions of the languages pprof commonly profiles:
//! Go import paths, Java packages and C++ namespaces.
//!
//! Examples:
//! - `example.com/pkg/v3/sub.Func` -> `sub.Func`
//! - `com.example.Foo.bar(int)` -> `Foo.bar`
//! - `ns::Outer::Inner<int>::method` -> `Outer::Inner<int>::method`

use regex::Regex;
use std::sync::OnceLock;

struct Patterns {
    cpp_anonymous_prefix: Regex,
    go_version: Regex,
    /// Tried in order, first match wins
    conventions: [Regex; 3],
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        cpp_anonymous_prefix: compile(r"^\(anonymous namespace\)::"),
        go_version: compile(r"^(.*?)/v(?:[2-9]|[1-9][0-9]+)([./].*)$"),
        conventions: [
            // Go: drop every directory of the import path
            compile(r"^(?:[\w\-\.]+/)+(.+)"),
            // Java: drop the package, keep Class.method without arguments
            compile(r"^(?:[a-z]\w*\.)*([A-Z][\w$]*\.(?:<init>|[a-z][\w$]*(?:\$\d+)?))(?:\(|$)"),
            // C++: drop lowercase namespaces, keep the qualified name with templates
            compile(r"^(?:[_a-z]\w*::)+(_*[A-Z].*::~?[_a-zA-Z]\w*(?:<.*>)?)$"),
        ],
    })
}

// Patterns are literals; a failure here is a programming error caught by tests.
#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("symbol pattern must compile")
}

/// Shorten a fully-qualified symbol name.
///
/// Never fails: names matching none of the conventions are returned unchanged.
pub fn shorten_symbol(full_name: &str) -> String {
    let p = patterns();

    let name = p.cpp_anonymous_prefix.replace(full_name, "");
    let name = p.go_version.replace(&name, "${1}${2}");

    for re in &p.conventions {
        if let Some(caps) = re.captures(&name) {
            return caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .collect();
        }
    }

    name.into_owned()
}

/// Tree label for a shortened name: the text after the last `.`
pub fn display_key(short_name: &str) -> &str {
    match short_name.rsplit_once('.') {
        Some((_, tail)) => tail,
        None => short_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_import_path() {
        assert_eq!(shorten_symbol("github.com/user/project/pkg.Func"), "pkg.Func");
        assert_eq!(
            shorten_symbol("github.com/user/project/pkg.(*Type).Method"),
            "pkg.(*Type).Method"
        );
        assert_eq!(shorten_symbol("runtime.mallocgc"), "runtime.mallocgc");
    }

    #[test]
    fn test_go_module_version_is_removed() {
        assert_eq!(shorten_symbol("example.com/pkg/v3/sub.Func"), "sub.Func");
        assert_eq!(shorten_symbol("example.com/pkg/v12.Func"), "pkg.Func");
        // v1 is not a major-version suffix
        assert_eq!(shorten_symbol("example.com/v1/sub.Func"), "sub.Func");
        assert_eq!(shorten_symbol("example.com/pkg/v1.Func"), "v1.Func");
    }

    #[test]
    fn test_java_method() {
        assert_eq!(shorten_symbol("com.example.Foo.bar(int)"), "Foo.bar");
        assert_eq!(shorten_symbol("java.lang.Thread.run"), "Thread.run");
        assert_eq!(shorten_symbol("com.example.Foo.<init>"), "Foo.<init>");
        assert_eq!(shorten_symbol("com.example.Foo$Bar.lambda$0"), "Foo$Bar.lambda$0");
    }

    #[test]
    fn test_cpp_namespace() {
        assert_eq!(
            shorten_symbol("ns::Outer::Inner<int>::method"),
            "Outer::Inner<int>::method"
        );
        assert_eq!(shorten_symbol("foo::bar::Baz::~Baz"), "Baz::~Baz");
        assert_eq!(
            shorten_symbol("(anonymous namespace)::detail::Worker::run"),
            "Worker::run"
        );
        assert_eq!(
            shorten_symbol("std::vector<int>::push_back"),
            "std::vector<int>::push_back"
        );
    }

    #[test]
    fn test_unmatched_names_pass_through() {
        assert_eq!(shorten_symbol("main"), "main");
        assert_eq!(shorten_symbol(""), "");
        assert_eq!(shorten_symbol("[unknown]"), "[unknown]");
    }

    #[test]
    fn test_shortening_is_idempotent() {
        for name in [
            "github.com/user/project/pkg.Func",
            "example.com/pkg/v3/sub.Func",
            "com.example.Foo.bar(int)",
            "ns::Outer::Inner<int>::method",
            "(anonymous namespace)::Worker::run",
        ] {
            let once = shorten_symbol(name);
            assert_eq!(shorten_symbol(&once), once, "input: {}", name);
        }
    }

    #[test]
    fn test_display_key() {
        assert_eq!(display_key("pkg.(*Type).Method"), "Method");
        assert_eq!(display_key("Outer::Inner<int>::method"), "Outer::Inner<int>::method");
        assert_eq!(display_key("pkg."), "");
    }
}
