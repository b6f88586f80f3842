//! Path targeting — decides whether a campaign is eligible on the current
//! navigation path. Patterns support exact matches and single-level `*`
//! wildcards compiled to anchored regexes.

use popup_core::types::{TargetingMode, TargetingRule};
use tracing::debug;

/// Strip one trailing slash; the root path stays `/`.
fn normalize(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// Test `path` against `pattern`. Exact equality after trailing-slash
/// normalization, or a `*` glob translated to `.*` with every other regex
/// metacharacter escaped.
pub fn matches(path: &str, pattern: &str) -> bool {
    let path = normalize(path);
    let pattern = normalize(pattern);

    if path == pattern {
        return true;
    }

    if pattern.contains('*') {
        let translated = format!("^{}$", regex::escape(pattern).replace(r"\*", ".*"));
        match regex::Regex::new(&translated) {
            Ok(re) => return re.is_match(path),
            Err(e) => {
                // Hot display path: a bad pattern means no match, never an error.
                debug!(pattern, error = %e, "Glob pattern failed to compile");
                return false;
            }
        }
    }

    false
}

/// Evaluate a campaign's targeting rule for the current path.
pub fn should_show(rule: &TargetingRule, path: &str) -> bool {
    match rule.mode {
        TargetingMode::All => true,
        TargetingMode::Include => rule.paths.iter().any(|p| matches(path, p)),
        TargetingMode::Exclude => !rule.paths.iter().any(|p| matches(path, p)),
        TargetingMode::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches("/products", "/products"));
        assert!(!matches("/products", "/cart"));
    }

    #[test]
    fn test_trailing_slash_normalization() {
        assert!(matches("/about/", "/about"));
        assert!(matches("/about", "/about/"));
        assert!(matches("/", "/"));
    }

    #[test]
    fn test_wildcard_segment() {
        assert!(matches("/products/42", "/products/*"));
        assert!(matches("/products/42/reviews", "/products/*"));
        assert!(!matches("/products", "/products/*"));
        assert!(!matches("/cart", "/products/*"));
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        // The dot stays literal; only `*` becomes a wildcard.
        assert!(matches("/docs/intro.html", "/docs/*.html"));
        assert!(!matches("/docs/introxhtml", "/docs/*.html"));
        assert!(!matches("/filex", "/file."));
        assert!(matches("/file.", "/file."));
    }

    fn rule(mode: TargetingMode, paths: &[&str]) -> TargetingRule {
        TargetingRule {
            mode,
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_mode_all() {
        let r = rule(TargetingMode::All, &[]);
        assert!(should_show(&r, "/"));
        assert!(should_show(&r, "/checkout"));
    }

    #[test]
    fn test_mode_include() {
        let r = rule(TargetingMode::Include, &["/checkout"]);
        assert!(should_show(&r, "/checkout"));
        assert!(!should_show(&r, "/"));
        assert!(!should_show(&r, "/products/1"));
    }

    #[test]
    fn test_mode_exclude() {
        let r = rule(TargetingMode::Exclude, &["/checkout"]);
        assert!(!should_show(&r, "/checkout"));
        assert!(should_show(&r, "/"));
        assert!(should_show(&r, "/products/1"));
    }

    #[test]
    fn test_mode_unknown_never_shows() {
        let r = rule(TargetingMode::Unknown, &[]);
        assert!(!should_show(&r, "/"));
    }
}
