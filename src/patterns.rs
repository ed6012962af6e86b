//! Textual pattern counters
//!
//! No preprocessing or parsing takes place: both counters are plain regex
//! scans over a file's text.

use std::sync::LazyLock;

use regex_lite::Regex;

/// `#include "..."` with a greedy tail that stays on the same line
static LOCAL_INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"#include ".*""#).expect("valid local include regex"));

/// `TODO` or `FIXME` in any case, consuming the rest of the line
static TODO_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(TODO|FIXME).*").expect("valid todo marker regex"));

/// Count local (quoted) include directives.
///
/// The quoted argument is not validated. Because the tail is greedy, two
/// directives on one physical line count once.
pub fn count_local_includes(content: &str) -> usize {
    LOCAL_INCLUDE_RE.find_iter(content).count()
}

/// Count TODO/FIXME markers, case-insensitively.
///
/// Each match swallows the remainder of its line, so a line carrying several
/// markers counts once.
pub fn count_todo_markers(content: &str) -> usize {
    TODO_MARKER_RE.find_iter(content).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_includes() {
        let code = r#"
#include "Atom.hpp"
#include <vector>
#include "utils/StringUtils.hpp"

int main() { return 0; }
"#;
        assert_eq!(count_local_includes(code), 2);
    }

    #[test]
    fn test_no_local_includes() {
        assert_eq!(count_local_includes("#include <iostream>\nint x;\n"), 0);
        assert_eq!(count_local_includes(""), 0);
    }

    #[test]
    fn test_local_include_requires_exact_directive() {
        // no space, extra space and wrong case never match
        assert_eq!(count_local_includes("#include\"a.h\"\n"), 0);
        assert_eq!(count_local_includes("#include  \"a.h\"\n"), 0);
        assert_eq!(count_local_includes("#INCLUDE \"a.h\"\n"), 0);
        // indentation before the directive is fine
        assert_eq!(count_local_includes("  #include \"a.h\"\n"), 1);
    }

    #[test]
    fn test_local_include_does_not_cross_lines() {
        assert_eq!(count_local_includes("#include \"a.h\n\"\n"), 0);
        assert_eq!(count_local_includes("#include \"a.h\" #include \"b.h\"\n"), 1);
    }

    #[test]
    fn test_todo_markers_case_insensitive() {
        let code = "// fixme: later\nint x; /* TODO fix */\n";
        assert_eq!(count_todo_markers(code), 2);
    }

    #[test]
    fn test_todo_markers_one_per_line() {
        assert_eq!(count_todo_markers("// TODO and FIXME\n"), 1);
        assert_eq!(count_todo_markers("// Todo\n// todo\n// FixMe\n"), 3);
        assert_eq!(count_todo_markers("int done = 0;\n"), 0);
    }
}
