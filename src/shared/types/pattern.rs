//! `*` wildcard patterns used by account search.
//!
//! `*` matches any run of characters (including none); every other
//! character matches itself, ignoring ASCII case.

/// `true` when the pattern filters nothing.
pub fn is_match_all(pattern: &str) -> bool {
    pattern.chars().all(|c| c == '*')
}

/// Case-insensitive wildcard match of `value` against `pattern`.
pub fn matches_pattern(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let value: Vec<char> = value.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut p, mut v) = (0, 0);
    // Position of the last `*` seen and the value index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, v));
            p += 1;
        } else if p < pattern.len() && pattern[p] == value[v] {
            p += 1;
            v += 1;
        } else if let Some((star, at)) = backtrack {
            p = star + 1;
            v = at + 1;
            backtrack = Some((star, at + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Translate a wildcard pattern into a SQL `LIKE` operand, or `None` when
/// the pattern matches everything.
///
/// `%`, `_` and the escape character itself are escaped with
/// [`LIKE_ESCAPE`] so they match literally, as they do in memory.
pub fn to_like_pattern(pattern: &str) -> Option<String> {
    if is_match_all(pattern) {
        return None;
    }
    let mut like = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '*' => like.push('%'),
            '%' | '_' | LIKE_ESCAPE => {
                like.push(LIKE_ESCAPE);
                like.push(c);
            }
            other => like.push(other),
        }
    }
    Some(like)
}

/// Escape character paired with [`to_like_pattern`] output
pub const LIKE_ESCAPE: char = '\\';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_anything() {
        assert!(matches_pattern("*", ""));
        assert!(matches_pattern("*", "alice"));
        assert!(is_match_all("*"));
        assert!(is_match_all(""));
    }

    #[test]
    fn literal_pattern_is_exact_and_case_insensitive() {
        assert!(matches_pattern("alice", "ALICE"));
        assert!(!matches_pattern("alice", "alice2"));
        assert!(!matches_pattern("alice", "alic"));
    }

    #[test]
    fn prefix_suffix_and_infix() {
        assert!(matches_pattern("adm*", "admin"));
        assert!(matches_pattern("*@example.com", "bob@example.com"));
        assert!(!matches_pattern("*@example.com", "bob@example.org"));
        assert!(matches_pattern("a*c*e", "abcde"));
        assert!(!matches_pattern("a*c*e", "abcdf"));
    }

    #[test]
    fn backtracks_across_repeated_characters() {
        assert!(matches_pattern("*ab", "aaab"));
        assert!(matches_pattern("a*a*a", "aaa"));
        assert!(!matches_pattern("a*a*a", "aa"));
    }

    #[test]
    fn like_translation() {
        assert_eq!(to_like_pattern("*"), None);
        assert_eq!(to_like_pattern("adm*"), Some("adm%".into()));
        assert_eq!(to_like_pattern("*x*"), Some("%x%".into()));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(to_like_pattern("a_ice"), Some(r"a\_ice".into()));
        assert_eq!(to_like_pattern("%"), Some(r"\%".into()));
        assert_eq!(to_like_pattern(r"a\b*"), Some(r"a\\b%".into()));
    }

    #[test]
    fn like_metacharacters_match_literally_in_memory() {
        assert!(matches_pattern("a_ice", "a_ice"));
        assert!(!matches_pattern("a_ice", "alice"));
        assert!(!matches_pattern("%", "alice"));
    }
}
