use std::collections::HashMap;
use regex::{Captures, Regex};
use lazy_static::lazy_static;

lazy_static! {
    /// Matches the smallest `{...}` span. `.` does not cross line breaks, so `{a\n}` is not a placeholder.
    static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{(.*?)\}").unwrap();
}

#[inline]
fn strip_format(key: &str) -> &str {
    //! Strips the surrounding `{` and `}` of a match of [PLACEHOLDER_MATCH_RE].
    //! Ensure the string is properly formatted like "{a}".
    &key[1..key.len() - 1]
}

/// Replaces every placeholder occurrence with its value in `mapping`.
///
/// Placeholders missing from the mapping, or mapped to `None`, are left as written.
pub(crate) fn replace_all_placeholders(original: &str, mapping: &HashMap<String, Option<String>>) -> String {
    PLACEHOLDER_MATCH_RE.replace_all(original, |captures: &Captures| {
        let match_text = &captures[0];
        let key = strip_format(match_text);
        match mapping.get(key) {
            Some(Some(value)) => value.clone(),
            _ => match_text.to_string(),
        }
    }).into_owned()
}

/// Extracts the names of all placeholders in scan order, keeping duplicates.
///
/// # Example
/// ```
/// use promptload::utils::prompt_processing::get_placeholders;
/// let placeholders = get_placeholders("Hello {name}, welcome to {place}!");
/// assert_eq!(placeholders, vec!["name", "place"]);
/// ```
pub fn get_placeholders(string: &str) -> Vec<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .map(|captures| strip_format(&captures[0]).to_string())
        .collect()
}

#[cfg(test)]
mod prompt_processing_tests {
    use std::collections::HashMap;
    use super::{get_placeholders, replace_all_placeholders};

    #[test]
    fn test_get_placeholders() {
        let keys = get_placeholders("{a}");
        assert_eq!(vec!["a".to_string()], keys);

        let keys = get_placeholders("{a\n}");
        assert_eq!(0, keys.len());

        let keys = get_placeholders("{a}    {b}");
        assert_eq!(vec!["a".to_string(), "b".to_string()], keys);

        let keys = get_placeholders("no placeholders at all");
        assert!(keys.is_empty());
    }

    #[test]
    fn test_duplicates_and_empty_names_are_kept() {
        let keys = get_placeholders("{a}{a}{}");
        assert_eq!(vec!["a", "a", ""], keys);
    }

    #[test]
    fn test_minimal_span() {
        // the scan stops at the first closing brace
        let keys = get_placeholders("{{a}}");
        assert_eq!(vec!["{a"], keys);

        let keys = get_placeholders("{a {b} c}");
        assert_eq!(vec!["a {b"], keys);

        let keys = get_placeholders("} {x} {");
        assert_eq!(vec!["x"], keys);
    }

    #[test]
    fn test_placeholder_names_keep_spaces() {
        let keys = get_placeholders("{ first name }");
        assert_eq!(vec![" first name "], keys);
    }

    #[test]
    fn test_replace() {
        let string = "{a} and {b} and {a}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("alice".to_string())),
            ("b".to_string(), Some("bob".to_string())),
        ]);
        assert_eq!("alice and bob and alice", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_replace_keeps_unfilled() {
        let string = "{a} and {b}";
        let mapping = HashMap::from([
            ("a".to_string(), Some("alice".to_string())),
            ("b".to_string(), None),
        ]);
        assert_eq!("alice and {b}", replace_all_placeholders(string, &mapping));
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let mapping = HashMap::from([
            ("a".to_string(), Some("{b}".to_string())),
            ("b".to_string(), Some("bob".to_string())),
        ]);
        assert_eq!("{b} bob", replace_all_placeholders("{a} {b}", &mapping));
    }
}
