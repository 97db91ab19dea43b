//! Pattern matching over textual actuals.

use regex::Regex;

use crate::check::{Check, CheckResult};
use crate::extract::{Actual, must_extract};
use crate::fail;
use crate::matcher::Matcher;

struct Say {
    pattern: Regex,
}

impl Matcher for Say {
    fn check(&self, cx: &mut Check<'_>, actuals: &[Actual]) -> CheckResult {
        for actual in actuals {
            let value = must_extract(cx, actual)?;
            let text = match &value {
                Actual::Text(s) => s.clone(),
                Actual::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
                other => {
                    fail!("Unsupported type for a text match: {other:?}");
                }
            };
            if !self.pattern.is_match(&text) {
                fail!(
                    "Expected actual value to match '{}', but it does not: {text}",
                    self.pattern
                );
            }
        }
        Ok(())
    }
}

/// Require every actual's text to match `pattern`.
///
/// # Panics
///
/// Panics when `pattern` is not a valid regular expression.
pub fn say(pattern: &str) -> impl Matcher {
    match Regex::new(pattern) {
        Ok(re) => say_regex(re),
        Err(err) => panic!("invalid pattern for say: {err}"),
    }
}

/// [`say`] with a pre-compiled pattern.
#[must_use]
pub fn say_regex(pattern: Regex) -> impl Matcher {
    Say { pattern }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::TickShared;

    fn check_with(matcher: &dyn Matcher, actual: Actual) -> CheckResult {
        let shared = TickShared::default();
        let mut cx = Check::contained(&shared);
        matcher.check(&mut cx, &[actual])
    }

    #[test]
    fn test_matching_text_passes() {
        let matcher = say("^hello, \\w+$");
        assert!(check_with(&matcher, Actual::Text("hello, world".into())).is_ok());
    }

    #[test]
    fn test_non_matching_text_fails() {
        let matcher = say("^ready$");
        let err = check_with(&matcher, Actual::Text("pending".into())).unwrap_err();
        assert_eq!(
            err.message(),
            "Expected actual value to match '^ready$', but it does not: pending"
        );
    }

    #[test]
    fn test_bytes_match_as_text() {
        let matcher = say("abc");
        assert!(check_with(&matcher, Actual::bytes(b"xxabcxx".to_vec())).is_ok());
    }

    #[test]
    fn test_non_textual_actual_fails() {
        let matcher = say("1");
        let err = check_with(&matcher, Actual::Signed(1)).unwrap_err();
        assert_eq!(err.message(), "Unsupported type for a text match: 1");
    }

    #[test]
    #[should_panic(expected = "invalid pattern for say")]
    fn test_invalid_pattern_panics() {
        let _ = say("(unclosed");
    }
}
