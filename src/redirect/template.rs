//! Replacement templates.
//!
//! Redirect targets are written with preg-style back-references:
//! `$1`, `${1}` and `\1` all name capture group 1, and group numbers
//! are at most two digits long. The `regex` crate expands `$name`
//! greedily (so `$1a` would look up a group called `1a`), which means
//! the raw string cannot be handed to `Regex::replace_all` as-is.
//! [`Replacement::parse`] rewrites every reference into the
//! unambiguous `${n}` form and escapes all other `$` characters.

use std::fmt::Write;

/// A replacement string translated into `regex` expansion syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    raw: String,
    expansion: String,
}

impl Replacement {
    pub fn parse(raw: &str) -> Self {
        let mut expansion = String::with_capacity(raw.len() + 8);
        let mut rest = raw;

        while let Some(pos) = rest.find(['$', '\\']) {
            expansion.push_str(&rest[..pos]);
            let sigil = rest.as_bytes()[pos];
            let after = &rest[pos + 1..];

            match group_reference(sigil, after) {
                Some((group, consumed)) => {
                    // Writing into a String cannot fail.
                    let _ = write!(expansion, "${{{group}}}");
                    rest = &after[consumed..];
                }
                None => {
                    expansion.push_str(if sigil == b'$' { "$$" } else { "\\" });
                    rest = after;
                }
            }
        }
        expansion.push_str(rest);

        Self {
            raw: raw.to_owned(),
            expansion,
        }
    }

    /// The string as it appeared in configuration.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The string in `regex` expansion syntax.
    pub fn expansion(&self) -> &str {
        &self.expansion
    }

    /// True if the replacement is an absolute `http://` or `https://` URL.
    pub fn is_absolute_url(&self) -> bool {
        self.raw.starts_with("http://") || self.raw.starts_with("https://")
    }
}

/// Parses the group number following `sigil`, returning it with the
/// number of bytes of `after` it occupies.
fn group_reference(sigil: u8, after: &str) -> Option<(u8, usize)> {
    if let Some(braced) = after.strip_prefix('{').filter(|_| sigil == b'$') {
        let digits = leading_digits(braced);
        if digits > 0 && braced.as_bytes().get(digits) == Some(&b'}') {
            return Some((braced[..digits].parse().ok()?, digits + 2));
        }
        return None;
    }

    let digits = leading_digits(after);
    if digits == 0 {
        return None;
    }
    Some((after[..digits].parse().ok()?, digits))
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take(2).take_while(u8::is_ascii_digit).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_references() {
        assert_eq!(Replacement::parse("/new/$1").expansion(), "/new/${1}");
        assert_eq!(Replacement::parse("$0").expansion(), "${0}");
        // Only two digits belong to the reference.
        assert_eq!(Replacement::parse("$123").expansion(), "${12}3");
    }

    #[test]
    fn test_reference_followed_by_text() {
        assert_eq!(Replacement::parse("/$1abc").expansion(), "/${1}abc");
        assert_eq!(Replacement::parse("${1}0").expansion(), "${1}0");
    }

    #[test]
    fn test_backslash_references() {
        assert_eq!(Replacement::parse(r"/new/\1/\2").expansion(), "/new/${1}/${2}");
        assert_eq!(Replacement::parse(r"a\b").expansion(), r"a\b");
    }

    #[test]
    fn test_literal_dollars_are_escaped() {
        assert_eq!(Replacement::parse("/price$").expansion(), "/price$$");
        assert_eq!(Replacement::parse("$name").expansion(), "$$name");
        assert_eq!(Replacement::parse("${x}").expansion(), "$${x}");
        assert_eq!(Replacement::parse("${1").expansion(), "$${1");
    }

    #[test]
    fn test_plain_text_untouched() {
        let r = Replacement::parse("https://new.example.com/");
        assert_eq!(r.expansion(), "https://new.example.com/");
        assert_eq!(r.raw(), "https://new.example.com/");
    }

    #[test]
    fn test_absolute_url_detection() {
        assert!(Replacement::parse("https://other.com/$1").is_absolute_url());
        assert!(Replacement::parse("http://other.com").is_absolute_url());
        assert!(!Replacement::parse("/new/$1").is_absolute_url());
        assert!(!Replacement::parse("HTTPS://other.com").is_absolute_url());
        assert!(!Replacement::parse("ftp://other.com").is_absolute_url());
    }
}
