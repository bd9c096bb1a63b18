//! Parser for flat `[section]` / `key = value` configuration text.
//!
//! The dialect:
//!
//! ```text
//! [DEFAULT]
//! host = shop.example.com
//!
//! [checkout]
//! ; full-line comments start with `;` or `#`
//! success_url = https://%(host)s/stripe/success/
//! method_types: card,
//!     sepa_debit
//! ```
//!
//! * section names are case-sensitive, option names are lower-cased;
//! * `=` or `:` separates the key from the value, whichever comes first;
//! * indented lines continue the previous value, joined with `\n`;
//! * `[DEFAULT]` holds options inherited by every other section.
//!
//! `rust-ini` does the reading. This module adds the structural checks it
//! leaves out, such as repeated sections, and folds the result into
//! [`Section`]s.

mod interpolation;

pub use interpolation::{MAX_INTERPOLATION_DEPTH, interpolate};

use crate::error::{ParseError, ParseErrorKind};
use ini::{Ini, ParseOption};

/// Name of the section whose options every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Origin reported for sources that were not read from a file.
pub const STRING_ORIGIN: &str = "<string>";

/// One section of a parsed source, options in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Raw value of an already lower-cased option name.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == option)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, option: &str) -> bool {
        self.get(option).is_some()
    }

    /// Insert or overwrite an option. An overwritten option keeps its position.
    pub fn set(&mut self, option: String, value: String) {
        match self.entries.iter_mut().find(|(key, _)| *key == option) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((option, value)),
        }
    }

    /// Fold `other` into this section, `other` winning on collisions.
    pub fn merge(&mut self, other: Section) {
        for (option, value) in other.entries {
            self.set(option, value);
        }
    }
}

/// Normalises an option name the way the parser stores it.
pub fn option_key(option: &str) -> String {
    option.trim().to_lowercase()
}

/// Quotes and backslashes stay literal; indented lines continue the
/// previous value.
fn reader_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    }
}

/// Parses one source into its sections, in the order they first appear.
///
/// `origin` names the source in error messages. A `[DEFAULT]` block is
/// returned as a regular section named [`DEFAULT_SECTION`].
pub fn parse(text: &str, origin: &str) -> Result<Vec<Section>, ParseError> {
    let error = |line: Option<usize>, kind: ParseErrorKind| ParseError {
        origin: origin.to_owned(),
        line,
        kind,
    };

    let document = Ini::load_from_str_opt(text, reader_options())
        .map_err(|e| error(Some(e.line), ParseErrorKind::Syntax(e.msg.to_string())))?;

    let mut sections: Vec<Section> = Vec::new();
    for (name, properties) in document.iter() {
        let Some(name) = name else {
            // Options above the first header land in the general section.
            if properties.iter().next().is_some() {
                return Err(error(None, ParseErrorKind::MissingSectionHeader));
            }
            continue;
        };

        let index = match sections.iter().position(|s| s.name == name) {
            Some(index) if name == DEFAULT_SECTION => index,
            Some(_) => {
                return Err(error(
                    None,
                    ParseErrorKind::DuplicateSection(name.to_owned()),
                ));
            }
            None => {
                sections.push(Section::new(name));
                sections.len() - 1
            }
        };

        let section = &mut sections[index];
        for (key, value) in properties.iter() {
            let key = option_key(key);
            if key.is_empty() {
                return Err(error(
                    None,
                    ParseErrorKind::EmptyOption(section.name.clone()),
                ));
            }
            if section.contains(&key) {
                return Err(error(
                    None,
                    ParseErrorKind::DuplicateOption {
                        section: section.name.clone(),
                        option: key,
                    },
                ));
            }
            section.entries.push((key, join_lines(value)));
        }
    }

    Ok(sections)
}

/// Continuation lines are stored trimmed and joined with `\n`.
fn join_lines(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> Vec<Section> {
        parse(text, STRING_ORIGIN).unwrap()
    }

    #[test]
    fn test_sections_and_options() {
        let sections = parse_ok(
            r#"
[payment]
api_key = sk_test_123
Currency : usd

[checkout]
success_url=http://localhost/stripe/success/
"#,
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "payment");
        assert_eq!(sections[0].get("api_key"), Some("sk_test_123"));
        assert_eq!(sections[0].get("currency"), Some("usd"));
        assert_eq!(
            sections[1].get("success_url"),
            Some("http://localhost/stripe/success/")
        );
    }

    #[test]
    fn test_first_delimiter_wins() {
        let sections = parse_ok("[db]\nurl = postgres://user:pw@host/db\ndsn: a=b\n");
        assert_eq!(sections[0].get("url"), Some("postgres://user:pw@host/db"));
        assert_eq!(sections[0].get("dsn"), Some("a=b"));
    }

    #[test]
    fn test_section_names_keep_case() {
        let sections = parse_ok("[Payment]\nKEY = v\n");
        assert_eq!(sections[0].name, "Payment");
        assert_eq!(sections[0].get("key"), Some("v"));
    }

    #[test]
    fn test_comments_are_skipped() {
        let sections = parse_ok("# leading\n[a]\n; note\nx = 1 ; not a comment\n");
        assert_eq!(sections[0].entries.len(), 1);
        assert_eq!(sections[0].get("x"), Some("1 ; not a comment"));
    }

    #[test]
    fn test_quotes_and_backslashes_are_literal() {
        let sections = parse_ok("[paths]\nroot = C:\\shop\\static\ntitle = \"Shop\"\n");
        assert_eq!(sections[0].get("root"), Some("C:\\shop\\static"));
        assert_eq!(sections[0].get("title"), Some("\"Shop\""));
    }

    #[test]
    fn test_continuation_lines() {
        let sections =
            parse_ok("[payment]\nmethod_types = card,\n    sepa_debit,\n    ideal\nnext = 1\n");
        assert_eq!(
            sections[0].get("method_types"),
            Some("card,\nsepa_debit,\nideal")
        );
        assert_eq!(sections[0].get("next"), Some("1"));
    }

    #[test]
    fn test_trailing_blank_lines_are_dropped() {
        let sections = parse_ok("[a]\nx = 1\n\n\n[b]\ny = 2\n");
        assert_eq!(sections[0].get("x"), Some("1"));
        assert_eq!(sections[1].get("y"), Some("2"));
    }

    #[test]
    fn test_empty_value() {
        let sections = parse_ok("[a]\nx =\n");
        assert_eq!(sections[0].get("x"), Some(""));
    }

    #[test]
    fn test_empty_section_is_kept() {
        let sections = parse_ok("[a]\n[b]\ny = 2\n");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].entries.is_empty());
    }

    #[test]
    fn test_default_section_can_reopen() {
        let sections = parse_ok("[DEFAULT]\na = 1\n[s]\nb = 2\n[DEFAULT]\nc = 3\n");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, DEFAULT_SECTION);
        assert_eq!(sections[0].get("c"), Some("3"));
    }

    #[test]
    fn test_missing_section_header() {
        let err = parse("key = value\n", "shop.ini").unwrap_err();
        assert_eq!(err.origin, "shop.ini");
        assert_eq!(err.kind, ParseErrorKind::MissingSectionHeader);
        assert_eq!(err.to_string(), "shop.ini: option found before any section header");
    }

    #[test]
    fn test_duplicate_section() {
        let err = parse("[a]\nx = 1\n[a]\ny = 2\n", STRING_ORIGIN).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DuplicateSection("a".to_string()));
    }

    #[test]
    fn test_duplicate_option_is_case_insensitive() {
        let err = parse("[a]\nx = 1\nX = 2\n", STRING_ORIGIN).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::DuplicateOption {
                section: "a".to_string(),
                option: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_option_across_reopened_default() {
        let err = parse("[DEFAULT]\nx = 1\n[DEFAULT]\nx = 2\n", STRING_ORIGIN).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::DuplicateOption { .. }));
    }

    #[test]
    fn test_unterminated_header_is_a_syntax_error() {
        let err = parse("[broken\nx = 1\n", "shop.ini").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Syntax(_)));
        assert!(err.line.is_some());
    }

    #[test]
    fn test_section_merge_overrides_in_place() {
        let mut base = Section::new("a");
        base.set("x".into(), "1".into());
        base.set("y".into(), "2".into());
        let mut other = Section::new("a");
        other.set("x".into(), "10".into());
        other.set("z".into(), "3".into());
        base.merge(other);
        assert_eq!(
            base.entries,
            vec![
                ("x".to_string(), "10".to_string()),
                ("y".to_string(), "2".to_string()),
                ("z".to_string(), "3".to_string()),
            ]
        );
    }
}
