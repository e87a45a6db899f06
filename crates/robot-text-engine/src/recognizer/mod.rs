//! Token recognizers: anchored patterns that propose token types for a cell.
//!
//! Word patterns are made case-insensitive by expanding every letter into a
//! bracket class (`Library` becomes `[lL][iI][bB][rR][aA][rR][yY]`) rather
//! than by a case-folding flag, so translated synonyms match exactly the way
//! their authors spelled them.
//!
//! All patterns are compiled once per process. A [`RecognizerSet`] is the
//! version-filtered view a single parse uses; recognizers outside their
//! version window are never consulted.

mod table;

pub use table::RecognizerEntry;

use crate::tokens::{FilePosition, RobotToken, TokenType};
use crate::version::RobotVersion;
use regex::Regex;
use std::sync::OnceLock;

/// How a recognizer's regex is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `*** Name ***` table header.
    Header(&'static str),
    /// Suite setting name, optionally followed by `:`.
    Setting(&'static str),
    /// `[Name]` body setting.
    Bracketed(&'static str),
    /// Plain case-insensitive words.
    Words(&'static str),
    /// Literal regex, used as-is.
    Regex(&'static str),
}

impl Pattern {
    pub fn to_regex(self) -> String {
        match self {
            Pattern::Header(name) => format!(r"^\*+\s*{}\s*\**$", expand_words(name)),
            Pattern::Setting(name) => format!(r"^{}\s*:?$", expand_words(name)),
            Pattern::Bracketed(name) => format!(r"^\[\s*{}\s*\]$", expand_words(name)),
            Pattern::Words(name) => format!("^{}$", expand_words(name)),
            Pattern::Regex(regex) => regex.to_string(),
        }
    }
}

/// Expand letters into `[xX]` classes; spaces between words become optional
/// whitespace and everything else is escaped.
pub fn expand_words(words: &str) -> String {
    let mut out = String::with_capacity(words.len() * 4);
    for c in words.chars() {
        if c == ' ' {
            out.push_str(r"\s*");
            continue;
        }
        let lower: String = c.to_lowercase().collect();
        let upper: String = c.to_uppercase().collect();
        if lower == upper {
            out.push_str(&regex::escape(&c.to_string()));
        } else {
            out.push('[');
            out.push_str(&regex::escape(&lower));
            out.push_str(&regex::escape(&upper));
            out.push(']');
        }
    }
    out
}

#[derive(Debug)]
pub struct Recognizer {
    pub entry: RecognizerEntry,
    regex: Regex,
}

impl Recognizer {
    pub fn token_type(&self) -> TokenType {
        self.entry.token_type
    }

    pub fn is_applicable_for(&self, version: RobotVersion) -> bool {
        self.entry.versions.contains(version)
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn is_deprecated_in(&self, version: RobotVersion) -> bool {
        self.entry
            .deprecated_since
            .is_some_and(|since| version >= since)
    }
}

static RECOGNIZERS: OnceLock<Vec<Recognizer>> = OnceLock::new();

fn all_recognizers() -> &'static [Recognizer] {
    RECOGNIZERS.get_or_init(|| {
        table::recognizer_table()
            .into_iter()
            .map(|entry| Recognizer {
                regex: Regex::new(&entry.pattern.to_regex()).expect("Invalid recognizer regex"),
                entry,
            })
            .collect()
    })
}

/// Recognizers applicable to one language version, in registration order.
#[derive(Debug, Clone)]
pub struct RecognizerSet {
    version: RobotVersion,
    recognizers: Vec<&'static Recognizer>,
}

impl RecognizerSet {
    pub fn for_version(version: RobotVersion) -> Self {
        let recognizers = all_recognizers()
            .iter()
            .filter(|r| r.is_applicable_for(version))
            .collect();
        Self {
            version,
            recognizers,
        }
    }

    pub fn version(&self) -> RobotVersion {
        self.version
    }

    /// Every recognizer that matches the trimmed `text`, in priority order.
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'static Recognizer> + 'a {
        let text = text.trim();
        self.recognizers
            .iter()
            .copied()
            .filter(move |r| r.matches(text))
    }

    /// Candidate types for `text`, without duplicates; empty when nothing
    /// matches.
    pub fn candidate_types(&self, text: &str) -> Vec<TokenType> {
        let mut types = Vec::new();
        for recognizer in self.matching(text) {
            if !types.contains(&recognizer.token_type()) {
                types.push(recognizer.token_type());
            }
        }
        types
    }

    /// One token per matching recognizer, each typed with that recognizer's
    /// type.
    pub fn recognize(&self, text: &str, position: FilePosition) -> Vec<RobotToken> {
        self.matching(text)
            .map(|recognizer| {
                let mut token = RobotToken::parsed(text, position);
                token.set_types(vec![recognizer.token_type()]);
                token
            })
            .collect()
    }

    /// Whether the form that produced `token_type` for `text` is deprecated.
    pub fn is_deprecated(&self, text: &str, token_type: TokenType) -> bool {
        self.matching(text)
            .any(|r| r.token_type() == token_type && r.is_deprecated_in(self.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HolderKind, LocalSettingKind, SettingKind, TableKind, VariableKind};
    use rstest::rstest;

    fn version(v: &str) -> RobotVersion {
        v.parse().unwrap()
    }

    fn types(v: &str, text: &str) -> Vec<TokenType> {
        RecognizerSet::for_version(version(v)).candidate_types(text)
    }

    #[test]
    fn expands_letters_into_bracket_classes() {
        assert_eq!(expand_words("Rob"), "[rR][oO][bB]");
        assert_eq!(expand_words("Test Setup"), r"[tT][eE][sS][tT]\s*[sS][eE][tT][uU][pP]");
        assert_eq!(expand_words("a.b"), r"[aA]\.[bB]");
    }

    #[rstest]
    #[case("2.9", false)]
    #[case("3.0", true)]
    #[case("3.0.2", true)]
    #[case("3.1", false)]
    fn keyword_postcondition_is_only_valid_in_3_0(#[case] v: &str, #[case] expected: bool) {
        let teardown =
            TokenType::LocalSettingDeclaration(HolderKind::Keyword, LocalSettingKind::Teardown);
        assert_eq!(types(v, "[Postcondition]").contains(&teardown), expected);
    }

    #[rstest]
    #[case("3.0", false)]
    #[case("3.1", true)]
    #[case("3.2", true)]
    fn task_setup_needs_3_1(#[case] v: &str, #[case] expected: bool) {
        let setup = TokenType::LocalSettingDeclaration(HolderKind::Task, LocalSettingKind::Setup);
        assert_eq!(types(v, "[Setup]").contains(&setup), expected);
    }

    #[test]
    fn test_case_aliases_sunset_at_3_1() {
        let setup =
            TokenType::LocalSettingDeclaration(HolderKind::TestCase, LocalSettingKind::Setup);
        assert!(types("3.0", "[Precondition]").contains(&setup));
        assert!(types("3.1", "[Precondition]").is_empty());
    }

    #[rstest]
    #[case("*** Settings ***", TableKind::Settings)]
    #[case("*Setting*", TableKind::Settings)]
    #[case("***test cases***", TableKind::TestCases)]
    #[case("*** Test Case", TableKind::TestCases)]
    #[case("*** User Keywords ***", TableKind::Keywords)]
    #[case("*** Tasks ***", TableKind::Tasks)]
    #[case("*** Comments ***", TableKind::Comments)]
    fn recognises_table_headers(#[case] text: &str, #[case] expected: TableKind) {
        let found = types("3.1", text);
        assert_eq!(found.first(), Some(&TokenType::TableHeader(expected)));
        assert_eq!(found.last(), Some(&TokenType::UserTableHeader));
    }

    #[test]
    fn unknown_headers_are_user_tables() {
        assert_eq!(types("3.1", "*** Notes ***"), vec![TokenType::UserTableHeader]);
    }

    #[test]
    fn bracketed_settings_are_ambiguous_between_holders() {
        let found = types("3.1", "[Documentation]");
        assert_eq!(
            found,
            vec![
                TokenType::LocalSettingDeclaration(
                    HolderKind::TestCase,
                    LocalSettingKind::Documentation
                ),
                TokenType::LocalSettingDeclaration(HolderKind::Task, LocalSettingKind::Documentation),
                TokenType::LocalSettingDeclaration(
                    HolderKind::Keyword,
                    LocalSettingKind::Documentation
                ),
            ]
        );
    }

    #[rstest]
    #[case("Suite Setup", SettingKind::SuiteSetup)]
    #[case("suite setup:", SettingKind::SuiteSetup)]
    #[case("SuiteSetup", SettingKind::SuiteSetup)]
    #[case("LIBRARY", SettingKind::Library)]
    #[case("Task Timeout", SettingKind::TestTimeout)]
    fn recognises_suite_settings(#[case] text: &str, #[case] expected: SettingKind) {
        assert_eq!(types("3.1", text), vec![TokenType::SettingDeclaration(expected)]);
    }

    #[rstest]
    #[case("${name}", VariableKind::Scalar)]
    #[case("${name} =", VariableKind::Scalar)]
    #[case("@{items}=", VariableKind::List)]
    #[case("&{map}", VariableKind::Dictionary)]
    #[case("%{HOME}", VariableKind::Unknown)]
    fn recognises_variable_declarations(#[case] text: &str, #[case] expected: VariableKind) {
        assert_eq!(types("3.1", text), vec![TokenType::VariableDeclaration(expected)]);
    }

    #[rstest]
    #[case("3.0", ":FOR", true)]
    #[case("3.0", ": for", true)]
    #[case("3.0", "FOR", false)]
    #[case("3.1", "FOR", true)]
    #[case("3.1", "For", false)]
    fn for_loop_syntax_depends_on_version(
        #[case] v: &str,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(types(v, text).contains(&TokenType::ForToken), expected);
    }

    #[test]
    fn matching_yields_recognizers_that_outlive_the_text() {
        let set = RecognizerSet::for_version(version("3.1"));
        let found: Vec<&'static Recognizer> = {
            let text = format!("  {}  ", "Library");
            set.matching(&text).collect()
        };
        assert_eq!(
            found.iter().map(|r| r.token_type()).collect::<Vec<_>>(),
            vec![TokenType::SettingDeclaration(SettingKind::Library)]
        );
    }

    #[test]
    fn recognize_returns_one_token_per_match() {
        let set = RecognizerSet::for_version(version("3.1"));
        let tokens = set.recognize("[Tags]", FilePosition::new(2, 4, 30));
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t.text() == "[Tags]"));
        assert!(set.recognize("Log", FilePosition::new(1, 0, 0)).is_empty());
    }

    #[test]
    fn deprecated_forms_are_flagged() {
        let set = RecognizerSet::for_version(version("3.0"));
        assert!(set.is_deprecated("*** Metadata ***", TokenType::TableHeader(TableKind::Settings)));
        assert!(!set.is_deprecated("*** Settings ***", TokenType::TableHeader(TableKind::Settings)));
    }
}
