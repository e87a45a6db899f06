//! The recognizer vocabulary as data: one row per `(type, pattern, versions)`.
//!
//! Row order is registration order. When two rows match the same text the
//! earlier one becomes the token's primary type.

use super::Pattern;
use crate::model::{HolderKind, LocalSettingKind, SettingKind, TableKind, VariableKind};
use crate::tokens::TokenType;
use crate::version::{RobotVersion, VersionRange};

const V3_0: RobotVersion = RobotVersion::minor(3, 0);
const V3_1: RobotVersion = RobotVersion::minor(3, 1);

#[derive(Debug, Clone)]
pub struct RecognizerEntry {
    pub token_type: TokenType,
    pub pattern: Pattern,
    pub versions: VersionRange,
    /// Still recognised, but reported as deprecated from this version on.
    pub deprecated_since: Option<RobotVersion>,
}

impl RecognizerEntry {
    fn new(token_type: TokenType, pattern: Pattern) -> Self {
        Self {
            token_type,
            pattern,
            versions: VersionRange::ANY,
            deprecated_since: None,
        }
    }

    fn versions(mut self, versions: VersionRange) -> Self {
        self.versions = versions;
        self
    }

    fn deprecated_since(mut self, version: RobotVersion) -> Self {
        self.deprecated_since = Some(version);
        self
    }
}

pub fn recognizer_table() -> Vec<RecognizerEntry> {
    let mut table = Vec::new();
    table_headers(&mut table);
    settings(&mut table);
    variables(&mut table);
    for holder in [HolderKind::TestCase, HolderKind::Task, HolderKind::Keyword] {
        local_settings(&mut table, holder);
    }
    executable_literals(&mut table);
    general(&mut table);
    table
}

fn table_headers(table: &mut Vec<RecognizerEntry>) {
    use TokenType::TableHeader;
    let header = |kind, name| RecognizerEntry::new(TableHeader(kind), Pattern::Header(name));

    table.push(header(TableKind::Settings, "Settings"));
    table.push(header(TableKind::Settings, "Setting"));
    table.push(header(TableKind::Settings, "Metadata").deprecated_since(V3_0));
    table.push(header(TableKind::Variables, "Variables"));
    table.push(header(TableKind::Variables, "Variable"));
    table.push(header(TableKind::TestCases, "Test Cases"));
    table.push(header(TableKind::TestCases, "Test Case"));
    table.push(header(TableKind::Tasks, "Tasks").versions(VersionRange::since(V3_1)));
    table.push(header(TableKind::Tasks, "Task").versions(VersionRange::since(V3_1)));
    table.push(header(TableKind::Keywords, "Keywords"));
    table.push(header(TableKind::Keywords, "Keyword"));
    table.push(header(TableKind::Keywords, "User Keywords"));
    table.push(header(TableKind::Keywords, "User Keyword").deprecated_since(V3_0));
    table.push(header(TableKind::Comments, "Comments"));
    table.push(header(TableKind::Comments, "Comment"));
    table.push(RecognizerEntry::new(
        TokenType::UserTableHeader,
        Pattern::Regex(r"^\*.*$"),
    ));
}

fn settings(table: &mut Vec<RecognizerEntry>) {
    use SettingKind::*;
    let setting = |kind, name| {
        RecognizerEntry::new(TokenType::SettingDeclaration(kind), Pattern::Setting(name))
    };
    let before_3_1 = VersionRange::before(V3_1);
    let since_3_1 = VersionRange::since(V3_1);

    table.push(setting(Library, "Library"));
    table.push(setting(Resource, "Resource"));
    table.push(setting(Variables, "Variables"));
    table.push(setting(Documentation, "Documentation"));
    table.push(
        setting(Documentation, "Document")
            .versions(before_3_1)
            .deprecated_since(V3_0),
    );
    table.push(setting(Metadata, "Metadata"));
    table.push(setting(SuiteSetup, "Suite Setup"));
    table.push(setting(SuiteSetup, "Suite Precondition").versions(before_3_1));
    table.push(setting(SuiteTeardown, "Suite Teardown"));
    table.push(setting(SuiteTeardown, "Suite Postcondition").versions(before_3_1));
    table.push(setting(ForceTags, "Force Tags"));
    table.push(setting(DefaultTags, "Default Tags"));
    table.push(setting(TestSetup, "Test Setup"));
    table.push(setting(TestSetup, "Test Precondition").versions(before_3_1));
    table.push(setting(TestSetup, "Task Setup").versions(since_3_1));
    table.push(setting(TestTeardown, "Test Teardown"));
    table.push(setting(TestTeardown, "Test Postcondition").versions(before_3_1));
    table.push(setting(TestTeardown, "Task Teardown").versions(since_3_1));
    table.push(setting(TestTemplate, "Test Template"));
    table.push(setting(TestTemplate, "Task Template").versions(since_3_1));
    table.push(setting(TestTimeout, "Test Timeout"));
    table.push(setting(TestTimeout, "Task Timeout").versions(since_3_1));
}

fn variables(table: &mut Vec<RecognizerEntry>) {
    let variable = |kind, pattern| {
        RecognizerEntry::new(TokenType::VariableDeclaration(kind), Pattern::Regex(pattern))
    };
    table.push(variable(VariableKind::Scalar, r"^\$\{.+\}(?: ?=)?$"));
    table.push(variable(VariableKind::List, r"^@\{.+\}(?: ?=)?$"));
    table.push(variable(VariableKind::Dictionary, r"^&\{.+\}(?: ?=)?$"));
    table.push(variable(VariableKind::Unknown, r"^%\{.+\}(?: ?=)?$"));
}

fn local_settings(table: &mut Vec<RecognizerEntry>, holder: HolderKind) {
    use LocalSettingKind::*;
    // Tasks only exist from 3.1 on.
    let base = match holder {
        HolderKind::Task => VersionRange::since(V3_1),
        _ => VersionRange::ANY,
    };
    let local = |kind, name| {
        RecognizerEntry::new(
            TokenType::LocalSettingDeclaration(holder, kind),
            Pattern::Bracketed(name),
        )
        .versions(base)
    };

    for (kind, name) in [
        (Documentation, "Documentation"),
        (Tags, "Tags"),
        (Setup, "Setup"),
        (Teardown, "Teardown"),
        (Template, "Template"),
        (Timeout, "Timeout"),
        (Arguments, "Arguments"),
        (Return, "Return"),
    ] {
        if kind.allowed_in(holder) {
            table.push(local(kind, name));
        }
    }

    let before_3_1 = VersionRange::before(V3_1);
    match holder {
        HolderKind::TestCase => {
            table.push(
                local(Documentation, "Document")
                    .versions(before_3_1)
                    .deprecated_since(V3_0),
            );
            table.push(
                local(Setup, "Precondition")
                    .versions(before_3_1)
                    .deprecated_since(V3_0),
            );
            table.push(
                local(Teardown, "Postcondition")
                    .versions(before_3_1)
                    .deprecated_since(V3_0),
            );
        }
        HolderKind::Keyword => {
            table.push(
                local(Documentation, "Document")
                    .versions(before_3_1)
                    .deprecated_since(V3_0),
            );
            table.push(
                local(Teardown, "Postcondition")
                    .versions(VersionRange::between(V3_0, V3_1))
                    .deprecated_since(V3_0),
            );
        }
        HolderKind::Task => {}
    }
}

fn executable_literals(table: &mut Vec<RecognizerEntry>) {
    let literal = |token_type, pattern| RecognizerEntry::new(token_type, Pattern::Regex(pattern));
    table.push(literal(TokenType::ForToken, r"^:\s*[fF][oO][rR]$"));
    table.push(
        literal(TokenType::ForToken, r"^FOR$").versions(VersionRange::since(V3_1)),
    );
    table.push(
        literal(TokenType::ForEndToken, r"^END$").versions(VersionRange::since(V3_1)),
    );
    table.push(literal(
        TokenType::InToken,
        r"^IN(?: RANGE| ENUMERATE| ZIP)?$",
    ));
    table.push(literal(TokenType::ForContinueToken, r"^\\$"));
    table.push(RecognizerEntry::new(
        TokenType::CommentKeyword,
        Pattern::Words("Comment"),
    ));
}

fn general(table: &mut Vec<RecognizerEntry>) {
    table.push(RecognizerEntry::new(
        TokenType::PreviousLineContinue,
        Pattern::Regex(r"^\.\.\.$"),
    ));
    table.push(RecognizerEntry::new(
        TokenType::StartHashComment,
        Pattern::Regex(r"^#"),
    ));
}
