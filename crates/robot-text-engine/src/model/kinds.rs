//! Kind enums shared by tokens, the parser and the model.
//!
//! Model nodes are not one type per grammar construct; a [`ModelElement`]
//! carries an [`ElementKind`] and everything kind-specific (which value roles
//! exist, how tokens sort when regenerated) is a `match` over these enums.
//!
//! [`ModelElement`]: super::ModelElement

use serde::Serialize;

/// Top-level section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TableKind {
    Settings,
    Variables,
    TestCases,
    Tasks,
    Keywords,
    /// `*** Comments ***`: content is kept as trivia and never mapped.
    Comments,
}

impl TableKind {
    /// Header text used when a table has to be created from scratch.
    pub fn default_header(self) -> &'static str {
        match self {
            TableKind::Settings => "*** Settings ***",
            TableKind::Variables => "*** Variables ***",
            TableKind::TestCases => "*** Test Cases ***",
            TableKind::Tasks => "*** Tasks ***",
            TableKind::Keywords => "*** Keywords ***",
            TableKind::Comments => "*** Comments ***",
        }
    }

    pub fn holder(self) -> Option<HolderKind> {
        match self {
            TableKind::TestCases => Some(HolderKind::TestCase),
            TableKind::Tasks => Some(HolderKind::Task),
            TableKind::Keywords => Some(HolderKind::Keyword),
            _ => None,
        }
    }
}

/// Named blocks with a body of settings and executable rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HolderKind {
    TestCase,
    Task,
    Keyword,
}

impl HolderKind {
    pub fn table(self) -> TableKind {
        match self {
            HolderKind::TestCase => TableKind::TestCases,
            HolderKind::Task => TableKind::Tasks,
            HolderKind::Keyword => TableKind::Keywords,
        }
    }
}

/// Suite-level settings in the Settings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SettingKind {
    Library,
    Resource,
    Variables,
    Documentation,
    Metadata,
    SuiteSetup,
    SuiteTeardown,
    ForceTags,
    DefaultTags,
    TestSetup,
    TestTeardown,
    TestTemplate,
    TestTimeout,
    Unknown,
}

impl SettingKind {
    /// Canonical spelling used when a setting is created by an edit.
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            SettingKind::Library => "Library",
            SettingKind::Resource => "Resource",
            SettingKind::Variables => "Variables",
            SettingKind::Documentation => "Documentation",
            SettingKind::Metadata => "Metadata",
            SettingKind::SuiteSetup => "Suite Setup",
            SettingKind::SuiteTeardown => "Suite Teardown",
            SettingKind::ForceTags => "Force Tags",
            SettingKind::DefaultTags => "Default Tags",
            SettingKind::TestSetup => "Test Setup",
            SettingKind::TestTeardown => "Test Teardown",
            SettingKind::TestTemplate => "Test Template",
            SettingKind::TestTimeout => "Test Timeout",
            SettingKind::Unknown => return None,
        })
    }
}

/// Declarations in the Variables table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariableKind {
    Scalar,
    List,
    Dictionary,
    /// Environment variables, malformed names and anything else that is not
    /// a declarable variable.
    Unknown,
}

/// Bracketed settings inside test case, task and keyword bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LocalSettingKind {
    Documentation,
    Tags,
    Setup,
    Teardown,
    Template,
    Timeout,
    Arguments,
    Return,
    Unknown,
}

impl LocalSettingKind {
    /// Whether the setting is legal in a body of the given holder kind.
    pub fn allowed_in(self, holder: HolderKind) -> bool {
        match self {
            LocalSettingKind::Setup | LocalSettingKind::Template => holder != HolderKind::Keyword,
            LocalSettingKind::Arguments | LocalSettingKind::Return => holder == HolderKind::Keyword,
            _ => true,
        }
    }
}

impl LocalSettingKind {
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            LocalSettingKind::Documentation => "[Documentation]",
            LocalSettingKind::Tags => "[Tags]",
            LocalSettingKind::Setup => "[Setup]",
            LocalSettingKind::Teardown => "[Teardown]",
            LocalSettingKind::Template => "[Template]",
            LocalSettingKind::Timeout => "[Timeout]",
            LocalSettingKind::Arguments => "[Arguments]",
            LocalSettingKind::Return => "[Return]",
            LocalSettingKind::Unknown => return None,
        })
    }
}

/// What a value token means within its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueRole {
    Name,
    Path,
    KeywordName,
    Argument,
    UnwantedArgument,
    AliasMarker,
    AliasValue,
    Text,
    Key,
    Value,
    Message,
    Tag,
}

/// Shape of the value list that follows a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueGrammar {
    /// Library name, arguments, optional `WITH NAME` alias.
    Library,
    /// One path then arguments that are not allowed.
    Resource,
    /// One path then arguments.
    VariablesImport,
    /// Keyword name then its arguments.
    KeywordCall,
    /// Keyword name then nothing allowed.
    Template,
    /// Timeout value then failure message cells.
    Timeout,
    Metadata,
    Tags,
    Text,
    /// Every cell is an argument.
    Arguments,
    /// Every cell is a value.
    Values,
}

impl ValueGrammar {
    /// Role of the next value given the role of the previous one.
    pub fn next_role(self, previous: Option<ValueRole>, text: &str) -> ValueRole {
        match self {
            ValueGrammar::Library => match previous {
                None => ValueRole::Name,
                Some(ValueRole::AliasMarker) => ValueRole::AliasValue,
                Some(ValueRole::AliasValue | ValueRole::UnwantedArgument) => {
                    ValueRole::UnwantedArgument
                }
                Some(_) if is_library_alias_marker(text) => ValueRole::AliasMarker,
                Some(_) => ValueRole::Argument,
            },
            ValueGrammar::Resource => match previous {
                None => ValueRole::Path,
                Some(_) => ValueRole::UnwantedArgument,
            },
            ValueGrammar::VariablesImport => match previous {
                None => ValueRole::Path,
                Some(_) => ValueRole::Argument,
            },
            ValueGrammar::KeywordCall => match previous {
                None => ValueRole::KeywordName,
                Some(_) => ValueRole::Argument,
            },
            ValueGrammar::Template => match previous {
                None => ValueRole::KeywordName,
                Some(_) => ValueRole::UnwantedArgument,
            },
            ValueGrammar::Timeout => match previous {
                None => ValueRole::Value,
                Some(_) => ValueRole::Message,
            },
            ValueGrammar::Metadata => match previous {
                None => ValueRole::Key,
                Some(_) => ValueRole::Value,
            },
            ValueGrammar::Tags => ValueRole::Tag,
            ValueGrammar::Text => ValueRole::Text,
            ValueGrammar::Arguments => ValueRole::Argument,
            ValueGrammar::Values => ValueRole::Value,
        }
    }

    /// Replays the grammar over a whole value list.
    pub fn roles<'a>(self, texts: impl IntoIterator<Item = &'a str>) -> Vec<ValueRole> {
        let mut previous = None;
        texts
            .into_iter()
            .map(|text| {
                let role = self.next_role(previous, text);
                previous = Some(role);
                role
            })
            .collect()
    }
}

fn is_library_alias_marker(text: &str) -> bool {
    text == "WITH NAME"
}

/// Kind tag of a [`ModelElement`](super::ModelElement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Setting(SettingKind),
    Variable(VariableKind),
    LocalSetting(HolderKind, LocalSettingKind),
    ExecutableRow(HolderKind),
}

impl ElementKind {
    pub fn grammar(self) -> ValueGrammar {
        match self {
            ElementKind::Setting(kind) => match kind {
                SettingKind::Library => ValueGrammar::Library,
                SettingKind::Resource => ValueGrammar::Resource,
                SettingKind::Variables => ValueGrammar::VariablesImport,
                SettingKind::Documentation => ValueGrammar::Text,
                SettingKind::Metadata => ValueGrammar::Metadata,
                SettingKind::SuiteSetup
                | SettingKind::SuiteTeardown
                | SettingKind::TestSetup
                | SettingKind::TestTeardown => ValueGrammar::KeywordCall,
                SettingKind::ForceTags | SettingKind::DefaultTags => ValueGrammar::Tags,
                SettingKind::TestTemplate => ValueGrammar::Template,
                SettingKind::TestTimeout => ValueGrammar::Timeout,
                SettingKind::Unknown => ValueGrammar::Arguments,
            },
            ElementKind::Variable(_) => ValueGrammar::Values,
            ElementKind::LocalSetting(_, kind) => match kind {
                LocalSettingKind::Documentation => ValueGrammar::Text,
                LocalSettingKind::Tags => ValueGrammar::Tags,
                LocalSettingKind::Setup | LocalSettingKind::Teardown => ValueGrammar::KeywordCall,
                LocalSettingKind::Template => ValueGrammar::Template,
                LocalSettingKind::Timeout => ValueGrammar::Timeout,
                LocalSettingKind::Arguments | LocalSettingKind::Unknown => {
                    ValueGrammar::Arguments
                }
                LocalSettingKind::Return => ValueGrammar::Values,
            },
            ElementKind::ExecutableRow(_) => ValueGrammar::Arguments,
        }
    }

    /// Table an element of this kind lives in.
    pub fn table(self) -> TableKind {
        match self {
            ElementKind::Setting(_) => TableKind::Settings,
            ElementKind::Variable(_) => TableKind::Variables,
            ElementKind::LocalSetting(holder, _) | ElementKind::ExecutableRow(holder) => {
                holder.table()
            }
        }
    }

    pub fn holder(self) -> Option<HolderKind> {
        match self {
            ElementKind::LocalSetting(holder, _) | ElementKind::ExecutableRow(holder) => {
                Some(holder)
            }
            _ => None,
        }
    }

    /// Declaration text implied by the kind; `None` when the declaration is
    /// free text (variables, rows and unknown settings).
    pub fn canonical_declaration(self) -> Option<&'static str> {
        match self {
            ElementKind::Setting(kind) => kind.name(),
            ElementKind::LocalSetting(_, kind) => kind.name(),
            ElementKind::Variable(_) | ElementKind::ExecutableRow(_) => None,
        }
    }

    /// Body elements are written with an empty first cell.
    pub fn is_indented(self) -> bool {
        self.holder().is_some()
    }
}
