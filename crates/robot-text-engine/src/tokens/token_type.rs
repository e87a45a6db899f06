use crate::model::{
    ElementKind, HolderKind, LocalSettingKind, SettingKind, TableKind, ValueRole, VariableKind,
};
use serde::Serialize;

/// Lexical and syntactic categories a token can carry.
///
/// Recognizers assign the declaration-like variants; mappers assign the
/// value variants once the token has been attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    Unknown,

    TableHeader(TableKind),
    /// `*** Anything Else ***`
    UserTableHeader,
    TableHeaderColumn,

    /// `#` and the cells after it on the same line.
    StartHashComment,
    CommentContinue,
    /// `...`
    PreviousLineContinue,

    SettingDeclaration(SettingKind),
    SettingValue(SettingKind, ValueRole),

    VariableDeclaration(VariableKind),
    VariableValue,

    HolderName(HolderKind),
    LocalSettingDeclaration(HolderKind, LocalSettingKind),
    LocalSettingValue(HolderKind, LocalSettingKind, ValueRole),

    ActionName(HolderKind),
    ActionArgument(HolderKind),
    TemplateArgument(HolderKind),
    /// A row's leading `${x}` / `${x}=` target.
    Assignment,
    VariableUsage,

    ForToken,
    ForEndToken,
    InToken,
    /// Old-style `\` loop body marker.
    ForContinueToken,
    /// The BuiltIn `Comment` keyword used as a row action.
    CommentKeyword,
}

impl TokenType {
    /// Table this type is specific to, `None` when it may appear anywhere.
    pub fn table(self) -> Option<TableKind> {
        match self {
            TokenType::SettingDeclaration(_) | TokenType::SettingValue(..) => {
                Some(TableKind::Settings)
            }
            TokenType::VariableDeclaration(_) | TokenType::VariableValue => {
                Some(TableKind::Variables)
            }
            TokenType::HolderName(holder)
            | TokenType::LocalSettingDeclaration(holder, _)
            | TokenType::LocalSettingValue(holder, ..)
            | TokenType::ActionName(holder)
            | TokenType::ActionArgument(holder)
            | TokenType::TemplateArgument(holder) => Some(holder.table()),
            _ => None,
        }
    }

    pub fn is_table_header(self) -> bool {
        matches!(self, TokenType::TableHeader(_) | TokenType::UserTableHeader)
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenType::StartHashComment | TokenType::CommentContinue)
    }

    /// Literals only meaningful as cells of an executable row.
    pub fn is_executable_literal(self) -> bool {
        matches!(
            self,
            TokenType::ForToken
                | TokenType::ForEndToken
                | TokenType::InToken
                | TokenType::ForContinueToken
                | TokenType::CommentKeyword
        )
    }

    /// Type a mapper gives a value token of `kind` in `role`.
    pub fn for_value(kind: ElementKind, role: ValueRole) -> TokenType {
        match kind {
            ElementKind::Setting(setting) => TokenType::SettingValue(setting, role),
            ElementKind::Variable(_) => TokenType::VariableValue,
            ElementKind::LocalSetting(holder, setting) => {
                TokenType::LocalSettingValue(holder, setting, role)
            }
            ElementKind::ExecutableRow(holder) => TokenType::ActionArgument(holder),
        }
    }

    /// Type of the declaration token of a new element of `kind`.
    pub fn for_declaration(kind: ElementKind) -> TokenType {
        match kind {
            ElementKind::Setting(setting) => TokenType::SettingDeclaration(setting),
            ElementKind::Variable(variable) => TokenType::VariableDeclaration(variable),
            ElementKind::LocalSetting(holder, setting) => {
                TokenType::LocalSettingDeclaration(holder, setting)
            }
            ElementKind::ExecutableRow(holder) => TokenType::ActionName(holder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_setting_types_belong_to_their_holder_table() {
        let ty = TokenType::LocalSettingDeclaration(HolderKind::Task, LocalSettingKind::Setup);
        assert_eq!(ty.table(), Some(TableKind::Tasks));
        assert_eq!(TokenType::ForToken.table(), None);
        assert!(TokenType::ForToken.is_executable_literal());
    }

    #[test]
    fn value_types_follow_element_kind() {
        let kind = ElementKind::Setting(SettingKind::Library);
        assert_eq!(
            TokenType::for_value(kind, ValueRole::AliasValue),
            TokenType::SettingValue(SettingKind::Library, ValueRole::AliasValue)
        );
        assert_eq!(
            TokenType::for_value(ElementKind::Variable(VariableKind::List), ValueRole::Value),
            TokenType::VariableValue
        );
    }
}
