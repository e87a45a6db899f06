use super::variables::{is_assignment_target, references};
use crate::model::{ElementKind, ModelElement, RobotFile};
use crate::tokens::{TokenId, TokenType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    /// Assignments, an action and its arguments.
    Simple,
    /// `FOR` / `:FOR` loop header.
    ForLoop,
    /// Old-style loop body row starting with `\`.
    ForContinuation,
    /// `END` of a new-style loop.
    ForEnd,
    /// Action is the BuiltIn `Comment` keyword.
    CommentKeyword,
    /// No cells at all, e.g. a comment-only row.
    Empty,
}

/// A variable referenced by a row cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsedVariable {
    pub token: TokenId,
    /// The whole reference, e.g. `${user}[name]`.
    pub text: String,
}

/// What an executable row does: which variables it creates, which action it
/// runs with which arguments and which variables those use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDescriptor {
    pub kind: RowKind,
    pub created_variables: Vec<TokenId>,
    pub action: Option<TokenId>,
    pub arguments: Vec<TokenId>,
    pub used_variables: Vec<UsedVariable>,
}

impl RowDescriptor {
    /// Describe `element`; `None` when it is not an executable row.
    pub fn describe(file: &RobotFile, element: &ModelElement) -> Option<Self> {
        if !matches!(element.kind(), ElementKind::ExecutableRow(_)) {
            return None;
        }
        let cells: Vec<TokenId> = element
            .declaration()
            .into_iter()
            .chain(element.values().iter().copied())
            .collect();

        let mut descriptor = RowDescriptor {
            kind: if cells.is_empty() {
                RowKind::Empty
            } else {
                RowKind::Simple
            },
            created_variables: Vec::new(),
            action: None,
            arguments: Vec::new(),
            used_variables: Vec::new(),
        };

        let mut after_first_action = false;
        let mut seen_in = false;
        for (index, id) in cells.into_iter().enumerate() {
            let token = file.token(id);
            let text = token.text();
            if !after_first_action {
                if index == 0 && token.has_type(TokenType::ForContinueToken) {
                    descriptor.kind = RowKind::ForContinuation;
                    continue;
                }
                if is_assignment_target(text) {
                    descriptor.created_variables.push(id);
                    continue;
                }
                after_first_action = true;
                descriptor.action = Some(id);
                if token.has_type(TokenType::ForToken) {
                    descriptor.kind = RowKind::ForLoop;
                } else if token.has_type(TokenType::ForEndToken) {
                    descriptor.kind = RowKind::ForEnd;
                } else if token.has_type(TokenType::CommentKeyword) {
                    descriptor.kind = RowKind::CommentKeyword;
                } else {
                    descriptor.collect_usages(id, text);
                }
                continue;
            }

            if descriptor.kind == RowKind::ForLoop && !seen_in {
                if token.has_type(TokenType::InToken) {
                    seen_in = true;
                    continue;
                }
                if is_assignment_target(text) {
                    descriptor.created_variables.push(id);
                    continue;
                }
            }
            descriptor.arguments.push(id);
            if descriptor.kind != RowKind::CommentKeyword {
                descriptor.collect_usages(id, text);
            }
        }
        Some(descriptor)
    }

    fn collect_usages(&mut self, token: TokenId, text: &str) {
        self.used_variables
            .extend(references(text).into_iter().map(|reference| UsedVariable {
                token,
                text: text[reference.start..reference.end].to_string(),
            }));
    }
}
