//! Cell typing for executable rows.
//!
//! Cells are walked left to right. Until the row's action has been seen,
//! a cell holding exactly one variable (optionally followed by `=`) is an
//! assignment target; the first cell that is not flips the row into its
//! argument phase and becomes the action. From then on variables are usages.

use super::state::RowPhase;
use super::variables::{contains_variable, is_assignment_target};
use crate::model::HolderKind;
use crate::tokens::TokenType;

#[derive(Debug, Clone, Copy)]
pub(crate) struct RowTyper {
    holder: HolderKind,
    phase: RowPhase,
    first: bool,
    for_row: bool,
    seen_in: bool,
    comment_row: bool,
}

impl RowTyper {
    pub(crate) fn new(holder: HolderKind) -> Self {
        Self {
            holder,
            phase: RowPhase::Assignments,
            first: true,
            for_row: false,
            seen_in: false,
            comment_row: false,
        }
    }

    /// Typer positioned after the already typed cells of a row.
    pub(crate) fn replay<'a>(
        holder: HolderKind,
        typed: impl IntoIterator<Item = &'a [TokenType]>,
    ) -> Self {
        let mut typer = Self::new(holder);
        for types in typed {
            typer.first = false;
            for token_type in types {
                match token_type {
                    TokenType::ForToken => {
                        typer.for_row = true;
                        typer.phase = RowPhase::Arguments;
                    }
                    TokenType::InToken => typer.seen_in = true,
                    TokenType::CommentKeyword => typer.comment_row = true,
                    TokenType::ActionName(_) | TokenType::ForEndToken => {
                        typer.phase = RowPhase::Arguments;
                    }
                    _ => {}
                }
            }
        }
        typer
    }

    pub(crate) fn phase(&self) -> RowPhase {
        self.phase
    }

    /// Types for the next cell; `candidates` are the recognizer matches.
    pub(crate) fn next(&mut self, text: &str, candidates: &[TokenType]) -> Vec<TokenType> {
        let first = std::mem::replace(&mut self.first, false);
        let types = match self.phase {
            RowPhase::Assignments => self.before_action(first, text, candidates),
            RowPhase::Arguments => self.after_action(text, candidates),
        };
        log::trace!("row cell {text:?} typed as {types:?}");
        types
    }

    fn before_action(&mut self, first: bool, text: &str, candidates: &[TokenType]) -> Vec<TokenType> {
        if first && candidates.contains(&TokenType::ForContinueToken) {
            return vec![TokenType::ForContinueToken];
        }
        if is_assignment_target(text) {
            return vec![TokenType::Assignment];
        }
        self.phase = RowPhase::Arguments;
        if candidates.contains(&TokenType::ForToken) {
            self.for_row = true;
            return vec![TokenType::ForToken];
        }
        if candidates.contains(&TokenType::ForEndToken) {
            return vec![TokenType::ForEndToken];
        }
        if candidates.contains(&TokenType::CommentKeyword) {
            self.comment_row = true;
            return vec![TokenType::ActionName(self.holder), TokenType::CommentKeyword];
        }
        let mut types = vec![TokenType::ActionName(self.holder)];
        if contains_variable(text) {
            types.push(TokenType::VariableUsage);
        }
        types
    }

    fn after_action(&mut self, text: &str, candidates: &[TokenType]) -> Vec<TokenType> {
        if self.for_row && !self.seen_in {
            if candidates.contains(&TokenType::InToken) {
                self.seen_in = true;
                return vec![TokenType::InToken];
            }
            if is_assignment_target(text) {
                return vec![TokenType::Assignment];
            }
        }
        let mut types = vec![TokenType::ActionArgument(self.holder)];
        if !self.comment_row && contains_variable(text) {
            types.push(TokenType::VariableUsage);
        }
        types
    }
}
