//! Position queries used by editors to map carets to model nodes and nodes
//! back to source ranges.

use super::{ElementId, ExecutableHolder, ModelElement, RobotFile, Section};
use crate::tokens::{FilePosition, TokenId};

/// The model node a token belongs to.
#[derive(Debug, Clone, Copy)]
pub enum ModelNode<'a> {
    Section(&'a Section),
    Holder(&'a ExecutableHolder),
    Element(&'a ModelElement),
}

impl RobotFile {
    /// Token whose raw text covers `column` on `line` (1-based line).
    pub fn token_at(&self, line: usize, column: usize) -> Option<TokenId> {
        let robot_line = self.lines.get(line.checked_sub(1)?)?;
        robot_line.tokens().find(|&id| {
            self.token(id)
                .column_span()
                .is_some_and(|(start, end)| (start..end.max(start + 1)).contains(&column))
        })
    }

    /// Node owning the token at `line`/`column`.
    pub fn element_at(&self, line: usize, column: usize) -> Option<ModelNode<'_>> {
        self.node_of(self.token_at(line, column)?)
    }

    pub fn node_of(&self, token: TokenId) -> Option<ModelNode<'_>> {
        if let Some(element) = self.elements().find(|e| e.contains(token)) {
            return Some(ModelNode::Element(element));
        }
        if let Some(holder) = self
            .holders()
            .find(|h| h.name() == token || h.comments().contains(&token))
        {
            return Some(ModelNode::Holder(holder));
        }
        self.sections
            .iter()
            .find(|s| s.header() == token || s.columns().contains(&token) || s.comments().contains(&token))
            .map(ModelNode::Section)
    }

    /// Start of the first and end of the last positioned token of an element
    /// or holder. Tokens created by edits have no position and are skipped.
    pub fn range_of(&self, id: ElementId) -> Option<(FilePosition, FilePosition)> {
        let tokens = match self.element(id) {
            Some(element) => element.element_tokens(),
            None => {
                let holder = self.holder(id)?;
                std::iter::once(holder.name())
                    .chain(holder.elements().iter().flat_map(ModelElement::element_tokens))
                    .collect()
            }
        };
        let positioned = tokens.into_iter().filter_map(|id| {
            let token = self.token(id);
            token.position().map(|p| (p, p.advanced_by(token.raw_text().len())))
        });
        positioned.fold(None, |range, (start, end)| match range {
            None => Some((start, end)),
            Some((first, last)) => Some((first.min(start), last.max(end))),
        })
    }
}
