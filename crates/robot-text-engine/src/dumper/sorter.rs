//! Token order for rebuilt rows.
//!
//! The declaration always leads. Values are ordered by role so that, for
//! example, a library alias never ends up in front of the library
//! arguments. Comments trail the row, which also keeps an old-style `\` loop
//! marker in front of the cells it prefixes.

use crate::model::{ModelElement, RobotFile, SettingKind, ValueRole};
use crate::tokens::{TokenId, TokenType};

const DECLARATION: u8 = 0;
const VALUE: u8 = 1;

fn value_key(token_type: TokenType) -> u8 {
    match token_type {
        TokenType::SettingValue(SettingKind::Metadata, ValueRole::Value) => 2,
        TokenType::SettingValue(_, role) | TokenType::LocalSettingValue(_, _, role) => match role {
            ValueRole::Name | ValueRole::Key => 1,
            ValueRole::Argument | ValueRole::Message => 2,
            ValueRole::AliasMarker => 3,
            ValueRole::AliasValue => 4,
            ValueRole::UnwantedArgument => 5,
            _ => VALUE,
        },
        _ => VALUE,
    }
}

/// Declaration and values in write order, and the comments that close the
/// last row.
pub(crate) fn ordered_cells(file: &RobotFile, element: &ModelElement) -> (Vec<TokenId>, Vec<TokenId>) {
    let mut cells: Vec<(u8, TokenId)> = element
        .declaration()
        .map(|id| (DECLARATION, id))
        .into_iter()
        .chain(
            element
                .values()
                .iter()
                .map(|id| (value_key(file.token(*id).primary_type()), *id)),
        )
        .collect();
    cells.sort_by_key(|(key, _)| *key);
    (
        cells.into_iter().map(|(_, id)| id).collect(),
        element.comments().to_vec(),
    )
}
