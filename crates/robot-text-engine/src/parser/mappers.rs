//! Mappers: `(can_map, map)` pairs consulted in order for every cell that is
//! not a header, a comment or part of a trash table. The first mapper whose
//! predicate holds attaches the token to the model and pushes its state.

use super::builder::{ModelBuilder, PendingCell};
use super::diagnostics::{DiagnosticKind, Severity};
use super::row::RowTyper;
use super::state::ParsingState;
use super::variables::contains_variable;
use crate::model::{ElementKind, HolderKind, LocalSettingKind, SettingKind, TableKind, VariableKind};
use crate::tokens::TokenType;

/// Everything a mapper may look at to decide applicability.
pub(crate) struct MappingInput<'a> {
    pub state: ParsingState,
    pub cell: &'a PendingCell,
    /// An element is already open on this line.
    pub has_open: bool,
    /// A holder exists in the current table.
    pub has_holder: bool,
}

pub(crate) struct Mapper {
    pub name: &'static str,
    pub can_map: fn(&MappingInput<'_>) -> bool,
    pub map: fn(&mut ModelBuilder, &MappingInput<'_>),
}

pub(crate) const MAPPERS: &[Mapper] = &[
    Mapper {
        name: "setting_declaration",
        can_map: can_map_setting_declaration,
        map: map_setting_declaration,
    },
    Mapper {
        name: "setting_unknown",
        can_map: can_map_setting_unknown,
        map: map_setting_unknown,
    },
    Mapper {
        name: "setting_value",
        can_map: can_map_setting_value,
        map: map_setting_value,
    },
    Mapper {
        name: "variable_declaration",
        can_map: can_map_variable_declaration,
        map: map_variable_declaration,
    },
    Mapper {
        name: "variable_value",
        can_map: can_map_variable_value,
        map: map_variable_value,
    },
    Mapper {
        name: "holder_name",
        can_map: can_map_holder_name,
        map: map_holder_name,
    },
    Mapper {
        name: "local_setting_declaration",
        can_map: can_map_local_setting_declaration,
        map: map_local_setting_declaration,
    },
    Mapper {
        name: "local_setting_unknown",
        can_map: can_map_local_setting_unknown,
        map: map_local_setting_unknown,
    },
    Mapper {
        name: "local_setting_value",
        can_map: can_map_local_setting_value,
        map: map_local_setting_value,
    },
    Mapper {
        name: "executable_row_action",
        can_map: can_map_executable_row_action,
        map: map_executable_row_action,
    },
    Mapper {
        name: "executable_row_argument",
        can_map: can_map_executable_row_argument,
        map: map_executable_row_argument,
    },
];

/// Run the first applicable mapper. Returns false when none applies.
pub(crate) fn map_token(builder: &mut ModelBuilder, input: &MappingInput<'_>) -> bool {
    match MAPPERS.iter().find(|mapper| (mapper.can_map)(input)) {
        Some(mapper) => {
            log::trace!("{:?} mapped by {}", input.cell.text, mapper.name);
            (mapper.map)(builder, input);
            true
        }
        None => false,
    }
}

fn usage_extras(text: &str) -> &'static [TokenType] {
    if contains_variable(text) {
        &[TokenType::VariableUsage]
    } else {
        &[]
    }
}

fn setting_candidate(cell: &PendingCell) -> Option<SettingKind> {
    cell.candidates.iter().find_map(|t| match t {
        TokenType::SettingDeclaration(kind) => Some(*kind),
        _ => None,
    })
}

fn local_setting_candidate(cell: &PendingCell, holder: HolderKind) -> Option<LocalSettingKind> {
    cell.candidates.iter().find_map(|t| match t {
        TokenType::LocalSettingDeclaration(h, kind) if *h == holder => Some(*kind),
        _ => None,
    })
}

fn is_bracketed(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('[') && text.ends_with(']')
}

fn structural_inconsistency(builder: &mut ModelBuilder, input: &MappingInput<'_>, what: &str) {
    builder.set_types(input.cell.id, Vec::new());
    builder.report(
        Severity::Error,
        DiagnosticKind::StructuralInconsistency,
        format!("{what} '{}' has no declaration to attach to", input.cell.text),
        input.cell.position,
    );
}

// Settings table

fn can_map_setting_declaration(input: &MappingInput<'_>) -> bool {
    input.state == ParsingState::TableInside(TableKind::Settings)
        && setting_candidate(input.cell).is_some()
}

fn map_setting_declaration(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let kind = setting_candidate(input.cell).unwrap_or(SettingKind::Unknown);
    let token_type = TokenType::SettingDeclaration(kind);
    builder.classify(input.cell.id, token_type, &[]);
    builder.check_deprecated(input.cell, token_type);
    builder.start_element(ElementKind::Setting(kind), Some(input.cell.id));
    builder.stack.push(ParsingState::Setting(kind, None));
}

fn can_map_setting_unknown(input: &MappingInput<'_>) -> bool {
    input.state == ParsingState::TableInside(TableKind::Settings)
}

fn map_setting_unknown(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    builder.classify(
        input.cell.id,
        TokenType::SettingDeclaration(SettingKind::Unknown),
        &[],
    );
    builder.report(
        Severity::Warning,
        DiagnosticKind::UnknownSetting,
        format!("unknown setting '{}'", input.cell.text),
        input.cell.position,
    );
    builder.start_element(
        ElementKind::Setting(SettingKind::Unknown),
        Some(input.cell.id),
    );
    builder.stack.push(ParsingState::Setting(SettingKind::Unknown, None));
}

fn can_map_setting_value(input: &MappingInput<'_>) -> bool {
    matches!(input.state, ParsingState::Setting(..))
}

fn map_setting_value(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let ParsingState::Setting(kind, previous) = input.state else {
        return;
    };
    let element_kind = ElementKind::Setting(kind);
    let Some(path) = builder.open_element(element_kind) else {
        structural_inconsistency(builder, input, "setting value");
        return;
    };
    let role = element_kind.grammar().next_role(previous, &input.cell.text);
    builder.classify(
        input.cell.id,
        TokenType::SettingValue(kind, role),
        usage_extras(&input.cell.text),
    );
    builder.attach_value(path, input.cell.id);
    builder.stack.push(input.state.after_value(role));
}

// Variables table

fn can_map_variable_declaration(input: &MappingInput<'_>) -> bool {
    input.state == ParsingState::TableInside(TableKind::Variables)
}

fn map_variable_declaration(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let kind = input
        .cell
        .candidates
        .iter()
        .find_map(|t| match t {
            TokenType::VariableDeclaration(kind) => Some(*kind),
            _ => None,
        })
        .unwrap_or(VariableKind::Unknown);
    if kind == VariableKind::Unknown {
        log::debug!("wrongly defined variable '{}'", input.cell.text);
    }
    builder.classify(input.cell.id, TokenType::VariableDeclaration(kind), &[]);
    builder.start_element(ElementKind::Variable(kind), Some(input.cell.id));
    builder.stack.push(ParsingState::Variable(kind));
}

fn can_map_variable_value(input: &MappingInput<'_>) -> bool {
    matches!(input.state, ParsingState::Variable(_))
}

fn map_variable_value(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let ParsingState::Variable(kind) = input.state else {
        return;
    };
    let Some(path) = builder.open_element(ElementKind::Variable(kind)) else {
        structural_inconsistency(builder, input, "variable value");
        return;
    };
    builder.classify(
        input.cell.id,
        TokenType::VariableValue,
        usage_extras(&input.cell.text),
    );
    builder.attach_value(path, input.cell.id);
}

// Test case, task and keyword tables

fn holder_table(state: ParsingState) -> Option<HolderKind> {
    match state {
        ParsingState::TableInside(table) => table.holder(),
        ParsingState::Holder(kind) => Some(kind),
        _ => None,
    }
}

fn can_map_holder_name(input: &MappingInput<'_>) -> bool {
    input.cell.cell == 0 && !input.has_open && holder_table(input.state).is_some()
}

fn map_holder_name(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let Some(kind) = holder_table(input.state) else {
        return;
    };
    if builder.start_holder(input.cell.id) {
        builder.classify(input.cell.id, TokenType::HolderName(kind), &[]);
    }
}

fn body_holder(input: &MappingInput<'_>) -> Option<HolderKind> {
    match input.state {
        ParsingState::Holder(kind) if !input.has_open && input.has_holder => Some(kind),
        _ => None,
    }
}

fn can_map_local_setting_declaration(input: &MappingInput<'_>) -> bool {
    body_holder(input).is_some_and(|holder| local_setting_candidate(input.cell, holder).is_some())
}

fn map_local_setting_declaration(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let Some(holder) = body_holder(input) else {
        return;
    };
    let kind = local_setting_candidate(input.cell, holder).unwrap_or(LocalSettingKind::Unknown);
    start_local_setting(builder, input, holder, kind);
}

fn can_map_local_setting_unknown(input: &MappingInput<'_>) -> bool {
    body_holder(input).is_some() && is_bracketed(&input.cell.text)
}

fn map_local_setting_unknown(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let Some(holder) = body_holder(input) else {
        return;
    };
    builder.report(
        Severity::Warning,
        DiagnosticKind::UnknownSetting,
        format!("unknown setting '{}'", input.cell.text),
        input.cell.position,
    );
    start_local_setting(builder, input, holder, LocalSettingKind::Unknown);
}

fn start_local_setting(
    builder: &mut ModelBuilder,
    input: &MappingInput<'_>,
    holder: HolderKind,
    kind: LocalSettingKind,
) {
    let token_type = TokenType::LocalSettingDeclaration(holder, kind);
    builder.classify(input.cell.id, token_type, &[]);
    builder.check_deprecated(input.cell, token_type);
    builder.start_element(ElementKind::LocalSetting(holder, kind), Some(input.cell.id));
    builder
        .stack
        .push(ParsingState::LocalSetting(holder, kind, None));
}

fn can_map_local_setting_value(input: &MappingInput<'_>) -> bool {
    matches!(input.state, ParsingState::LocalSetting(..))
}

fn map_local_setting_value(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let ParsingState::LocalSetting(holder, kind, previous) = input.state else {
        return;
    };
    let element_kind = ElementKind::LocalSetting(holder, kind);
    let Some(path) = builder.open_element(element_kind) else {
        structural_inconsistency(builder, input, "setting value");
        return;
    };
    let role = element_kind.grammar().next_role(previous, &input.cell.text);
    builder.classify(
        input.cell.id,
        TokenType::LocalSettingValue(holder, kind, role),
        usage_extras(&input.cell.text),
    );
    builder.attach_value(path, input.cell.id);
    builder.stack.push(input.state.after_value(role));
}

fn can_map_executable_row_action(input: &MappingInput<'_>) -> bool {
    body_holder(input).is_some()
}

fn map_executable_row_action(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let Some(holder) = body_holder(input) else {
        return;
    };
    if builder
        .start_element(ElementKind::ExecutableRow(holder), Some(input.cell.id))
        .is_none()
    {
        return;
    }
    let mut typer = RowTyper::new(holder);
    let types = typer.next(&input.cell.text, &input.cell.candidates);
    builder.set_types(input.cell.id, types);
    builder
        .stack
        .push(ParsingState::ExecutableRow(holder, typer.phase()));
}

fn can_map_executable_row_argument(input: &MappingInput<'_>) -> bool {
    matches!(input.state, ParsingState::ExecutableRow(..))
}

fn map_executable_row_argument(builder: &mut ModelBuilder, input: &MappingInput<'_>) {
    let ParsingState::ExecutableRow(holder, _) = input.state else {
        return;
    };
    let Some(path) = builder.open_element(ElementKind::ExecutableRow(holder)) else {
        structural_inconsistency(builder, input, "row argument");
        return;
    };
    let typed = builder.open_element_types();
    let mut typer = RowTyper::replay(holder, typed.iter().map(Vec::as_slice));
    let types = typer.next(&input.cell.text, &input.cell.candidates);
    builder.set_types(input.cell.id, types);
    builder.attach_value(path, input.cell.id);
    builder.stack.pop();
    builder
        .stack
        .push(ParsingState::ExecutableRow(holder, typer.phase()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mapper_order_is_pinned() {
        let names: Vec<_> = MAPPERS.iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "setting_declaration",
                "setting_unknown",
                "setting_value",
                "variable_declaration",
                "variable_value",
                "holder_name",
                "local_setting_declaration",
                "local_setting_unknown",
                "local_setting_value",
                "executable_row_action",
                "executable_row_argument",
            ]
        );
    }

    fn cell(text: &str, index: usize, candidates: Vec<TokenType>) -> PendingCell {
        PendingCell {
            id: crate::tokens::TokenId(0),
            cell: index,
            text: text.to_string(),
            candidates,
            position: None,
        }
    }

    fn first_applicable(input: &MappingInput<'_>) -> Option<&'static str> {
        MAPPERS.iter().find(|m| (m.can_map)(input)).map(|m| m.name)
    }

    #[test]
    fn known_settings_win_over_unknown_ones() {
        let library = cell(
            "Library",
            0,
            vec![TokenType::SettingDeclaration(SettingKind::Library)],
        );
        let input = MappingInput {
            state: ParsingState::TableInside(TableKind::Settings),
            cell: &library,
            has_open: false,
            has_holder: false,
        };
        assert_eq!(first_applicable(&input), Some("setting_declaration"));

        let bogus = cell("[Bogus]", 0, vec![]);
        let input = MappingInput {
            cell: &bogus,
            ..input
        };
        assert_eq!(first_applicable(&input), Some("setting_unknown"));
    }

    #[test]
    fn body_cells_need_a_holder_and_respect_the_holder_kind() {
        let arguments = cell(
            "[Arguments]",
            1,
            vec![TokenType::LocalSettingDeclaration(
                HolderKind::Keyword,
                LocalSettingKind::Arguments,
            )],
        );
        let in_keyword = MappingInput {
            state: ParsingState::Holder(HolderKind::Keyword),
            cell: &arguments,
            has_open: false,
            has_holder: true,
        };
        assert_eq!(first_applicable(&in_keyword), Some("local_setting_declaration"));

        let in_test = MappingInput {
            state: ParsingState::Holder(HolderKind::TestCase),
            ..in_keyword
        };
        assert_eq!(first_applicable(&in_test), Some("local_setting_unknown"));

        let log = cell("Log", 1, vec![]);
        let without_holder = MappingInput {
            state: ParsingState::TableInside(TableKind::Keywords),
            cell: &log,
            has_open: false,
            has_holder: false,
        };
        assert_eq!(first_applicable(&without_holder), None);
    }
}
