//! Post-parse passes that need the whole file.

use crate::model::{
    ElementKind, ExecutableHolder, HolderKind, LocalSettingKind, RobotFile, SettingKind,
};
use super::row::RowTyper;
use crate::recognizer::RecognizerSet;
use crate::tokens::{TokenId, TokenType};

/// Whether the rows of a test or task are template data. A local
/// `[Template]` wins over the suite's `Test Template`; `NONE` disables both.
fn is_templated(file: &RobotFile, holder: &ExecutableHolder) -> bool {
    if holder.kind() == HolderKind::Keyword {
        return false;
    }
    let template_value = |values: &[TokenId]| {
        values
            .first()
            .map(|id| file.token_text(*id))
            .filter(|name| !name.is_empty())
            .map(|name| !name.eq_ignore_ascii_case("NONE"))
    };
    if let Some(local) = holder.setting(LocalSettingKind::Template) {
        return template_value(local.values()).unwrap_or(false);
    }
    file.setting_table()
        .setting(SettingKind::TestTemplate)
        .and_then(|suite| template_value(suite.values()))
        .unwrap_or(false)
}

/// Retype the cells of templated tests and tasks as template arguments.
/// Loop literals keep their types. Rows that hold template arguments but
/// are no longer templated (the template setting was edited or removed) are
/// typed again as keyword calls.
pub(crate) fn apply_template_arguments(file: &mut RobotFile) {
    let mut to_template = Vec::new();
    let mut to_calls = Vec::new();
    for holder in file.holders() {
        let templated = is_templated(file, holder);
        for row in holder
            .elements()
            .iter()
            .filter(|e| matches!(e.kind(), ElementKind::ExecutableRow(_)))
        {
            let cells = row.declaration().into_iter().chain(row.values().iter().copied());
            if templated {
                let data = cells.filter(|id| {
                    matches!(
                        file.token(*id).primary_type(),
                        TokenType::ActionName(_)
                            | TokenType::ActionArgument(_)
                            | TokenType::Assignment
                    )
                });
                to_template.extend(data.map(|id| (id, holder.kind())));
            } else {
                let cells: Vec<TokenId> = cells.collect();
                if cells
                    .iter()
                    .any(|id| matches!(file.token(*id).primary_type(), TokenType::TemplateArgument(_)))
                {
                    to_calls.push((cells, holder.kind()));
                }
            }
        }
    }

    for (id, holder) in to_template {
        let token = file.token_mut(id);
        let mut types = vec![TokenType::TemplateArgument(holder)];
        types.extend(
            token
                .types()
                .iter()
                .copied()
                .filter(|t| *t == TokenType::VariableUsage),
        );
        token.set_types(types);
    }

    if to_calls.is_empty() {
        return;
    }
    let recognizers = RecognizerSet::for_version(file.version());
    for (cells, holder) in to_calls {
        let mut typer = RowTyper::new(holder);
        for id in cells {
            let text = file.token_text(id).to_string();
            let types = typer.next(&text, &recognizers.candidate_types(&text));
            file.token_mut(id).set_types(types);
        }
    }
}
