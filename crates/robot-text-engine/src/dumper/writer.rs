//! Row writers for rebuilt elements, one per separator style.

use super::DumpOptions;
use crate::separators::{SeparatorKind, escape_cell};

const MIN_SPACES: usize = 2;

/// Marker that starts a continuation row.
pub(crate) const CONTINUATION: &str = "...";

/// Render one physical row. `indent` adds the empty first cell of body rows.
/// Cell text is escaped so that every cell reads back as one cell.
pub(crate) fn write_row(
    cells: &[String],
    indent: bool,
    style: SeparatorKind,
    options: &DumpOptions,
) -> String {
    let escaped: Vec<String> = cells
        .iter()
        .map(|cell| escape_cell(cell, style).into_owned())
        .collect();
    let cells = escaped.as_slice();
    match style {
        SeparatorKind::Pipe => pipe_row(cells, indent),
        SeparatorKind::Tab => tab_row(cells, indent),
        SeparatorKind::Space => space_row(cells, indent, options),
    }
}

fn pipe_row(cells: &[String], indent: bool) -> String {
    let mut all: Vec<&str> = Vec::with_capacity(cells.len() + 1);
    if indent {
        all.push("");
    }
    all.extend(cells.iter().map(String::as_str));
    format!("| {} |", all.join(" | "))
}

fn tab_row(cells: &[String], indent: bool) -> String {
    let row = cells.join("\t");
    if indent { format!("\t{row}") } else { row }
}

fn space_row(cells: &[String], indent: bool, options: &DumpOptions) -> String {
    let separator = " ".repeat(options.separator_width.max(MIN_SPACES));
    let mut row = String::new();
    if indent {
        row.push_str(&separator);
    }
    let last = cells.len().saturating_sub(1);
    for (index, cell) in cells.iter().enumerate() {
        row.push_str(cell);
        if index == last {
            break;
        }
        if options.align_columns {
            let width = cell.chars().count();
            let padding = options.column_width.saturating_sub(width).max(MIN_SPACES);
            row.push_str(&" ".repeat(padding));
        } else {
            row.push_str(&separator);
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cells(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[rstest]
    #[case(SeparatorKind::Space, false, "Log    hello    world")]
    #[case(SeparatorKind::Space, true, "    Log    hello    world")]
    #[case(SeparatorKind::Pipe, false, "| Log | hello | world |")]
    #[case(SeparatorKind::Pipe, true, "|  | Log | hello | world |")]
    #[case(SeparatorKind::Tab, false, "Log\thello\tworld")]
    #[case(SeparatorKind::Tab, true, "\tLog\thello\tworld")]
    fn styles(#[case] style: SeparatorKind, #[case] indent: bool, #[case] expected: &str) {
        let row = write_row(&cells(&["Log", "hello", "world"]), indent, style, &DumpOptions::default());
        assert_eq!(row, expected);
    }

    #[test]
    fn empty_cells_are_spelled_out() {
        let row = write_row(
            &cells(&["Set Variable", "", "x"]),
            false,
            SeparatorKind::Space,
            &DumpOptions::default(),
        );
        assert_eq!(row, "Set Variable    ${EMPTY}    x");

        let pipe = write_row(&cells(&["a", "", "b"]), false, SeparatorKind::Pipe, &DumpOptions::default());
        assert_eq!(pipe, "| a | ${EMPTY} | b |");
    }

    #[rstest]
    #[case(SeparatorKind::Pipe, "| Log | a \\| b |")]
    #[case(SeparatorKind::Space, "Log    a | b")]
    #[case(SeparatorKind::Tab, "Log\ta | b")]
    fn cells_are_escaped_per_style(#[case] style: SeparatorKind, #[case] expected: &str) {
        let row = write_row(&cells(&["Log", "a | b"]), false, style, &DumpOptions::default());
        assert_eq!(row, expected);
    }

    #[test]
    fn doubled_spaces_are_escaped_in_space_rows() {
        let row = write_row(
            &cells(&["Should Be Equal", "a  b"]),
            false,
            SeparatorKind::Space,
            &DumpOptions::default(),
        );
        assert_eq!(row, "Should Be Equal    a \\ b");
    }

    #[test]
    fn aligned_columns_keep_two_spaces_minimum() {
        let options = DumpOptions {
            align_columns: true,
            column_width: 10,
            ..DumpOptions::default()
        };
        let row = write_row(
            &cells(&["Log", "a very long argument", "x"]),
            false,
            SeparatorKind::Space,
            &options,
        );
        assert_eq!(row, "Log       a very long argument  x");
    }

    #[test]
    fn separator_width_has_a_floor() {
        let options = DumpOptions {
            separator_width: 1,
            ..DumpOptions::default()
        };
        let row = write_row(&cells(&["a", "b"]), false, SeparatorKind::Space, &options);
        assert_eq!(row, "a  b");
    }
}
