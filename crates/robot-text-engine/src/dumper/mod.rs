//! # Dumper
//!
//! Writes a [`RobotFile`] back to text. Everything that was not edited is
//! emitted from its source line, separators and padding included, so a
//! parse followed by a dump reproduces the input byte for byte. Elements
//! that were created or restructured by an edit are rebuilt from their
//! tokens in the style of their neighbours.
//!
//! ## Modules
//!
//! - **`sorter`**: token order for rebuilt rows
//! - **`writer`**: space, pipe and tab row rendering

mod sorter;
mod writer;

use crate::format::FileFormat;
use crate::model::{ExecutableHolder, LineElement, ModelElement, RobotFile, Section, TableKind};
use crate::separators::SeparatorKind;
use crate::tokens::TokenId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use writer::{CONTINUATION, write_row};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Keep source terminators; new lines copy the first one seen.
    #[default]
    Auto,
    Lf,
    Crlf,
}

/// How rebuilt rows are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpOptions {
    /// Spaces between cells in space separated rows.
    pub separator_width: usize,
    /// Pad space separated cells to `column_width`.
    pub align_columns: bool,
    pub column_width: usize,
    /// Wrap rebuilt rows with `...` after this many cells; 0 never wraps.
    pub max_cells_per_line: usize,
    pub line_ending: LineEnding,
    /// Rebuild every element and holder name row, not only edited ones.
    #[serde(skip)]
    pub regenerate_all: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            separator_width: 4,
            align_columns: false,
            column_width: 18,
            max_cells_per_line: 0,
            line_ending: LineEnding::Auto,
            regenerate_all: false,
        }
    }
}

/// Render `file` as text.
pub fn dump(file: &RobotFile, options: &DumpOptions) -> String {
    let output = Dumper::new(file, options).run();
    log::debug!("dumped {} bytes", output.len());
    output
}

struct Dumper<'a> {
    file: &'a RobotFile,
    options: &'a DumpOptions,
    out: String,
    eol: String,
    last_blank: bool,
    /// The last line written had no terminator.
    open_line: bool,
    /// Blank lines that close the previous item. New elements are written in
    /// front of them.
    pending: Vec<usize>,
    default_style: SeparatorKind,
}

impl<'a> Dumper<'a> {
    fn new(file: &'a RobotFile, options: &'a DumpOptions) -> Self {
        let eol = match options.line_ending {
            LineEnding::Lf => "\n".to_string(),
            LineEnding::Crlf => "\r\n".to_string(),
            LineEnding::Auto => file
                .lines()
                .iter()
                .map(|l| l.eol.as_str())
                .find(|eol| !eol.is_empty())
                .unwrap_or("\n")
                .to_string(),
        };
        let default_style = match file.format() {
            FileFormat::Tsv => SeparatorKind::Tab,
            FileFormat::Txt => file
                .lines()
                .iter()
                .find_map(|line| line.separator_kind())
                .unwrap_or(SeparatorKind::Space),
        };
        Self {
            file,
            options,
            out: String::new(),
            eol,
            last_blank: true,
            open_line: false,
            pending: Vec::new(),
            default_style,
        }
    }

    fn run(mut self) -> String {
        if self.file.has_bom {
            self.out.push(BOM);
        }
        let file = self.file;
        self.source_lines(file.preamble.iter().copied());
        for (index, section) in file.sections().iter().enumerate() {
            self.section(index, section);
        }
        self.flush();
        self.out
    }

    fn section(&mut self, index: usize, section: &Section) {
        self.flush();
        match section.header_line {
            Some(line) => self.source_line(line),
            None => {
                if !self.last_blank {
                    self.push("", None);
                }
                let header = self.file.token(section.header()).text().to_string();
                self.push(&header, None);
            }
        }
        self.source_lines(section.trailing.iter().copied());

        let file = self.file;
        let Some(kind) = section.kind() else {
            return;
        };
        if let Some(table) = file.element_table(kind) {
            let home = self.home_sections(kind);
            let elements = table.elements();
            for (position, element) in elements.iter().enumerate() {
                let section = if home.contains(&element.section) {
                    element.section
                } else {
                    home.last().copied().unwrap_or(index)
                };
                if section == index {
                    self.element(element, &elements[..position], false);
                }
            }
        } else if let Some(table) = file.holder_table(kind) {
            for holder in table.holders().iter().filter(|h| h.section == index) {
                self.holder(holder);
            }
        }
    }

    /// Sections that carry the table `kind`.
    fn home_sections(&self, kind: TableKind) -> Vec<usize> {
        self.file
            .sections()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind() == Some(kind))
            .map(|(i, _)| i)
            .collect()
    }

    fn holder(&mut self, holder: &ExecutableHolder) {
        self.flush();
        let file = self.file;
        let regenerate_all = self.options.regenerate_all;
        let shared = holder
            .elements()
            .first()
            .filter(|e| e.shares_holder_line && !e.needs_regeneration() && !regenerate_all);

        let verbatim = holder.header_line.filter(|&line| {
            if regenerate_all {
                return false;
            }
            let mut allowed: HashSet<TokenId> = HashSet::from([holder.name()]);
            allowed.extend(holder.comments());
            if let Some(element) = shared {
                allowed.extend(element.element_tokens());
            }
            file.lines()
                .get(line)
                .is_some_and(|l| l.tokens().all(|t| allowed.contains(&t)))
        });

        let mut elements = holder.elements().iter().enumerate();
        match (verbatim, shared) {
            (Some(line), Some(element)) => {
                self.source_line(line);
                let mut rest: Vec<usize> = holder
                    .trailing
                    .iter()
                    .copied()
                    .chain(element.lines.iter().map(|l| l.index))
                    .filter(|&l| l != line)
                    .collect();
                rest.sort_unstable();
                self.source_lines(rest);
                elements.next();
            }
            (Some(line), None) => {
                self.source_line(line);
                self.source_lines(holder.trailing.iter().copied());
            }
            (None, _) => {
                let mut cells = vec![file.token(holder.name()).text().to_string()];
                cells.extend(holder.comments().iter().map(|c| file.token(*c).text().to_string()));
                let style = holder
                    .header_line
                    .and_then(|line| self.line_style(line))
                    .or_else(|| holder.elements().iter().find_map(|e| self.element_style(e)))
                    .unwrap_or(self.default_style);
                let row = write_row(&cells, false, style, self.options);
                self.push(&row, None);
                self.source_lines(holder.trailing.iter().copied());
            }
        }

        let all = holder.elements();
        for (position, element) in elements {
            // Its content line went out with the name row or was replaced.
            let force = element.shares_holder_line;
            self.element(element, &all[..position], force);
        }
    }

    fn element(
        &mut self,
        element: &ModelElement,
        before: &[ModelElement],
        force: bool,
    ) {
        if !force && !element.needs_regeneration() && !self.options.regenerate_all {
            self.flush();
            let mut lines: Vec<usize> = element.lines.iter().map(|l| l.index).collect();
            lines.sort_unstable();
            self.source_lines(lines);
            return;
        }
        if !element.is_new() {
            self.flush();
        }
        let style = self
            .element_style(element)
            .or_else(|| before.iter().rev().find_map(|e| self.element_style(e)))
            .unwrap_or(self.default_style);
        for row in self.rows(element, style) {
            self.push(&row, None);
        }
        let mut trivia: Vec<usize> = element.trivia_lines().collect();
        trivia.sort_unstable();
        self.source_lines(trivia);
    }

    /// Physical rows for a rebuilt element.
    fn rows(&self, element: &ModelElement, style: SeparatorKind) -> Vec<String> {
        let file = self.file;
        let (cells, comments) = sorter::ordered_cells(file, element);
        let offset = usize::from(element.declaration().is_some());
        let breaks = element.row_breaks();

        let mut logical: Vec<Vec<String>> = vec![Vec::new()];
        for (index, id) in cells.iter().enumerate() {
            let starts_row = index >= offset && breaks.contains(&(index - offset));
            if starts_row && logical.last().is_some_and(|row| !row.is_empty()) {
                logical.push(Vec::new());
            }
            if let Some(row) = logical.last_mut() {
                row.push(file.token(*id).text().to_string());
            }
        }
        if let Some(row) = logical.last_mut() {
            row.extend(comments.iter().map(|id| file.token(*id).text().to_string()));
        }

        let indent = element.kind().is_indented();
        let max = self.options.max_cells_per_line;
        let mut rows = Vec::new();
        for (row_index, row) in logical.into_iter().filter(|r| !r.is_empty()).enumerate() {
            let mut rest = row.as_slice();
            let mut continued = row_index > 0;
            while !rest.is_empty() {
                let mut line = Vec::new();
                if continued {
                    line.push(CONTINUATION.to_string());
                }
                let take = match max {
                    0 => rest.len(),
                    max => max.saturating_sub(line.len()).max(1).min(rest.len()),
                };
                line.extend(rest[..take].iter().cloned());
                rest = &rest[take..];
                rows.push(write_row(&line, indent, style, self.options));
                continued = true;
            }
        }
        rows
    }

    fn element_style(&self, element: &ModelElement) -> Option<SeparatorKind> {
        element.content_lines().min().and_then(|line| self.line_style(line))
    }

    fn line_style(&self, line: usize) -> Option<SeparatorKind> {
        if self.file.format() == FileFormat::Tsv {
            return Some(SeparatorKind::Tab);
        }
        self.file.lines().get(line)?.separator_kind()
    }

    fn source_lines(&mut self, lines: impl IntoIterator<Item = usize>) {
        for line in lines {
            let blank = self
                .file
                .lines()
                .get(line)
                .is_some_and(|l| l.tokens().next().is_none());
            if blank {
                self.pending.push(line);
            } else {
                self.flush();
                self.source_line(line);
            }
        }
    }

    fn flush(&mut self) {
        for line in std::mem::take(&mut self.pending) {
            self.source_line(line);
        }
    }

    fn source_line(&mut self, index: usize) {
        let file = self.file;
        let Some(line) = file.lines().get(index) else {
            return;
        };
        let kind = self.line_style(index).unwrap_or(self.default_style);
        let mut text = String::new();
        for element in &line.elements {
            match element {
                LineElement::Token(id) => text.push_str(&file.token(*id).render(kind)),
                LineElement::Separator(separator) => text.push_str(&separator.text),
            }
        }
        self.push(&text, Some(&line.eol));
    }

    /// Append one line. `eol` is the source terminator, `None` for rebuilt
    /// lines.
    fn push(&mut self, content: &str, eol: Option<&str>) {
        if self.open_line {
            let eol = self.eol.clone();
            self.out.push_str(&eol);
        }
        self.out.push_str(content);
        let eol = match (eol, self.options.line_ending) {
            (Some(eol), LineEnding::Auto) => eol,
            (Some(""), _) => "",
            _ => self.eol.as_str(),
        };
        self.out.push_str(eol);
        self.open_line = eol.is_empty();
        self.last_blank = content.trim().is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Cmd, ElementOwner};
    use crate::model::{ElementKind, HolderKind, SettingKind, VariableKind};
    use crate::parser::parse_text;
    use crate::version::RobotVersion;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> RobotFile {
        parse_text(text, FileFormat::Txt, RobotVersion::LATEST).file
    }

    fn dump_default(file: &RobotFile) -> String {
        dump(file, &DumpOptions::default())
    }

    const SUITE: &str = "\
*** Settings ***
Library    Collections
Resource    common.robot

*** Test Cases ***
First
    Log    one
    Log    two

Second
    No Operation
";

    #[test]
    fn clean_files_round_trip() {
        let text = "\u{feff}Preamble text\r\n*** Settings ***  # note\r\nLibrary      Collections\r\n\r\n| *** Keywords *** |\r\n| Helper | [Arguments] | ${x} |\r\n|        | Log         | ${x} |\r\n    # trailing comment";
        assert_eq!(dump_default(&parse(text)), text);
        assert_eq!(dump_default(&parse(SUITE)), SUITE);
    }

    #[test]
    fn byte_order_mark_is_not_followed_by_a_blank_line() {
        let text = "\u{feff}*** Settings ***\nLibrary    X\n";
        assert_eq!(dump_default(&parse(text)), text);

        let tsv = "\u{feff}*** Settings ***\nLibrary\tX";
        let file = parse_text(tsv, FileFormat::Tsv, RobotVersion::LATEST).file;
        assert_eq!(dump_default(&file), tsv);
    }

    #[test]
    fn emptied_cells_are_written_as_empty_variables() {
        let mut file = parse("*** Test Cases ***\nT\n    Log Many    a    b\n");
        let first = file.test_case_table().holders()[0].elements()[0].values()[0];
        file.apply(Cmd::SetTokenText {
            token: first,
            text: String::new(),
        })
        .unwrap();
        assert_eq!(
            dump_default(&file),
            "*** Test Cases ***\nT\n    Log Many    ${EMPTY}    b\n"
        );
    }

    #[test]
    fn inserted_pipes_are_escaped_in_pipe_rows() {
        let mut file = parse("| *** Test Cases *** |\n| T |\n|  | Log | one |\n");
        let row = file.test_case_table().holders()[0].elements()[0].id();
        file.apply(Cmd::InsertValue {
            element: row,
            index: 1,
            text: "a | b".into(),
        })
        .unwrap();
        assert_eq!(
            dump_default(&file),
            "| *** Test Cases *** |\n| T |\n|  | Log | one | a \\| b |\n"
        );
    }

    #[test]
    fn changed_text_keeps_cell_padding() {
        let mut file = parse("*** Settings ***\nLibrary      Collections    # why\n");
        let library = file.setting_table().elements()[0].values()[0];
        file.apply(Cmd::SetTokenText {
            token: library,
            text: "String".into(),
        })
        .unwrap();
        assert_eq!(
            dump_default(&file),
            "*** Settings ***\nLibrary      String    # why\n"
        );
    }

    #[test]
    fn new_elements_go_before_trailing_blank_lines() {
        let mut file = parse(SUITE);
        file.apply(Cmd::AddElement {
            owner: ElementOwner::Table(TableKind::Settings),
            kind: ElementKind::Setting(SettingKind::SuiteSetup),
            index: None,
            cells: vec!["Open Browser".into()],
        })
        .unwrap();
        let expected = SUITE.replace(
            "common.robot\n",
            "common.robot\nSuite Setup    Open Browser\n",
        );
        assert_eq!(dump_default(&file), expected);
    }

    #[test]
    fn missing_tables_are_appended() {
        let mut file = parse(SUITE);
        file.apply(Cmd::AddElement {
            owner: ElementOwner::Table(TableKind::Variables),
            kind: ElementKind::Variable(VariableKind::Scalar),
            index: None,
            cells: vec!["${HOST}".into(), "".into()],
        })
        .unwrap();
        let expected = format!("{SUITE}\n*** Variables ***\n${{HOST}}    ${{EMPTY}}\n");
        assert_eq!(dump_default(&file), expected);
    }

    #[test]
    fn rebuilt_rows_keep_continuation_breaks() {
        let mut file = parse("*** Settings ***\nDocumentation    First line\n...    second line\n");
        let documentation = file.setting_table().elements()[0].id();
        file.apply(Cmd::InsertValue {
            element: documentation,
            index: 2,
            text: "third".into(),
        })
        .unwrap();
        assert_eq!(
            dump_default(&file),
            "*** Settings ***\nDocumentation    First line\n...    second line    third\n"
        );
    }

    #[test]
    fn long_rows_wrap() {
        let mut file = parse("*** Settings ***\n");
        file.apply(Cmd::AddElement {
            owner: ElementOwner::Table(TableKind::Settings),
            kind: ElementKind::Setting(SettingKind::Library),
            index: None,
            cells: vec!["A".into(), "b".into(), "c".into(), "d".into()],
        })
        .unwrap();
        let options = DumpOptions {
            max_cells_per_line: 3,
            ..DumpOptions::default()
        };
        assert_eq!(
            dump(&file, &options),
            "*** Settings ***\nLibrary    A    b\n...    c    d\n"
        );
    }

    #[test]
    fn new_rows_follow_the_pipe_style_of_their_siblings() {
        let mut file = parse("| *** Test Cases *** |\n| First | Log | one |\n");
        let holder = file.test_case_table().holders()[0].id();
        file.apply(Cmd::AddElement {
            owner: ElementOwner::Holder(holder),
            kind: ElementKind::ExecutableRow(HolderKind::TestCase),
            index: None,
            cells: vec!["Log".into(), "two".into()],
        })
        .unwrap();
        assert_eq!(
            dump_default(&file),
            "| *** Test Cases *** |\n| First | Log | one |\n|  | Log | two |\n"
        );
    }

    #[test]
    fn removing_the_row_on_the_name_line_rebuilds_the_name_row() {
        let mut file = parse("*** Test Cases ***\nFirst    Log    one\n    Log    two\n");
        let shared = file.test_case_table().holders()[0].elements()[0].id();
        file.apply(Cmd::RemoveElement { id: shared }).unwrap();
        assert_eq!(
            dump_default(&file),
            "*** Test Cases ***\nFirst\n    Log    two\n"
        );
    }

    #[test]
    fn explicit_line_endings_rewrite_terminators() {
        let file = parse("*** Settings ***\nLibrary    X\n");
        let options = DumpOptions {
            line_ending: LineEnding::Crlf,
            ..DumpOptions::default()
        };
        assert_eq!(dump(&file, &options), "*** Settings ***\r\nLibrary    X\r\n");
    }

    #[test]
    fn regenerate_all_realigns_every_row() {
        let file = parse("*** Settings ***\nLibrary  Collections\n\n*** Keywords ***\nK\n    Log  x\n");
        let options = DumpOptions {
            align_columns: true,
            regenerate_all: true,
            ..DumpOptions::default()
        };
        let expected = format!(
            "*** Settings ***\n{:<18}Collections\n\n*** Keywords ***\nK\n    {:<18}x\n",
            "Library", "Log"
        );
        assert_eq!(dump(&file, &options), expected);
    }
}
