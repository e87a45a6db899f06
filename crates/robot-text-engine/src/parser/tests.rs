use super::*;
use crate::model::{
    ElementKind, HolderKind, LocalSettingKind, SettingKind, TableKind, ValueRole, VariableKind,
};
use pretty_assertions::assert_eq;
use std::ops::ControlFlow;

fn parse(text: &str) -> ParseOutput {
    parse_text(text, FileFormat::Txt, RobotVersion::LATEST)
}

fn texts(file: &RobotFile, ids: &[crate::tokens::TokenId]) -> Vec<String> {
    ids.iter().map(|id| file.token_text(*id).to_string()).collect()
}

fn kinds(output: &ParseOutput) -> Vec<DiagnosticKind> {
    output.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn settings_table_maps_values_by_role() {
    let output = parse(
        "*** Settings ***\n\
         Library    Collections    WITH NAME    C\n\
         Suite Setup    Open Browser    ${URL}\n",
    );
    let file = &output.file;
    let settings = file.setting_table().elements();
    assert_eq!(settings.len(), 2);

    let library = &settings[0];
    assert_eq!(library.kind(), ElementKind::Setting(SettingKind::Library));
    let roles: Vec<_> = library
        .values()
        .iter()
        .map(|id| file.token(*id).primary_type())
        .collect();
    assert_eq!(
        roles,
        vec![
            TokenType::SettingValue(SettingKind::Library, ValueRole::Name),
            TokenType::SettingValue(SettingKind::Library, ValueRole::AliasMarker),
            TokenType::SettingValue(SettingKind::Library, ValueRole::AliasValue),
        ]
    );

    let setup = &settings[1];
    let url = file.token(setup.values()[1]);
    assert_eq!(
        url.types(),
        &[
            TokenType::SettingValue(SettingKind::SuiteSetup, ValueRole::Argument),
            TokenType::VariableUsage,
        ]
    );
    assert_eq!(output.status(), Status::Passed);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn unknown_setting_is_contained_in_its_own_element() {
    let output = parse(
        "*** Settings ***\n\
         [Bogus]    value\n\
         Library    OperatingSystem\n",
    );
    let settings = output.file.setting_table().elements();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings[0].kind(), ElementKind::Setting(SettingKind::Unknown));
    assert_eq!(
        output.file.token(settings[0].declaration().unwrap()).primary_type(),
        TokenType::SettingDeclaration(SettingKind::Unknown)
    );
    assert_eq!(settings[1].kind(), ElementKind::Setting(SettingKind::Library));
    assert_eq!(kinds(&output), vec![DiagnosticKind::UnknownSetting]);
}

#[test]
fn continuation_spans_comment_lines() {
    let output = parse(
        "*** Settings ***\n\
         Documentation    First line\n\
         # a comment\n\
         \n\
         ...    second line\n",
    );
    let file = &output.file;
    let documentation = &file.setting_table().elements()[0];
    assert_eq!(texts(file, documentation.values()), vec!["First line", "second line"]);
    assert_eq!(documentation.row_breaks(), &[1]);
    assert_eq!(documentation.content_lines().collect::<Vec<_>>(), vec![1, 4]);
    assert_eq!(documentation.trivia_lines().collect::<Vec<_>>(), vec![2, 3]);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn continuation_without_a_row_is_dangling() {
    let output = parse("*** Variables ***\n...    orphan\n${x}    1\n");
    assert_eq!(kinds(&output), vec![DiagnosticKind::DanglingContinuation]);
    let variables = output.file.variable_table().elements();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].kind(), ElementKind::Variable(VariableKind::Scalar));
    let orphan = output.file.lines()[1].tokens().nth(1).unwrap();
    assert_eq!(output.file.token(orphan).primary_type(), TokenType::Unknown);
}

#[test]
fn variables_table_declarations() {
    let output = parse(
        "*** Variables ***\n\
         ${NAME} =    robot\n\
         @{LIST}    a    b\n\
         &{DICT}    key=value\n\
         %{HOME}    x\n\
         plain    y\n",
    );
    let kinds: Vec<_> = output
        .file
        .variable_table()
        .elements()
        .iter()
        .map(|e| e.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Variable(VariableKind::Scalar),
            ElementKind::Variable(VariableKind::List),
            ElementKind::Variable(VariableKind::Dictionary),
            ElementKind::Variable(VariableKind::Unknown),
            ElementKind::Variable(VariableKind::Unknown),
        ]
    );
}

const SUITE: &str = "\
*** Test Cases ***
Login    [Documentation]    Logs in
    ${x}=    Set Variable    1
    Log    ${x}
    # just a comment
    [Teardown]    Close

*** Keywords ***
My Keyword
    [Arguments]    ${a}
    FOR    ${i}    IN RANGE    ${a}
        Log    ${i}
    END
    [Return]    ${a}
";

#[test]
fn holders_collect_body_settings_and_rows() {
    let output = parse(SUITE);
    let file = &output.file;
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let login = &file.test_case_table().holders()[0];
    assert_eq!(file.token_text(login.name()), "Login");
    let element_kinds: Vec<_> = login.elements().iter().map(|e| e.kind()).collect();
    let tc = HolderKind::TestCase;
    assert_eq!(
        element_kinds,
        vec![
            ElementKind::LocalSetting(tc, LocalSettingKind::Documentation),
            ElementKind::ExecutableRow(tc),
            ElementKind::ExecutableRow(tc),
            ElementKind::ExecutableRow(tc),
            ElementKind::LocalSetting(tc, LocalSettingKind::Teardown),
        ]
    );
    assert!(login.elements()[0].shares_holder_line);
    assert!(login.elements()[3].declaration().is_none());
    assert_eq!(login.elements()[3].comments().len(), 1);
    assert_eq!(login.elements()[4].trivia_lines().collect::<Vec<_>>(), vec![6]);

    let keyword = &file.keyword_table().holders()[0];
    assert_eq!(keyword.elements().len(), 5);
    assert!(keyword.setting(LocalSettingKind::Return).is_some());
}

#[test]
fn executable_rows_tell_definitions_from_usages() {
    let output = parse(SUITE);
    let file = &output.file;
    let login = &file.test_case_table().holders()[0];
    let tc = HolderKind::TestCase;

    let assign = &login.elements()[1];
    assert_eq!(
        file.token(assign.declaration().unwrap()).types(),
        &[TokenType::Assignment]
    );
    assert_eq!(
        file.token(assign.values()[0]).types(),
        &[TokenType::ActionName(tc)]
    );

    let log = &login.elements()[2];
    assert_eq!(
        file.token(log.values()[0]).types(),
        &[TokenType::ActionArgument(tc), TokenType::VariableUsage]
    );
}

#[test]
fn row_descriptors_describe_loops() {
    let output = parse(SUITE);
    let file = &output.file;
    let keyword = &file.keyword_table().holders()[0];
    let describe = |index: usize| RowDescriptor::describe(file, &keyword.elements()[index]).unwrap();

    let for_row = describe(1);
    assert_eq!(for_row.kind, RowKind::ForLoop);
    assert_eq!(texts(file, &for_row.created_variables), vec!["${i}"]);
    assert_eq!(texts(file, &for_row.arguments), vec!["${a}"]);

    let body = describe(2);
    assert_eq!(body.kind, RowKind::Simple);
    assert_eq!(body.action.map(|id| file.token_text(id)), Some("Log"));
    let used: Vec<_> = body.used_variables.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(used, vec!["${i}"]);

    assert_eq!(describe(3).kind, RowKind::ForEnd);
    assert!(RowDescriptor::describe(file, &keyword.elements()[0]).is_none());

    let login = &file.test_case_table().holders()[0];
    let assign = RowDescriptor::describe(file, &login.elements()[1]).unwrap();
    assert_eq!(texts(file, &assign.created_variables), vec!["${x}="]);
    assert_eq!(
        RowDescriptor::describe(file, &login.elements()[3]).unwrap().kind,
        RowKind::Empty
    );
}

#[test]
fn comment_and_user_tables_are_kept_but_not_mapped() {
    let output = parse("*** Comments ***\nanything    here\n*** Notes ***\nx    y\n");
    let file = &output.file;
    let sections: Vec<_> = file.sections().iter().map(|s| s.kind()).collect();
    assert_eq!(sections, vec![Some(TableKind::Comments), None]);
    assert_eq!(file.sections()[0].trailing, vec![1]);
    assert_eq!(file.sections()[1].trailing, vec![3]);
    assert!(file.elements().next().is_none());
    assert_eq!(kinds(&output), vec![DiagnosticKind::UnknownTableHeader]);
}

#[test]
fn tasks_table_needs_version_3_1() {
    let text = "*** Tasks ***\nClean Up\n    Log    x\n";
    let old = parse_text(text, FileFormat::Txt, RobotVersion::minor(3, 0));
    assert_eq!(old.file.sections()[0].kind(), None);
    assert!(old.file.task_table().holders().is_empty());

    let new = parse_text(text, FileFormat::Txt, RobotVersion::minor(3, 1));
    assert_eq!(new.file.sections()[0].kind(), Some(TableKind::Tasks));
    assert_eq!(new.file.task_table().holders().len(), 1);
}

#[test]
fn deprecated_spellings_are_reported() {
    let output = parse_text(
        "*** Test Cases ***\nT\n    [Precondition]    Setup Stuff\n",
        FileFormat::Txt,
        RobotVersion::minor(3, 0),
    );
    assert_eq!(kinds(&output), vec![DiagnosticKind::DeprecatedSyntax]);
    let holder = &output.file.test_case_table().holders()[0];
    assert!(holder.setting(LocalSettingKind::Setup).is_some());
}

#[test]
fn content_before_first_table_is_preamble() {
    let output = parse("stray    text\n\n*** Settings ***\n");
    assert_eq!(output.file.preamble, vec![0, 1]);
    assert_eq!(kinds(&output), vec![DiagnosticKind::ContentOutsideTable]);
}

#[test]
fn template_rows_become_template_arguments() {
    let output = parse(
        "*** Settings ***\n\
         Test Template    Login With\n\
         \n\
         *** Test Cases ***\n\
         Valid\n    demo    mode\n\
         Other\n    [Template]    NONE\n    Log    x\n",
    );
    let file = &output.file;
    let holders = file.test_case_table().holders();
    let tc = HolderKind::TestCase;
    let valid = &holders[0].elements()[0];
    for id in valid.element_tokens() {
        assert_eq!(file.token(id).primary_type(), TokenType::TemplateArgument(tc));
    }
    let log = holders[1].executable_rows().next().unwrap();
    assert_eq!(
        file.token(log.declaration().unwrap()).primary_type(),
        TokenType::ActionName(tc)
    );
}

#[test]
fn pipe_rows_share_the_holder_line() {
    let output = parse("| *** Test Cases *** |\n| Case | Log | x |\n");
    let holder = &output.file.test_case_table().holders()[0];
    assert_eq!(output.file.token_text(holder.name()), "Case");
    let row = &holder.elements()[0];
    assert!(row.shares_holder_line);
    assert_eq!(texts(&output.file, &row.element_tokens()), vec!["Log", "x"]);
}

#[test]
fn header_columns_and_comments_stay_on_the_section() {
    let output = parse("*** Test Cases ***    Action    Argument    # note\n");
    let section = &output.file.sections()[0];
    assert_eq!(texts(&output.file, section.columns()), vec!["Action", "Argument"]);
    assert_eq!(texts(&output.file, section.comments()), vec!["# note"]);
}

#[test]
fn byte_order_mark_shifts_offsets() {
    let output = parse("\u{feff}*** Settings ***\nLibrary    X\n");
    let file = &output.file;
    assert!(file.has_bom);
    let first = file.lines()[0].tokens().next().unwrap();
    assert_eq!(file.token(first).position().unwrap().offset, 3);
    let library = file.lines()[1].tokens().next().unwrap();
    assert_eq!(
        file.token(library).position().unwrap(),
        FilePosition::new(2, 0, 20)
    );
}

#[test]
fn reporter_can_stop_forwarding() {
    let output = parse("*** Notes ***\n*** Other ***\n");
    assert_eq!(output.diagnostics.len(), 2);
    let mut seen = Vec::new();
    let delivered = output.report_to(&mut |d: &Diagnostic| {
        seen.push(d.kind);
        ControlFlow::Break(())
    });
    assert_eq!(delivered, 1);
    assert_eq!(seen, vec![DiagnosticKind::UnknownTableHeader]);
    assert_eq!(output.file.sections().len(), 2);
}

#[test]
fn parse_is_clean_afterwards() {
    let output = parse(SUITE);
    assert!(!output.file.is_dirty());
    assert!(output.file.elements().all(|e| !e.needs_regeneration()));
}
