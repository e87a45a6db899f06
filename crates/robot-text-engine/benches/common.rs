// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_suite(tests: usize, keywords: usize) -> String {
    let mut content = String::from(
        "*** Settings ***\nLibrary    Collections\nLibrary    OperatingSystem    WITH NAME    OS\nSuite Setup    Prepare    ${ROOT}\n\n*** Variables ***\n${ROOT}    /tmp\n@{ITEMS}    a    b    c\n\n*** Test Cases ***\n",
    );

    for test in 0..tests {
        content.push_str(&format!("Test {test}\n"));
        content.push_str("    [Documentation]    Checks one thing\n    ...    and spans two rows\n");
        content.push_str(&format!("    ${{value}}=    Keyword {}    {test}\n", test % keywords.max(1)));
        content.push_str("    Should Be Equal    ${value}    expected    # compare\n\n");
    }

    content.push_str("*** Keywords ***\n");
    for keyword in 0..keywords {
        content.push_str(&format!("Keyword {keyword}\n"));
        content.push_str("    [Arguments]    ${arg}\n");
        content.push_str("    FOR    ${item}    IN    @{ITEMS}\n        Log    ${item}\n    END\n");
        content.push_str("    [Return]    ${arg}\n\n");
    }

    content
}

#[allow(dead_code)]
pub fn generate_pipe_suite(tests: usize) -> String {
    let mut content = String::from("| *** Test Cases *** |\n");
    for test in 0..tests {
        content.push_str(&format!("| Test {test} | Log | one |\n"));
        content.push_str("|            | Log | two | three |\n");
    }
    content
}
