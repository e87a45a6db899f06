//! Variable reference scanning: `${scalar}`, `@{list}`, `&{dict}`,
//! `%{environment}`, with nested braces and `[item]` access.

/// A `${...}`-style reference inside a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference<'a> {
    /// `$`, `@`, `&` or `%`.
    pub sigil: char,
    pub name: &'a str,
    /// Byte range of the whole reference including item access.
    pub start: usize,
    pub end: usize,
}

/// All unescaped variable references in `text`, outermost only.
pub fn references(text: &str) -> Vec<VariableReference<'_>> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut at = 0;
    while at + 1 < bytes.len() {
        if is_sigil(bytes[at]) && bytes[at + 1] == b'{' && !is_escaped(bytes, at) {
            if let Some(close) = matching_brace(bytes, at + 1) {
                let end = item_access_end(bytes, close + 1);
                found.push(VariableReference {
                    sigil: bytes[at] as char,
                    name: &text[at + 2..close],
                    start: at,
                    end,
                });
                at = end;
                continue;
            }
        }
        at += 1;
    }
    found
}

pub fn contains_variable(text: &str) -> bool {
    !references(text).is_empty()
}

/// Exactly one reference and nothing else.
pub fn is_single_variable(text: &str) -> bool {
    let refs = references(text);
    matches!(refs.as_slice(), [only] if only.start == 0 && only.end == text.len() && !only.name.is_empty())
}

/// A cell that can stand before a row's action: one scalar, list or
/// dictionary variable with no item access, optionally followed by `=`
/// (with at most one space before it).
pub fn is_assignment_target(text: &str) -> bool {
    let target = text
        .strip_suffix('=')
        .map(|t| t.strip_suffix(' ').unwrap_or(t))
        .unwrap_or(text);
    let refs = references(target);
    matches!(
        refs.as_slice(),
        [only] if only.start == 0
            && only.end == target.len()
            && !only.name.is_empty()
            && matches!(only.sigil, '$' | '@' | '&')
            && target.ends_with('}')
    )
}

/// Split a dictionary item `key=value` at the first unescaped `=`.
pub fn split_dictionary_item(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    (0..bytes.len())
        .find(|&at| bytes[at] == b'=' && !is_escaped(bytes, at))
        .map(|at| (&text[..at], &text[at + 1..]))
}

fn is_sigil(byte: u8) -> bool {
    matches!(byte, b'$' | b'@' | b'&' | b'%')
}

/// Preceded by an odd number of backslashes.
fn is_escaped(bytes: &[u8], at: usize) -> bool {
    bytes[..at].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (at, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'{' if !is_escaped(bytes, at) => depth += 1,
            b'}' if !is_escaped(bytes, at) => {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
            _ => {}
        }
    }
    None
}

fn item_access_end(bytes: &[u8], mut at: usize) -> usize {
    while at < bytes.len() && bytes[at] == b'[' {
        match bytes[at..].iter().position(|&b| b == b']') {
            Some(close) => at += close + 1,
            None => break,
        }
    }
    at
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn finds_nested_and_indexed_references() {
        let refs = references("Hello ${user.name} from ${items}[0] and ${outer${inner}}");
        let names: Vec<_> = refs.iter().map(|r| (r.sigil, r.name)).collect();
        assert_eq!(
            names,
            vec![('$', "user.name"), ('$', "items"), ('$', "outer${inner}")]
        );
        assert_eq!(&"Hello ${user.name} from ${items}[0]"[refs[1].start..refs[1].end], "${items}[0]");
    }

    #[test]
    fn escaped_references_are_ignored() {
        assert!(references(r"\${not a variable}").is_empty());
        assert_eq!(references(r"\\${real}").len(), 1);
    }

    #[rstest]
    #[case("${x}", true)]
    #[case("${x}=", true)]
    #[case("${x} =", true)]
    #[case("@{list}", true)]
    #[case("&{dict}=", true)]
    #[case("${x}  =", false)]
    #[case("%{HOME}", false)]
    #[case("${x}[0]", false)]
    #[case("${a}${b}", false)]
    #[case("prefix ${x}", false)]
    #[case("${}", false)]
    #[case("Set Variable", false)]
    fn assignment_targets(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_assignment_target(text), expected);
    }

    #[test]
    fn single_variable_allows_item_access() {
        assert!(is_single_variable("${x}[0]"));
        assert!(!is_single_variable("${x} y"));
    }

    #[test]
    fn dictionary_items_split_on_first_unescaped_equals() {
        assert_eq!(split_dictionary_item("a=b=c"), Some(("a", "b=c")));
        assert_eq!(split_dictionary_item(r"a\=b=c"), Some((r"a\=b", "c")));
        assert_eq!(split_dictionary_item("plain"), None);
    }
}
