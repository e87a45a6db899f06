pub(super) fn find(line: &str, from: usize) -> Option<(usize, usize)> {
    line.get(from..)?
        .find('\t')
        .map(|index| (from + index, from + index + 1))
}
