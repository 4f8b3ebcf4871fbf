use std::collections::HashMap;

/// Damerau–Levenshtein distance between two strings, counted in chars.
///
/// Insertions, deletions, substitutions and transpositions of adjacent
/// characters each cost one (unrestricted variant).
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a.len(), b.len());

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let max_dist = len_a + len_b;
    let width = len_b + 2;
    let mut d = vec![0usize; (len_a + 2) * width];
    let idx = |i: usize, j: usize| i * width + j;

    d[idx(0, 0)] = max_dist;
    for i in 0..=len_a {
        d[idx(i + 1, 0)] = max_dist;
        d[idx(i + 1, 1)] = i;
    }
    for j in 0..=len_b {
        d[idx(0, j + 1)] = max_dist;
        d[idx(1, j + 1)] = j;
    }

    // Last row in which each character was seen.
    let mut last_row: HashMap<char, usize> = HashMap::new();

    for i in 1..=len_a {
        let mut last_match_col = 0;
        for j in 1..=len_b {
            let i1 = last_row.get(&b[j - 1]).copied().unwrap_or(0);
            let j1 = last_match_col;
            let cost = if a[i - 1] == b[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };

            let substitution = d[idx(i, j)] + cost;
            let insertion = d[idx(i + 1, j)] + 1;
            let deletion = d[idx(i, j + 1)] + 1;
            let transposition = d[idx(i1, j1)] + (i - i1 - 1) + 1 + (j - j1 - 1);

            d[idx(i + 1, j + 1)] = substitution.min(insertion).min(deletion).min(transposition);
        }
        last_row.insert(a[i - 1], i);
    }

    d[idx(len_a + 1, len_b + 1)]
}

#[cfg(test)]
mod tests {
    use super::damerau_levenshtein;

    #[test]
    fn identical_strings() {
        assert_eq!(damerau_levenshtein("blocked", "blocked"), 0);
        assert_eq!(damerau_levenshtein("", ""), 0);
    }

    #[test]
    fn empty_side_costs_length() {
        assert_eq!(damerau_levenshtein("", "abc"), 3);
        assert_eq!(damerau_levenshtein("abcd", ""), 4);
    }

    #[test]
    fn single_edits() {
        assert_eq!(damerau_levenshtein("color", "colr"), 1);
        assert_eq!(damerau_levenshtein("color", "colour"), 1);
        assert_eq!(damerau_levenshtein("color", "dolor"), 1);
    }

    #[test]
    fn adjacent_transposition_costs_one() {
        assert_eq!(damerau_levenshtein("color", "colro"), 1);
        assert_eq!(damerau_levenshtein("ab", "ba"), 1);
    }

    #[test]
    fn unrestricted_transposition_with_edit_between() {
        // The optimal-string-alignment variant would answer 3 here.
        assert_eq!(damerau_levenshtein("ca", "abc"), 2);
    }

    #[test]
    fn multiple_edits() {
        assert_eq!(damerau_levenshtein("kitten", "sitting"), 3);
        assert_eq!(damerau_levenshtein("blocker", "locked"), 2);
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(damerau_levenshtein("café", "cafe"), 1);
    }
}
