//! Automatic account-code assignment.
//!
//! Codes are digit strings ("1111", "4101"). When a code is not supplied at
//! creation, the next code is derived from the existing siblings under the
//! same parent: the numerically highest sibling code is incremented, keeping
//! its width. A parent with no children yet gets `parent_code + "01"`; an
//! empty top level starts at "1".

/// Derives the next account code under the given parent.
///
/// `sibling_codes` are the codes of existing accounts that share the parent.
/// Codes that do not parse as unsigned integers are skipped when looking for
/// the numeric maximum.
#[must_use]
pub fn next_code(parent_code: Option<&str>, sibling_codes: &[String]) -> String {
    let highest = sibling_codes
        .iter()
        .filter_map(|code| code.parse::<u64>().ok().map(|n| (n, code.len())))
        .max_by_key(|&(n, _)| n);

    match highest {
        Some((n, width)) => {
            let next = n + 1;
            format!("{next:0width$}")
        }
        None => match parent_code {
            Some(parent) => format!("{parent}01"),
            None => "1".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[rstest]
    #[case(&["4101", "4102", "4103"], "4104")]
    #[case(&["4101"], "4102")]
    #[case(&["4109"], "4110")]
    #[case(&["4102", "4101"], "4103")]
    fn test_increments_highest_sibling(#[case] siblings: &[&str], #[case] expected: &str) {
        assert_eq!(next_code(Some("41"), &codes(siblings)), expected);
    }

    #[test]
    fn test_first_child_appends_01() {
        assert_eq!(next_code(Some("41"), &[]), "4101");
        assert_eq!(next_code(Some("2141"), &[]), "214101");
    }

    #[test]
    fn test_empty_top_level_starts_at_one() {
        assert_eq!(next_code(None, &[]), "1");
    }

    #[test]
    fn test_top_level_increments_highest_block() {
        assert_eq!(next_code(None, &codes(&["1", "2", "3"])), "4");
        assert_eq!(next_code(None, &codes(&["1000", "2000"])), "2001");
    }

    #[test]
    fn test_preserves_leading_zero_width() {
        assert_eq!(next_code(Some("1"), &codes(&["101", "102"])), "103");
        assert_eq!(next_code(Some("01"), &codes(&["0101"])), "0102");
    }

    #[test]
    fn test_non_numeric_siblings_are_skipped() {
        assert_eq!(next_code(Some("41"), &codes(&["41-A", "4101"])), "4102");
        // Only unparseable siblings behaves like no siblings at all.
        assert_eq!(next_code(Some("41"), &codes(&["41-A"])), "4101");
    }

    #[test]
    fn test_width_grows_on_rollover() {
        assert_eq!(next_code(Some("41"), &codes(&["4199"])), "4200");
        assert_eq!(next_code(Some("9"), &codes(&["999"])), "1000");
    }
}
