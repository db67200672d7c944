//! @ai:module:intent Query category ordering, display names and top-N policy
//! @ai:module:layer domain
//! @ai:module:public_api CATEGORY_ORDER, display_name, ground_truth_depth, ordered_categories
//! @ai:module:stateless true

use std::collections::BTreeSet;

/// Fixed report order for known categories.
pub const CATEGORY_ORDER: [&str; 9] = [
    "exact_symbol",
    "exact_name",
    "exact_isin",
    "prefix",
    "typo",
    "substring",
    "multi_word",
    "symbol_spaces",
    "abbreviation",
];

const TOP_FIVE_CATEGORIES: [&str; 3] = ["typo", "prefix", "abbreviation"];

/// @ai:intent Human readable category name; unknown categories display verbatim
/// @ai:effects pure
pub fn display_name(category: &str) -> &str {
    match category {
        "exact_symbol" => "Exact symbol",
        "exact_name" => "Exact name",
        "exact_isin" => "Exact ISIN",
        "prefix" => "Prefix / progressive typing",
        "typo" => "Typo / misspelling",
        "substring" => "Keyword / substring",
        "multi_word" => "Multi-word descriptive",
        "symbol_spaces" => "Symbol with spaces",
        "abbreviation" => "Abbreviation (first letters)",
        other => other,
    }
}

/// @ai:intent How many ranked entries count toward a ground-truth hit
/// @ai:post 5 for typo, prefix and abbreviation; 1 otherwise
/// @ai:effects pure
pub fn ground_truth_depth(category: &str) -> usize {
    if TOP_FIVE_CATEGORIES.contains(&category) {
        5
    } else {
        1
    }
}

/// @ai:intent Order the given categories: known ones first, then the rest sorted
/// @ai:post each category appears once
/// @ai:effects pure
pub fn ordered_categories<'a, I>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: BTreeSet<&str> = categories.into_iter().collect();

    let known = CATEGORY_ORDER
        .iter()
        .filter(|c| present.contains(*c))
        .map(|c| c.to_string());

    let unknown = present
        .iter()
        .filter(|c| !CATEGORY_ORDER.contains(*c))
        .map(|c| c.to_string());

    known.chain(unknown).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_policy() {
        assert_eq!(ground_truth_depth("typo"), 5);
        assert_eq!(ground_truth_depth("abbreviation"), 5);
        assert_eq!(ground_truth_depth("exact_name"), 1);
        assert_eq!(ground_truth_depth("other"), 1);
    }

    #[test]
    fn test_ordered_categories_known_then_sorted_unknown() {
        let cats = ["zeta", "typo", "other", "exact_symbol", "typo"];
        assert_eq!(
            ordered_categories(cats),
            vec!["exact_symbol", "typo", "other", "zeta"]
        );
    }

    #[test]
    fn test_display_name_unknown_passthrough() {
        assert_eq!(display_name("prefix"), "Prefix / progressive typing");
        assert_eq!(display_name("misc"), "misc");
    }
}
