use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::config::DiscoveryConfig;

static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric pattern compiles"));

/// Substrings that mark copyright notices, links and other non-biological text.
const NON_BIOLOGICAL_MARKERS: &[&str] = &["©", "http", "://"];

/// Outcome of inspecting one path's sampled values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No non-null samples were available.
    Empty,
    NumericDominated,
    LongText,
    /// Categorical, with the number of distinct non-null values observed.
    Categorical { distinct: usize },
}

impl Classification {
    pub fn is_categorical(&self) -> bool {
        matches!(self, Classification::Categorical { .. })
    }
}

pub fn is_numeric(value: &str) -> bool {
    NUMERIC_PATTERN.is_match(value.trim())
}

pub fn is_long_text(value: &str, config: &DiscoveryConfig) -> bool {
    value.chars().count() > config.long_text_threshold
        || NON_BIOLOGICAL_MARKERS
            .iter()
            .any(|marker| value.contains(marker))
}

/// Decides whether a path's samples look like an enumeration.
///
/// Nulls are dropped first. The numeric test runs before the long-text test
/// and both compare with a strict `>`, so a ratio sitting exactly on its
/// threshold never excludes the path.
pub fn classify(values: &[Option<String>], config: &DiscoveryConfig) -> Classification {
    let present = values.iter().flatten().map(String::as_str).collect::<Vec<_>>();
    if present.is_empty() {
        return Classification::Empty;
    }
    let total = present.len() as f64;

    let numeric = present.iter().filter(|value| is_numeric(value)).count();
    if numeric as f64 / total > config.numeric_ratio_threshold {
        return Classification::NumericDominated;
    }

    let long_text = present
        .iter()
        .filter(|value| is_long_text(value, config))
        .count();
    if long_text as f64 / total > config.long_text_ratio_threshold {
        return Classification::LongText;
    }

    let distinct = present.iter().collect::<HashSet<_>>().len();
    Classification::Categorical { distinct }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn numeric_pattern_accepts_signed_decimals_only() {
        for value in ["1", "-12", "3.25", "-0.5", " 42 "] {
            assert!(is_numeric(value), "{value:?} should be numeric");
        }
        for value in ["1.", ".5", "+3", "1e5", "12a", "", "-"] {
            assert!(!is_numeric(value), "{value:?} should not be numeric");
        }
    }

    #[test]
    fn all_numeric_values_are_excluded() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            classify(&samples(&["1", "2", "3"]), &config),
            Classification::NumericDominated
        );
    }

    #[test]
    fn minority_numeric_values_stay_categorical() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            classify(&samples(&["1", "a", "b"]), &config),
            Classification::Categorical { distinct: 3 }
        );
    }

    #[test]
    fn numeric_ratio_at_threshold_is_not_excluded() {
        let config = DiscoveryConfig::default();
        let result = classify(&samples(&["1", "2", "aerobe", "anaerobe"]), &config);
        assert_eq!(result, Classification::Categorical { distinct: 4 });
    }

    #[test]
    fn long_value_dominating_sample_is_excluded() {
        let config = DiscoveryConfig::default();
        let long = "x".repeat(51);
        assert_eq!(
            classify(&samples(&[&long, "short"]), &config),
            Classification::LongText
        );
        let exactly_fifty = "y".repeat(50);
        assert!(!is_long_text(&exactly_fifty, &config));
    }

    #[test]
    fn link_counts_as_long_text_regardless_of_length() {
        let config = DiscoveryConfig::default();
        assert!(is_long_text("http://x", &config));
        assert!(is_long_text("© DSMZ", &config));
        assert_eq!(
            classify(&samples(&["http://x", "rod"]), &config),
            Classification::LongText
        );
    }

    #[test]
    fn long_text_ratio_at_threshold_is_not_excluded() {
        let config = DiscoveryConfig::default();
        let mut values = samples(&["a", "b", "c", "d", "e", "f", "g"]);
        values.extend(samples(&["see https://bacdive.dsmz.de", "ftp://host", "© 2024"]));
        assert_eq!(
            classify(&values, &config),
            Classification::Categorical { distinct: 10 }
        );
    }

    #[test]
    fn nulls_are_ignored_and_empty_samples_are_flagged() {
        let config = DiscoveryConfig::default();
        assert_eq!(classify(&[None, None], &config), Classification::Empty);
        assert_eq!(classify(&[], &config), Classification::Empty);
        let values = vec![None, Some("1".to_string()), None, Some("rod".to_string())];
        assert_eq!(
            classify(&values, &config),
            Classification::Categorical { distinct: 2 }
        );
    }

    #[test]
    fn distinct_count_ignores_repeats() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            classify(&samples(&["yes", "no", "yes", "yes"]), &config),
            Classification::Categorical { distinct: 2 }
        );
    }
}
