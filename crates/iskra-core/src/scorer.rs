use crate::lexicon::Lexicon;
use crate::metrics::{AxisScores, clamp};

/// Score `text` against `lexicon`, returning a target for every axis that
/// had at least one matching signal.
///
/// Each axis starts at its lexicon base; every match of every pattern adds
/// the signal's impact. Axes with no match are omitted so the caller leaves
/// their prior targets untouched. Matched scores are clamped to [0, 1].
pub fn score(lexicon: &Lexicon, text: &str) -> AxisScores {
    let mut scores = AxisScores::new();
    if text.trim().is_empty() {
        return scores;
    }

    let lower = text.to_lowercase();
    for (axis, entry) in lexicon.iter() {
        let mut value = entry.base;
        let mut matched = false;

        for signal in &entry.signals {
            for pattern in &signal.patterns {
                let count = pattern.count_matches(&lower);
                if count > 0 {
                    value += signal.impact * count as f64;
                    matched = true;
                }
            }
        }

        if matched {
            scores.insert(axis, clamp(value, 0.0, 1.0));
        }
    }

    scores
}

/// Score against the built-in lexicon.
pub fn score_builtin(text: &str) -> AxisScores {
    score(Lexicon::builtin(), text)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::lexicon::{AxisLexicon, Pattern, Signal};
    use crate::metrics::Axis;

    fn trust_only() -> Lexicon {
        let mut entries = BTreeMap::new();
        entries.insert(
            Axis::Trust,
            AxisLexicon {
                base: 0.8,
                signals: vec![Signal::new(vec![Pattern::literal("спасибо")], 0.15)],
            },
        );
        Lexicon::new(entries)
    }

    #[test]
    fn test_repeated_keyword_adds_per_occurrence() {
        let scores = score(&trust_only(), "большое спасибо спасибо");
        assert_eq!(scores.len(), 1);
        assert_abs_diff_eq!(scores[&Axis::Trust], 1.0);
    }

    #[test]
    fn test_single_match_below_cap() {
        let scores = score(&trust_only(), "спасибо");
        assert_abs_diff_eq!(scores[&Axis::Trust], 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_and_whitespace_produce_nothing() {
        assert!(score_builtin("").is_empty());
        assert!(score_builtin("   ").is_empty());
        assert!(score_builtin("\n\t").is_empty());
    }

    #[test]
    fn test_unrecognized_text_produces_nothing() {
        assert!(score_builtin("the weather is fine today").is_empty());
    }

    #[test]
    fn test_input_is_lower_cased() {
        let scores = score(&trust_only(), "СПАСИБО");
        assert!(scores.contains_key(&Axis::Trust));
    }

    #[test]
    fn test_unaddressed_axes_omitted() {
        let scores = score_builtin("мне больно");
        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec![Axis::Pain]);
        assert_abs_diff_eq!(scores[&Axis::Pain], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_impact_clamps_at_zero() {
        let scores = score_builtin("не понимаю, запутался, сложно, неясно???");
        assert_abs_diff_eq!(scores[&Axis::Clarity], 0.0);
    }

    #[test]
    fn test_regex_signal_counts() {
        // "1." and "2." each add 0.2 to clarity base 0.7
        let scores = score_builtin("1. встать 2. выпить воды");
        assert_abs_diff_eq!(scores[&Axis::Clarity], 1.0);
    }

    #[test]
    fn test_numbered_steps_need_ascii_digits() {
        // Arabic-Indic digits are not list markers
        assert!(score_builtin("١. ٢.").get(&Axis::Clarity).is_none());
        assert!(score_builtin("١) ٢)").get(&Axis::Clarity).is_none());
    }

    #[test]
    fn test_matched_signals_that_cancel_still_address_axis() {
        // +0.15 and -0.2 both matched: axis addressed at base + (-0.05)
        let scores = score_builtin("спасибо, но я не уверен");
        assert_abs_diff_eq!(scores[&Axis::Trust], 0.75, epsilon = 1e-12);
    }
}
