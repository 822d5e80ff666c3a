//! Signal lexicon: per-axis resting values and weighted textual signals.
//!
//! Pure data. Patterns are either literal substrings or regular expressions;
//! both are matched against lower-cased input, so literals must be written
//! in lower case.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, check_unit};
use crate::metrics::Axis;

/// A single keyword pattern.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PatternSpec", into = "PatternSpec")]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

/// Serialized form of [`Pattern`]: `{ literal = "..." }` or `{ regex = "..." }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PatternSpec {
    Literal(String),
    Regex(String),
}

impl TryFrom<PatternSpec> for Pattern {
    type Error = ConfigError;

    fn try_from(spec: PatternSpec) -> Result<Self> {
        match spec {
            PatternSpec::Literal(s) => Ok(Pattern::Literal(s)),
            PatternSpec::Regex(src) => Pattern::regex(&src),
        }
    }
}

impl From<Pattern> for PatternSpec {
    fn from(p: Pattern) -> Self {
        match p {
            Pattern::Literal(s) => PatternSpec::Literal(s),
            Pattern::Regex(re) => PatternSpec::Regex(re.as_str().to_string()),
        }
    }
}

impl Pattern {
    pub fn literal(s: &str) -> Self {
        Pattern::Literal(s.to_string())
    }

    pub fn regex(src: &str) -> Result<Self> {
        Ok(Pattern::Regex(Regex::new(src)?))
    }

    /// Count non-overlapping matches in `text`.
    /// Empty literals and zero-length regex matches count as nothing.
    pub fn count_matches(&self, text: &str) -> usize {
        match self {
            Pattern::Literal(s) if s.is_empty() => 0,
            Pattern::Literal(s) => text.matches(s.as_str()).count(),
            Pattern::Regex(re) => re.find_iter(text).filter(|m| !m.is_empty()).count(),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Literal(a), Pattern::Literal(b)) => a == b,
            (Pattern::Regex(a), Pattern::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// A group of patterns sharing one impact per match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub patterns: Vec<Pattern>,
    pub impact: f64,
}

impl Signal {
    pub fn new(patterns: Vec<Pattern>, impact: f64) -> Self {
        Self { patterns, impact }
    }

    fn literals(words: &[&str], impact: f64) -> Self {
        Self::new(words.iter().map(|w| Pattern::literal(w)).collect(), impact)
    }
}

/// Lexicon entry for one axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisLexicon {
    /// Resting value assumed when the axis receives no signal.
    pub base: f64,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<Axis, AxisLexicon>,
}

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(build_builtin);

impl Default for Lexicon {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Lexicon {
    /// The shared built-in table.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    pub fn new(entries: BTreeMap<Axis, AxisLexicon>) -> Self {
        Self { entries }
    }

    pub fn get(&self, axis: Axis) -> Option<&AxisLexicon> {
        self.entries.get(&axis)
    }

    /// Resting value of `axis`, if the lexicon covers it.
    pub fn base(&self, axis: Axis) -> Option<f64> {
        self.entries.get(&axis).map(|e| e.base)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, &AxisLexicon)> {
        self.entries.iter().map(|(a, e)| (*a, e))
    }

    pub fn validate(&self) -> Result<()> {
        for (axis, entry) in &self.entries {
            check_unit(&format!("lexicon.{axis}.base"), entry.base, 0.0, 1.0, "[0, 1]")?;
            for signal in &entry.signals {
                if !signal.impact.is_finite() {
                    return Err(ConfigError::out_of_range(
                        format!("lexicon.{axis}.impact"),
                        signal.impact,
                        "a finite number",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn build_builtin() -> Lexicon {
    let re = |src: &str| Pattern::regex(src).expect("builtin lexicon regex");
    let mut entries = BTreeMap::new();

    entries.insert(
        Axis::Trust,
        AxisLexicon {
            base: 0.8,
            signals: vec![
                // agreement, gratitude, affiliation
                Signal::literals(
                    &["спасибо", "согласен", "понял", "хорошо", "доверяю", "верим", "мы", "🤗", "⟡"],
                    0.15,
                ),
                // doubt
                Signal::literals(
                    &["не уверен", "сомневаюсь", "наверно", "может быть", "не думаю", "трудно сказать"],
                    -0.2,
                ),
            ],
        },
    );

    entries.insert(
        Axis::Clarity,
        AxisLexicon {
            base: 0.7,
            signals: vec![
                Signal::new(
                    [re(r"[0-9]\."), re(r"[0-9]\)")]
                        .into_iter()
                        .chain(
                            ["шаг", "пункт", "конкретно", "точно", "ясно", "☉"]
                                .iter()
                                .map(|w| Pattern::literal(w)),
                        )
                        .collect(),
                    0.2,
                ),
                Signal::new(
                    vec![
                        Pattern::literal("не понимаю"),
                        Pattern::literal("запутался"),
                        Pattern::literal("сложно"),
                        Pattern::literal("неясно"),
                        re(r"\?\?\?"),
                        Pattern::literal("в смысле"),
                    ],
                    -0.3,
                ),
            ],
        },
    );

    entries.insert(
        Axis::Pain,
        AxisLexicon {
            base: 0.1,
            signals: vec![Signal::literals(
                &[
                    "∆", "⚑", "больно", "тяжело", "страшно", "не могу", "рухнуло", "устал",
                    "стресс", "проблема",
                ],
                0.4,
            )],
        },
    );

    entries.insert(
        Axis::Drift,
        AxisLexicon {
            base: 0.1,
            signals: vec![Signal::literals(
                &[
                    "кстати",
                    "другой вопрос",
                    "не по теме",
                    "возвращаясь",
                    "ушли от темы",
                    "противоречит",
                    "🪞",
                ],
                0.35,
            )],
        },
    );

    entries.insert(
        Axis::Chaos,
        AxisLexicon {
            base: 0.2,
            signals: vec![
                Signal::literals(
                    &["🜃", "хаос", "все смешалось", "бардак", "не знаю с чего начать"],
                    0.4,
                ),
                // indecision, topic switching
                Signal::literals(&["или", "а может", "хотя нет", "с другой стороны"], 0.15),
            ],
        },
    );

    entries.insert(
        Axis::Echo,
        AxisLexicon {
            base: 0.5,
            signals: vec![
                Signal::literals(&["повтори", "снова", "опять", "эхо", "📡", "резонирует"], 0.2),
                Signal::literals(&["мимо", "не слышишь", "не то"], -0.2),
            ],
        },
    );

    entries.insert(
        Axis::SilenceMass,
        AxisLexicon {
            base: 0.1,
            signals: vec![
                Signal::literals(&["...", "тишина", "молчи", "≈", "пауза"], 0.3),
                Signal::literals(&["говори", "расскажи", "ответь"], -0.1),
            ],
        },
    );

    Lexicon { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_axis() {
        let lex = Lexicon::builtin();
        for axis in Axis::ALL {
            assert!(lex.get(axis).is_some(), "missing axis {axis}");
        }
        assert!(lex.validate().is_ok());
    }

    #[test]
    fn test_builtin_bases() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.base(Axis::Trust), Some(0.8));
        assert_eq!(lex.base(Axis::Chaos), Some(0.2));
        assert_eq!(lex.base(Axis::Drift), Some(0.1));
    }

    #[test]
    fn test_literal_counts_non_overlapping() {
        let p = Pattern::literal("aa");
        assert_eq!(p.count_matches("aaaa"), 2);
        assert_eq!(p.count_matches("aaa"), 1);
    }

    #[test]
    fn test_literal_dots_are_not_wildcards() {
        let p = Pattern::literal("...");
        assert_eq!(p.count_matches("abc"), 0);
        assert_eq!(p.count_matches("ну..."), 1);
    }

    #[test]
    fn test_empty_literal_matches_nothing() {
        assert_eq!(Pattern::literal("").count_matches("anything"), 0);
    }

    #[test]
    fn test_zero_length_regex_matches_ignored() {
        let p = Pattern::regex("x*").unwrap();
        assert_eq!(p.count_matches("abc"), 0);
        assert_eq!(p.count_matches("axxbx"), 2);
    }

    #[test]
    fn test_regex_pattern() {
        let p = Pattern::regex(r"\d\.").unwrap();
        assert_eq!(p.count_matches("1. first 2. second"), 2);
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(matches!(
            Pattern::regex("("),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_pattern_serde_tagged() {
        let json = serde_json::to_string(&Pattern::literal("хаос")).unwrap();
        assert_eq!(json, r#"{"literal":"хаос"}"#);

        let p: Pattern = serde_json::from_str(r#"{"regex":"\\?\\?\\?"}"#).unwrap();
        assert_eq!(p.count_matches("что???"), 1);

        let bad: std::result::Result<Pattern, _> = serde_json::from_str(r#"{"regex":"("}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_lexicon_roundtrip_preserves_table() {
        let json = serde_json::to_string(Lexicon::builtin()).unwrap();
        let back: Lexicon = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, Lexicon::builtin());
    }

    #[test]
    fn test_validate_rejects_base_out_of_range() {
        let mut entries = BTreeMap::new();
        entries.insert(
            Axis::Pain,
            AxisLexicon {
                base: 1.5,
                signals: vec![],
            },
        );
        assert!(Lexicon::new(entries).validate().is_err());
    }
}
