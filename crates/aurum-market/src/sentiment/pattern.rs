//! Formal-text analyzer based on a polarity/subjectivity word lexicon
//!
//! Each lexicon entry carries a polarity in [-1, 1] and a subjectivity in [0, 1].
//! A text scores the mean over matched words. An intensifier scales the next
//! matched word; a negation within the previous three tokens multiplies its
//! polarity by -0.5.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

const TOKEN_PATTERN: &str = r"[\p{L}\p{N}]+(?:['’-][\p{L}\p{N}]+)*";

/// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    // general evaluative adjectives
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("positive", 0.23, 0.55),
    ("strong", 0.43, 0.73),
    ("stronger", 0.5, 0.7),
    ("solid", 0.3, 0.5),
    ("healthy", 0.5, 0.5),
    ("optimistic", 0.6, 0.7),
    ("confident", 0.5, 0.8),
    ("happy", 0.8, 1.0),
    ("safe", 0.5, 0.5),
    ("stable", 0.3, 0.4),
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("weak", -0.38, 0.63),
    ("weaker", -0.4, 0.6),
    ("negative", -0.3, 0.4),
    ("pessimistic", -0.6, 0.7),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("uncertain", -0.2, 0.6),
    ("risky", -0.5, 0.6),
    ("volatile", -0.3, 0.5),
    ("fragile", -0.4, 0.6),
    ("worried", -0.5, 0.8),
    ("fearful", -0.6, 0.8),
    ("high", 0.16, 0.54),
    ("higher", 0.25, 0.5),
    ("low", -0.1, 0.3),
    ("lower", -0.15, 0.3),
    ("new", 0.14, 0.45),
    ("big", 0.1, 0.3),
    ("huge", 0.4, 0.9),
    ("massive", 0.2, 0.8),
    // market vocabulary
    ("bullish", 0.8, 0.7),
    ("bearish", -0.8, 0.7),
    ("rally", 0.6, 0.4),
    ("rallies", 0.6, 0.4),
    ("surge", 0.6, 0.4),
    ("surges", 0.6, 0.4),
    ("soar", 0.7, 0.5),
    ("soars", 0.7, 0.5),
    ("gain", 0.4, 0.3),
    ("gains", 0.4, 0.3),
    ("rise", 0.3, 0.2),
    ("rises", 0.3, 0.2),
    ("record", 0.3, 0.3),
    ("recovery", 0.4, 0.4),
    ("rebound", 0.4, 0.4),
    ("growth", 0.4, 0.3),
    ("profit", 0.5, 0.3),
    ("boom", 0.5, 0.5),
    ("crash", -0.8, 0.6),
    ("crashes", -0.8, 0.6),
    ("plunge", -0.7, 0.5),
    ("plunges", -0.7, 0.5),
    ("slump", -0.6, 0.5),
    ("drop", -0.4, 0.3),
    ("drops", -0.4, 0.3),
    ("fall", -0.4, 0.3),
    ("falls", -0.4, 0.3),
    ("decline", -0.4, 0.3),
    ("declines", -0.4, 0.3),
    ("loss", -0.5, 0.4),
    ("losses", -0.5, 0.4),
    ("crisis", -0.7, 0.6),
    ("recession", -0.7, 0.5),
    ("inflation", -0.2, 0.3),
    ("default", -0.6, 0.4),
    ("fear", -0.6, 0.7),
    ("fears", -0.6, 0.7),
    ("panic", -0.7, 0.8),
    ("risk", -0.3, 0.4),
    ("risks", -0.3, 0.4),
    ("turmoil", -0.6, 0.6),
    // Spanish coverage for Latin American outlets
    ("bueno", 0.7, 0.6),
    ("buena", 0.7, 0.6),
    ("alza", 0.4, 0.3),
    ("sube", 0.3, 0.2),
    ("récord", 0.3, 0.3),
    ("ganancias", 0.4, 0.3),
    ("malo", -0.7, 0.6),
    ("mala", -0.7, 0.6),
    ("caída", -0.4, 0.3),
    ("cae", -0.3, 0.2),
    ("pérdidas", -0.5, 0.4),
    ("riesgo", -0.3, 0.4),
];

/// (word, multiplier)
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("really", 1.2),
    ("incredibly", 1.5),
    ("sharply", 1.4),
    ("significantly", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("muy", 1.3),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "hardly", "barely", "cannot",
    "can't", "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
    "won't", "wouldn't", "shouldn't", "couldn't", "nunca", "sin",
];

/// Tokens a negation reaches forward
const NEGATION_WINDOW: usize = 3;

/// Pattern-analyzer output
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternScore {
    /// Mean polarity in [-1, 1]
    pub polarity: f64,
    /// Mean subjectivity in [0, 1]
    pub subjectivity: f64,
}

/// Analyzer tuned for well-formed prose (article bodies, summaries)
#[cfg_attr(test, mockall::automock)]
pub trait FormalAnalyzer: Send + Sync {
    /// Fails on input the analyzer cannot tokenize reliably
    fn analyze(&self, text: &str) -> Result<PatternScore>;
}

#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    token: Regex,
    lexicon: HashMap<String, (f64, f64)>,
    intensifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl PatternAnalyzer {
    pub fn new() -> Result<Self> {
        let token = Regex::new(TOKEN_PATTERN)
            .map_err(|e| MarketError::AnalyzerError(format!("invalid token pattern: {e}")))?;

        Ok(Self {
            token,
            lexicon: LEXICON
                .iter()
                .map(|&(w, p, s)| (w.to_string(), (p, s)))
                .collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|&(w, m)| (w.to_string(), m))
                .collect(),
            negations: NEGATIONS.iter().map(|w| (*w).to_string()).collect(),
        })
    }

    /// Add or replace a lexicon entry
    pub fn with_word(mut self, word: &str, polarity: f64, subjectivity: f64) -> Self {
        self.lexicon.insert(
            word.to_lowercase(),
            (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)),
        );
        self
    }

    fn is_negation(&self, token: &str) -> bool {
        self.negations.iter().any(|n| n == token)
    }
}

impl FormalAnalyzer for PatternAnalyzer {
    fn analyze(&self, text: &str) -> Result<PatternScore> {
        if let Some(bad) = text
            .chars()
            .find(|c| (c.is_control() && !c.is_whitespace()) || *c == char::REPLACEMENT_CHARACTER)
        {
            return Err(MarketError::AnalyzerError(format!(
                "malformed input: unexpected character U+{:04X}",
                u32::from(bad)
            )));
        }

        let tokens: Vec<String> = self
            .token
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase().replace('’', "'"))
            .collect();

        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;
        let mut multiplier = 1.0;
        let mut last_negation: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            if self.is_negation(token) {
                last_negation = Some(i);
                continue;
            }

            if let Some(&m) = self.intensifiers.get(token) {
                multiplier = m;
                continue;
            }

            let Some(&(polarity, subjectivity)) = self.lexicon.get(token) else {
                continue;
            };

            let mut polarity = polarity * multiplier;
            let subjectivity = (subjectivity * multiplier).clamp(0.0, 1.0);
            multiplier = 1.0;

            if last_negation.is_some_and(|n| i - n <= NEGATION_WINDOW) {
                polarity *= -0.5;
            }

            polarity_sum += polarity.clamp(-1.0, 1.0);
            subjectivity_sum += subjectivity;
            matched += 1;
        }

        if matched == 0 {
            return Ok(PatternScore::default());
        }

        let n = matched as f64;
        Ok(PatternScore {
            polarity: (polarity_sum / n).clamp(-1.0, 1.0),
            subjectivity: (subjectivity_sum / n).clamp(0.0, 1.0),
        })
    }
}
