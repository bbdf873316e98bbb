//! The text-analysis collaborator used by analyze operators.

use crate::canvas::AnalysisType;

/// Produces a label or score of the requested kind for a piece of text.
///
/// The analyze operator calls this once per row with non-empty text. A real
/// deployment would plug in a model client here; [`HeuristicAnalyzer`] is
/// the deterministic built-in used for previews and tests.
pub trait TextAnalyzer {
    fn analyze(&self, text: &str, kind: AnalysisType) -> String;
}

/// Deterministic, dictionary-based analysis. Same text in, same label out.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "excellent", "best", "good", "amazing", "friendly", "happy",
];
const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "awful", "bad", "worst", "hate", "poor", "broken", "disappointing",
];

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn sentiment(text: &str) -> &'static str {
        let lower = text.to_lowercase();
        let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count();
        let positive = hits(POSITIVE_WORDS);
        let negative = hits(NEGATIVE_WORDS);
        if positive > negative {
            "Positive"
        } else if negative > positive {
            "Negative"
        } else {
            "Neutral"
        }
    }

    fn keywords(text: &str) -> String {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.len() > 3)
            .take(3)
            .collect();
        if words.is_empty() {
            "No keywords found".to_string()
        } else {
            words.join(", ")
        }
    }

    fn entity(text: &str) -> &'static str {
        // Coarse category guess: dates before names before places.
        if text.chars().filter(|c| c.is_ascii_digit()).count() >= 4 {
            return "Date";
        }
        let capitalized = text
            .split_whitespace()
            .skip(1)
            .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
            .count();
        match capitalized {
            0 => "Organization",
            1 => "Person",
            _ => "Location",
        }
    }

    fn language(text: &str) -> &'static str {
        let lower = format!(" {} ", text.to_lowercase());
        let score = |words: &[&str]| {
            words
                .iter()
                .filter(|w| lower.contains(&format!(" {} ", w)))
                .count()
        };
        let candidates = [
            ("English", score(&["the", "and", "was", "is", "of"])),
            ("French", score(&["le", "la", "et", "est", "les"])),
            ("German", score(&["der", "die", "und", "ist", "das"])),
            ("Spanish", score(&["el", "los", "es", "una"])),
        ];
        candidates
            .iter()
            .filter(|(_, s)| *s > 0)
            .max_by_key(|(_, s)| *s)
            .map(|(name, _)| *name)
            .unwrap_or("Unknown")
    }
}

impl TextAnalyzer for HeuristicAnalyzer {
    fn analyze(&self, text: &str, kind: AnalysisType) -> String {
        match kind {
            AnalysisType::Sentiment => Self::sentiment(text).to_string(),
            AnalysisType::Keyword => Self::keywords(text),
            AnalysisType::Entity => Self::entity(text).to_string(),
            AnalysisType::Language => Self::language(text).to_string(),
            AnalysisType::Unsupported(_) => "Analysis not supported".to_string(),
        }
    }
}
