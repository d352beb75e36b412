//! Topic Classification Rules

use serde::{Deserialize, Serialize};

/// Welfare topic a question is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceTopic {
    Insurance,
    Fatigue,
    Finance,
    Weather,
    Traffic,
    Health,
    Documents,
    Maintenance,
    /// No keyword matched
    General,
}

impl AdviceTopic {
    /// Topics in matching priority; the first hit wins
    pub const PRIORITY: [AdviceTopic; 8] = [
        AdviceTopic::Insurance,
        AdviceTopic::Fatigue,
        AdviceTopic::Finance,
        AdviceTopic::Weather,
        AdviceTopic::Traffic,
        AdviceTopic::Health,
        AdviceTopic::Documents,
        AdviceTopic::Maintenance,
    ];

    /// Trigger words and phrases, lowercase
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            AdviceTopic::Insurance => &["insurance", "coverage", "claim"],
            AdviceTopic::Fatigue => &["tired", "fatigue", "sleepy", "rest"],
            AdviceTopic::Finance => &["save money", "financial", "budget", "money"],
            AdviceTopic::Weather => &["weather", "rain", "storm", "drive"],
            AdviceTopic::Traffic => &["traffic", "jam", "macet"],
            AdviceTopic::Health => &["health", "sick", "medical"],
            AdviceTopic::Documents => &["license", "documents", "sim", "ktp"],
            AdviceTopic::Maintenance => &["bike maintenance", "motor maintenance", "service"],
            AdviceTopic::General => &[],
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceTopic::Insurance => "insurance",
            AdviceTopic::Fatigue => "fatigue",
            AdviceTopic::Finance => "finance",
            AdviceTopic::Weather => "weather",
            AdviceTopic::Traffic => "traffic",
            AdviceTopic::Health => "health",
            AdviceTopic::Documents => "documents",
            AdviceTopic::Maintenance => "maintenance",
            AdviceTopic::General => "general",
        }
    }

    /// Route a question. Keywords match whole words; phrases match consecutive words.
    pub fn classify(query: &str) -> AdviceTopic {
        let words = tokenize(query);
        Self::PRIORITY
            .iter()
            .copied()
            .find(|topic| topic.keywords().iter().any(|k| contains_phrase(&words, k)))
            .unwrap_or(AdviceTopic::General)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|w| w.iter().zip(&needle).all(|(a, b)| a.as_str() == *b))
}
