use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Number of exchanges kept in a conversation window.
pub const MAX_HISTORY_LENGTH: usize = 5;

/// A single ranked hit returned by the search provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(rename = "score", default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl SearchResult {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> SearchResult {
        SearchResult {
            url: url.into(),
            content: content.into(),
            relevance_score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> SearchResult {
        self.relevance_score = Some(score);
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

impl SearchDepth {
    /// Questions longer than this many words get an advanced search.
    pub const ADVANCED_WORD_THRESHOLD: usize = 10;

    pub fn for_question(question: &str) -> SearchDepth {
        if question.split_whitespace().count() > Self::ADVANCED_WORD_THRESHOLD {
            SearchDepth::Advanced
        } else {
            SearchDepth::Basic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceLabel::Low => "Low",
            ConfidenceLabel::Medium => "Medium",
            ConfidenceLabel::High => "High",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScore {
    pub label: ConfidenceLabel,
    pub value: f64,
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {:.2}", self.label, self.value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConversationExchange {
    pub question: String,
    pub answer: String,
}

impl ConversationExchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> ConversationExchange {
        ConversationExchange {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Sliding window of the most recent exchanges, oldest first.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ConversationHistory {
    exchanges: VecDeque<ConversationExchange>,
}

impl ConversationHistory {
    pub fn new() -> ConversationHistory {
        ConversationHistory::default()
    }

    /// Appends an exchange and evicts from the front until the window fits.
    pub fn push(&mut self, exchange: ConversationExchange) {
        self.exchanges.push_back(exchange);
        while self.exchanges.len() > MAX_HISTORY_LENGTH {
            self.exchanges.pop_front();
        }
    }

    /// Returns a copy of `self` with `exchange` appended.
    pub fn appended(&self, exchange: ConversationExchange) -> ConversationHistory {
        let mut next = self.clone();
        next.push(exchange);
        next
    }

    /// The last `MAX_HISTORY_LENGTH` exchanges in chronological order.
    pub fn recent(&self) -> impl Iterator<Item = &ConversationExchange> {
        let skip = self.exchanges.len().saturating_sub(MAX_HISTORY_LENGTH);
        self.exchanges.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

// Deserializing goes through `push` so an oversized list is trimmed on the way in.
impl<'de> Deserialize<'de> for ConversationHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let exchanges = Vec::<ConversationExchange>::deserialize(deserializer)?;
        Ok(exchanges.into_iter().collect())
    }
}

impl FromIterator<ConversationExchange> for ConversationHistory {
    fn from_iter<I: IntoIterator<Item = ConversationExchange>>(iter: I) -> Self {
        let mut history = ConversationHistory::new();
        for exchange in iter {
            history.push(exchange);
        }
        history
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Citation number to source URL, ordered by number.
pub type CitationMap = BTreeMap<usize, String>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub raw_answer: String,
    pub cited_answer: String,
    pub citation_map: CitationMap,
    pub followups: Vec<String>,
    pub confidence: ConfidenceScore,
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_depth_word_threshold() {
        assert_eq!(SearchDepth::for_question("What is photosynthesis?"), SearchDepth::Basic);
        // exactly ten words stays basic
        assert_eq!(
            SearchDepth::for_question("one two three four five six seven eight nine ten"),
            SearchDepth::Basic
        );
        assert_eq!(
            SearchDepth::for_question("one two three four five six seven eight nine ten eleven"),
            SearchDepth::Advanced
        );
        // runs of whitespace do not create empty words
        assert_eq!(
            SearchDepth::for_question("  one   two\tthree\n four  "),
            SearchDepth::Basic
        );
    }

    #[test]
    fn test_history_window_evicts_oldest() {
        let mut history = ConversationHistory::new();
        for i in 0..7 {
            history.push(ConversationExchange::new(format!("q{i}"), format!("a{i}")));
        }
        assert_eq!(history.len(), MAX_HISTORY_LENGTH);
        let questions: Vec<&str> = history.recent().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["q2", "q3", "q4", "q5", "q6"]);
    }

    #[test]
    fn test_appended_leaves_original_untouched() {
        let history: ConversationHistory = vec![ConversationExchange::new("q", "a")]
            .into_iter()
            .collect();
        let next = history.appended(ConversationExchange::new("q2", "a2"));
        assert_eq!(history.len(), 1);
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_history_serializes_as_plain_list() {
        let history: ConversationHistory = vec![ConversationExchange::new("q", "a")]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!([{"question": "q", "answer": "a"}]));
    }

    #[test]
    fn test_search_result_missing_fields() {
        let result: SearchResult =
            serde_json::from_value(serde_json::json!({"content": "text"})).unwrap();
        assert_eq!(result.url, "");
        assert_eq!(result.relevance_score, None);

        let null_url: SearchResult =
            serde_json::from_value(serde_json::json!({"url": null, "content": "x", "score": null}))
                .unwrap();
        assert_eq!(null_url.url, "");
        assert_eq!(null_url.relevance_score, None);

        let scored: SearchResult = serde_json::from_value(
            serde_json::json!({"url": "https://a.example", "content": "x", "score": 0.5}),
        )
        .unwrap();
        assert_eq!(scored.relevance_score, Some(0.5));
    }

    #[test]
    fn test_confidence_display() {
        let score = ConfidenceScore {
            label: ConfidenceLabel::Medium,
            value: 0.72,
        };
        assert_eq!(score.to_string(), "Medium – 0.72");
    }
}
