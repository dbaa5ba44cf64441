/// Keyword triggers paired with the follow-ups they produce, in priority order.
///
/// The first entry whose keywords appear anywhere in the lower-cased question
/// wins. Matching is by substring, so "who" also fires on "whole".
const CATEGORIES: &[(&[&str], [&str; 3])] = &[
    (
        &["what is", "explain", "how does", "what are"],
        [
            "Can you give me more details about this?",
            "What are the main applications of this?",
            "How has this evolved over time?",
        ],
    ),
    (
        &["who", "person", "people"],
        [
            "What are their major achievements?",
            "What's their background?",
            "How did they get started?",
        ],
    ),
    (
        &["when", "date", "year"],
        [
            "What led up to this event?",
            "What were the consequences?",
            "How did this change things?",
        ],
    ),
    (
        &["where", "location", "place"],
        [
            "What's the significance of this location?",
            "What can you tell me about the surroundings?",
            "How has this place changed?",
        ],
    ),
];

const GENERIC: [&str; 3] = [
    "Can you elaborate on this?",
    "What are the key implications?",
    "Are there any related topics I should know about?",
];

pub const MAX_FOLLOWUPS: usize = 3;

/// Suggests next questions from the wording of `question`.
///
/// `answer` and `sources` are accepted so richer policies can use them; the
/// keyword rules only look at the question.
pub fn suggest_followups(question: &str, _answer: &str, _sources: &[String]) -> Vec<String> {
    let question = question.to_lowercase();
    let templates = CATEGORIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map(|(_, templates)| templates)
        .unwrap_or(&GENERIC);

    templates
        .iter()
        .take(MAX_FOLLOWUPS)
        .map(|t| t.to_string())
        .collect()
}
