use serde::{Deserialize, Serialize};

use crate::data_models::{AnswerResult, CitationMap, ConfidenceLabel, ConversationHistory};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: String,
    pub question: String,
    pub answer: String,
    pub cited_answer: String,
    pub citation_map: CitationMap,
    pub sources: Vec<String>,
    pub confidence: ConfidenceView,
    pub followups: Vec<String>,
    pub processing_time_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct ConfidenceView {
    pub label: ConfidenceLabel,
    pub value: f64,
    pub display: String,
}

impl AskResponse {
    pub fn new(
        session_id: String,
        question: String,
        result: AnswerResult,
        processing_time_ms: u128,
    ) -> AskResponse {
        AskResponse {
            session_id,
            question,
            answer: result.raw_answer,
            cited_answer: result.cited_answer,
            citation_map: result.citation_map,
            sources: result.sources,
            confidence: ConfidenceView {
                label: result.confidence.label,
                value: result.confidence.value,
                display: result.confidence.to_string(),
            },
            followups: result.followups,
            processing_time_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub exchanges: ConversationHistory,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
