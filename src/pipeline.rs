use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use crate::citations::link_citations;
use crate::confidence::calculate_confidence;
use crate::context::build_context;
use crate::conversation::assemble_messages;
use crate::data_models::{AnswerResult, ConversationExchange, ConversationHistory, SearchDepth};
use crate::error::PipelineError;
use crate::followups::suggest_followups;
use crate::llm::AnswerClient;
use crate::search::SearchClient;

/// Stages a single question moves through. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Searching,
    Contextualizing,
    Prompting,
    Answering,
    Postprocessing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A finished answer plus the history the caller should store for next time.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub result: AnswerResult,
    pub history: ConversationHistory,
}

/// Sequences search, prompting, completion and post-processing for one question.
///
/// The pipeline holds no per-session state. Callers pass the current history
/// in and persist the returned one; on failure the history they hold stays
/// valid as-is.
#[derive(Clone)]
pub struct AnswerPipeline {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn AnswerClient>,
}

impl AnswerPipeline {
    pub fn new(search: Arc<dyn SearchClient>, llm: Arc<dyn AnswerClient>) -> Self {
        Self { search, llm }
    }

    /// Answers `question` in the context of `history`.
    ///
    /// Runs on its own task so a panicking client is reported as
    /// [`PipelineError::Unexpected`] instead of unwinding into the caller.
    pub async fn answer(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> Result<PipelineOutcome, PipelineError> {
        let pipeline = self.clone();
        let question = question.to_string();
        let history = history.clone();
        let span = tracing::info_span!("answer", question = %question);

        tokio::spawn(async move { pipeline.run(&question, &history).await }.instrument(span))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "answer task aborted");
                PipelineError::Unexpected(e.to_string())
            })?
    }

    async fn run(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> Result<PipelineOutcome, PipelineError> {
        tracing::debug!(stage = %Stage::Validating);
        if question.trim().is_empty() {
            tracing::warn!("rejected empty question");
            return Err(PipelineError::EmptyQuestion);
        }

        let depth = SearchDepth::for_question(question);
        tracing::debug!(stage = %Stage::Searching, depth = depth.as_str());
        let results = self.search.search(question, depth).await.map_err(|e| {
            tracing::warn!(error = %e, "search failed");
            PipelineError::from(e)
        })?;

        tracing::debug!(stage = %Stage::Contextualizing, results = results.len());
        let context = build_context(&results);
        let confidence = calculate_confidence(&results, depth);
        let sources: Vec<String> = results
            .iter()
            .filter(|r| !r.url.is_empty())
            .map(|r| r.url.clone())
            .collect();

        tracing::debug!(stage = %Stage::Prompting, history = history.len());
        let messages = assemble_messages(question, &context, history);

        tracing::debug!(stage = %Stage::Answering, messages = messages.len());
        let raw_answer = self.llm.complete(&messages).await.map_err(|e| {
            tracing::warn!(error = %e, "answer generation failed");
            PipelineError::from(e)
        })?;

        tracing::debug!(stage = %Stage::Postprocessing);
        let (cited_answer, citation_map) = link_citations(&raw_answer, &sources);
        let followups = suggest_followups(question, &raw_answer, &sources);
        let history = history.appended(ConversationExchange::new(question, raw_answer.as_str()));

        tracing::info!(
            stage = %Stage::Done,
            sources = sources.len(),
            citations = citation_map.len(),
            confidence = %confidence,
            "answered question"
        );

        Ok(PipelineOutcome {
            result: AnswerResult {
                raw_answer,
                cited_answer,
                citation_map,
                followups,
                confidence,
                sources,
            },
            history,
        })
    }
}
