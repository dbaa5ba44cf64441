use crate::data_models::{ChatMessage, ConversationHistory};

pub const SYSTEM_PROMPT: &str = "You are a factual assistant that provides web-grounded answers. \
Always respond in this exact structure:\n\n\
DIRECT ANSWER: [1-2 sentences]\n\n\
KEY POINTS:\n- [bullet point]\n- [bullet point]\n\n\
UNCERTAINTY/ASSUMPTIONS:\n[List any uncertainties or assumptions made]\n\n\
SOURCES USED:\n[Cite sources by number, e.g., [1], [2]]\n\n\
Answer strictly using the provided context. \
If the answer is not in the context, say you don't know.";

/// Builds the message sequence for one completion call.
///
/// Order is: the system instruction, then a user/assistant pair for each
/// recent exchange (oldest first), then the grounded question.
pub fn assemble_messages(
    question: &str,
    context: &str,
    history: &ConversationHistory,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + history.len() * 2);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));

    for exchange in history.recent() {
        messages.push(ChatMessage::user(exchange.question.as_str()));
        messages.push(ChatMessage::assistant(exchange.answer.as_str()));
    }

    messages.push(ChatMessage::user(format!(
        "Context:\n{context}\n\nQuestion:\n{question}"
    )));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::{ConversationExchange, Role};

    #[test]
    fn test_without_history() {
        let messages = assemble_messages("Why?", "[1] Source: u\nContent: c\n\n", &ConversationHistory::new());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "Context:\n[1] Source: u\nContent: c\n\n\n\nQuestion:\nWhy?"
        );
    }

    #[test]
    fn test_history_interleaved_in_order() {
        let history: ConversationHistory = vec![
            ConversationExchange::new("q1", "a1"),
            ConversationExchange::new("q2", "a2"),
        ]
        .into_iter()
        .collect();
        let messages = assemble_messages("q3", "", &history);

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(messages[1].content, "q1");
        assert_eq!(messages[2].content, "a1");
        assert_eq!(messages[3].content, "q2");
        assert_eq!(messages[4].content, "a2");
        assert!(messages[5].content.ends_with("Question:\nq3"));
    }

    #[test]
    fn test_history_is_not_mutated() {
        let history: ConversationHistory =
            vec![ConversationExchange::new("q1", "a1")].into_iter().collect();
        let before = history.clone();
        let _ = assemble_messages("q2", "ctx", &history);
        assert_eq!(history, before);
    }

    #[test]
    fn test_system_prompt_sections() {
        for section in [
            "DIRECT ANSWER:",
            "KEY POINTS:",
            "UNCERTAINTY/ASSUMPTIONS:",
            "SOURCES USED:",
        ] {
            assert!(SYSTEM_PROMPT.contains(section), "missing {section}");
        }
    }
}
