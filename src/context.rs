use std::fmt::Write;

use crate::data_models::SearchResult;

/// Renders search results as the numbered grounding block handed to the model.
///
/// Each result becomes `[i] Source: <url>` / `Content: <content>` followed by
/// a blank line, where `i` is the 1-based position in `results`. Content is
/// passed through untruncated.
pub fn build_context(results: &[SearchResult]) -> String {
    let mut context = String::new();
    for (i, result) in results.iter().enumerate() {
        // writing into a String cannot fail
        let _ = write!(
            context,
            "[{}] Source: {}\nContent: {}\n\n",
            i + 1,
            result.url,
            result.content
        );
    }
    context
}
