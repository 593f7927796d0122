//! Prompt for LLM extraction from scraped content.
//!
//! One canonical, versioned template. Bump [`PROMPT_VERSION`] whenever the
//! wording changes so traces can tell revisions apart.

use crate::types::outcome::NO_RELEVANT_INFORMATION;

/// Version of [`EXTRACTION_PROMPT`].
pub const PROMPT_VERSION: &str = "2";

/// The only answer a compliant model gives to a disallowed request.
pub const SAFETY_REFUSAL: &str = "Warning: The requested content is inappropriate and violates the safety guidelines. This tool cannot be used for such purposes.";

/// Topics the model must refuse to process.
pub const DISALLOWED_TOPICS: [&str; 8] = [
    "adult content",
    "NSFW",
    "sexual topics (including nude or semi-nude magazines/websites)",
    "gambling",
    "dark web",
    "child assault",
    "sex trafficking",
    "any other illegal activities",
];

/// Extraction prompt. `{topics}`, `{refusal}` and `{no_answer}` are fixed at
/// build time; `{context}` and `{query}` carry the request.
pub const EXTRACTION_PROMPT: &str = r#"You are an expert assistant who extracts useful, structured information from the content provided to you. Most of the time the content comes from e-commerce websites, and users ask you to extract product information such as product name, price and rating.

**Safety Guardrails:**
You have a strict policy against processing harmful content. If the user's question or the provided context involves any of the following topics, you must refuse to answer: {topics}. In that case respond with only this exact message and nothing else: "{refusal}"

State your identity (model name and provider, if applicable) at the beginning of your answer.

**Formatting:**
- If you are asked to extract product information, give the final answer as a markdown table.
- Otherwise, answer in plain markdown prose.
- If the user asks for JSON, answer in JSON only.

Users mostly ask for product information but may ask for anything contained in the content, so read the question carefully and extract accordingly.

**Accuracy:**
Do not hallucinate and never make up answers. If the context is empty or contains nothing relevant to the question, respond with exactly: "{no_answer}"
If the content looks like scraping did not work properly, suggest selecting a different scraper (FireCrawl or Crawl4AI) and trying again.
Never respond with an empty answer.

Context:
{context}

Question:
{query}

Your Identity:

Answer:
"#;

/// What the extraction flow should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedPrompt {
    /// Send this prompt to the model.
    Dispatch(String),
    /// Answer directly without calling a model.
    Answered(String),
}

/// Build the extraction prompt for `query` over `source_text`.
///
/// An empty `source_text` short-circuits to [`NO_RELEVANT_INFORMATION`].
/// Otherwise both values are inserted verbatim, untruncated and unescaped;
/// placeholder-like text inside them is never expanded.
pub fn build_prompt(query: &str, source_text: &str) -> PreparedPrompt {
    if source_text.is_empty() {
        return PreparedPrompt::Answered(NO_RELEVANT_INFORMATION.to_string());
    }

    PreparedPrompt::Dispatch(format_extraction_prompt(query, source_text))
}

/// Fill [`EXTRACTION_PROMPT`].
pub fn format_extraction_prompt(query: &str, context: &str) -> String {
    let template = EXTRACTION_PROMPT
        .replace("{topics}", &DISALLOWED_TOPICS.join(", "))
        .replace("{refusal}", SAFETY_REFUSAL)
        .replace("{no_answer}", NO_RELEVANT_INFORMATION);

    // Split on the request placeholders instead of replacing them, so that
    // user text is copied once and never rescanned.
    let (head, rest) = template
        .split_once("{context}")
        .unwrap_or((template.as_str(), ""));
    let (middle, tail) = rest.split_once("{query}").unwrap_or((rest, ""));

    let mut prompt =
        String::with_capacity(head.len() + context.len() + middle.len() + query.len() + tail.len());
    prompt.push_str(head);
    prompt.push_str(context);
    prompt.push_str(middle);
    prompt.push_str(query);
    prompt.push_str(tail);
    prompt
}

/// Pull the question back out of a built prompt.
pub fn question_of(prompt: &str) -> Option<&str> {
    let (_, after) = prompt.rsplit_once("\nQuestion:\n")?;
    let (question, _) = after.rsplit_once("\n\nYour Identity:")?;
    Some(question)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatched(query: &str, source: &str) -> String {
        match build_prompt(query, source) {
            PreparedPrompt::Dispatch(prompt) => prompt,
            PreparedPrompt::Answered(text) => panic!("expected a prompt, got {text:?}"),
        }
    }

    #[test]
    fn test_empty_source_short_circuits() {
        assert_eq!(
            build_prompt("find the price", ""),
            PreparedPrompt::Answered(
                "No relevant information found to answer your question.".to_string()
            )
        );
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let prompt = dispatched("Find product name and price", "# Cat food\n$10");

        let positions: Vec<usize> = [
            "You are an expert assistant",
            "**Safety Guardrails:**",
            SAFETY_REFUSAL,
            "State your identity",
            "markdown table",
            "JSON only",
            NO_RELEVANT_INFORMATION,
            "Context:\n# Cat food\n$10",
            "Question:\nFind product name and price",
        ]
        .iter()
        .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("missing {needle:?}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_lists_every_disallowed_topic() {
        let prompt = dispatched("q", "ctx");
        for topic in DISALLOWED_TOPICS {
            assert!(prompt.contains(topic), "missing topic {topic}");
        }
    }

    #[test]
    fn test_is_deterministic() {
        assert_eq!(dispatched("q", "ctx"), dispatched("q", "ctx"));
    }

    #[test]
    fn test_user_text_is_not_expanded_or_truncated() {
        let source = "price: {query} {context} ".repeat(20_000);
        let query = "what is {context}?";
        let prompt = dispatched(query, &source);

        assert!(prompt.contains(&source));
        assert_eq!(question_of(&prompt), Some(query));
        assert!(!prompt.contains("{topics}"));
    }
}
