//! Grounded prompt assembly.

/// Separator placed between context chunks.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Build a prompt that restricts the generator to the supplied context.
///
/// Chunks are joined with a blank line, in the order given (best match first
/// when fed from the retriever). Pure and infallible.
pub fn build_prompt(context: &[String], question: &str) -> String {
    let context_text = context.join(CONTEXT_SEPARATOR);

    format!(
        "You are a helpful assistant.

Answer the question using ONLY the context below.
If the answer cannot be found in the context, say \"I don't know\".

Context:
{context_text}

Question:
{question}

Answer:
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let context = vec![
            "John Doe founded the company.".to_string(),
            "SGFD is an AI defence company.".to_string(),
        ];

        let prompt = build_prompt(&context, "Who founded the company?");

        assert!(prompt.starts_with("You are a helpful assistant.\n\n"));
        assert!(prompt.contains(
            "Context:\nJohn Doe founded the company.\n\nSGFD is an AI defence company.\n\nQuestion:"
        ));
        assert!(prompt.contains("Question:\nWho founded the company?\n\nAnswer:\n"));
        assert!(prompt.ends_with("Answer:\n"));
    }

    #[test]
    fn test_refusal_instruction_present() {
        let prompt = build_prompt(&[], "Anything?");
        assert!(prompt.contains("using ONLY the context below"));
        assert!(prompt.contains("say \"I don't know\""));
        assert!(prompt.contains("Context:\n\n\nQuestion:"));
    }

    #[test]
    fn test_chunk_order_preserved() {
        let context: Vec<String> = (0..3).map(|i| format!("chunk {}", i)).collect();
        let prompt = build_prompt(&context, "q");

        let first = prompt.find("chunk 0").unwrap();
        let second = prompt.find("chunk 1").unwrap();
        let third = prompt.find("chunk 2").unwrap();
        assert!(first < second && second < third);
    }
}
