//! Grounded answer generation.
//!
//! [`CompletionBackend`] is the opaque generation capability;
//! [`Answerer`] composes the strict-grounding prompt and handles the
//! decoded text. There is no retry and no validation that the output stays
//! grounded in the context; ungrounded answers are an accepted limitation
//! of this layer.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::RagError;

pub use http::HttpCompletionProvider;

/// Text-to-text generation capability with a bounded output length.
///
/// Implementations must be safe for concurrent read-only use; one instance
/// is shared across requests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, RagError>;
}

/// Answer generation settings.
#[derive(Clone, Copy, Debug)]
pub struct AnswerConfig {
    /// Maximum output length passed to the generation capability.
    pub max_tokens: usize,
    /// Strip `<pad>`/`</s>`-style special markers from the decoded text.
    /// Leave off when bit-for-bit fidelity with the backend output matters.
    pub strip_markers: bool,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            strip_markers: true,
        }
    }
}

/// Produces a natural-language answer from a question and assembled context.
pub struct Answerer {
    backend: Arc<dyn CompletionBackend>,
    config: AnswerConfig,
}

impl Answerer {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: AnswerConfig) -> Self {
        Self { backend, config }
    }

    /// Generates an answer grounded in `context` only.
    pub async fn answer(&self, query: &str, context: &str) -> Result<String, RagError> {
        let prompt = compose_prompt(query, context);
        let output = self.backend.complete(&prompt, self.config.max_tokens).await?;
        if self.config.strip_markers {
            Ok(strip_special_markers(&output))
        } else {
            Ok(output)
        }
    }
}

/// Builds the strict-grounding prompt sent to the generation capability.
pub fn compose_prompt(query: &str, context: &str) -> String {
    format!(
        "Answer the question using ONLY the context below.\n\n\
         Context:\n{context}\n\n\
         Question:\n{query}\n"
    )
}

/// Removes angle-bracketed special tokens (`<pad>`, `</s>`, `<|im_end|>`)
/// from decoder output. Only whitespace-free bracketed runs are treated as
/// markers so ordinary prose comparisons like `a < b` survive.
pub fn strip_special_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some(rel_end) = text[i + 1..]
                .find('>')
                .filter(|&end| !text[i + 1..i + 1 + end].contains(char::is_whitespace))
            {
                i += rel_end + 2;
                continue;
            }
        }
        let ch = text[i..].chars().next().unwrap_or('\u{fffd}');
        out.push(ch);
        i += ch.len_utf8();
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoBackend {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        async fn complete(&self, prompt: &str, _max_tokens: usize) -> Result<String, RagError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn prompt_contains_context_and_question() {
        let prompt = compose_prompt("What color is the sky?", "The sky is blue.");
        assert!(prompt.contains("ONLY the context"));
        assert!(prompt.contains("The sky is blue."));
        assert!(prompt.contains("What color is the sky?"));
    }

    #[test]
    fn markers_are_stripped() {
        assert_eq!(
            strip_special_markers("<pad> The sky is blue.</s>"),
            "The sky is blue."
        );
        assert_eq!(strip_special_markers("answer<|im_end|>"), "answer");
    }

    #[test]
    fn prose_with_spaces_inside_brackets_survives() {
        assert_eq!(
            strip_special_markers("values < threshold > baseline"),
            "values < threshold > baseline"
        );
    }

    #[tokio::test]
    async fn answerer_passes_prompt_and_strips_by_default() {
        let backend = Arc::new(EchoBackend {
            prompts: Mutex::new(Vec::new()),
            reply: "<pad> Blue.</s>".to_string(),
        });
        let answerer = Answerer::new(backend.clone(), AnswerConfig::default());

        let answer = answerer.answer("What color?", "The sky is blue.").await.unwrap();
        assert_eq!(answer, "Blue.");

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("The sky is blue."));
    }

    #[tokio::test]
    async fn verbatim_mode_preserves_markers() {
        let backend = Arc::new(EchoBackend {
            prompts: Mutex::new(Vec::new()),
            reply: "<pad> Blue.</s>".to_string(),
        });
        let answerer = Answerer::new(
            backend,
            AnswerConfig {
                max_tokens: 200,
                strip_markers: false,
            },
        );

        let answer = answerer.answer("What color?", "ctx").await.unwrap();
        assert_eq!(answer, "<pad> Blue.</s>");
    }
}
