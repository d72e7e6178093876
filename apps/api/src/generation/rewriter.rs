//! Experience rewriting — pluggable, trait-based collaborator that tailors raw
//! experience bullets to a target job description.
//!
//! Default: `GeminiRewriter` (LLM via `LlmClient`).
//! `AppState` holds an `Arc<dyn ExperienceRewriter>` so tests can swap in a stub.

use async_trait::async_trait;

use crate::generation::prompts::REWRITE_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{ATS_PUNCTUATION_INSTRUCTION, PLAIN_OUTPUT_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};

/// Inputs to one rewrite. The job description is used here only and never
/// reaches the rendered document.
#[derive(Debug, Clone, Copy)]
pub struct RewriteRequest<'a> {
    pub job_description: &'a str,
    pub experience: &'a str,
}

/// The rewrite collaborator. Implementations return plain bullet-point text
/// with no commentary.
#[async_trait]
pub trait ExperienceRewriter: Send + Sync {
    async fn rewrite(&self, api_key: &str, request: RewriteRequest<'_>) -> Result<String, LlmError>;
}

pub struct GeminiRewriter {
    llm: LlmClient,
}

impl GeminiRewriter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ExperienceRewriter for GeminiRewriter {
    async fn rewrite(&self, api_key: &str, request: RewriteRequest<'_>) -> Result<String, LlmError> {
        let prompt = build_rewrite_prompt(request);
        self.llm.call_text(api_key, &prompt).await
    }
}

/// Fills the rewrite template.
pub fn build_rewrite_prompt(request: RewriteRequest<'_>) -> String {
    fill_template(
        REWRITE_PROMPT_TEMPLATE,
        &[
            ("job_description", request.job_description.trim()),
            ("experience", request.experience.trim()),
            ("punctuation_instruction", ATS_PUNCTUATION_INSTRUCTION),
            ("output_instruction", PLAIN_OUTPUT_INSTRUCTION),
        ],
    )
}

/// Substitutes `{name}` placeholders in a single left-to-right pass. Inserted
/// values are never rescanned, so user text containing `{experience}` or
/// similar is copied through untouched. Unknown `{...}` runs are kept as is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
