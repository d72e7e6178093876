// Resume Generation: AI rewrite of the experience draft, then rendering of the
// caller-edited draft. All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod rewriter;
