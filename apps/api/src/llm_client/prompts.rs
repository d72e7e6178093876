// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Keeps model output inside the punctuation the PDF renderer and ATS parsers accept.
pub const ATS_PUNCTUATION_INSTRUCTION: &str = "\
    FORBIDDEN: Do NOT use em-dashes (\u{2014}). Use only standard hyphens (-). \
    Do NOT use generic buzzwords like \"hard worker.\"";

/// Forces a bare answer with no framing text.
pub const PLAIN_OUTPUT_INSTRUCTION: &str = "\
    Provide ONLY the bullet points. No introductory text. No explanations. \
    Do NOT use markdown code fences.";
