// LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Experience rewrite prompt template.
/// Replace: {job_description}, {experience}, {punctuation_instruction}, {output_instruction}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"You are an expert Resume Writer and ATS Algorithm Specialist.
Rewrite the following "Old Experience" to perfectly match the "Target Job".

TARGET JOB DESCRIPTION:
{job_description}

OLD EXPERIENCE:
{experience}

STRICT INSTRUCTIONS:
1. KEYWORD MATCHING: Identify the top 5 hard skills/keywords from the Target Job and ensure they appear naturally in the rewritten bullets.
2. FORMAT: Use standard bullet points. Start every bullet with a strong Action Verb (e.g., Led, Developed, Analyzed).
3. METRICS: Wherever possible, imply or include impact (e.g., "resulting in improved efficiency" or "impacting X stakeholders").
4. TONE: Professional, corporate, and direct.
5. {punctuation_instruction}

OUTPUT FORMAT:
{output_instruction}"#;
