//! Resume Generation — the two steps of the pipeline.
//!
//! Flow: validate → dispatch submission log → LLM rewrite → `DraftHandle`.
//! The caller edits the handle's `experience` and posts it back to render:
//! `RenderRequest` → `DocumentAssembler` → PDF bytes.
//!
//! No draft is stored server-side; the handle carries all state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::rewriter::{ExperienceRewriter, RewriteRequest};
use crate::models::resume::{Profile, ResumeSections};
use crate::models::submission::SubmissionRecord;
use crate::render::{DocumentAssembler, RenderError, RenderedDocument};
use crate::submissions::SubmissionLog;

pub const MISSING_KEY_MESSAGE: &str = "API key is missing.";
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in Email, Resume, and Job Description.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for the generate step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub profile: Profile,
    pub sections: ResumeSections,
    /// Raw experience text the rewrite starts from.
    pub experience_draft: String,
    /// Used for the rewrite only. Never echoed back or rendered.
    pub job_description: String,
    /// Caller's own key, used when no community key is configured.
    pub api_key: Option<String>,
}

/// Everything needed to render, handed back to the caller for editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftHandle {
    pub draft_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: Profile,
    pub sections: ResumeSections,
    /// Rewritten experience; the caller may edit it before rendering.
    pub experience: String,
}

/// Request body for the render step. A serialized `DraftHandle` is a valid
/// `RenderRequest`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    pub draft_id: Option<Uuid>,
    pub profile: Profile,
    pub sections: ResumeSections,
    pub experience: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the generate step.
///
/// The submission record is dispatched once validation passes and before the
/// rewrite, so it is written whether or not the AI call succeeds.
pub async fn generate_draft(
    rewriter: &dyn ExperienceRewriter,
    submissions: Option<&SubmissionLog>,
    community_key: Option<&str>,
    request: GenerateRequest,
) -> Result<DraftHandle, AppError> {
    let api_key = resolve_api_key(community_key, request.api_key.as_deref())
        .ok_or_else(|| AppError::Validation(MISSING_KEY_MESSAGE.to_string()))?;

    if is_blank(&request.profile.email)
        || is_blank(&request.experience_draft)
        || is_blank(&request.job_description)
    {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    if let Some(log) = submissions {
        log.dispatch(SubmissionRecord {
            name: request.profile.name.clone(),
            email: request.profile.email.clone(),
            resume_text: request.experience_draft.clone(),
            job_description: request.job_description.clone(),
        });
    }

    info!("Rewriting experience for {}", request.profile.email);
    let experience = rewriter
        .rewrite(
            api_key,
            RewriteRequest {
                job_description: &request.job_description,
                experience: &request.experience_draft,
            },
        )
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let handle = DraftHandle {
        draft_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        profile: request.profile,
        sections: request.sections,
        experience,
    };
    info!(
        "Draft {} ready for {}",
        handle.draft_id, handle.profile.email
    );
    Ok(handle)
}

/// Runs the render step. Blocking; call from `spawn_blocking`.
///
/// A request without experience text renders without that section.
pub fn render_draft(
    assembler: &DocumentAssembler,
    request: &RenderRequest,
) -> Result<RenderedDocument, RenderError> {
    let experience = request.experience.as_deref().unwrap_or_default();
    let document = assembler.assemble(
        &request.profile,
        &request.sections,
        experience,
        request.profile.video_url.as_deref(),
    )?;
    info!(
        "Rendered draft {:?}: {} page(s), {} bytes",
        request.draft_id,
        document.page_count,
        document.bytes.len()
    );
    Ok(document)
}

/// Community key first, then the caller's. Blank keys count as absent.
fn resolve_api_key<'a>(community: Option<&'a str>, user: Option<&'a str>) -> Option<&'a str> {
    community
        .filter(|k| !is_blank(k))
        .or_else(|| user.filter(|k| !is_blank(k)))
        .map(str::trim)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::submissions::tests::MemorySink;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Returns a canned answer (or an error) and remembers the key it was given.
    pub(crate) struct StubRewriter {
        pub answer: Result<String, u16>,
        pub seen_key: Mutex<Option<String>>,
    }

    impl StubRewriter {
        pub(crate) fn ok(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                seen_key: Mutex::new(None),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                seen_key: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ExperienceRewriter for StubRewriter {
        async fn rewrite(
            &self,
            api_key: &str,
            _request: RewriteRequest<'_>,
        ) -> Result<String, LlmError> {
            *self.seen_key.lock().unwrap() = Some(api_key.to_string());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "API key not valid.".to_string(),
                }),
            }
        }
    }

    fn valid_request() -> GenerateRequest {
        GenerateRequest {
            profile: Profile {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                contact: "London".to_string(),
                video_url: None,
            },
            sections: ResumeSections {
                skills: Some("Rust, SQL".to_string()),
                ..Default::default()
            },
            experience_draft: "- Made charts".to_string(),
            job_description: "Data analyst, Python, SQL".to_string(),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_rewritten_draft() {
        let rewriter = StubRewriter::ok("- Analyzed data in SQL");
        let handle = generate_draft(&rewriter, None, Some("community"), valid_request())
            .await
            .unwrap();
        assert_eq!(handle.experience, "- Analyzed data in SQL");
        assert_eq!(handle.profile.email, "jane@example.com");
        assert_eq!(handle.sections.skills.as_deref(), Some("Rust, SQL"));
    }

    #[tokio::test]
    async fn test_missing_key_is_validation_error() {
        let rewriter = StubRewriter::ok("unused");
        let err = generate_draft(&rewriter, None, None, valid_request())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, MISSING_KEY_MESSAGE),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_user_key_used_without_community_key() {
        let rewriter = StubRewriter::ok("- ok");
        let request = GenerateRequest {
            api_key: Some("  user-key ".to_string()),
            ..valid_request()
        };
        generate_draft(&rewriter, None, None, request).await.unwrap();
        assert_eq!(rewriter.seen_key.lock().unwrap().as_deref(), Some("user-key"));
    }

    #[tokio::test]
    async fn test_community_key_takes_precedence() {
        let rewriter = StubRewriter::ok("- ok");
        let request = GenerateRequest {
            api_key: Some("user-key".to_string()),
            ..valid_request()
        };
        generate_draft(&rewriter, None, Some("community"), request)
            .await
            .unwrap();
        assert_eq!(rewriter.seen_key.lock().unwrap().as_deref(), Some("community"));
    }

    #[tokio::test]
    async fn test_missing_fields_block_generation_and_logging() {
        let sink = Arc::new(MemorySink::default());
        let (log, mut rx) = SubmissionLog::new(sink.clone());
        let rewriter = StubRewriter::ok("unused");

        for request in [
            GenerateRequest {
                profile: Profile::default(),
                ..valid_request()
            },
            GenerateRequest {
                experience_draft: "   ".to_string(),
                ..valid_request()
            },
            GenerateRequest {
                job_description: String::new(),
                ..valid_request()
            },
        ] {
            let err = generate_draft(&rewriter, Some(&log), Some("k"), request)
                .await
                .unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, MISSING_FIELDS_MESSAGE),
                other => panic!("expected Validation, got {other:?}"),
            }
        }

        drop(log);
        assert!(rx.recv().await.is_none());
        assert!(rewriter.seen_key.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submission_logged_even_when_rewrite_fails() {
        let sink = Arc::new(MemorySink::default());
        let (log, mut rx) = SubmissionLog::new(sink.clone());
        let rewriter = StubRewriter::failing(400);

        let err = generate_draft(&rewriter, Some(&log), Some("k"), valid_request())
            .await
            .unwrap_err();
        match err {
            AppError::Llm(msg) => assert!(msg.contains("API key not valid.")),
            other => panic!("expected Llm, got {other:?}"),
        }

        let outcome = rx.recv().await.unwrap();
        assert!(outcome.result.is_ok());
        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resume_text, "- Made charts");
        assert_eq!(records[0].job_description, "Data analyst, Python, SQL");
    }

    #[tokio::test]
    async fn test_logging_failure_does_not_affect_generation() {
        let sink = Arc::new(MemorySink {
            fail: true,
            ..Default::default()
        });
        let (log, mut rx) = SubmissionLog::new(sink);
        let rewriter = StubRewriter::ok("- ok");

        let handle = generate_draft(&rewriter, Some(&log), Some("k"), valid_request()).await;
        assert!(handle.is_ok());
        assert!(rx.recv().await.unwrap().result.is_err());
    }

    #[tokio::test]
    async fn test_handle_round_trips_into_render_request() {
        let rewriter = StubRewriter::ok("- Analyzed data");
        let handle = generate_draft(&rewriter, None, Some("k"), valid_request())
            .await
            .unwrap();

        let json = serde_json::to_value(&handle).unwrap();
        assert!(json.get("job_description").is_none());

        let request: RenderRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.draft_id, Some(handle.draft_id));
        assert_eq!(request.profile, handle.profile);
        assert_eq!(request.sections, handle.sections);
        assert_eq!(request.experience.as_deref(), Some("- Analyzed data"));
    }

    #[test]
    fn test_render_without_prior_generation() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let request: RenderRequest =
            serde_json::from_str(r#"{"profile": {"name": "Jane Doe"}}"#).unwrap();

        let document = render_draft(&assembler, &request).unwrap();
        assert!(document.bytes.starts_with(b"%PDF"));
        assert_eq!(document.page_count, 1);
    }

    #[test]
    fn test_resolve_api_key_ignores_blank_community_key() {
        assert_eq!(resolve_api_key(Some("  "), Some("user")), Some("user"));
        assert_eq!(resolve_api_key(None, Some("")), None);
        assert_eq!(resolve_api_key(Some("c"), None), Some("c"));
    }
}
