//! Where submission records end up. `PgSubmissionSink` is the only production
//! implementation; tests plug in an in-memory sink.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::submission::SubmissionRecord;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn record(&self, record: &SubmissionRecord) -> Result<(), SubmissionError>;
}

/// Appends one row per generation attempt to the `submissions` table.
pub struct PgSubmissionSink {
    pool: PgPool,
}

impl PgSubmissionSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionSink for PgSubmissionSink {
    async fn record(&self, record: &SubmissionRecord) -> Result<(), SubmissionError> {
        sqlx::query(
            r#"
            INSERT INTO submissions (name, email, resume_text, job_description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.resume_text)
        .bind(&record.job_description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
