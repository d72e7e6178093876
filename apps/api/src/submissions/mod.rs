//! Fire-and-forget submission logging.
//!
//! Each record is written on its own tokio task; the request never waits for
//! it. Outcomes travel over an mpsc channel to [`report_outcomes`], which is
//! the only place a logging failure surfaces (as a `warn!`).

pub mod sink;

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::submission::SubmissionRecord;

pub use sink::{PgSubmissionSink, SubmissionError, SubmissionSink};

/// Result of one background insert.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub email: String,
    pub result: Result<(), SubmissionError>,
}

#[derive(Clone)]
pub struct SubmissionLog {
    sink: Arc<dyn SubmissionSink>,
    outcomes: UnboundedSender<SubmissionOutcome>,
}

impl SubmissionLog {
    /// Returns the log and the receiving end of its outcome channel. The
    /// receiver should be handed to [`report_outcomes`].
    pub fn new(sink: Arc<dyn SubmissionSink>) -> (Self, UnboundedReceiver<SubmissionOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (Self { sink, outcomes }, rx)
    }

    /// Writes `record` in the background. Callers are free to drop the handle.
    pub fn dispatch(&self, record: SubmissionRecord) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = sink.record(&record).await;
            // Receiver gone means nobody is reporting; the outcome is dropped.
            let _ = outcomes.send(SubmissionOutcome {
                email: record.email,
                result,
            });
        })
    }
}

/// Drains the outcome channel until every `SubmissionLog` clone is dropped.
pub async fn report_outcomes(mut rx: UnboundedReceiver<SubmissionOutcome>) {
    while let Some(outcome) = rx.recv().await {
        match outcome.result {
            Ok(()) => info!("Submission logged for {}", outcome.email),
            Err(e) => warn!("Submission log failed for {}: {e}", outcome.email),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Keeps every record in memory, or fails every write when `fail` is set.
    #[derive(Default)]
    pub(crate) struct MemorySink {
        pub records: Mutex<Vec<SubmissionRecord>>,
        pub fail: bool,
    }

    #[async_trait]
    impl SubmissionSink for MemorySink {
        async fn record(&self, record: &SubmissionRecord) -> Result<(), SubmissionError> {
            if self.fail {
                return Err(sqlx::Error::PoolTimedOut.into());
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn record(email: &str) -> SubmissionRecord {
        SubmissionRecord {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            resume_text: "- Built things".to_string(),
            job_description: "Analyst".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_writes_record_and_reports_success() {
        let sink = Arc::new(MemorySink::default());
        let (log, mut rx) = SubmissionLog::new(sink.clone());

        log.dispatch(record("jane@example.com")).await.unwrap();

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.email, "jane@example.com");
        assert!(outcome.result.is_ok());
        assert_eq!(sink.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_is_reported_not_raised() {
        let sink = Arc::new(MemorySink {
            fail: true,
            ..Default::default()
        });
        let (log, mut rx) = SubmissionLog::new(sink.clone());

        log.dispatch(record("jane@example.com")).await.unwrap();

        let outcome = rx.recv().await.unwrap();
        assert!(matches!(
            outcome.result,
            Err(SubmissionError::Database(sqlx::Error::PoolTimedOut))
        ));
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_survives_dropped_receiver() {
        let sink = Arc::new(MemorySink::default());
        let (log, rx) = SubmissionLog::new(sink.clone());
        drop(rx);

        log.dispatch(record("a@example.com")).await.unwrap();
        assert_eq!(sink.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reporter_stops_when_all_logs_dropped() {
        let sink = Arc::new(MemorySink::default());
        let (log, rx) = SubmissionLog::new(sink);
        let reporter = tokio::spawn(report_outcomes(rx));

        log.dispatch(record("a@example.com")).await.unwrap();
        log.dispatch(record("b@example.com")).await.unwrap();
        drop(log);

        reporter.await.unwrap();
    }
}
