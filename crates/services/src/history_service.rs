use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::ScoreSummary;
use quiz_core::model::HistoryEntry;
use storage::repository::HistoryRepository;

use crate::error::HistoryServiceError;

/// Records finished quizzes into the capped, newest-first history.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    cap: u32,
}

impl HistoryService {
    #[must_use]
    pub fn new(repo: Arc<dyn HistoryRepository>, cap: u32) -> Self {
        Self { repo, cap }
    }

    #[must_use]
    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Persist a completed quiz at the front of the history.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError` if the entry is invalid or storage fails.
    pub async fn record(
        &self,
        topic: &str,
        summary: &ScoreSummary,
        completed_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, HistoryServiceError> {
        let entry = HistoryEntry::from_summary(topic, summary, completed_at)?;
        self.repo.prepend_entry(&entry, self.cap).await?;
        Ok(entry)
    }

    /// Most recent entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `HistoryServiceError` on storage failures.
    pub async fn recent(&self) -> Result<Vec<HistoryEntry>, HistoryServiceError> {
        Ok(self.repo.list_recent(self.cap).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerChoice, AnswerResult, Question, QuestionId};
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn summary(correct: usize, total: usize) -> ScoreSummary {
        let q = Question::new(
            QuestionId::new(1),
            "Q?",
            ["a", "b", "c", "d"].map(String::from),
            0,
            None,
        )
        .unwrap();
        let results: Vec<_> = (0..total)
            .map(|i| {
                let choice = if i < correct {
                    AnswerChoice::Option(0)
                } else {
                    AnswerChoice::NoAnswer
                };
                AnswerResult::record(i, &q, choice, 10)
            })
            .collect();
        ScoreSummary::from_results(&results).unwrap()
    }

    #[tokio::test]
    async fn record_builds_entry_from_summary() {
        let service = HistoryService::new(Arc::new(InMemoryRepository::new()), 10);
        let entry = service
            .record("science", &summary(2, 3), fixed_now())
            .await
            .unwrap();

        assert_eq!(entry.score(), 67);
        assert_eq!(entry.correct_answers(), 2);
        assert_eq!(entry.total_questions(), 3);
        assert_eq!(entry.total_time_secs(), 30);
        assert_eq!(service.recent().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let service = HistoryService::new(Arc::new(InMemoryRepository::new()), 2);
        for topic in ["a", "b", "c"] {
            service.record(topic, &summary(1, 1), fixed_now()).await.unwrap();
        }
        let topics: Vec<_> = service
            .recent()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.topic().to_string())
            .collect();
        assert_eq!(topics, ["c", "b"]);
    }

    #[tokio::test]
    async fn blank_topic_is_rejected() {
        let service = HistoryService::new(Arc::new(InMemoryRepository::new()), 10);
        let err = service.record(" ", &summary(1, 1), fixed_now()).await.unwrap_err();
        assert!(matches!(err, HistoryServiceError::Entry(_)));
    }
}
