//! Retrieval service: the seam between HTTP handlers and whatever answers
//! physics questions.
//!
//! - [`live::LiveRetrieval`] - per-topic vendor retrievers plus chat completion
//! - [`placeholder::PlaceholderRetrieval`] - static keyword answers and canned problem sets

pub mod live;
pub mod placeholder;

use async_trait::async_trait;

use crate::models::{Difficulty, GradeResult, PracticeSet, SearchResult, Topic};

pub use live::LiveRetrieval;
pub use placeholder::PlaceholderRetrieval;

#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Topics this service answers for.
    fn topics(&self) -> &[Topic];

    /// Answer `query`, restricted to `topic` when it has its own index.
    async fn search(&self, query: &str, topic: Option<Topic>) -> anyhow::Result<SearchResult>;

    /// Practice problems for `topic`. Unknown topics get a generic set.
    async fn generate_practice_problems(
        &self,
        topic: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<PracticeSet>;

    async fn grade_answer(
        &self,
        question: &str,
        student_answer: &str,
        reference_answer: Option<&str>,
    ) -> anyhow::Result<GradeResult>;
}

/// `true` when the lowercased answer mentions any of `keywords`.
pub(crate) fn mentions_any(answer: &str, keywords: &[&str]) -> bool {
    let answer = answer.to_lowercase();
    keywords.iter().any(|k| answer.contains(k))
}
