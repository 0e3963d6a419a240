use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::config::Config;
use crate::models::{Difficulty, GradeResult, PracticeProblem, PracticeSet, SearchResult, Topic};
use crate::retrieval::{mentions_any, RetrievalService};
use crate::vendor::{ChatMessage, RagClient};

const SEARCH_SYSTEM_PROMPT: &str = "You are a knowledgeable physics instructor. Answer the question \
     based on the following context information. If you don't know the answer based on the \
     context, say so.";

const GRADING_SYSTEM_PROMPT: &str = "You are an expert physics instructor grading a student's \
     answer. Provide a score from 0-100, indicate if the answer is correct or not, provide \
     detailed feedback, and explain the correct solution.";

const GRADING_KEYWORDS: &[&str] = &["force", "acceleration", "newton", "joule", "energy"];
const CORRECT_SCORE: u8 = 90;
const INCORRECT_SCORE: u8 = 40;
const GRADING_SOLUTION: &str = "The detailed solution would be provided by the LLM.";

/// Retrieval backed by the vendor API.
///
/// Holds one document retriever per topic (when bootstrapped with
/// retrievers) and synthesizes answers through chat completion.
pub struct LiveRetrieval {
    rag: RagClient,
    topics: Vec<Topic>,
    retrievers: BTreeMap<Topic, String>,
}

impl LiveRetrieval {
    pub fn new(rag: RagClient) -> Self {
        Self::with_retrievers(rag, BTreeMap::new())
    }

    pub fn with_retrievers(rag: RagClient, retrievers: BTreeMap<Topic, String>) -> Self {
        Self {
            rag,
            topics: Topic::ALL.to_vec(),
            retrievers,
        }
    }

    /// Resolve the vendor project and feature group, then optionally create
    /// a retriever per topic. Vendor failures leave the service degraded,
    /// never unusable.
    pub async fn bootstrap(mut rag: RagClient, config: &Config) -> Self {
        rag.initialize_project(&config.vendor.project_name).await;
        rag.create_feature_group(&config.vendor.feature_group_name).await;

        let mut service = Self::new(rag);
        if config.init_retrievers {
            service.initialize_document_retrievers().await;
        }
        service
    }

    /// Create a document retriever for every topic that lacks one.
    pub async fn initialize_document_retrievers(&mut self) {
        for topic in self.topics.clone() {
            if self.retrievers.contains_key(&topic) {
                continue;
            }
            let name = format!("physics_{topic}_retriever");
            let description = format!("Document retriever for physics {topic}");
            if let Some(id) = self.rag.create_document_retriever(&name, &description).await {
                tracing::info!("Created document retriever for {topic}: {id}");
                self.retrievers.insert(topic, id);
            }
        }
    }

    pub fn retrievers(&self) -> &BTreeMap<Topic, String> {
        &self.retrievers
    }

    /// Fetch snippets for every document matching `query`.
    async fn gather_context(&self, query: &str, topic: Option<Topic>) -> Vec<String> {
        let targets: Vec<&str> = match topic.and_then(|t| self.retrievers.get(&t)) {
            Some(id) => vec![id.as_str()],
            None => self.retrievers.values().map(String::as_str).collect(),
        };

        let mut documents = Vec::new();
        for retriever_id in targets {
            documents.extend(self.rag.query_document_retriever(retriever_id, query).await);
        }

        let mut context = Vec::new();
        for doc in &documents {
            let Some(document_id) = doc.document_id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            tracing::debug!("Fetching snippet for {document_id} (score {:?})", doc.score);
            let snippet = self.rag.get_document_snippet(document_id).await;
            if !snippet.is_empty() {
                context.push(snippet);
            }
        }
        context
    }
}

#[async_trait]
impl RetrievalService for LiveRetrieval {
    fn topics(&self) -> &[Topic] {
        &self.topics
    }

    async fn search(&self, query: &str, topic: Option<Topic>) -> anyhow::Result<SearchResult> {
        let context = self.gather_context(query, topic).await;

        if context.is_empty() {
            tracing::info!("No context found for query, returning generic answer");
            return Ok(SearchResult {
                query: query.to_string(),
                answer: format!(
                    "I don't have specific information about '{query}'. \
                     Please try a different physics query."
                ),
                source: "knowledge base".to_string(),
            });
        }

        tracing::info!("Answering from {} snippets", context.len());
        let messages = vec![
            ChatMessage::system(SEARCH_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Context information:\n\n{}\n\nQuestion: {query}",
                context.join(" ")
            )),
        ];
        let answer = self.rag.chat_completion(&messages).await;

        Ok(SearchResult {
            query: query.to_string(),
            answer,
            source: "physics knowledge".to_string(),
        })
    }

    async fn generate_practice_problems(
        &self,
        topic: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<PracticeSet> {
        let messages = vec![
            ChatMessage::system(format!(
                "You are an expert physics professor. Generate 3 physics practice problems on \
                 the topic of {topic} at {difficulty} difficulty level. For each problem: provide \
                 a clear problem statement, include all necessary information to solve the \
                 problem, include the correct answer, and provide a detailed explanation of the \
                 solution."
            )),
            ChatMessage::user(format!(
                "Create {difficulty} level practice problems for {topic}."
            )),
        ];

        // The completion is not parsed yet; callers always get the sample set.
        let generated = self.rag.chat_completion(&messages).await;
        tracing::debug!(
            "Practice generation returned {} chars (unused)",
            generated.len()
        );

        Ok(PracticeSet {
            topic: topic.to_string(),
            difficulty,
            problems: sample_problems(topic),
        })
    }

    async fn grade_answer(
        &self,
        question: &str,
        student_answer: &str,
        reference_answer: Option<&str>,
    ) -> anyhow::Result<GradeResult> {
        let mut content = format!("Problem: {question}\n\nStudent Answer: {student_answer}");
        if let Some(reference) = reference_answer.filter(|r| !r.is_empty()) {
            content.push_str(&format!("\n\nReference Answer: {reference}"));
        }

        let messages = vec![
            ChatMessage::system(GRADING_SYSTEM_PROMPT),
            ChatMessage::user(content),
        ];
        let feedback = self.rag.chat_completion(&messages).await;

        let correct = mentions_any(student_answer, GRADING_KEYWORDS);

        Ok(GradeResult {
            score: if correct { CORRECT_SCORE } else { INCORRECT_SCORE },
            correct,
            feedback,
            correct_solution: GRADING_SOLUTION.to_string(),
        })
    }
}

fn sample_problems(topic: &str) -> Vec<PracticeProblem> {
    vec![
        PracticeProblem::new(
            format!("{topic}-1"),
            &format!("Sample problem for {topic}"),
            "Sample answer",
            "Sample explanation",
        ),
        PracticeProblem::new(
            format!("{topic}-2"),
            &format!("Another sample problem for {topic}"),
            "Another sample answer",
            "Another sample explanation",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VendorConfig;
    use crate::vendor::{VendorClient, CHAT_FALLBACK};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rag_for(server: &MockServer) -> RagClient {
        let mut config = VendorConfig::with_api_key("test-key");
        config.base_url = server.uri();
        RagClient::new(VendorClient::new(&config).unwrap(), &config)
    }

    fn ok(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({ "success": true, "result": result }))
    }

    async fn mount_chat(server: &MockServer, content: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v0/chatCompletion"))
            .respond_with(ok(json!({ "content": content })))
            .mount(server)
            .await;
    }

    async fn mount_documents(server: &MockServer, retriever_id: &str, doc_ids: &[&str]) {
        let documents: Vec<_> = doc_ids.iter().map(|id| json!({ "documentId": id })).collect();
        Mock::given(method("POST"))
            .and(path("/api/v0/getMatchingDocuments"))
            .and(body_partial_json(json!({ "documentRetrieverId": retriever_id })))
            .respond_with(ok(json!({ "documents": documents })))
            .mount(server)
            .await;
    }

    async fn mount_snippet(server: &MockServer, doc_id: &str, snippet: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v0/getDocumentSnippet"))
            .and(body_partial_json(json!({ "documentId": doc_id })))
            .respond_with(ok(json!({ "snippet": snippet })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn search_without_retrievers_returns_no_information() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/chatCompletion"))
            .respond_with(ok(json!({ "content": "unused" })))
            .expect(0)
            .mount(&server)
            .await;

        let service = LiveRetrieval::new(rag_for(&server));
        let result = service.search("What is entropy?", None).await.unwrap();

        assert_eq!(result.query, "What is entropy?");
        assert_eq!(
            result.answer,
            "I don't have specific information about 'What is entropy?'. \
             Please try a different physics query."
        );
        assert_eq!(result.source, "knowledge base");
    }

    #[tokio::test]
    async fn search_all_topics_joins_snippets_into_context() {
        let server = MockServer::start().await;
        mount_documents(&server, "r-cm", &["d-1"]).await;
        mount_documents(&server, "r-th", &["d-2", ""]).await;
        mount_snippet(&server, "d-1", "Objects keep moving.").await;
        mount_snippet(&server, "d-2", "Heat flows downhill.").await;
        Mock::given(method("POST"))
            .and(path("/api/v0/chatCompletion"))
            .and(body_string_contains(
                "Context information:\\n\\nObjects keep moving. Heat flows downhill.",
            ))
            .respond_with(ok(json!({ "content": "Inertia and heat transfer." })))
            .expect(1)
            .mount(&server)
            .await;

        let retrievers = BTreeMap::from([
            (Topic::ClassicalMechanics, "r-cm".to_string()),
            (Topic::Thermodynamics, "r-th".to_string()),
        ]);
        let service = LiveRetrieval::with_retrievers(rag_for(&server), retrievers);
        let result = service.search("Explain motion and heat", None).await.unwrap();

        assert_eq!(result.answer, "Inertia and heat transfer.");
        assert_eq!(result.source, "physics knowledge");
    }

    #[tokio::test]
    async fn search_with_topic_queries_only_that_retriever() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/getMatchingDocuments"))
            .and(body_partial_json(json!({ "documentRetrieverId": "r-cm" })))
            .respond_with(ok(json!({ "documents": [] })))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v0/getMatchingDocuments"))
            .and(body_partial_json(json!({ "documentRetrieverId": "r-th" })))
            .respond_with(ok(json!({ "documents": [{ "documentId": "d-2" }] })))
            .expect(1)
            .mount(&server)
            .await;
        mount_snippet(&server, "d-2", "Entropy never decreases.").await;
        mount_chat(&server, "Entropy grows.").await;

        let retrievers = BTreeMap::from([
            (Topic::ClassicalMechanics, "r-cm".to_string()),
            (Topic::Thermodynamics, "r-th".to_string()),
        ]);
        let service = LiveRetrieval::with_retrievers(rag_for(&server), retrievers);
        let result = service
            .search("entropy", Some(Topic::Thermodynamics))
            .await
            .unwrap();
        assert_eq!(result.answer, "Entropy grows.");
    }

    #[tokio::test]
    async fn search_degrades_when_chat_fails() {
        let server = MockServer::start().await;
        mount_documents(&server, "r-cm", &["d-1"]).await;
        mount_snippet(&server, "d-1", "F = ma").await;
        Mock::given(method("POST"))
            .and(path("/api/v0/chatCompletion"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let retrievers = BTreeMap::from([(Topic::ClassicalMechanics, "r-cm".to_string())]);
        let service = LiveRetrieval::with_retrievers(rag_for(&server), retrievers);
        let result = service.search("force", None).await.unwrap();
        assert_eq!(result.answer, CHAT_FALLBACK);
        assert_eq!(result.source, "physics knowledge");
    }

    #[tokio::test]
    async fn practice_problems_ignore_generated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/chatCompletion"))
            .and(body_string_contains("Create hard level practice problems for relativity."))
            .respond_with(ok(json!({ "content": "1. A train moves at 0.9c..." })))
            .expect(1)
            .mount(&server)
            .await;

        let service = LiveRetrieval::new(rag_for(&server));
        let set = service
            .generate_practice_problems("relativity", Difficulty::Hard)
            .await
            .unwrap();

        assert_eq!(set.topic, "relativity");
        assert_eq!(set.difficulty, Difficulty::Hard);
        assert_eq!(set.problems.len(), 2);
        assert_eq!(set.problems[0].id, "relativity-1");
        assert_eq!(set.problems[0].problem, "Sample problem for relativity");
        assert_eq!(set.problems[1].id, "relativity-2");
    }

    #[tokio::test]
    async fn grade_uses_keyword_band_and_completion_feedback() {
        let server = MockServer::start().await;
        mount_chat(&server, "Looks right.").await;

        let service = LiveRetrieval::new(rag_for(&server));
        let graded = service
            .grade_answer("Why does the ball accelerate?", "Net Force acts on it", None)
            .await
            .unwrap();
        assert_eq!(graded.score, 90);
        assert!(graded.correct);
        assert_eq!(graded.feedback, "Looks right.");
        assert_eq!(graded.correct_solution, GRADING_SOLUTION);

        let graded = service
            .grade_answer("Why does the ball accelerate?", "because", None)
            .await
            .unwrap();
        assert_eq!(graded.score, 40);
        assert!(!graded.correct);
    }

    #[tokio::test]
    async fn grade_includes_reference_answer_in_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/chatCompletion"))
            .and(body_string_contains("Reference Answer: a = F/m"))
            .respond_with(ok(json!({ "content": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let service = LiveRetrieval::new(rag_for(&server));
        service
            .grade_answer("Find a", "F/m", Some("a = F/m"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn bootstrap_creates_a_retriever_per_topic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/listProjects"))
            .respond_with(ok(json!([{ "name": "PhysicsRAG", "projectId": "p-1" }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v0/listProjectFeatureGroups"))
            .respond_with(ok(json!([{ "name": "PhysicsDocuments", "featureGroupId": "fg-1" }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v0/createDocumentRetriever"))
            .and(body_partial_json(json!({ "featureGroupId": "fg-1" })))
            .respond_with(ok(json!({ "documentRetrieverId": "r-any" })))
            .expect(5)
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("test-key");
        config.vendor.base_url = server.uri();
        config.init_retrievers = true;

        let service = LiveRetrieval::bootstrap(rag_for(&server), &config).await;
        assert_eq!(service.retrievers().len(), 5);
        assert_eq!(service.topics(), &Topic::ALL);
    }

    #[tokio::test]
    async fn bootstrap_without_vendor_leaves_no_retrievers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let mut config = Config::with_api_key("test-key");
        config.vendor.base_url = server.uri();
        config.init_retrievers = true;

        let service = LiveRetrieval::bootstrap(rag_for(&server), &config).await;
        assert!(service.retrievers().is_empty());
    }
}
