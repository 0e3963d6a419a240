use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnknownTopic;

/// A physics topic the service knows about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    ClassicalMechanics,
    Thermodynamics,
    Electromagnetism,
    QuantumMechanics,
    Relativity,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::ClassicalMechanics,
        Topic::Thermodynamics,
        Topic::Electromagnetism,
        Topic::QuantumMechanics,
        Topic::Relativity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ClassicalMechanics => "classical_mechanics",
            Topic::Thermodynamics => "thermodynamics",
            Topic::Electromagnetism => "electromagnetism",
            Topic::QuantumMechanics => "quantum_mechanics",
            Topic::Relativity => "relativity",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTopic(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a search or topic question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub query: String,
    pub answer: String,
    /// Where the answer came from ("physics knowledge", "knowledge base", "placeholder")
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeProblem {
    pub id: String,
    pub problem: String,
    pub answer: String,
    pub explanation: String,
}

impl PracticeProblem {
    pub fn new(id: impl Into<String>, problem: &str, answer: &str, explanation: &str) -> Self {
        Self {
            id: id.into(),
            problem: problem.to_string(),
            answer: answer.to_string(),
            explanation: explanation.to_string(),
        }
    }
}

/// Practice response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeSet {
    pub topic: String,
    pub difficulty: Difficulty,
    pub problems: Vec<PracticeProblem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeResult {
    /// 0-100
    pub score: u8,
    pub correct: bool,
    pub feedback: String,
    pub correct_solution: String,
}

/// Search / learn request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// Practice request
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeRequest {
    pub topic: String,
    /// Absent or null means medium
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Grading request
#[derive(Debug, Clone, Deserialize)]
pub struct GradeRequest {
    pub question: String,
    pub student_answer: String,
    #[serde(default)]
    pub reference_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
}

/// `/learn/{topic}` answers with either a result or an inline error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LearnResponse {
    Answer(SearchResult),
    UnknownTopic { error: String },
}
