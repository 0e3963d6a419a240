use async_trait::async_trait;

use crate::models::{Difficulty, GradeResult, PracticeProblem, PracticeSet, SearchResult, Topic};
use crate::retrieval::{mentions_any, RetrievalService};

/// Canned explanations, checked in order against the lowercased query.
const KEYWORD_ANSWERS: &[(&str, &str)] = &[
    (
        "newton",
        "Newton's laws of motion are three fundamental laws that describe the relationship \
         between an object and the forces acting on it. The First Law states that an object will \
         remain at rest or in uniform motion unless acted upon by a force. The Second Law states \
         that force equals mass times acceleration (F=ma). The Third Law states that for every \
         action, there is an equal and opposite reaction.",
    ),
    (
        "energy",
        "Energy is the capacity to do work or produce heat. In physics, the law of conservation \
         of energy states that energy cannot be created or destroyed, only transformed from one \
         form to another.",
    ),
    (
        "gravity",
        "Gravity is a fundamental force that attracts objects with mass toward each other. On \
         Earth, gravity gives weight to physical objects, and the Moon's gravity causes the ocean \
         tides.",
    ),
];

const CLARIFY_ANSWER: &str = "I don't have specific information about that yet. Try asking about \
     Newton's laws, energy, or gravity, or rephrase your question with a specific physics concept.";

const GRADING_KEYWORDS: &[&str] = &["5", "20", "newton"];
const CORRECT_SCORE: u8 = 100;
const INCORRECT_SCORE: u8 = 60;
const CORRECT_FEEDBACK: &str = "Good job! Your answer is correct.";
const INCORRECT_FEEDBACK: &str = "Not quite right. Check your calculations and try again.";
const GENERIC_SOLUTION: &str =
    "The solution involves identifying the correct formula and applying it to the problem.";

/// (problem, answer, explanation)
type CannedProblem = (&'static str, &'static str, &'static str);

const CLASSICAL_MECHANICS: &[CannedProblem] = &[
    (
        "A 2 kg object is pushed with a force of 10 N. What is its acceleration?",
        "5 m/s²",
        "Using Newton's Second Law (F = ma), a = F/m = 10 N / 2 kg = 5 m/s².",
    ),
    (
        "A ball is thrown upward with an initial velocity of 20 m/s. How high will it go? \
         (Assume g = 10 m/s²)",
        "20 m",
        "Using v² = v₀² + 2a(x - x₀) with v = 0 at the highest point: 0 = 400 + 2(-10)h, \
         so h = 20 m.",
    ),
];

const THERMODYNAMICS: &[CannedProblem] = &[(
    "How much heat is needed to raise the temperature of 2 kg of water by 10 °C? \
     (c = 4186 J/kg·°C)",
    "83,720 J",
    "Using Q = mcΔT, Q = 2 kg × 4186 J/kg·°C × 10 °C = 83,720 J.",
)];

const ELECTROMAGNETISM: &[CannedProblem] = &[(
    "What current flows through a 10 Ω resistor connected across a 20 V battery?",
    "2 A",
    "Using Ohm's law (V = IR), I = V/R = 20 V / 10 Ω = 2 A.",
)];

const QUANTUM_MECHANICS: &[CannedProblem] = &[(
    "What is the energy of a photon with frequency 5 × 10¹⁴ Hz? (h = 6.63 × 10⁻³⁴ J·s)",
    "3.3 × 10⁻¹⁹ J",
    "Using E = hf, E = 6.63 × 10⁻³⁴ J·s × 5 × 10¹⁴ Hz ≈ 3.3 × 10⁻¹⁹ J.",
)];

const RELATIVITY: &[CannedProblem] = &[(
    "A spaceship travels at 0.6c relative to Earth. What is its Lorentz factor γ?",
    "1.25",
    "γ = 1 / √(1 - v²/c²) = 1 / √(1 - 0.36) = 1 / 0.8 = 1.25.",
)];

const GENERIC: &[CannedProblem] = &[(
    "State Newton's Second Law and explain what each term means.",
    "F = ma",
    "The net force F on an object equals its mass m times its acceleration a.",
)];

/// Retrieval that never leaves the process: keyword answers, canned
/// problem sets and keyword grading.
pub struct PlaceholderRetrieval {
    topics: Vec<Topic>,
}

impl PlaceholderRetrieval {
    pub fn new() -> Self {
        Self {
            topics: Topic::ALL.to_vec(),
        }
    }
}

impl Default for PlaceholderRetrieval {
    fn default() -> Self {
        Self::new()
    }
}

fn canned_problems(topic: Topic) -> &'static [CannedProblem] {
    match topic {
        Topic::ClassicalMechanics => CLASSICAL_MECHANICS,
        Topic::Thermodynamics => THERMODYNAMICS,
        Topic::Electromagnetism => ELECTROMAGNETISM,
        Topic::QuantumMechanics => QUANTUM_MECHANICS,
        Topic::Relativity => RELATIVITY,
    }
}

#[async_trait]
impl RetrievalService for PlaceholderRetrieval {
    fn topics(&self) -> &[Topic] {
        &self.topics
    }

    async fn search(&self, query: &str, _topic: Option<Topic>) -> anyhow::Result<SearchResult> {
        let lowered = query.to_lowercase();
        let answer = KEYWORD_ANSWERS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, answer)| *answer)
            .unwrap_or(CLARIFY_ANSWER);

        Ok(SearchResult {
            query: query.to_string(),
            answer: answer.to_string(),
            source: "placeholder".to_string(),
        })
    }

    async fn generate_practice_problems(
        &self,
        topic: &str,
        difficulty: Difficulty,
    ) -> anyhow::Result<PracticeSet> {
        let canned = match topic.parse::<Topic>() {
            Ok(known) => canned_problems(known),
            Err(_) => {
                tracing::debug!("No canned problems for {topic}, using generic sample");
                GENERIC
            }
        };

        let problems = canned
            .iter()
            .enumerate()
            .map(|(i, (problem, answer, explanation))| {
                PracticeProblem::new(format!("{topic}-{}", i + 1), problem, answer, explanation)
            })
            .collect();

        Ok(PracticeSet {
            topic: topic.to_string(),
            difficulty,
            problems,
        })
    }

    async fn grade_answer(
        &self,
        _question: &str,
        student_answer: &str,
        reference_answer: Option<&str>,
    ) -> anyhow::Result<GradeResult> {
        let reference = reference_answer.filter(|r| !r.trim().is_empty());

        let correct = match reference {
            Some(reference) => matches_reference(student_answer, reference),
            None => mentions_any(student_answer, GRADING_KEYWORDS),
        };

        let (score, feedback) = if correct {
            (CORRECT_SCORE, CORRECT_FEEDBACK)
        } else {
            (INCORRECT_SCORE, INCORRECT_FEEDBACK)
        };

        Ok(GradeResult {
            score,
            correct,
            feedback: feedback.to_string(),
            correct_solution: reference.unwrap_or(GENERIC_SOLUTION).to_string(),
        })
    }
}

/// Whole-answer match after trimming and lowercasing: the student's answer
/// is the reference, contains the reference, or is the reference's leading
/// value with the unit left off ("5" for "5 m/s²").
fn matches_reference(student_answer: &str, reference: &str) -> bool {
    let student = student_answer.trim().to_lowercase();
    let reference = reference.trim().to_lowercase();
    if student.is_empty() {
        return false;
    }
    student == reference
        || student.contains(&reference)
        || reference.split_whitespace().next() == Some(student.as_str())
}
