//! Quiz Engine
//!
//! Grades a submitted quiz, breaks accuracy down per topic, classifies
//! mastery and produces study recommendations.

pub mod question;

pub use question::{Difficulty, QuizQuestion, TopicTag, UserAnswer};

use education_core::{round_to, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Recorded as `selected_key` when no answer was submitted
pub const UNANSWERED: &str = "UNANSWERED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MasteryLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl MasteryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Beginner => "BEGINNER",
            MasteryLevel::Intermediate => "INTERMEDIATE",
            MasteryLevel::Advanced => "ADVANCED",
        }
    }

    fn motivational_feedback(&self) -> &'static str {
        match self {
            MasteryLevel::Advanced => {
                "Exceptional performance. Your understanding of financial concepts is at an advanced level. \
                 Continue challenging yourself with complex multi-indicator scenarios."
            }
            MasteryLevel::Intermediate => {
                "Solid performance. You have a working understanding of core concepts. \
                 Review the topics where accuracy fell below 80% to consolidate your knowledge."
            }
            MasteryLevel::Beginner => {
                "Good start. Focus on foundational concepts before advancing to complex strategies. \
                 Revisiting incorrect answers is the fastest path to mastery."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PerformanceBand {
    Strong,
    Developing,
    Weak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub points_per_correct: i64,
    /// Score percentage at or above which mastery is ADVANCED
    pub advanced_threshold: f64,
    /// Score percentage at or above which mastery is INTERMEDIATE
    pub intermediate_threshold: f64,
    pub topic_strong_threshold: f64,
    pub topic_developing_threshold: f64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            points_per_correct: 10,
            advanced_threshold: 80.0,
            intermediate_threshold: 60.0,
            topic_strong_threshold: 80.0,
            topic_developing_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub topic: TopicTag,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub selected_key: String,
    pub correct_key: String,
    /// Empty when the answer was correct
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPerformance {
    pub topic: TopicTag,
    pub attempted: usize,
    pub correct: usize,
    pub accuracy_percent: f64,
    pub performance_band: PerformanceBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub quiz_id: String,
    pub total_questions: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub score_percentage: f64,
    pub points_earned: i64,
    pub mastery_level: MasteryLevel,
    /// Sorted by topic name
    pub topic_performance: Vec<TopicPerformance>,
    /// In question order
    pub question_results: Vec<QuestionResult>,
    pub learning_recommendations: Vec<String>,
    pub motivational_feedback: String,
}

#[derive(Debug, Clone, Default)]
pub struct QuizEvaluator {
    config: QuizConfig,
}

impl QuizEvaluator {
    pub fn new(config: QuizConfig) -> Self {
        Self { config }
    }

    /// Grade `answers` against `questions`.
    ///
    /// Fails on an empty or malformed question set, or when an answer
    /// references a question that was not submitted.
    pub fn evaluate(
        &self,
        quiz_id: &str,
        questions: &[QuizQuestion],
        answers: &[UserAnswer],
    ) -> Result<QuizResult, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::EmptyQuestionSet);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in questions {
            question.validate()?;
            if !seen.insert(question.question_id.as_str()) {
                return Err(ValidationError::DuplicateQuestionId {
                    question_id: question.question_id.clone(),
                });
            }
        }

        // A repeated answer for the same question keeps the last one
        let mut answer_map: HashMap<&str, &UserAnswer> = HashMap::with_capacity(answers.len());
        for answer in answers {
            if !seen.contains(answer.question_id.as_str()) {
                return Err(ValidationError::UnknownQuestionReference {
                    question_id: answer.question_id.clone(),
                });
            }
            answer_map.insert(answer.question_id.as_str(), answer);
        }

        tracing::info!("evaluate_quiz: quiz_id={} questions={}", quiz_id, questions.len());

        let question_results: Vec<QuestionResult> = questions
            .iter()
            .map(|q| grade(q, answer_map.get(q.question_id.as_str()).copied()))
            .collect();

        let total = question_results.len();
        let correct_count = question_results.iter().filter(|r| r.is_correct).count();
        let score = correct_count as f64 / total as f64 * 100.0;
        let mastery_level = self.mastery(score);
        let topic_performance = self.topic_performance(&question_results);
        let learning_recommendations = recommendations(&topic_performance, mastery_level);

        Ok(QuizResult {
            quiz_id: quiz_id.to_string(),
            total_questions: total,
            correct_count,
            incorrect_count: total - correct_count,
            score_percentage: round_to(score, 2),
            points_earned: correct_count as i64 * self.config.points_per_correct,
            mastery_level,
            topic_performance,
            question_results,
            learning_recommendations,
            motivational_feedback: mastery_level.motivational_feedback().to_string(),
        })
    }

    pub fn mastery(&self, score_percentage: f64) -> MasteryLevel {
        if score_percentage >= self.config.advanced_threshold {
            MasteryLevel::Advanced
        } else if score_percentage >= self.config.intermediate_threshold {
            MasteryLevel::Intermediate
        } else {
            MasteryLevel::Beginner
        }
    }

    fn band(&self, accuracy: f64) -> PerformanceBand {
        if accuracy >= self.config.topic_strong_threshold {
            PerformanceBand::Strong
        } else if accuracy >= self.config.topic_developing_threshold {
            PerformanceBand::Developing
        } else {
            PerformanceBand::Weak
        }
    }

    fn topic_performance(&self, results: &[QuestionResult]) -> Vec<TopicPerformance> {
        let mut by_topic: BTreeMap<&'static str, (TopicTag, usize, usize)> = BTreeMap::new();
        for result in results {
            let entry = by_topic
                .entry(result.topic.as_str())
                .or_insert((result.topic, 0, 0));
            entry.1 += 1;
            if result.is_correct {
                entry.2 += 1;
            }
        }

        by_topic
            .into_values()
            .map(|(topic, attempted, correct)| {
                let accuracy = correct as f64 / attempted as f64 * 100.0;
                TopicPerformance {
                    topic,
                    attempted,
                    correct,
                    accuracy_percent: round_to(accuracy, 2),
                    performance_band: self.band(accuracy),
                }
            })
            .collect()
    }
}

fn grade(question: &QuizQuestion, answer: Option<&UserAnswer>) -> QuestionResult {
    let (selected_key, is_correct, explanation) = match answer {
        None => (
            UNANSWERED.to_string(),
            false,
            format!(
                "This question was not answered. Correct answer: {}. {}",
                question.correct_option_key, question.explanation
            ),
        ),
        Some(answer) => {
            let selected = answer.selected_key.trim().to_ascii_uppercase();
            let is_correct = selected == question.correct_option_key.trim().to_ascii_uppercase();
            let explanation = if is_correct {
                String::new()
            } else {
                question.explanation.clone()
            };
            (selected, is_correct, explanation)
        }
    };

    QuestionResult {
        question_id: question.question_id.clone(),
        topic: question.topic,
        difficulty: question.difficulty,
        is_correct,
        selected_key,
        correct_key: question.correct_option_key.clone(),
        explanation,
    }
}

fn recommendations(topics: &[TopicPerformance], mastery: MasteryLevel) -> Vec<String> {
    let weak: Vec<&TopicPerformance> = topics
        .iter()
        .filter(|t| t.performance_band == PerformanceBand::Weak)
        .collect();
    let developing: Vec<&TopicPerformance> = topics
        .iter()
        .filter(|t| t.performance_band == PerformanceBand::Developing)
        .collect();

    let mut out = Vec::new();
    for t in &weak {
        out.push(format!(
            "Priority review required: {topic}. Accuracy of {acc:.0}% indicates foundational gaps. \
             Study the definition, thresholds, and practical use cases for {topic} before retaking this section.",
            topic = t.topic,
            acc = t.accuracy_percent
        ));
    }
    for t in &developing {
        out.push(format!(
            "Consolidation needed: {topic}. Accuracy of {acc:.0}% suggests partial understanding. \
             Focus on edge cases and scenario-based application of {topic}.",
            topic = t.topic,
            acc = t.accuracy_percent
        ));
    }

    if mastery == MasteryLevel::Advanced && weak.is_empty() && developing.is_empty() {
        out.push(
            "All topics are in the STRONG band. \
             Advance to multi-indicator strategy simulations and portfolio-level analysis exercises."
                .to_string(),
        );
    }
    if out.is_empty() {
        out.push("Continue with the next difficulty tier to build on your current performance.".to_string());
    }
    out
}
