//! Built-in graders, one per recognised answer modality.

use lectern_core::Question;
use serde_json::Value;

use super::{Grade, Grader};
use crate::answer::{Answer, value_text};

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Multiple choice and true/false: case-insensitive match on the trimmed text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactChoice;

impl Grader for ExactChoice {
    fn grade(&self, question: &Question, answer: &Answer) -> Grade {
        let Some(correct) = question.correct_answer.as_ref().and_then(value_text) else {
            return Grade::incorrect();
        };
        Grade::all_or_nothing(
            normalize(&answer.as_text()) == normalize(&correct),
            question.points,
        )
    }
}

/// Open-ended: matches any of the question's acceptable answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptableAnswers;

impl Grader for AcceptableAnswers {
    fn grade(&self, question: &Question, answer: &Answer) -> Grade {
        let submitted = normalize(&answer.as_text());
        let matched = question
            .acceptable_answers
            .iter()
            .any(|a| normalize(a) == submitted);
        Grade::all_or_nothing(matched, question.points)
    }
}

/// Mathematical: exact match on the trimmed text, case preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactText;

impl Grader for ExactText {
    fn grade(&self, question: &Question, answer: &Answer) -> Grade {
        let Some(correct) = question.correct_answer.as_ref().and_then(value_text) else {
            return Grade::incorrect();
        };
        Grade::all_or_nothing(answer.as_text().trim() == correct.trim(), question.points)
    }
}

/// Structural equality, except numbers compare by value so `1` equals `1.0`.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

/// Matching: partial credit for each pair answered correctly.
///
/// Points are the fraction of correct pairs times the question's points,
/// rounded half to even. Only a fully correct mapping counts as correct.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingPairs;

impl Grader for MatchingPairs {
    fn grade(&self, question: &Question, answer: &Answer) -> Grade {
        let (Some(submitted), Some(correct)) = (
            answer.as_mapping(),
            question.correct_answer.as_ref().and_then(|v| v.as_object()),
        ) else {
            return Grade::incorrect();
        };
        if correct.is_empty() {
            return Grade::incorrect();
        }

        let matched = correct
            .iter()
            .filter(|&(key, value)| submitted.get(key).is_some_and(|s| same_value(s, value)))
            .count();
        let fraction = matched as f64 / correct.len() as f64;
        Grade {
            is_correct: matched == correct.len(),
            points: (fraction * f64::from(question.points)).round_ties_even() as u32,
        }
    }
}

/// Never awards points. Stands in for modalities that need an external grader.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCorrect;

impl Grader for NeverCorrect {
    fn grade(&self, _question: &Question, _answer: &Answer) -> Grade {
        Grade::incorrect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::AnswerModality;
    use serde_json::{Value, json};

    fn mapping(value: Value) -> Answer {
        Answer::Mapping(value.as_object().cloned().unwrap())
    }

    fn choice(correct: impl Into<Value>) -> Question {
        Question::new("q1", "2+2?", AnswerModality::MultipleChoice)
            .with_correct_answer(correct)
            .with_points(2)
    }

    // ===== Choice =====

    #[test]
    fn choice_ignores_case_and_whitespace() {
        let grade = ExactChoice.grade(&choice("4"), &Answer::from(" 4 "));
        assert_eq!(grade, Grade { is_correct: true, points: 2 });
        let grade = ExactChoice.grade(&choice("Paris"), &Answer::from("pARIS"));
        assert!(grade.is_correct);
    }

    #[test]
    fn choice_wrong_answer_scores_zero() {
        assert_eq!(ExactChoice.grade(&choice("4"), &Answer::from("5")), Grade::incorrect());
    }

    #[test]
    fn choice_compares_numbers_and_bools_as_text() {
        assert!(ExactChoice.grade(&choice(4), &Answer::from("4")).is_correct);
        assert!(ExactChoice.grade(&choice(true), &Answer::from("True")).is_correct);
        assert!(ExactChoice.grade(&choice("false"), &Answer::from(false)).is_correct);
    }

    #[test]
    fn choice_without_correct_answer_never_matches() {
        let question = Question::new("q1", "?", AnswerModality::MultipleChoice);
        assert_eq!(ExactChoice.grade(&question, &Answer::from("")), Grade::incorrect());
    }

    // ===== Open ended =====

    #[test]
    fn open_ended_matches_any_acceptable_answer() {
        let question = Question::new("q1", "Name a loop", AnswerModality::OpenEnded)
            .with_acceptable_answers(vec!["for".into(), "While".into()]);
        assert!(AcceptableAnswers.grade(&question, &Answer::from(" while")).is_correct);
        assert!(!AcceptableAnswers.grade(&question, &Answer::from("loop")).is_correct);
    }

    #[test]
    fn open_ended_without_list_scores_zero() {
        let question = Question::new("q1", "Name a loop", AnswerModality::OpenEnded);
        assert_eq!(
            AcceptableAnswers.grade(&question, &Answer::from("for")),
            Grade::incorrect()
        );
    }

    // ===== Mathematical =====

    #[test]
    fn mathematical_is_exact_and_case_sensitive() {
        let question = Question::new("q1", "Simplify", AnswerModality::Mathematical)
            .with_correct_answer("2x");
        assert!(ExactText.grade(&question, &Answer::from(" 2x ")).is_correct);
        assert!(!ExactText.grade(&question, &Answer::from("2X")).is_correct);
        assert!(!ExactText.grade(&question, &Answer::from("x*2")).is_correct);
    }

    // ===== Matching =====

    #[test]
    fn matching_partial_credit_rounds() {
        let question = Question::new("q1", "Match", AnswerModality::Matching)
            .with_correct_answer(json!({"A": 1, "B": 2, "C": 3}))
            .with_points(6);
        let grade = MatchingPairs.grade(&question, &mapping(json!({"A": 1, "B": 2, "C": 4})));
        assert_eq!(grade, Grade { is_correct: false, points: 4 });
    }

    #[test]
    fn matching_full_credit_is_correct() {
        let question = Question::new("q1", "Match", AnswerModality::Matching)
            .with_correct_answer(json!({"A": 1, "B": 2}))
            .with_points(3);
        let grade = MatchingPairs.grade(&question, &mapping(json!({"B": 2, "A": 1, "Z": 9})));
        assert_eq!(grade, Grade { is_correct: true, points: 3 });
    }

    #[test]
    fn matching_compares_numbers_by_value() {
        let question = Question::new("q1", "Match", AnswerModality::Matching)
            .with_correct_answer(json!({"A": 1, "B": 2}))
            .with_points(2);
        let grade = MatchingPairs.grade(&question, &mapping(json!({"A": 1.0, "B": 2.0})));
        assert_eq!(grade, Grade { is_correct: true, points: 2 });

        let grade = MatchingPairs.grade(&question, &mapping(json!({"A": "1", "B": 2.5})));
        assert_eq!(grade, Grade::incorrect());
    }

    #[test]
    fn same_value_recurses_into_collections() {
        assert!(same_value(&json!([1, {"x": 2}]), &json!([1.0, {"x": 2.0}])));
        assert!(!same_value(&json!([1, 2]), &json!([1])));
        assert!(!same_value(&json!({"x": 1}), &json!({"x": 1, "y": 2})));
        assert!(same_value(&json!("a"), &json!("a")));
    }

    #[test]
    fn matching_rounds_half_to_even() {
        // 1 of 2 pairs on a 1-point question is 0.5, which rounds to 0
        let question = Question::new("q1", "Match", AnswerModality::Matching)
            .with_correct_answer(json!({"A": 1, "B": 2}))
            .with_points(1);
        let grade = MatchingPairs.grade(&question, &mapping(json!({"A": 1})));
        assert_eq!(grade.points, 0);

        // 1 of 2 pairs on a 3-point question is 1.5, which rounds to 2
        let question = question.with_points(3);
        let grade = MatchingPairs.grade(&question, &mapping(json!({"A": 1})));
        assert_eq!(grade.points, 2);
    }

    #[test]
    fn matching_rejects_non_mapping_submission() {
        let question = Question::new("q1", "Match", AnswerModality::Matching)
            .with_correct_answer(json!({"A": 1}));
        assert_eq!(
            MatchingPairs.grade(&question, &Answer::from("A=1")),
            Grade::incorrect()
        );
    }

    #[test]
    fn matching_with_empty_key_scores_zero() {
        let question = Question::new("q1", "Match", AnswerModality::Matching)
            .with_correct_answer(json!({}));
        assert_eq!(
            MatchingPairs.grade(&question, &mapping(json!({}))),
            Grade::incorrect()
        );
    }

    #[test]
    fn never_correct_ignores_input() {
        let question = Question::new("q1", "fizzbuzz", AnswerModality::Code)
            .with_correct_answer("print(1)");
        assert_eq!(
            NeverCorrect.grade(&question, &Answer::from("print(1)")),
            Grade::incorrect()
        );
    }
}
