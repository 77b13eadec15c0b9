//! Authoring checks applied to every payload shape.
//!
//! Constructors already reject missing required fields. These checks catch
//! content that is well-formed but could never be answered or displayed
//! correctly, such as a multiple choice question without a correct answer.

use serde_json::Value;

use crate::content::{AnswerModality, ContentBody, Question};

/// Run the checks for the body's shape.
pub(crate) fn check_body(body: &ContentBody) -> Vec<String> {
    let mut errors = Vec::new();
    match body {
        ContentBody::Theory(theory) => {
            if theory.images().iter().any(|i| i.trim().is_empty()) {
                errors.push("Image references cannot be blank".to_string());
            }
        }
        ContentBody::Exercise(exercise) => {
            if exercise.hints().iter().any(|h| h.trim().is_empty()) {
                errors.push("Hints cannot be blank".to_string());
            }
        }
        ContentBody::Quiz(quiz) => {
            for question in quiz.questions() {
                check_question(question, &mut errors);
            }
        }
        ContentBody::Assessment(assessment) => {
            for question in assessment.questions() {
                check_question(question, &mut errors);
            }
        }
        ContentBody::Interactive(interactive) => {
            if interactive
                .instructions()
                .is_some_and(|i| i.trim().is_empty())
            {
                errors.push("Instructions cannot be blank".to_string());
            }
        }
        ContentBody::Resource(resource) => {
            if resource.created_by().is_some_and(|c| c.trim().is_empty()) {
                errors.push("Resource creator cannot be blank".to_string());
            }
        }
    }
    errors
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn check_question(question: &Question, errors: &mut Vec<String>) {
    let id = &question.id;
    if question.text.trim().is_empty() {
        errors.push(format!("Question {id}: text is required"));
    }

    match &question.answer_type {
        AnswerModality::MultipleChoice | AnswerModality::TrueFalse => {
            let Some(answer) = question.correct_answer.as_ref().and_then(scalar_text) else {
                errors.push(format!("Question {id}: correct answer is required"));
                return;
            };
            let answer = normalize(&answer);
            if question.answer_type == AnswerModality::TrueFalse
                && answer != "true"
                && answer != "false"
            {
                errors.push(format!("Question {id}: answer must be true or false"));
            }
            if !question.options.is_empty()
                && !question.options.iter().any(|o| normalize(o) == answer)
            {
                errors.push(format!(
                    "Question {id}: correct answer is not one of the options"
                ));
            }
        }
        AnswerModality::OpenEnded => {
            if question.acceptable_answers.is_empty() {
                errors.push(format!("Question {id}: acceptable answers are required"));
            }
        }
        AnswerModality::Mathematical => {
            if question.correct_answer.as_ref().and_then(scalar_text).is_none() {
                errors.push(format!("Question {id}: correct answer is required"));
            }
        }
        AnswerModality::Matching => {
            let valid = question
                .correct_answer
                .as_ref()
                .and_then(Value::as_object)
                .is_some_and(|pairs| !pairs.is_empty());
            if !valid {
                errors.push(format!(
                    "Question {id}: matching answer must be a non-empty mapping"
                ));
            }
        }
        AnswerModality::Code => {}
        AnswerModality::Unrecognized(tag) => {
            errors.push(format!("Question {id}: unrecognized answer type '{tag}'"));
        }
    }
}
