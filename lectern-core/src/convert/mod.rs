//! Conversion between stored content records and content units.
//!
//! Reading is tolerant: a record already in storage is never rejected for a
//! missing field that has a sensible default. Required fields are filled in
//! and logged. Only records that cannot be shaped at all (unknown type,
//! payload that is not an object, no questions) fail, and those failures
//! surface as `None` from [`ContentConverter::to_model`] so one bad row does
//! not break a lesson listing.

mod error;
mod payload;
mod record;

pub use error::ConversionError;
pub use payload::MISSING_TEXT;
pub use record::{ContentRecord, NewContentRecord};

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::content::{
    Assessment, ContentBody, ContentHeader, ContentKind, ContentUnit, DEFAULT_EXERCISE_ANSWER_TYPE,
    DEFAULT_PASSING_SCORE, Exercise, Interactive, Question, Quiz, Resource, Theory,
};
use crate::registry::ContentTypeRegistry;
use payload::PayloadReader;

/// Attempt allowance assumed for stored assessments that do not record one.
pub const STORED_ATTEMPTS_DEFAULT: u32 = 1;

const DEFAULT_DIFFICULTY: &str = "medium";
const DEFAULT_RESOURCE_TYPE: &str = "link";
const DEFAULT_INTERACTION_TYPE: &str = "unknown";

/// Converts records to units and back, resolving tags through the registry.
#[derive(Clone)]
pub struct ContentConverter {
    registry: Arc<ContentTypeRegistry>,
}

impl ContentConverter {
    pub fn new(registry: Arc<ContentTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ContentTypeRegistry {
        &self.registry
    }

    /// Convert a record, logging and swallowing any failure.
    pub fn to_model(&self, record: &ContentRecord) -> Option<ContentUnit> {
        match self.try_to_model(record) {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!(content_id = %record.id, content_type = %record.content_type, error = %e, "Skipping unconvertible content record");
                None
            }
        }
    }

    /// Convert a record, reporting why it could not be shaped.
    pub fn try_to_model(&self, record: &ContentRecord) -> Result<ContentUnit, ConversionError> {
        let kind = self
            .registry
            .shape_of(&record.content_type)
            .ok_or_else(|| ConversionError::UnknownType(record.content_type.clone()))?;

        let empty = Map::new();
        let data = match &record.content_data {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => return Err(ConversionError::PayloadNotObject(record.content_type.clone())),
        };
        let reader = PayloadReader::new(record.id, data);
        debug!(content_id = %record.id, %kind, "Converting content record");

        let body: ContentBody = match kind {
            ContentKind::Theory => theory_from(&reader)?.into(),
            ContentKind::Exercise => exercise_from(&reader)?.into(),
            ContentKind::Quiz => quiz_from(&reader, &record.content_type)?.into(),
            ContentKind::Assessment => assessment_from(&reader, &record.content_type)?.into(),
            ContentKind::Interactive => interactive_from(&reader)?.into(),
            ContentKind::Resource => resource_from(&reader)?.into(),
        };

        let unit = ContentUnit::with_type(record.content_type.clone(), header_from(record), body)?;
        Ok(unit)
    }

    /// Convert a unit into its stored shape.
    pub fn to_record(&self, unit: &ContentUnit) -> ContentRecord {
        let header = unit.header();
        ContentRecord {
            id: header.id,
            lesson_id: header.lesson_id,
            content_type: unit.content_type().to_string(),
            title: header.title.clone(),
            order: header.order,
            description: header.description.clone(),
            metadata: Value::Object(header.metadata.clone()),
            estimated_minutes: header.estimated_minutes,
            created_at: header.created_at,
            updated_at: header.updated_at,
            content_data: payload_of(unit.body()),
        }
    }
}

fn header_from(record: &ContentRecord) -> ContentHeader {
    let metadata = match &record.metadata {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            warn!(content_id = %record.id, value = %other, "Ignoring non-object metadata");
            Map::new()
        }
    };
    ContentHeader {
        id: record.id,
        title: record.title.clone(),
        order: record.order,
        lesson_id: record.lesson_id,
        description: record.description.clone(),
        metadata,
        estimated_minutes: record.estimated_minutes,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

fn theory_from(reader: &PayloadReader<'_>) -> Result<Theory, ConversionError> {
    Ok(Theory::new(reader.required_text("text_content"))?
        .with_images(reader.strings("images"))
        .with_examples(reader.object("examples"))
        .with_references(reader.object("references")))
}

const STARTER_CODE_KEYS: [&str; 3] = ["initial_code", "buggy_code", "code"];

fn exercise_from(reader: &PayloadReader<'_>) -> Result<Exercise, ConversionError> {
    // Older rows hold a list of exercises; only the first one is used.
    if !reader.contains("question")
        && let Some(Value::Array(items)) = reader.get("exercises")
        && let Some(first) = items.first()
    {
        let Value::Object(first) = first else {
            return Err(ConversionError::MalformedField {
                field: "exercises",
                reason: "first entry is not an object".to_string(),
            });
        };
        return exercise_fields(&reader.nested(first), "answer");
    }
    exercise_fields(reader, "solution")
}

fn exercise_fields(
    reader: &PayloadReader<'_>,
    solution_key: &str,
) -> Result<Exercise, ConversionError> {
    let exercise = Exercise::new(
        reader.required_text("question"),
        reader.required_text(solution_key),
        reader.text_or("difficulty", DEFAULT_DIFFICULTY),
    )?
    .with_hints(reader.strings("hints"))
    .with_answer_type(reader.text_or("answer_type", DEFAULT_EXERCISE_ANSWER_TYPE));
    Ok(match reader.first_text(&STARTER_CODE_KEYS) {
        Some(code) => exercise.with_starter_code(code),
        None => exercise,
    })
}

fn questions_from(
    reader: &PayloadReader<'_>,
    content_type: &str,
) -> Result<Vec<Question>, ConversionError> {
    let Some(raw) = reader.get("questions") else {
        return Err(ConversionError::MissingQuestions(content_type.to_string()));
    };
    let questions: Vec<Question> =
        serde_json::from_value(raw.clone()).map_err(|e| ConversionError::MalformedField {
            field: "questions",
            reason: e.to_string(),
        })?;
    if questions.is_empty() {
        return Err(ConversionError::MissingQuestions(content_type.to_string()));
    }
    Ok(questions)
}

/// Stored passing score, clamped into `0..=100`.
fn passing_score(reader: &PayloadReader<'_>) -> f64 {
    let stored = reader.number_or("passing_score", DEFAULT_PASSING_SCORE);
    let score = stored.clamp(0.0, 100.0);
    if score != stored {
        warn!(
            content_id = %reader.id(),
            passing_score = stored,
            clamped = score,
            "Passing score out of range, clamping"
        );
    }
    score
}

fn quiz_from(reader: &PayloadReader<'_>, content_type: &str) -> Result<Quiz, ConversionError> {
    let quiz = Quiz::new(questions_from(reader, content_type)?)?
        .with_passing_score(passing_score(reader))?;
    Ok(quiz)
}

fn assessment_from(
    reader: &PayloadReader<'_>,
    content_type: &str,
) -> Result<Assessment, ConversionError> {
    let attempts = match reader.count("attempts_allowed") {
        Some(n) if n > 0 => n,
        _ => {
            warn!(
                content_id = %reader.id(),
                attempts = STORED_ATTEMPTS_DEFAULT,
                "Assessment has no usable attempt allowance, using default"
            );
            STORED_ATTEMPTS_DEFAULT
        }
    };
    let assessment = Assessment::new(questions_from(reader, content_type)?)?
        .with_passing_score(passing_score(reader))?
        .with_time_limit(reader.count("time_limit"))
        .with_attempts_allowed(attempts)?
        .with_final(reader.flag("is_final"));
    Ok(assessment)
}

fn interactive_from(reader: &PayloadReader<'_>) -> Result<Interactive, ConversionError> {
    let configuration = match reader.get("configuration") {
        Some(Value::Object(map)) if !map.is_empty() => map.clone(),
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("raw".to_string(), other.cloned().unwrap_or(Value::Null));
            wrapped
        }
    };
    let interactive = Interactive::new(
        reader.text_or("interactive_type", DEFAULT_INTERACTION_TYPE),
        configuration,
    )?;
    Ok(match reader.optional_text("instructions") {
        Some(instructions) => interactive.with_instructions(instructions),
        None => interactive,
    })
}

fn resource_from(reader: &PayloadReader<'_>) -> Result<Resource, ConversionError> {
    let resource = Resource::new(
        reader.text_or("resource_type", DEFAULT_RESOURCE_TYPE),
        reader.required_text("resource_url"),
    )?
    .with_required(reader.flag("is_required"))
    .with_resource_metadata(reader.object("resource_metadata"));
    let creator = match reader.get("created_by") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(match creator {
        Some(creator) => resource.with_creator(creator),
        None => resource,
    })
}

fn payload_of(body: &ContentBody) -> Value {
    match body {
        ContentBody::Theory(theory) => json!({
            "text_content": theory.text(),
            "images": theory.images(),
            "examples": theory.examples(),
            "references": theory.references(),
        }),
        ContentBody::Exercise(exercise) => {
            let mut data = json!({
                "question": exercise.problem_statement(),
                "solution": exercise.solution(),
                "difficulty": exercise.difficulty(),
                "hints": exercise.hints(),
                "answer_type": exercise.answer_type(),
            });
            if let Some(code) = exercise.starter_code() {
                data["initial_code"] = json!(code);
            }
            data
        }
        ContentBody::Quiz(quiz) => json!({
            "questions": quiz.questions(),
            "passing_score": quiz.passing_score(),
        }),
        ContentBody::Assessment(assessment) => json!({
            "questions": assessment.questions(),
            "passing_score": assessment.passing_score(),
            "time_limit": assessment.time_limit_minutes(),
            "attempts_allowed": assessment.attempts_allowed(),
            "is_final": assessment.is_final(),
        }),
        ContentBody::Interactive(interactive) => {
            let mut data = json!({
                "interactive_type": interactive.interaction_type(),
                "configuration": interactive.configuration(),
            });
            if let Some(instructions) = interactive.instructions() {
                data["instructions"] = json!(instructions);
            }
            data
        }
        ContentBody::Resource(resource) => {
            let mut data = json!({
                "resource_type": resource.resource_type(),
                "resource_url": resource.locator(),
                "is_required": resource.is_required(),
                "resource_metadata": resource.resource_metadata(),
            });
            if let Some(creator) = resource.created_by() {
                data["created_by"] = json!(creator);
            }
            data
        }
    }
}
