//! Type-specific payloads of a content unit.
//!
//! Every payload is built through a fallible constructor that checks the
//! required fields up front. Fields are private, so a payload that exists
//! has already passed those checks.

use serde_json::{Map, Value};

use super::error::ValidationError;
use super::kind::ContentKind;
use super::question::{Question, check_questions};

/// Default passing score for quizzes and assessments.
pub const DEFAULT_PASSING_SCORE: f64 = 70.0;

/// Default number of attempts for a newly authored assessment.
pub const DEFAULT_ATTEMPTS_ALLOWED: u32 = 3;

/// Default answer format for exercises.
pub const DEFAULT_EXERCISE_ANSWER_TYPE: &str = "text";

fn require(kind: ContentKind, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { kind, field });
    }
    Ok(())
}

fn require_questions(kind: ContentKind, questions: &[Question]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(ValidationError::MissingField {
            kind,
            field: "questions",
        });
    }
    check_questions(questions)
}

fn check_passing_score(score: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field: "passing_score",
            min: 0.0,
            max: 100.0,
            value: score,
        });
    }
    Ok(())
}

/// Explanatory material.
#[derive(Debug, Clone, PartialEq)]
pub struct Theory {
    text: String,
    images: Vec<String>,
    examples: Map<String, Value>,
    references: Map<String, Value>,
}

impl Theory {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        require(ContentKind::Theory, "text_content", &text)?;
        Ok(Self {
            text,
            images: Vec::new(),
            examples: Map::new(),
            references: Map::new(),
        })
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_examples(mut self, examples: Map<String, Value>) -> Self {
        self.examples = examples;
        self
    }

    pub fn with_references(mut self, references: Map<String, Value>) -> Self {
        self.references = references;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn examples(&self) -> &Map<String, Value> {
        &self.examples
    }

    pub fn references(&self) -> &Map<String, Value> {
        &self.references
    }
}

/// Practice problem with a reference solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    problem_statement: String,
    solution: String,
    difficulty: String,
    hints: Vec<String>,
    answer_type: String,
    starter_code: Option<String>,
}

impl Exercise {
    pub fn new(
        problem_statement: impl Into<String>,
        solution: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let problem_statement = problem_statement.into();
        let solution = solution.into();
        let difficulty = difficulty.into();
        require(ContentKind::Exercise, "problem_statement", &problem_statement)?;
        require(ContentKind::Exercise, "solution", &solution)?;
        require(ContentKind::Exercise, "difficulty", &difficulty)?;
        Ok(Self {
            problem_statement,
            solution,
            difficulty,
            hints: Vec::new(),
            answer_type: DEFAULT_EXERCISE_ANSWER_TYPE.to_string(),
            starter_code: None,
        })
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    /// Blank tags keep the default answer type.
    pub fn with_answer_type(mut self, answer_type: impl Into<String>) -> Self {
        let answer_type = answer_type.into();
        if !answer_type.trim().is_empty() {
            self.answer_type = answer_type;
        }
        self
    }

    pub fn with_starter_code(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.starter_code = (!code.is_empty()).then_some(code);
        self
    }

    pub fn problem_statement(&self) -> &str {
        &self.problem_statement
    }

    pub fn solution(&self) -> &str {
        &self.solution
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn answer_type(&self) -> &str {
        &self.answer_type
    }

    pub fn starter_code(&self) -> Option<&str> {
        self.starter_code.as_deref()
    }
}

/// Ungraded question set.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    questions: Vec<Question>,
    passing_score: f64,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Result<Self, ValidationError> {
        require_questions(ContentKind::Quiz, &questions)?;
        Ok(Self {
            questions,
            passing_score: DEFAULT_PASSING_SCORE,
        })
    }

    pub fn with_passing_score(mut self, score: f64) -> Result<Self, ValidationError> {
        check_passing_score(score)?;
        self.passing_score = score;
        Ok(self)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn passing_score(&self) -> f64 {
        self.passing_score
    }
}

/// Graded question set with attempt and time limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    questions: Vec<Question>,
    passing_score: f64,
    time_limit_minutes: Option<u32>,
    attempts_allowed: u32,
    is_final: bool,
}

impl Assessment {
    pub fn new(questions: Vec<Question>) -> Result<Self, ValidationError> {
        require_questions(ContentKind::Assessment, &questions)?;
        Ok(Self {
            questions,
            passing_score: DEFAULT_PASSING_SCORE,
            time_limit_minutes: None,
            attempts_allowed: DEFAULT_ATTEMPTS_ALLOWED,
            is_final: false,
        })
    }

    pub fn with_passing_score(mut self, score: f64) -> Result<Self, ValidationError> {
        check_passing_score(score)?;
        self.passing_score = score;
        Ok(self)
    }

    pub fn with_time_limit(mut self, minutes: Option<u32>) -> Self {
        self.time_limit_minutes = minutes;
        self
    }

    pub fn with_attempts_allowed(mut self, attempts: u32) -> Result<Self, ValidationError> {
        if attempts == 0 {
            return Err(ValidationError::OutOfRange {
                field: "attempts_allowed",
                min: 1.0,
                max: f64::from(u32::MAX),
                value: 0.0,
            });
        }
        self.attempts_allowed = attempts;
        Ok(self)
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id.as_str() == id)
    }

    pub fn passing_score(&self) -> f64 {
        self.passing_score
    }

    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    pub fn attempts_allowed(&self) -> u32 {
        self.attempts_allowed
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Sum of all question point values.
    pub fn max_points(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.points)).sum()
    }
}

/// Simulation, tool, game or visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactive {
    interaction_type: String,
    configuration: Map<String, Value>,
    instructions: Option<String>,
}

impl Interactive {
    pub fn new(
        interaction_type: impl Into<String>,
        configuration: Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        let interaction_type = interaction_type.into();
        require(ContentKind::Interactive, "interaction_type", &interaction_type)?;
        if configuration.is_empty() {
            return Err(ValidationError::MissingField {
                kind: ContentKind::Interactive,
                field: "configuration",
            });
        }
        Ok(Self {
            interaction_type,
            configuration,
            instructions: None,
        })
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn interaction_type(&self) -> &str {
        &self.interaction_type
    }

    pub fn configuration(&self) -> &Map<String, Value> {
        &self.configuration
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}

/// External link or file.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    resource_type: String,
    locator: String,
    is_required: bool,
    created_by: Option<String>,
    resource_metadata: Map<String, Value>,
}

impl Resource {
    pub fn new(
        resource_type: impl Into<String>,
        locator: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let resource_type = resource_type.into();
        let locator = locator.into();
        require(ContentKind::Resource, "resource_type", &resource_type)?;
        require(ContentKind::Resource, "resource_url", &locator)?;
        Ok(Self {
            resource_type,
            locator,
            is_required: false,
            created_by: None,
            resource_metadata: Map::new(),
        })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.created_by = Some(creator.into());
        self
    }

    pub fn with_resource_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.resource_metadata = metadata;
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn resource_metadata(&self) -> &Map<String, Value> {
        &self.resource_metadata
    }
}

/// The payload of a content unit, one variant per shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBody {
    Theory(Theory),
    Exercise(Exercise),
    Quiz(Quiz),
    Assessment(Assessment),
    Interactive(Interactive),
    Resource(Resource),
}

impl ContentBody {
    /// The shape this payload carries.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Theory(_) => ContentKind::Theory,
            Self::Exercise(_) => ContentKind::Exercise,
            Self::Quiz(_) => ContentKind::Quiz,
            Self::Assessment(_) => ContentKind::Assessment,
            Self::Interactive(_) => ContentKind::Interactive,
            Self::Resource(_) => ContentKind::Resource,
        }
    }
}

impl From<Theory> for ContentBody {
    fn from(body: Theory) -> Self {
        Self::Theory(body)
    }
}

impl From<Exercise> for ContentBody {
    fn from(body: Exercise) -> Self {
        Self::Exercise(body)
    }
}

impl From<Quiz> for ContentBody {
    fn from(body: Quiz) -> Self {
        Self::Quiz(body)
    }
}

impl From<Assessment> for ContentBody {
    fn from(body: Assessment) -> Self {
        Self::Assessment(body)
    }
}

impl From<Interactive> for ContentBody {
    fn from(body: Interactive) -> Self {
        Self::Interactive(body)
    }
}

impl From<Resource> for ContentBody {
    fn from(body: Resource) -> Self {
        Self::Resource(body)
    }
}
