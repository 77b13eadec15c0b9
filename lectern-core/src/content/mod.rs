//! Polymorphic content model

mod body;
mod error;
mod kind;
mod question;
mod unit;

pub use body::{
    Assessment, ContentBody, DEFAULT_ATTEMPTS_ALLOWED, DEFAULT_EXERCISE_ANSWER_TYPE,
    DEFAULT_PASSING_SCORE, Exercise, Interactive, Quiz, Resource, Theory,
};
pub use error::ValidationError;
pub use kind::ContentKind;
pub use question::{AnswerModality, Feedback, Question};
pub use unit::{ContentHeader, ContentUnit, DEFAULT_DATE_FORMAT, DateDisplay, MISSING_DATE};
