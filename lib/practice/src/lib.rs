//! Practice question generation for cloudbuddy.
//!
//! Questions are multiple choice, written in Hinglish, and scoped to one
//! AWS service at one [`Difficulty`]. A [`QuestionGenerator`] asks the
//! configured model for a fresh question and falls back to a small fixed
//! table whenever the model is unavailable or returns something unusable.

pub mod cache;
pub mod difficulty;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod question;

pub use cache::{QuestionCache, QuestionCacheConfig};
pub use difficulty::Difficulty;
pub use error::QuestionError;
pub use generator::QuestionGenerator;
pub use question::PracticeQuestion;
