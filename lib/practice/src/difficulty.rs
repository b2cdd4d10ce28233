//! Question difficulty levels.

use crate::error::QuestionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard a practice question should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Basic concepts, simple commands.
    #[default]
    Beginner,
    /// Configuration, best practices.
    Intermediate,
    /// Complex scenarios, troubleshooting.
    Advanced,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Picks the level mentioned in free text.
    ///
    /// "advanced" wins over "intermediate"; anything else is beginner.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("advanced") {
            Self::Advanced
        } else if lower.contains("intermediate") {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(QuestionError::UnknownDifficulty {
                value: s.to_string(),
            }),
        }
    }
}
