//! Built-in content shapes.

use serde::{Deserialize, Serialize};

/// The closed set of payload shapes a content unit can carry.
///
/// Every registered content type, built-in or custom, binds to exactly one
/// of these shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Explanatory material
    Theory,
    /// Practice problem with a reference solution
    Exercise,
    /// Ungraded question set
    Quiz,
    /// Graded, attempt-limited question set
    Assessment,
    /// Simulation, tool, game or visualization
    Interactive,
    /// External link or file
    Resource,
}

impl ContentKind {
    /// All built-in kinds in registration order.
    pub const ALL: [ContentKind; 6] = [
        Self::Theory,
        Self::Exercise,
        Self::Quiz,
        Self::Assessment,
        Self::Interactive,
        Self::Resource,
    ];

    /// Convert to the persisted type tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theory => "theory",
            Self::Exercise => "exercise",
            Self::Quiz => "quiz",
            Self::Assessment => "assessment",
            Self::Interactive => "interactive",
            Self::Resource => "resource",
        }
    }

    /// Parse from a persisted type tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "theory" => Some(Self::Theory),
            "exercise" => Some(Self::Exercise),
            "quiz" => Some(Self::Quiz),
            "assessment" => Some(Self::Assessment),
            "interactive" => Some(Self::Interactive),
            "resource" => Some(Self::Resource),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
