use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Scoring method applied by the service.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityFunction {
    /// Cosine similarity.
    #[default]
    Cosine,
    /// Euclidean distance.
    Euclidean,
}

impl SimilarityFunction {
    /// Every supported function, in display order.
    pub const ALL: [SimilarityFunction; 2] = [Self::Cosine, Self::Euclidean];

    /// Wire name of the function.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine Similarity",
            Self::Euclidean => "Euclidean Distance",
        }
    }
}

impl fmt::Display for SimilarityFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityFunction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            other => Err(AppError::Validation(format!(
                "unknown similarity function '{}', expected 'cosine' or 'euclidean'",
                other
            ))),
        }
    }
}

/// Body of `POST /api/compare-embeddings`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComparisonRequest {
    /// Reference text every compare text is scored against.
    pub target_text: String,
    /// Candidate texts, blank entries already removed.
    pub compares: Vec<String>,
    /// Scoring method.
    pub function: SimilarityFunction,
}

/// One scored candidate, as returned by the service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComparisonResult {
    /// The candidate text.
    pub text: String,
    /// Score computed by the service.
    pub score: f64,
}
