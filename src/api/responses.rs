use serde::{Deserialize, Serialize};

use crate::models::comparison::ComparisonResult;

/// Success body of `POST /api/compare-embeddings`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompareResponse {
    /// Scored candidates in service order
    pub results: Vec<ComparisonResult>,
}
