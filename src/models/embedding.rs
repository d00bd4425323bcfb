use serde::{Deserialize, Serialize};

/// Body of `POST /api/embed-text`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbedRequest {
    /// Text to embed.
    pub text: String,
}

/// Success body of `POST /api/embed-text`.
///
/// The embedding layout belongs to the service, so it is kept as raw JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmbedResponse {
    /// The embedding as produced by the service.
    pub embedding: serde_json::Value,
}

impl EmbedResponse {
    /// Number of components when the embedding is a flat array.
    pub fn dimensions(&self) -> Option<usize> {
        self.embedding.as_array().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let flat: EmbedResponse = serde_json::from_str(r#"{"embedding":[0.1,0.2,0.3]}"#).unwrap();
        assert_eq!(flat.dimensions(), Some(3));

        let nested: EmbedResponse =
            serde_json::from_str(r#"{"embedding":{"values":[1]}}"#).unwrap();
        assert_eq!(nested.dimensions(), None);
    }

    #[test]
    fn test_missing_embedding_field() {
        assert!(serde_json::from_str::<EmbedResponse>(r#"{"vector":[1]}"#).is_err());
    }
}
