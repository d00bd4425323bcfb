//! Client side of the comparison service HTTP API

pub mod client;
pub mod responses;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        comparison::{ComparisonRequest, ComparisonResult},
        embedding::EmbedResponse,
    },
};

pub use client::HttpBackend;

/// The remote service the front-end talks to.
///
/// Every call is a single request that either resolves or fails; no retries.
#[async_trait]
pub trait CompareBackend: Send + Sync {
    /// Score `request.compares` against `request.target_text`
    async fn compare(&self, request: &ComparisonRequest) -> Result<Vec<ComparisonResult>>;

    /// Ask the service for the embedding of `text`
    async fn embed_text(&self, text: &str) -> Result<EmbedResponse>;
}
