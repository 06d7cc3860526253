//! Client for the outfit analysis endpoint.
//!
//! One call is one exchange: compress the photo, `POST` it as JSON, and
//! either return the validated [`FashionAnalysis`] or fail. Nothing is
//! retried and no timeout is applied beyond the transport's own.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::image_processing::ImageCompressor;
use crate::model::{AnalysisRequest, FashionAnalysis, Language, ModelId};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

/// Anything that can turn a photo into a [`FashionAnalysis`].
///
/// The orchestrator depends on this rather than on [`AnalysisClient`]
/// directly so that alternative backends can be plugged in.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        image: &[u8],
        language: Language,
        model: &ModelId,
    ) -> Result<FashionAnalysis>;
}

/// Body sent by the endpoint alongside a non-success status.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: Url,
    compressor: ImageCompressor,
}

impl AnalysisClient {
    pub fn new(config: &Config) -> Self {
        Self::with_endpoint(config.endpoint.clone())
    }

    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            compressor: ImageCompressor::default(),
        }
    }

    /// Replaces the default compressor (800px, quality 60).
    pub fn with_compressor(mut self, compressor: ImageCompressor) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<FashionAnalysis> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .unwrap_or_default()
                .error;
            return Err(AppError::rejected(status.as_u16(), message));
        }

        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::transport(format!("Malformed response body: {}", e)))?;

        FashionAnalysis::from_value(value)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(
        &self,
        image: &[u8],
        language: Language,
        model: &ModelId,
    ) -> Result<FashionAnalysis> {
        let result = async {
            let payload = self.compressor.compress(image).await?;

            debug!(
                "Sending {}x{} photo to {} (lang: {}, model: {})",
                payload.width, payload.height, self.endpoint, language, model
            );

            let request = AnalysisRequest {
                payload,
                language,
                model_id: model.clone(),
            };
            self.send(&request).await
        }
        .await;

        result.inspect_err(|e| error!("Error analyzing outfit: {}", e))
    }
}
