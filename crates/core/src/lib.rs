//! Outfit Lens Core Library
//!
//! This library provides the core of the Outfit Lens photo analysis tool:
//! image compression, the analysis endpoint client, and the controller that
//! drives the analysis screen.
//!
//! # Overview
//!
//! A user picks a photo of their outfit. The photo is shrunk and re-encoded,
//! sent to an analysis endpoint (which forwards it to a vision model), and the
//! structured fashion feedback that comes back is shown. The library handles:
//!
//! - **Image Compression**: Downscaling and JPEG/Base64 encoding via [`image_processing`]
//! - **Analysis Client**: The single request/response exchange via [`client`]
//! - **User Interface**: The Idle/Analyzing/Success/Error controller via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use outfit_lens_core::OutfitLens;
//!
//! let app = OutfitLens::new()?;
//! let analysis = app.analyze(&std::fs::read("outfit.jpg")?).await?;
//! println!("{}", analysis.summary);
//! ```
//!
//! # Module Structure
//!
//! - [`client`]: Analysis endpoint client and the [`Analyzer`] trait
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`image_processing`]: Image compression utilities
//! - [`model`]: Languages, models, request and result types
//! - [`ui`]: State machine, status ticker and result rendering

pub mod client;
pub mod config;
pub mod error;
pub mod image_processing;
pub mod model;
pub mod ui;

// Re-export primary types for convenience
pub use client::{AnalysisClient, Analyzer};
pub use config::Config;
pub use error::{AppError, Result};
pub use image_processing::{CompressionOptions, EncodedPayload, ImageCompressor};
pub use model::{FashionAnalysis, Language, ModelId, AVAILABLE_MODELS};
pub use ui::{AnalysisOrchestrator, AppState};

/// Main entry point for the Outfit Lens library.
///
/// A thin facade over configuration, the analysis client and the
/// orchestrator.
pub struct OutfitLens {
    config: Config,
}

impl OutfitLens {
    /// Creates an instance configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an `OUTFIT_LENS_*` variable holds an invalid value.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Analyzes a photo directly, using the configured language and model.
    ///
    /// Errors are returned as-is; use [`orchestrator`](Self::orchestrator)
    /// for the UI-facing flow that maps them to a generic message.
    pub async fn analyze(&self, image: &[u8]) -> Result<FashionAnalysis> {
        AnalysisClient::new(&self.config)
            .analyze(image, self.config.language, &self.config.model)
            .await
    }

    /// Creates an orchestrator bound to the configured endpoint.
    pub fn orchestrator(&self) -> AnalysisOrchestrator {
        AnalysisOrchestrator::from_config(&self.config)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup. This loads `.env` files if present.
pub fn init() {
    let _ = dotenvy::dotenv();
}
