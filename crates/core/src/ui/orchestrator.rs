//! The controller behind the analysis screen.
//!
//! [`AnalysisOrchestrator`] owns the [`AppState`] machine. Analyses run on
//! spawned tasks and report back over a channel; the orchestrator applies a
//! completion only if it answers the most recent request, so a response that
//! arrives after a reset or a newer submission is dropped.

use super::state::{AnalysisEvent, AppState};
use super::ticker::{StatusTicker, STATUS_PERIOD};
use crate::client::{AnalysisClient, Analyzer};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{FashionAnalysis, Language, ModelId};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

pub struct AnalysisOrchestrator {
    analyzer: Arc<dyn Analyzer>,
    language: Language,
    model: ModelId,

    state: AppState,
    result: Option<FashionAnalysis>,
    error_message: Option<String>,

    // Bumped on every submission and reset
    generation: u64,
    ticker: Option<StatusTicker>,

    tx: mpsc::UnboundedSender<AnalysisEvent>,
    rx: mpsc::UnboundedReceiver<AnalysisEvent>,
}

impl AnalysisOrchestrator {
    pub fn new(analyzer: Arc<dyn Analyzer>, language: Language, model: ModelId) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            analyzer,
            language,
            model,
            state: AppState::Idle,
            result: None,
            error_message: None,
            generation: 0,
            ticker: None,
            tx,
            rx,
        }
    }

    /// Creates an orchestrator backed by an [`AnalysisClient`] for the
    /// configured endpoint.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(AnalysisClient::new(config)),
            config.language,
            config.model.clone(),
        )
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn result(&self) -> Option<&FashionAnalysis> {
        self.result.as_ref()
    }

    /// The user-facing error message; always the generic text for the
    /// current language.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn model(&self) -> &ModelId {
        &self.model
    }

    /// The rotating status message, while analyzing.
    pub fn status_text(&self) -> Option<&'static str> {
        self.ticker.as_ref().and_then(StatusTicker::current)
    }

    /// Notifies whenever the status message index changes. `None` outside
    /// of `Analyzing`.
    pub fn status_updates(&self) -> Option<watch::Receiver<usize>> {
        self.ticker.as_ref().map(StatusTicker::subscribe)
    }

    /// Changes the language used for the next request.
    ///
    /// While analyzing, the status messages restart from the first one in
    /// the new language. The in-flight request keeps its original language.
    pub fn set_language(&mut self, language: Language) {
        if self.language == language {
            return;
        }
        self.language = language;
        if self.state == AppState::Analyzing {
            self.start_ticker();
        }
    }

    pub fn set_model(&mut self, model: ModelId) {
        self.model = model;
    }

    /// Starts analyzing a photo.
    ///
    /// The state is `Analyzing` when this returns; the analysis itself runs
    /// on a spawned task. Must be called from within a tokio runtime.
    /// Returns the generation of the new request.
    pub fn select_image(&mut self, image: Vec<u8>) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        self.state = AppState::Analyzing;
        self.result = None;
        self.error_message = None;
        self.start_ticker();

        info!(
            "Analyzing photo ({} bytes, lang: {}, model: {}, request #{})",
            image.len(),
            self.language,
            self.model,
            generation
        );

        let analyzer = Arc::clone(&self.analyzer);
        let language = self.language;
        let model = self.model.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            // Run the analyzer on its own task so a panic still ends in an event.
            let analysis =
                tokio::spawn(async move { analyzer.analyze(&image, language, &model).await });
            let outcome = analysis
                .await
                .unwrap_or_else(|e| Err(AppError::task(e.to_string())));
            // Fails only if the orchestrator is gone; the result is dropped.
            let _ = tx.send(AnalysisEvent {
                generation,
                outcome,
            });
        });

        generation
    }

    /// Returns to `Idle`, clearing result and error. Any in-flight request
    /// keeps running but its result will be ignored.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = AppState::Idle;
        self.result = None;
        self.error_message = None;
        self.ticker = None;
    }

    /// Applies every completion that has already arrived, without waiting.
    ///
    /// Returns `true` if the state changed.
    pub fn process_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Waits for the next completion and applies it.
    ///
    /// Returns immediately with `false` when nothing is in flight. Safe to
    /// use inside `tokio::select!`.
    pub async fn next_event(&mut self) -> bool {
        if self.state != AppState::Analyzing {
            return false;
        }
        match self.rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Waits until the current analysis settles and returns the final state.
    pub async fn wait_for_completion(&mut self) -> AppState {
        while self.state == AppState::Analyzing {
            self.next_event().await;
        }
        self.state
    }

    fn start_ticker(&mut self) {
        // Replacing the old ticker drops it, which stops its timer.
        self.ticker = Some(StatusTicker::start(
            self.language.loading_messages(),
            STATUS_PERIOD,
        ));
    }

    fn apply(&mut self, event: AnalysisEvent) -> bool {
        if event.generation != self.generation || self.state != AppState::Analyzing {
            debug!(
                "Discarding stale result for request #{} (current #{})",
                event.generation, self.generation
            );
            return false;
        }

        self.ticker = None;
        match event.outcome {
            Ok(analysis) => {
                info!("Analysis #{} completed", event.generation);
                self.result = Some(analysis);
                self.state = AppState::Success;
            }
            Err(e) => {
                error!("Analysis #{} failed: {}", event.generation, e);
                self.error_message = Some(self.language.generic_error().to_string());
                self.state = AppState::Error;
            }
        }
        true
    }
}
