//! UI state types and event definitions.
//!
//! This module contains the state machine and the completion events
//! exchanged between the analysis task and the orchestrator.

use crate::error::AppError;
use crate::model::FashionAnalysis;

/// Current phase of the analysis UI.
///
/// The UI follows a simple state machine:
/// `Idle` -> `Analyzing` -> `Success` | `Error`
///
/// Selecting a new photo re-enters `Analyzing` from any state, and `reset`
/// returns to `Idle` from any state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the user to pick a photo.
    #[default]
    Idle,
    /// A photo is being compressed and analyzed.
    Analyzing,
    /// An analysis result is available.
    Success,
    /// The last analysis failed.
    Error,
}

/// Completion of one analysis, sent from the background task.
///
/// `generation` identifies the request it answers; the orchestrator only
/// applies events whose generation is still current.
#[derive(Debug)]
pub(crate) struct AnalysisEvent {
    pub generation: u64,
    pub outcome: Result<FashionAnalysis, AppError>,
}
