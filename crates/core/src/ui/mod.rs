//! User interface components for outfit-lens.
//!
//! Everything a shell needs to drive the analysis screen, independent of how
//! it draws.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`state`]: State machine types and event definitions
//! - [`ticker`]: Rotating status messages while analyzing
//! - [`orchestrator`]: The controller owning the state machine
//! - [`rendering`]: Text rendering of results
//!
//! # Usage
//!
//! ```ignore
//! use outfit_lens_core::{ui::AnalysisOrchestrator, Config};
//!
//! let config = Config::load()?;
//! let mut orchestrator = AnalysisOrchestrator::from_config(&config);
//!
//! orchestrator.select_image(std::fs::read("outfit.jpg")?);
//! match orchestrator.wait_for_completion().await {
//!     AppState::Success => println!("{:?}", orchestrator.result()),
//!     _ => eprintln!("{}", orchestrator.error_message().unwrap_or_default()),
//! }
//! ```

mod orchestrator;
mod rendering;
mod state;
mod ticker;

// Public API exports
pub use orchestrator::AnalysisOrchestrator;
pub use rendering::render_analysis;
pub use state::AppState;
pub use ticker::{StatusTicker, STATUS_PERIOD};
