// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. clamp::ClampConfig)
    clippy::module_name_repetitions
)]

//! # Lineclamp
//!
//! Fit nested text content into a bounded number of rendered lines,
//! truncating it and appending an ellipsis when it overflows.
//!
//! Lineclamp works against any host that can measure rendered height:
//! - Native line clamping when the host supports it (styles only)
//! - A fallback search that edits text leaves and re-measures until it fits
//! - Sentence/clause/word/character granularity, coarsest first
//! - Optional step pacing so the truncation can be animated
//!
//! ## Architecture
//!
//! - **Tree**: arena of element and text nodes owned by the caller
//! - **Layout oracle**: the host's measurement of rendered height
//! - **Truncator**: one search step at a time over a `SearchState`
//! - **Driver**: runs steps immediately or paced by a clock
//!
//! ## Modules
//!
//! - [`tree`]: Content tree of nested elements and text leaves
//! - [`layout`]: Layout oracle trait and the terminal cell layout
//! - [`clamp`]: Entry procedure, leaf locator and fit search
//! - [`config`]: Command-line defaults stored in rc files
//! - [`ui`]: Ratatui widget for clamped content
//! - [`perf`]: Timing scopes and the step debug log

pub mod clamp;
pub mod config;
pub mod error;
pub mod layout;
pub mod perf;
pub mod tree;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clamp::{
        ClampConfig, ClampOutcome, ClampReport, LineClamp, Pacing, clamp, clamp_with,
    };
    pub use crate::error::ClampError;
    pub use crate::layout::{CellLayout, LayoutOracle};
    pub use crate::tree::{NodeId, Tree};
}
