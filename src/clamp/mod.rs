//! Clamping content to a number of lines.
//!
//! [`clamp`] is the entry point. It resolves the line budget, then either
//! hands the container to the oracle's native clamping or runs the fit
//! search, which edits text leaves until the container fits.

mod locate;
mod marker;
mod options;
mod schedule;
mod search;
mod split;

pub use locate::locate_last;
pub use marker::Ellipsis;
pub use options::{
    ClampConfig, DEFAULT_MAX_STEPS, DEFAULT_SPLIT_ON_CHARS, DEFAULT_TRUNCATION_MARKER, LineClamp,
    Pacing,
};
pub use schedule::{Clock, DriveEnd, StdClock, drive};
pub use search::{Finish, SearchPhase, SearchState, Step, Truncator};
pub use split::split_chunks;

use std::ops::ControlFlow;

use tracing::debug;

use crate::error::ClampError;
use crate::layout::{LayoutOracle, Length, font_size, line_height};
use crate::perf;
use crate::tree::{NodeId, Tree};

/// What a clamp invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampOutcome {
    /// The content already fit; nothing was touched.
    AlreadyFits,
    /// The line budget resolved to zero lines; nothing was touched.
    NoRoom,
    /// Native clamping styles were written; text was not touched.
    Native,
    /// Text was truncated until the container fit.
    Truncated,
    /// All eligible text was removed without reaching a fit.
    Exhausted,
    /// The step budget ran out before a fit.
    StepLimit,
    /// The step observer stopped the search.
    Cancelled,
}

/// Summary of one clamp invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampReport {
    pub outcome: ClampOutcome,
    /// Resolved line budget.
    pub lines: usize,
    pub line_height: f32,
    pub target_height: f32,
    /// Search steps taken; zero unless the fit search ran.
    pub steps: usize,
}

/// Clamp `container` to the configured number of lines.
///
/// # Errors
/// Returns an error for an invalid configuration, a `container` that is
/// not an element, or an unusable line height. Running out of text is
/// reported as [`ClampOutcome::Exhausted`], not as an error.
///
/// # Example
///
/// ```
/// use lineclamp::prelude::*;
///
/// let mut tree = Tree::from_plain_text("The quick brown fox jumps over the lazy dog");
/// let root = tree.root();
/// let layout = CellLayout::new(36);
/// let config = ClampConfig::default().with_lines(LineClamp::Lines(1));
///
/// let report = clamp(&mut tree, root, &layout, &config).unwrap();
/// assert_eq!(report.outcome, ClampOutcome::Truncated);
/// assert_eq!(tree.text_content(root), "The quick brown fox jumps over the…");
/// ```
pub fn clamp<O: LayoutOracle + ?Sized>(
    tree: &mut Tree,
    container: NodeId,
    oracle: &O,
    config: &ClampConfig,
) -> Result<ClampReport, ClampError> {
    clamp_with(tree, container, oracle, config, &mut StdClock, |_, _| {
        ControlFlow::Continue(())
    })
}

/// [`clamp`] with an explicit clock and a step observer.
///
/// The observer runs after every search step that leaves the search
/// unfinished and may stop it with [`ControlFlow::Break`].
///
/// # Errors
/// Same as [`clamp`].
pub fn clamp_with<O, C, F>(
    tree: &mut Tree,
    container: NodeId,
    oracle: &O,
    config: &ClampConfig,
    clock: &mut C,
    observer: F,
) -> Result<ClampReport, ClampError>
where
    O: LayoutOracle + ?Sized,
    C: Clock + ?Sized,
    F: FnMut(&Tree, &SearchState) -> ControlFlow<()>,
{
    config.validate()?;
    if !tree.is_element(container) {
        return Err(ClampError::NotAnElement(container));
    }
    let _scope = perf::scope("clamp");

    let line_height = line_height(oracle, tree, container)?;
    let lines = resolve_lines(config.lines, oracle, tree, container, line_height)?;
    #[allow(clippy::cast_precision_loss)]
    let target_height = line_height * lines as f32;
    let mut report = ClampReport {
        outcome: ClampOutcome::AlreadyFits,
        lines,
        line_height,
        target_height,
        steps: 0,
    };
    debug!(lines, line_height, target_height, "clamp requested");

    if lines == 0 {
        report.outcome = ClampOutcome::NoRoom;
        return Ok(report);
    }

    if config.use_native_clamp && oracle.supports_native_clamp() {
        apply_native_clamp(tree, container, lines, config.lines);
        report.outcome = ClampOutcome::Native;
        debug!(lines, "native clamp applied");
        return Ok(report);
    }

    let height = oracle.height(tree, container);
    if height <= target_height {
        debug!(height, target_height, "content already fits");
        return Ok(report);
    }

    let mut truncator = Truncator::new(
        tree,
        container,
        target_height,
        config.split_on_chars.clone(),
        Ellipsis::new(config.truncation_marker.clone()),
    );
    let end = drive(
        &mut truncator,
        tree,
        oracle,
        config.animate,
        config.max_steps,
        clock,
        observer,
    );
    report.steps = truncator.state().steps();
    report.outcome = match end {
        DriveEnd::Finished(Finish::Fit) => ClampOutcome::Truncated,
        DriveEnd::Finished(Finish::Exhausted) => ClampOutcome::Exhausted,
        DriveEnd::StepLimit => ClampOutcome::StepLimit,
        DriveEnd::Cancelled => ClampOutcome::Cancelled,
    };
    debug!(outcome = ?report.outcome, steps = report.steps, "clamp finished");
    Ok(report)
}

/// Number of lines a [`LineClamp`] allows for `container`.
///
/// # Errors
/// Returns an error if an `em` length is given and the font size cannot
/// be read.
pub fn resolve_lines<O: LayoutOracle + ?Sized>(
    lines: LineClamp,
    oracle: &O,
    tree: &Tree,
    container: NodeId,
    line_height: f32,
) -> Result<usize, ClampError> {
    let available = match lines {
        LineClamp::Lines(lines) => return Ok(lines),
        LineClamp::Auto => oracle.height(tree, container),
        LineClamp::Height(length) => {
            let font = match length {
                Length::Em(_) => font_size(oracle, tree, container)?,
                Length::Px(_) => 0.0,
            };
            length.to_px(font)
        }
    };
    // Whole lines only, never negative
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lines = (available / line_height).floor().max(0.0) as usize;
    Ok(lines)
}

/// Write the style properties that make a host clamp natively.
pub fn apply_native_clamp(tree: &mut Tree, container: NodeId, lines: usize, clamp: LineClamp) {
    tree.set_style(container, "overflow", "hidden");
    tree.set_style(container, "text-overflow", "ellipsis");
    tree.set_style(container, "-webkit-box-orient", "vertical");
    tree.set_style(container, "display", "-webkit-box");
    tree.set_style(container, "-webkit-line-clamp", lines.to_string());
    if let LineClamp::Height(length) = clamp {
        tree.set_style(container, "height", length.to_string());
    }
}
