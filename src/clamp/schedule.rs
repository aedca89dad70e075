//! Running search steps to completion.

use std::ops::ControlFlow;
use std::time::Duration;

use super::options::Pacing;
use super::search::{Finish, SearchState, Step, Truncator};
use crate::layout::LayoutOracle;
use crate::perf;
use crate::tree::Tree;

/// Source of pauses between paced steps.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl Clock for StdClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How a driven search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveEnd {
    Finished(Finish),
    /// The step budget ran out first.
    StepLimit,
    /// The observer asked to stop.
    Cancelled,
}

/// Step `truncator` until it finishes, runs out of budget, or is cancelled.
///
/// `observer` sees the tree after every step that did not finish the
/// search; returning [`ControlFlow::Break`] stops the search there. With
/// [`Pacing::Delayed`] the clock pauses after each observed step. Pacing
/// never changes which steps are taken.
pub fn drive<O, C, F>(
    truncator: &mut Truncator,
    tree: &mut Tree,
    oracle: &O,
    pacing: Pacing,
    max_steps: usize,
    clock: &mut C,
    mut observer: F,
) -> DriveEnd
where
    O: LayoutOracle + ?Sized,
    C: Clock + ?Sized,
    F: FnMut(&Tree, &SearchState) -> ControlFlow<()>,
{
    loop {
        if truncator.state().steps() >= max_steps {
            return DriveEnd::StepLimit;
        }
        let step = truncator.step(tree, oracle);
        perf::record_step(&perf::StepRecord {
            step,
            state: truncator.state(),
        });
        if let Step::Finished(finish) = step {
            return DriveEnd::Finished(finish);
        }
        if observer(tree, truncator.state()).is_break() {
            return DriveEnd::Cancelled;
        }
        if let Pacing::Delayed(delay) = pacing {
            clock.sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clamp::marker::Ellipsis;
    use crate::layout::CellLayout;

    #[derive(Default)]
    struct RecordingClock {
        sleeps: Vec<Duration>,
    }

    impl Clock for RecordingClock {
        fn sleep(&mut self, duration: Duration) {
            self.sleeps.push(duration);
        }
    }

    fn setup(text: &str) -> (Tree, Truncator, CellLayout) {
        let mut tree = Tree::from_plain_text(text);
        let root = tree.root();
        let truncator = Truncator::new(
            &mut tree,
            root,
            1.0,
            vec![" ".to_string()],
            Ellipsis::default(),
        );
        (tree, truncator, CellLayout::new(10))
    }

    fn keep_going(_: &Tree, _: &SearchState) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    #[test]
    fn test_immediate_pacing_never_sleeps() {
        let (mut tree, mut truncator, layout) = setup("one two three four five");
        let mut clock = RecordingClock::default();
        let end = drive(
            &mut truncator,
            &mut tree,
            &layout,
            Pacing::Immediate,
            100,
            &mut clock,
            keep_going,
        );
        assert_eq!(end, DriveEnd::Finished(Finish::Fit));
        assert!(clock.sleeps.is_empty());
    }

    #[test]
    fn test_delayed_pacing_matches_immediate_result() {
        let (mut fast_tree, mut fast, layout) = setup("one two three four five");
        let (mut slow_tree, mut slow, _) = setup("one two three four five");
        let mut clock = RecordingClock::default();

        let fast_end = drive(
            &mut fast,
            &mut fast_tree,
            &layout,
            Pacing::Immediate,
            100,
            &mut clock,
            keep_going,
        );
        let slow_end = drive(
            &mut slow,
            &mut slow_tree,
            &layout,
            Pacing::from_millis(5),
            100,
            &mut clock,
            keep_going,
        );

        assert_eq!(fast_end, slow_end);
        assert_eq!(fast_tree, slow_tree);
        assert_eq!(fast.state().steps(), slow.state().steps());
        assert_eq!(clock.sleeps.len(), slow.state().steps() - 1);
        assert!(clock.sleeps.iter().all(|d| *d == Duration::from_millis(5)));
    }

    #[test]
    fn test_step_limit_stops_early() {
        let (mut tree, mut truncator, layout) = setup("one two three four five");
        let end = drive(
            &mut truncator,
            &mut tree,
            &layout,
            Pacing::Immediate,
            1,
            &mut StdClock,
            keep_going,
        );
        assert_eq!(end, DriveEnd::StepLimit);
        assert_eq!(truncator.state().steps(), 1);
    }

    #[test]
    fn test_observer_sees_every_intermediate_state_and_can_cancel() {
        let (mut tree, mut truncator, layout) = setup("one two three four five");
        let mut seen = Vec::new();
        let end = drive(
            &mut truncator,
            &mut tree,
            &layout,
            Pacing::Immediate,
            100,
            &mut StdClock,
            |tree, state| {
                seen.push(tree.text_content(tree.root()));
                if state.steps() == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        assert_eq!(end, DriveEnd::Cancelled);
        assert_eq!(seen, vec!["one two three four…", "one two three…"]);
    }
}
