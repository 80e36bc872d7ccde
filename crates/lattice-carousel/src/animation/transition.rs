//! The slide transition and the silent reset that follows it.
//!
//! A rotation slides a `k + 1` strip by exactly one item step:
//!
//! - Forward: the strip starts at offset `0` and slides to `-step`, pushing the
//!   leading item out on the left while the boundary item enters on the right.
//! - Backward: the strip starts pre-positioned at `-step` (the boundary item is
//!   hidden on the left) and slides to `0`. The pre-positioning must not be
//!   animated, so transitions stay disabled until the host has presented the
//!   first frame of the slide ([`SlideTransition::mark_presented`]).
//!
//! After the slide settles, the window is committed and the offset snaps back
//! to `0` with transitions disabled ([`TransitionState::Resetting`]). Because
//! the committed window at offset `0` shows the same items the strip showed at
//! its settled offset, the snap is invisible.

use std::time::{Duration, Instant};

use super::easing::Easing;
use crate::item::Direction;

/// Current state of the slide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// No transition in progress. Offset is neutral.
    #[default]
    Idle,
    /// The strip is sliding in the given direction.
    Animating(Direction),
    /// The slide settled and the offset snapped back to neutral. Transitions
    /// stay disabled until the reset guard delay elapses.
    Resetting,
}

impl TransitionState {
    /// Check if a slide is currently in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating(_))
    }
}

/// Start and end offsets of a slide, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSpan {
    /// Direction of the slide.
    pub direction: Direction,
    /// Offset at the start of the slide.
    pub from: f32,
    /// Offset at the end of the slide.
    pub to: f32,
}

impl SlideSpan {
    /// The span a strip travels for a rotation with the given item step.
    pub fn for_direction(direction: Direction, step: f32) -> Self {
        match direction {
            Direction::Forward => Self {
                direction,
                from: 0.0,
                to: -step,
            },
            Direction::Backward => Self {
                direction,
                from: -step,
                to: 0.0,
            },
        }
    }
}

/// Slide transition controller.
///
/// Time is always passed in by the caller; the controller never reads the clock.
#[derive(Debug, Clone)]
pub struct SlideTransition {
    /// Easing curve for the slide.
    easing: Easing,
    /// Duration of the slide. Shared by both directions.
    duration: Duration,
    /// Distance between two adjacent item origins (item width plus spacing).
    step: f32,
    /// Current state.
    state: TransitionState,
    /// When the current slide started.
    started_at: Option<Instant>,
    /// A backward slide whose pre-positioned first frame has not been shown.
    pre_positioned: bool,
}

impl SlideTransition {
    /// Create an idle transition.
    pub fn new(duration: Duration, easing: Easing, step: f32) -> Self {
        Self {
            easing,
            duration,
            step,
            state: TransitionState::Idle,
            started_at: None,
            pre_positioned: false,
        }
    }

    /// Get the slide duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Get the easing curve.
    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Get the item step in logical pixels.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Get the current state.
    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Direction of the slide in flight, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self.state {
            TransitionState::Animating(direction) => Some(direction),
            _ => None,
        }
    }

    /// The span of the slide in flight, if any.
    pub fn span(&self) -> Option<SlideSpan> {
        self.direction()
            .map(|direction| SlideSpan::for_direction(direction, self.step))
    }

    /// Start a slide.
    ///
    /// Returns `false` (and changes nothing) unless the transition is idle.
    pub fn start(&mut self, direction: Direction, now: Instant) -> bool {
        if self.state != TransitionState::Idle {
            return false;
        }
        self.state = TransitionState::Animating(direction);
        self.started_at = Some(now);
        self.pre_positioned = direction == Direction::Backward;
        true
    }

    /// Record that the first frame of the slide in flight was presented.
    ///
    /// Returns `true` if this re-enabled transitions after a backward
    /// pre-position.
    pub fn mark_presented(&mut self) -> bool {
        std::mem::take(&mut self.pre_positioned)
    }

    /// Linear progress of the slide in flight, from 0.0 to 1.0.
    ///
    /// Returns `0.0` when no slide is in flight.
    pub fn progress(&self, now: Instant) -> f32 {
        let (TransitionState::Animating(_), Some(started_at)) = (self.state, self.started_at)
        else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// The strip offset at `now`, in logical pixels.
    ///
    /// Neutral (`0.0`) unless a slide is in flight.
    pub fn offset(&self, now: Instant) -> f32 {
        match self.span() {
            Some(span) => self.easing.interpolate(span.from, span.to, self.progress(now)),
            None => 0.0,
        }
    }

    /// Whether the host should animate offset changes.
    ///
    /// Disabled while resetting, and for a backward slide until its
    /// pre-positioned first frame is presented.
    pub fn transitions_enabled(&self) -> bool {
        self.state != TransitionState::Resetting && !self.pre_positioned
    }

    /// Settle the slide in flight and enter the reset phase.
    ///
    /// Returns the direction that settled, or `None` if nothing was sliding.
    pub fn settle(&mut self) -> Option<Direction> {
        let direction = self.direction()?;
        self.state = TransitionState::Resetting;
        self.started_at = None;
        self.pre_positioned = false;
        Some(direction)
    }

    /// Leave the reset phase and re-enable transitions.
    ///
    /// Returns `false` if the transition was not resetting.
    pub fn finish_reset(&mut self) -> bool {
        if self.state != TransitionState::Resetting {
            return false;
        }
        self.state = TransitionState::Idle;
        true
    }

    /// Abandon any slide or reset immediately.
    pub fn stop(&mut self) {
        self.state = TransitionState::Idle;
        self.started_at = None;
        self.pre_positioned = false;
    }
}
