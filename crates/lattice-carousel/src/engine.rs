//! The carousel engine.
//!
//! [`CarouselEngine`] ties the window, the slide transition, gesture
//! arbitration and autoplay into one explicit state machine:
//!
//! ```text
//! Idle ──press──▶ Dragging ──swipe──▶ Committing ──settle──▶ Idle
//!  │                 │                    ▲
//!  │                 └──tap / short drag──┴──▶ Idle
//!  └──autoplay / key / rotate()──────────┘
//! ```
//!
//! The engine is headless and never reads the clock. Every time-dependent
//! method takes `now`, the host calls [`advance`](CarouselEngine::advance)
//! whenever [`time_until_next`](CarouselEngine::time_until_next) elapses, and
//! reports the end of each slide with
//! [`notify_animation_finished`](CarouselEngine::notify_animation_finished).
//! A fallback timer settles the slide if that report never arrives.
//!
//! While a rotation is in flight the guard is held: every other rotation
//! request is dropped, not queued.

use std::time::{Duration, Instant};

use lattice_carousel_core::{FiredTimer, Signal, TimerError, TimerId, TimerManager};

use crate::animation::{SlideTransition, TransitionState};
use crate::autoplay::{Autoplay, PauseReasons};
use crate::config::CarouselConfig;
use crate::error::{Degradation, Result};
use crate::gesture::{CarouselKey, GestureIntent, SwipeArbiter};
use crate::item::{CarouselItem, Direction};
use crate::render::Frame;
use crate::window::{WindowMode, WindowState};

const TARGET: &str = "lattice_carousel::engine";

/// The interaction state of a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// At rest. Autoplay may fire.
    #[default]
    Idle,
    /// A pointer is pressed on the carousel.
    Dragging,
    /// A rotation is sliding or settling.
    Committing(Direction),
}

/// Identifies one rotation.
///
/// Returned by [`CarouselEngine::rotate`] and passed back to
/// [`CarouselEngine::notify_animation_finished`]. A ticket from an earlier
/// rotation is rejected, so a late completion report can never settle the
/// wrong slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationTicket(u64);

impl RotationTicket {
    /// The raw ticket number.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// What asked for a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Api,
    Autoplay,
    Swipe,
    Key,
}

/// A headless infinite carousel over items of type `T`.
pub struct CarouselEngine<T> {
    config: CarouselConfig,
    window: WindowState<T>,
    slide: SlideTransition,
    arbiter: SwipeArbiter,
    autoplay: Autoplay,
    timers: TimerManager,
    state: EngineState,
    /// Ticket of the slide in flight.
    ticket: Option<RotationTicket>,
    next_ticket: u64,
    /// Settles the slide if the host never reports completion.
    settle_timer: Option<TimerId>,
    /// Releases the guard after the silent reset.
    reset_timer: Option<TimerId>,
    /// Resume pointer-paused autoplay when the guard is released.
    resume_after_settle: bool,
    mounted: bool,
    disposed: bool,
    degradation: Option<Degradation>,
    item_activated: Signal<T>,
    window_changed: Signal<Vec<T>>,
    rotation_started: Signal<Direction>,
}

impl<T: CarouselItem + Clone + Send + 'static> CarouselEngine<T> {
    /// Create an engine with no items.
    ///
    /// Fails only if the configuration is invalid.
    pub fn new(config: CarouselConfig) -> Result<Self> {
        config.validate()?;
        let engine = Self {
            window: WindowState::new(config.window_size),
            slide: SlideTransition::new(config.slide_duration, config.easing, config.step()),
            arbiter: SwipeArbiter::with_config(config.gesture_config()),
            autoplay: Autoplay::new(config.autoplay_interval, config.autoplay),
            timers: TimerManager::new(),
            state: EngineState::Idle,
            ticket: None,
            next_ticket: 0,
            settle_timer: None,
            reset_timer: None,
            resume_after_settle: false,
            mounted: false,
            disposed: false,
            degradation: Some(Degradation::Empty),
            item_activated: Signal::new(),
            window_changed: Signal::new(),
            rotation_started: Signal::new(),
            config,
        };
        tracing::debug!(target: TARGET, window_size = engine.config.window_size, "engine created");
        Ok(engine)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mount the carousel. Arms autoplay when the window rotates.
    ///
    /// Calling `start` on a running engine changes nothing.
    pub fn start(&mut self, now: Instant) {
        if self.disposed || self.mounted {
            return;
        }
        self.mounted = true;
        tracing::debug!(target: TARGET, len = self.window.len(), "engine started");
        if let Some(degradation) = self.degradation {
            self.report_degradation(degradation);
        }
        self.sync_autoplay(now);
    }

    /// Unmount the carousel. Autoplay stops; a slide in flight still settles.
    pub fn stop(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.autoplay.disarm(&mut self.timers);
        tracing::debug!(target: TARGET, "engine stopped");
    }

    /// Tear the engine down for good.
    ///
    /// Every timer is cleared and every signal disconnected. Later calls,
    /// including a late completion report, are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.mounted = false;
        self.autoplay.disarm(&mut self.timers);
        self.timers.clear();
        self.settle_timer = None;
        self.reset_timer = None;
        self.ticket = None;
        self.slide.stop();
        self.arbiter.cancel();
        self.state = EngineState::Idle;
        self.item_activated.disconnect_all();
        self.window_changed.disconnect_all();
        self.rotation_started.disconnect_all();
        tracing::debug!(target: TARGET, "engine disposed");
    }

    /// Whether the engine is mounted.
    pub fn is_running(&self) -> bool {
        self.mounted
    }

    /// Whether [`dispose`](Self::dispose) was called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Replace the item sequence.
    ///
    /// The first sequence shows its first `k` items. A refresh keeps the
    /// leading item in place when it still exists. A refresh during a slide is
    /// applied at once; the slide settles against the new sequence.
    pub fn set_sequence(&mut self, items: Vec<T>, now: Instant) {
        if self.disposed {
            return;
        }
        let changed = self.window.set_sequence(items);

        let degradation = self.compute_degradation();
        if degradation != self.degradation {
            self.degradation = degradation;
            if let (Some(degradation), true) = (degradation, self.mounted) {
                self.report_degradation(degradation);
            }
        }

        if changed {
            self.emit_window_changed();
        }
        self.sync_autoplay(now);
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// The full item sequence.
    pub fn sequence(&self) -> &[T] {
        self.window.sequence()
    }

    /// Items of the window at rest.
    pub fn window(&self) -> Vec<&T> {
        self.window.window()
    }

    /// Keys of the window at rest.
    pub fn window_keys(&self) -> Vec<String> {
        self.window.window_keys()
    }

    /// Sequence index of the leading window item.
    pub fn cursor(&self) -> usize {
        self.window.cursor()
    }

    /// How the window behaves for the current sequence.
    pub fn mode(&self) -> WindowMode {
        self.window.mode()
    }

    /// Why the carousel is not rotating, if it isn't.
    pub fn degradation(&self) -> Option<Degradation> {
        self.degradation
    }

    fn compute_degradation(&self) -> Option<Degradation> {
        let len = self.window.len();
        let window_size = self.window.window_size();
        match len {
            0 => Some(Degradation::Empty),
            len if len == window_size => Some(Degradation::ExactFit { len }),
            len if len < window_size => Some(Degradation::WindowExceedsSequence { window_size, len }),
            _ => None,
        }
    }

    fn report_degradation(&self, degradation: Degradation) {
        match degradation {
            Degradation::WindowExceedsSequence { .. } => {
                tracing::warn!(target: TARGET, %degradation, "carousel degraded to a static window");
            }
            Degradation::Empty | Degradation::ExactFit { .. } => {
                tracing::debug!(target: TARGET, %degradation, "carousel not rotating");
            }
        }
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// The interaction state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The slide transition state.
    pub fn transition_state(&self) -> TransitionState {
        self.slide.state()
    }

    /// Whether a rotation is sliding or settling.
    pub fn is_guard_held(&self) -> bool {
        self.slide.state() != TransitionState::Idle
    }

    /// Ticket of the slide in flight.
    pub fn current_ticket(&self) -> Option<RotationTicket> {
        self.ticket
    }

    /// Request a rotation.
    ///
    /// Returns the ticket of the new slide, or `None` if the request was
    /// dropped: the guard is held, a pointer is pressed, the window does not
    /// rotate, or the engine is disposed.
    pub fn rotate(&mut self, direction: Direction, now: Instant) -> Option<RotationTicket> {
        self.request_rotation(direction, now, Origin::Api)
    }

    fn request_rotation(
        &mut self,
        direction: Direction,
        now: Instant,
        origin: Origin,
    ) -> Option<RotationTicket> {
        if self.state == EngineState::Dragging {
            tracing::debug!(target: TARGET, ?direction, ?origin, "rotation dropped, pointer pressed");
            return None;
        }
        self.begin_rotation(direction, now, origin)
    }

    fn begin_rotation(
        &mut self,
        direction: Direction,
        now: Instant,
        origin: Origin,
    ) -> Option<RotationTicket> {
        if self.disposed {
            return None;
        }
        if !self.window.is_rotatable() {
            tracing::trace!(target: TARGET, ?direction, ?origin, mode = ?self.window.mode(), "rotation ignored, window is static");
            return None;
        }
        if !self.slide.start(direction, now) {
            tracing::debug!(target: TARGET, ?direction, ?origin, "rotation dropped, guard held");
            return None;
        }

        let ticket = RotationTicket(self.next_ticket);
        self.next_ticket += 1;
        self.ticket = Some(ticket);
        self.state = EngineState::Committing(direction);
        self.settle_timer = Some(self.timers.start_one_shot(now, self.config.settle_timeout()));

        tracing::debug!(
            target: TARGET,
            ?direction,
            ?origin,
            ticket = ticket.0,
            cursor = self.window.cursor(),
            boundary = ?self.window.boundary_index(direction),
            "rotation started"
        );
        self.rotation_started.emit(direction);
        Some(ticket)
    }

    /// Report that the host finished animating the slide for `ticket`.
    ///
    /// Returns `true` if the slide settled. Stale tickets and reports after
    /// [`dispose`](Self::dispose) are ignored.
    pub fn notify_animation_finished(&mut self, ticket: RotationTicket, now: Instant) -> bool {
        if self.disposed {
            tracing::trace!(target: TARGET, ticket = ticket.0, "completion ignored, engine disposed");
            return false;
        }
        if self.ticket != Some(ticket) || !self.slide.state().is_animating() {
            tracing::debug!(target: TARGET, ticket = ticket.0, current = ?self.ticket.map(RotationTicket::id), "stale completion ignored");
            return false;
        }
        self.settle(now)
    }

    /// Commit the slide in flight and enter the reset phase.
    fn settle(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        if let Some(id) = self.settle_timer.take() {
            match self.timers.stop(id) {
                Ok(()) | Err(TimerError::InvalidTimerId) => {}
                Err(err) => {
                    tracing::warn!(target: TARGET, ?id, %err, "failed to stop fallback timer");
                }
            }
        }
        let Some(direction) = self.slide.settle() else {
            return false;
        };
        self.ticket = None;

        let committed = self.window.commit(direction);
        self.reset_timer = Some(self.timers.start_one_shot(now, self.config.reset_guard_delay));
        tracing::debug!(target: TARGET, ?direction, committed, cursor = self.window.cursor(), "rotation settled");

        if committed {
            self.emit_window_changed();
        }
        true
    }

    /// Re-enable transitions and release the guard.
    fn release_guard(&mut self, now: Instant) {
        self.reset_timer = None;
        if !self.slide.finish_reset() {
            return;
        }
        self.state = if self.arbiter.is_active() {
            EngineState::Dragging
        } else {
            EngineState::Idle
        };
        if std::mem::take(&mut self.resume_after_settle) && !self.arbiter.is_active() {
            self.autoplay.resume(PauseReasons::POINTER);
        }
        tracing::trace!(target: TARGET, state = ?self.state, "guard released");
        self.sync_autoplay(now);
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Dispatch every timer due at `now`.
    ///
    /// Returns the number of timers dispatched.
    #[tracing::instrument(skip(self), target = "lattice_carousel::engine", level = "trace")]
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut dispatched = 0;
        while !self.disposed {
            let fired = self.timers.process_expired(now);
            if fired.is_empty() {
                break;
            }
            for timer in fired {
                dispatched += 1;
                self.dispatch_timer(timer, now);
            }
        }
        dispatched
    }

    fn dispatch_timer(&mut self, timer: FiredTimer, now: Instant) {
        let id = timer.id;
        if self.settle_timer == Some(id) {
            self.settle_timer = None;
            tracing::debug!(target: TARGET, late = ?now.saturating_duration_since(timer.due), "completion not reported, settling on fallback timer");
            // The reset phase is measured from the fallback deadline, not
            // from a late wake-up.
            self.settle(timer.due);
        } else if self.reset_timer == Some(id) {
            self.release_guard(now);
        } else if self.autoplay.owns(id) {
            if self.state == EngineState::Idle {
                self.request_rotation(Direction::Forward, now, Origin::Autoplay);
            } else {
                tracing::trace!(target: TARGET, state = ?self.state, "autoplay tick skipped");
            }
        }
    }

    /// How long the host may sleep before calling [`advance`](Self::advance).
    ///
    /// `None` means no timer is pending.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    // =========================================================================
    // Autoplay
    // =========================================================================

    /// Whether the autoplay timer is armed.
    pub fn is_autoplay_armed(&self) -> bool {
        self.autoplay.is_armed()
    }

    /// Active autoplay pause reasons.
    pub fn pause_reasons(&self) -> PauseReasons {
        self.autoplay.pause_reasons()
    }

    /// Pause autoplay on behalf of the container.
    pub fn pause_autoplay(&mut self, now: Instant) {
        self.autoplay.pause(PauseReasons::EXTERNAL);
        self.sync_autoplay(now);
    }

    /// Undo [`pause_autoplay`](Self::pause_autoplay).
    pub fn resume_autoplay(&mut self, now: Instant) {
        self.autoplay.resume(PauseReasons::EXTERNAL);
        self.sync_autoplay(now);
    }

    /// Turn autoplay on or off.
    ///
    /// Fails, changing nothing, if the resulting configuration is invalid
    /// (for example enabling autoplay with an interval shorter than the
    /// settle timeout).
    pub fn set_autoplay_enabled(&mut self, enabled: bool, now: Instant) -> Result<()> {
        let candidate = self.config.clone().with_autoplay(enabled);
        candidate.validate()?;
        self.config = candidate;
        self.autoplay.set_enabled(enabled);
        self.sync_autoplay(now);
        Ok(())
    }

    /// Change the autoplay interval. A running timer restarts its period.
    ///
    /// Fails, changing nothing, if the resulting configuration is invalid.
    pub fn set_autoplay_interval(&mut self, interval: Duration, now: Instant) -> Result<()> {
        let candidate = self.config.clone().with_autoplay_interval(interval);
        candidate.validate()?;
        self.config = candidate;
        self.autoplay.set_interval(interval, &mut self.timers, now);
        Ok(())
    }

    fn sync_autoplay(&mut self, now: Instant) {
        let eligible = self.mounted && !self.disposed && self.window.is_rotatable();
        self.autoplay.sync(&mut self.timers, now, eligible);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// A pointer was pressed at carousel-local `(x, y)`.
    ///
    /// Returns `false` if the press was ignored (another pointer is already
    /// tracked, or the engine is disposed).
    pub fn pointer_down(&mut self, pointer_id: u64, x: f32, y: f32, now: Instant) -> bool {
        if self.disposed || !self.arbiter.press(pointer_id, x, y) {
            return false;
        }
        self.autoplay.pause(PauseReasons::POINTER);
        if self.state == EngineState::Idle {
            self.state = EngineState::Dragging;
        }
        tracing::trace!(target: TARGET, pointer_id, x, state = ?self.state, "pointer down");
        self.sync_autoplay(now);
        true
    }

    /// The tracked pointer moved. Returns the horizontal drag displacement.
    pub fn pointer_move(&mut self, pointer_id: u64, x: f32) -> Option<f32> {
        if self.disposed {
            return None;
        }
        self.arbiter.move_to(pointer_id, x)
    }

    /// A pointer was released at carousel-local `(x, y)`.
    ///
    /// A swipe rotates (unless the guard is held), a tap emits
    /// [`item_activated`](Self::item_activated) for the item under the
    /// pointer, anything else is ignored.
    pub fn pointer_up(&mut self, pointer_id: u64, x: f32, y: f32, now: Instant) -> GestureIntent {
        if self.disposed || !self.arbiter.is_active() {
            return GestureIntent::None;
        }
        let intent = self.arbiter.release(pointer_id, x, y);
        if self.arbiter.is_active() {
            // Not the tracked pointer.
            return GestureIntent::None;
        }

        let was_dragging = self.state == EngineState::Dragging;
        if was_dragging {
            self.state = EngineState::Idle;
        }

        match intent {
            GestureIntent::Swipe(direction) if was_dragging => {
                if self.begin_rotation(direction, now, Origin::Swipe).is_some() {
                    self.resume_after_settle = true;
                } else {
                    self.autoplay.resume(PauseReasons::POINTER);
                }
            }
            GestureIntent::Swipe(direction) => {
                tracing::debug!(target: TARGET, ?direction, "swipe dropped, guard held");
                self.autoplay.resume(PauseReasons::POINTER);
            }
            GestureIntent::Tap { x, .. } => {
                self.autoplay.resume(PauseReasons::POINTER);
                let hit = self.frame(now).hit_test(x).cloned();
                if let Some(item) = hit {
                    tracing::debug!(target: TARGET, key = item.key(), "item activated");
                    self.item_activated.emit(item);
                }
            }
            GestureIntent::None => {
                self.autoplay.resume(PauseReasons::POINTER);
            }
        }
        self.sync_autoplay(now);
        intent
    }

    /// The pointer left the carousel. Cancels a drag without rotating.
    pub fn pointer_leave(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        if self.arbiter.cancel() {
            tracing::trace!(target: TARGET, "drag cancelled, pointer left");
            self.autoplay.resume(PauseReasons::POINTER);
            if self.state == EngineState::Dragging {
                self.state = EngineState::Idle;
            }
        }
        self.autoplay.resume(PauseReasons::HOVER);
        self.sync_autoplay(now);
    }

    /// The pointer entered the carousel.
    pub fn pointer_enter(&mut self, now: Instant) {
        if self.disposed || !self.config.pause_on_hover {
            return;
        }
        self.autoplay.pause(PauseReasons::HOVER);
        self.sync_autoplay(now);
    }

    /// A key was pressed while the carousel has focus.
    pub fn key_press(&mut self, key: CarouselKey, now: Instant) -> Option<RotationTicket> {
        let direction = key.direction()?;
        self.request_rotation(direction, now, Origin::Key)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// What to draw at `now`.
    ///
    /// The first frame of a backward slide shows the strip pre-positioned at
    /// `-step` with transitions disabled. Once the host has drawn it, it calls
    /// [`mark_frame_presented`](Self::mark_frame_presented) and later frames
    /// animate normally.
    pub fn frame(&self, now: Instant) -> Frame<'_, T> {
        let sequence = self.window.sequence();
        let item_width = self.config.item_width;
        let step = self.slide.step();

        let strip = self
            .slide
            .direction()
            .and_then(|direction| self.window.strip_indices(direction));

        let frame = match strip {
            Some(indices) => Frame::new(indices.into_iter().map(|i| (i, &sequence[i])), item_width, step)
                .with_offset(self.slide.offset(now))
                .with_transitions(self.slide.transitions_enabled())
                .with_slide(self.slide.span()),
            None => Frame::new(
                self.window.window_indices().into_iter().map(|i| (i, &sequence[i])),
                item_width,
                step,
            )
            .with_transitions(self.slide.transitions_enabled()),
        };
        frame.with_drag_offset(self.arbiter.drag_offset())
    }

    /// Report that the host drew the latest [`frame`](Self::frame).
    ///
    /// Re-enables transitions after the pre-positioned first frame of a
    /// backward slide. Harmless at any other time.
    pub fn mark_frame_presented(&mut self) {
        if self.slide.mark_presented() {
            tracing::trace!(target: TARGET, "pre-positioned frame presented, transitions enabled");
        }
    }

    /// The item under carousel-local `x` at `now`.
    pub fn hit_test(&self, x: f32, now: Instant) -> Option<&T> {
        self.frame(now).hit_test(x)
    }

    /// Emitted with the tapped item.
    pub fn item_activated(&self) -> &Signal<T> {
        &self.item_activated
    }

    /// Emitted with the new window after every commit and every refresh that
    /// changes it.
    pub fn window_changed(&self) -> &Signal<Vec<T>> {
        &self.window_changed
    }

    /// Emitted when a slide starts.
    pub fn rotation_started(&self) -> &Signal<Direction> {
        &self.rotation_started
    }

    fn emit_window_changed(&self) {
        let window: Vec<T> = self.window.window().into_iter().cloned().collect();
        self.window_changed.emit(window);
    }
}

impl<T> std::fmt::Debug for CarouselEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselEngine")
            .field("state", &self.state)
            .field("transition", &self.slide.state())
            .field("ticket", &self.ticket)
            .field("autoplay", &self.autoplay)
            .field("mounted", &self.mounted)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(CarouselEngine<String>: Send);
