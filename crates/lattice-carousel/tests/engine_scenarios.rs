//! End-to-end scenarios driving the engine with a simulated clock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lattice_carousel::{
    CarouselConfig, CarouselEngine, CarouselItem, Direction, EngineState, GestureIntent,
    WindowMode,
};
use parking_lot::Mutex;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[derive(Debug, Clone, PartialEq)]
struct Quote {
    id: String,
    text: String,
}

impl CarouselItem for Quote {
    fn key(&self) -> &str {
        &self.id
    }
}

fn quotes(n: usize) -> Vec<Quote> {
    (0..n)
        .map(|i| Quote {
            id: format!("I{i}"),
            text: format!("quote number {i}"),
        })
        .collect()
}

fn keys(items: Vec<&Quote>) -> Vec<String> {
    items.into_iter().map(|q| q.id.clone()).collect()
}

fn expected(ids: &[usize]) -> Vec<String> {
    ids.iter().map(|i| format!("I{i}")).collect()
}

/// A host that advances a fake clock and reports every slide as finished
/// exactly `slide_duration` after it started.
struct Host {
    engine: CarouselEngine<Quote>,
    now: Instant,
}

impl Host {
    fn new(n: usize, k: usize) -> Self {
        Self::with_config(n, CarouselConfig::default().with_window_size(k))
    }

    fn with_config(n: usize, config: CarouselConfig) -> Self {
        init_tracing();
        let now = Instant::now();
        let mut engine = CarouselEngine::new(config).unwrap();
        engine.set_sequence(quotes(n), now);
        engine.start(now);
        Self { engine, now }
    }

    fn tick(&mut self, by: Duration) -> usize {
        self.now += by;
        self.engine.advance(self.now)
    }

    /// Rotate and let the rotation settle completely.
    fn rotate_and_settle(&mut self, direction: Direction) -> bool {
        let Some(ticket) = self.engine.rotate(direction, self.now) else {
            return false;
        };
        self.present();
        self.now += self.engine.config().slide_duration;
        assert!(self.engine.notify_animation_finished(ticket, self.now));
        self.tick(self.engine.config().reset_guard_delay);
        assert_eq!(self.engine.state(), EngineState::Idle);
        true
    }

    /// Draw the current frame, then tell the engine it is on screen.
    fn present(&mut self) -> (f32, bool) {
        let frame = self.engine.frame(self.now);
        let drawn = (frame.offset(), frame.transitions_enabled());
        self.engine.mark_frame_presented();
        drawn
    }

    fn window(&self) -> Vec<String> {
        keys(self.engine.window())
    }
}

#[test]
fn test_scenario_first_forward_rotation() {
    let mut host = Host::new(10, 4);
    assert_eq!(host.window(), expected(&[0, 1, 2, 3]));

    assert!(host.rotate_and_settle(Direction::Forward));
    assert_eq!(host.window(), expected(&[1, 2, 3, 4]));
    assert_eq!(host.engine.cursor(), 1);
}

#[test]
fn test_scenario_exact_fit_is_static() {
    let mut host = Host::new(4, 4);
    assert_eq!(host.engine.mode(), WindowMode::Static);
    assert!(!host.engine.is_autoplay_armed());

    assert!(!host.rotate_and_settle(Direction::Forward));
    assert_eq!(host.window(), expected(&[0, 1, 2, 3]));

    // Nothing ever fires, no matter how long the host waits.
    assert_eq!(host.tick(ms(60_000)), 0);
    assert_eq!(host.window(), expected(&[0, 1, 2, 3]));
}

#[test]
fn test_scenario_wraparound_at_last_item() {
    let mut host = Host::new(10, 4);
    for _ in 0..9 {
        assert!(host.rotate_and_settle(Direction::Forward));
    }
    assert_eq!(host.engine.cursor(), 9);

    let strip = host.engine.frame(host.now);
    assert_eq!(strip.keys(), vec!["I9", "I0", "I1", "I2"]);

    let ticket = host.engine.rotate(Direction::Forward, host.now).unwrap();
    let frame = host.engine.frame(host.now);
    assert_eq!(frame.keys(), vec!["I9", "I0", "I1", "I2", "I3"]);
    assert_eq!(frame.slots()[4].context.sequence_index, 3);

    host.now += ms(500);
    host.engine.notify_animation_finished(ticket, host.now);
    assert_eq!(host.engine.cursor(), 0);
    assert_eq!(host.window(), expected(&[0, 1, 2, 3]));
}

#[test]
fn test_wraparound_single_item_window() {
    let mut host = Host::new(5, 1);
    for _ in 0..4 {
        host.rotate_and_settle(Direction::Forward);
    }
    assert_eq!(host.engine.cursor(), 4);

    host.engine.rotate(Direction::Forward, host.now).unwrap();
    assert_eq!(host.engine.frame(host.now).keys(), vec!["I4", "I0"]);
    host.tick(ms(600));
    host.tick(ms(50));
    assert_eq!(host.engine.cursor(), 0);
    assert_eq!(host.window(), expected(&[0]));
}

#[test]
fn test_scenario_swipe_pauses_and_resumes_autoplay() {
    let mut host = Host::new(10, 4);
    let started = Arc::new(Mutex::new(Vec::new()));
    let log = started.clone();
    host.engine.rotation_started().connect(move |direction| {
        log.lock().push(*direction);
    });
    assert!(host.engine.is_autoplay_armed());

    assert!(host.engine.pointer_down(1, 400.0, 50.0, host.now));
    assert_eq!(host.engine.state(), EngineState::Dragging);
    assert!(!host.engine.is_autoplay_armed());

    host.tick(ms(200));
    host.engine.pointer_move(1, 370.0);
    // Long enough for several autoplay periods: nothing fires while dragging.
    host.tick(ms(10_000));
    assert_eq!(host.engine.state(), EngineState::Dragging);
    assert!(started.lock().is_empty());

    let intent = host.engine.pointer_up(1, 340.0, 52.0, host.now);
    assert_eq!(intent, GestureIntent::Swipe(Direction::Forward));
    assert_eq!(*started.lock(), vec![Direction::Forward]);
    assert_eq!(host.engine.state(), EngineState::Committing(Direction::Forward));
    // Still paused until the rotation settles.
    assert!(!host.engine.is_autoplay_armed());

    let ticket = host.engine.current_ticket().unwrap();
    host.now += ms(500);
    host.engine.notify_animation_finished(ticket, host.now);
    assert!(!host.engine.is_autoplay_armed());
    host.tick(ms(50));
    assert_eq!(host.engine.state(), EngineState::Idle);
    assert!(host.engine.is_autoplay_armed());
    assert_eq!(host.window(), expected(&[1, 2, 3, 4]));
    assert_eq!(started.lock().len(), 1);
}

#[test]
fn test_backward_swipe() {
    let mut host = Host::new(7, 3);
    host.engine.pointer_down(1, 100.0, 0.0, host.now);
    let intent = host.engine.pointer_up(1, 180.0, 0.0, host.now);
    assert_eq!(intent, GestureIntent::Swipe(Direction::Backward));
    host.tick(ms(600));
    host.tick(ms(50));
    assert_eq!(host.window(), expected(&[6, 0, 1]));
}

#[test]
fn test_guard_drops_duplicate_requests() {
    let mut host = Host::new(10, 4);
    let started = Arc::new(Mutex::new(0usize));
    let count = started.clone();
    host.engine.rotation_started().connect(move |_| *count.lock() += 1);

    let ticket = host.engine.rotate(Direction::Forward, host.now).unwrap();
    for _ in 0..5 {
        assert!(host.engine.rotate(Direction::Forward, host.now).is_none());
        assert!(host.engine.rotate(Direction::Backward, host.now).is_none());
    }
    assert_eq!(*started.lock(), 1);
    // Exactly one fallback timer plus autoplay.
    assert_eq!(host.engine.time_until_next(host.now), Some(ms(600)));

    host.now += ms(500);
    host.engine.notify_animation_finished(ticket, host.now);
    host.tick(ms(50));
    assert_eq!(host.engine.cursor(), 1);
}

#[test]
fn test_round_trip_restores_window() {
    let mut host = Host::new(8, 3);
    host.rotate_and_settle(Direction::Forward);
    host.rotate_and_settle(Direction::Forward);
    let before = host.window();
    let cursor = host.engine.cursor();

    host.rotate_and_settle(Direction::Forward);
    host.rotate_and_settle(Direction::Backward);
    assert_eq!(host.window(), before);
    assert_eq!(host.engine.cursor(), cursor);
}

#[test]
fn test_window_is_always_a_circular_slice() {
    for (n, k) in [(5, 1), (5, 4), (9, 3), (12, 4)] {
        let mut host = Host::new(n, k);
        let pattern = [
            Direction::Forward,
            Direction::Backward,
            Direction::Backward,
            Direction::Forward,
            Direction::Forward,
            Direction::Forward,
        ];
        for direction in pattern.iter().cycle().take(40) {
            host.rotate_and_settle(*direction);
            let window = host.engine.window();
            assert_eq!(window.len(), k);
            let cursor = host.engine.cursor();
            for (offset, item) in window.iter().enumerate() {
                assert_eq!(item.id, format!("I{}", (cursor + offset) % n));
            }
        }
    }
}

#[test]
fn test_illusion_invariant_both_directions() {
    for direction in [Direction::Forward, Direction::Backward] {
        let mut host = Host::new(9, 4);
        host.rotate_and_settle(Direction::Forward);

        let ticket = host.engine.rotate(direction, host.now).unwrap();
        host.now += ms(500);
        let settled = host.engine.frame(host.now);
        let shown: Vec<String> = settled
            .visible_items(4)
            .into_iter()
            .map(|q| q.id.clone())
            .collect();

        host.engine.notify_animation_finished(ticket, host.now);
        let frame = host.engine.frame(host.now);
        assert_eq!(frame.offset(), 0.0);
        assert!(!frame.transitions_enabled());
        let committed: Vec<String> = frame.keys().into_iter().map(str::to_owned).collect();
        assert_eq!(committed, shown, "{direction:?}");
    }
}

#[test]
fn test_reported_completion_releases_guard_after_reset_delay() {
    let mut host = Host::new(10, 4);
    let ticket = host.engine.rotate(Direction::Forward, host.now).unwrap();
    host.now += ms(500);
    assert!(host.engine.notify_animation_finished(ticket, host.now));
    assert_eq!(host.engine.time_until_next(host.now), Some(ms(50)));
    host.tick(ms(50));
    assert_eq!(host.engine.state(), EngineState::Idle);
}

#[test]
fn test_backward_slide_snaps_to_pre_position() {
    let mut host = Host::new(9, 4);
    let step = host.engine.config().step();
    let ticket = host.engine.rotate(Direction::Backward, host.now).unwrap();

    assert_eq!(host.present(), (-step, false));
    let (offset, animated) = host.present();
    assert_eq!(offset, -step);
    assert!(animated);

    host.now += ms(500);
    let (offset, animated) = host.present();
    assert_eq!(offset, 0.0);
    assert!(animated);

    host.engine.notify_animation_finished(ticket, host.now);
    assert!(!host.engine.frame(host.now).transitions_enabled());
    host.tick(ms(50));
    assert!(host.engine.frame(host.now).transitions_enabled());
    assert_eq!(host.window(), expected(&[8, 0, 1, 2]));
}

#[test]
fn test_stale_completion_is_ignored() {
    let mut host = Host::new(10, 4);
    let first = host.engine.rotate(Direction::Forward, host.now).unwrap();
    // The host never reports; the fallback settles instead.
    host.tick(ms(600));
    host.tick(ms(50));
    assert_eq!(host.engine.cursor(), 1);

    let second = host.engine.rotate(Direction::Forward, host.now).unwrap();
    host.tick(ms(100));
    assert!(!host.engine.notify_animation_finished(first, host.now));
    assert_eq!(host.engine.current_ticket(), Some(second));
    assert_eq!(host.engine.cursor(), 1);
}

#[test]
fn test_dispose_mid_slide_never_commits() {
    let mut host = Host::new(10, 4);
    let changes = Arc::new(Mutex::new(Vec::new()));
    let log = changes.clone();
    host.engine
        .window_changed()
        .connect(move |window: &Vec<Quote>| log.lock().push(window.len()));

    let ticket = host.engine.rotate(Direction::Forward, host.now).unwrap();
    host.engine.dispose();
    host.now += ms(500);
    assert!(!host.engine.notify_animation_finished(ticket, host.now));
    assert_eq!(host.tick(ms(5_000)), 0);
    assert_eq!(host.engine.cursor(), 0);
    assert!(changes.lock().is_empty());

    host.engine.set_sequence(quotes(3), host.now);
    assert_eq!(host.engine.window().len(), 4);
}

#[test]
fn test_refresh_mid_slide_uses_live_sequence() {
    let mut host = Host::new(10, 4);
    let ticket = host.engine.rotate(Direction::Forward, host.now).unwrap();

    host.engine.set_sequence(quotes(3), host.now);
    assert_eq!(host.engine.frame(host.now).len(), 3);

    host.now += ms(500);
    host.engine.notify_animation_finished(ticket, host.now);
    host.tick(ms(50));
    assert_eq!(host.engine.cursor(), 0);
    assert_eq!(host.window(), expected(&[0, 1, 2]));
    assert!(!host.engine.is_autoplay_armed());
}

#[test]
fn test_refresh_keeps_leading_item() {
    let mut host = Host::new(10, 3);
    host.rotate_and_settle(Direction::Forward);
    host.rotate_and_settle(Direction::Forward);

    let mut refreshed = quotes(10);
    refreshed.retain(|q| q.id != "I0");
    host.engine.set_sequence(refreshed, host.now);
    assert_eq!(host.window(), expected(&[2, 3, 4]));
}

#[test]
fn test_tap_emits_activated_item() {
    let mut host = Host::with_config(
        6,
        CarouselConfig::quotes().with_item_geometry(200.0, 20.0),
    );
    let activated = Arc::new(Mutex::new(Vec::new()));
    let log = activated.clone();
    host.engine
        .item_activated()
        .connect(move |quote: &Quote| log.lock().push(quote.text.clone()));

    host.engine.pointer_down(3, 450.0, 30.0, host.now);
    let intent = host.engine.pointer_up(3, 452.0, 31.0, host.now);
    assert_eq!(intent, GestureIntent::Tap { x: 452.0, y: 31.0 });
    assert_eq!(*activated.lock(), vec!["quote number 2".to_string()]);

    // A tap in the gap between items activates nothing.
    host.engine.pointer_down(3, 210.0, 30.0, host.now);
    host.engine.pointer_up(3, 210.0, 30.0, host.now);
    assert_eq!(activated.lock().len(), 1);
}

#[test]
fn test_autoplay_runs_continuously() {
    let mut host = Host::new(6, 4);
    host.tick(ms(3000));
    for expected_cursor in 1..=8 {
        assert_eq!(host.engine.state(), EngineState::Committing(Direction::Forward));
        // Fallback settle and guard release in one wake-up.
        host.tick(ms(650));
        assert_eq!(host.engine.state(), EngineState::Idle);
        assert_eq!(host.engine.cursor(), expected_cursor % 6);
        assert_eq!(host.engine.time_until_next(host.now), Some(ms(2350)));
        host.tick(ms(2350));
    }
}

#[test]
fn test_window_changed_reports_every_commit() {
    let mut host = Host::new(6, 2);
    let windows = Arc::new(Mutex::new(Vec::new()));
    let log = windows.clone();
    host.engine.window_changed().connect(move |window: &Vec<Quote>| {
        log.lock().push(window.iter().map(|q| q.id.clone()).collect::<Vec<_>>());
    });

    host.rotate_and_settle(Direction::Forward);
    host.rotate_and_settle(Direction::Backward);
    host.rotate_and_settle(Direction::Backward);

    assert_eq!(
        *windows.lock(),
        vec![expected(&[1, 2]), expected(&[0, 1]), expected(&[5, 0])]
    );
}
