//! Drive a carousel with a simulated clock and print every frame change.
//!
//! Run with:
//!
//! ```text
//! RUST_LOG=lattice_carousel=debug cargo run --example headless
//! ```

use std::time::{Duration, Instant};

use lattice_carousel::{
    CarouselConfig, CarouselEngine, CarouselItem, CarouselKey, PerfSpan, SlotContext,
};

#[derive(Debug, Clone)]
struct Book {
    slug: String,
    title: String,
}

impl CarouselItem for Book {
    fn key(&self) -> &str {
        &self.slug
    }
}

fn library() -> Vec<Book> {
    [
        "Atomic Habits",
        "Deep Work",
        "Thinking, Fast and Slow",
        "The Psychology of Money",
        "Range",
        "Antifragile",
        "Sapiens",
    ]
    .iter()
    .enumerate()
    .map(|(i, title)| Book {
        slug: format!("book-{i}"),
        title: (*title).to_string(),
    })
    .collect()
}

fn main() -> lattice_carousel::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => CarouselConfig::load(path)?,
        None => CarouselConfig::books(),
    };

    let origin = Instant::now();
    let mut engine = CarouselEngine::new(config)?;
    engine
        .window_changed()
        .connect(|window: &Vec<Book>| {
            let titles: Vec<&str> = window.iter().map(|b| b.title.as_str()).collect();
            println!("  window -> {titles:?}");
        });
    engine
        .item_activated()
        .connect(|book: &Book| println!("  open {}", book.slug));

    engine.set_sequence(library(), origin);
    engine.start(origin);

    // Ten seconds of autoplay, then a swipe, a tap and a key press.
    let mut now = origin;
    let end = origin + Duration::from_secs(10);
    while let Some(wait) = engine.time_until_next(now) {
        now += wait;
        if now > end {
            break;
        }
        engine.advance(now);
        let _span = PerfSpan::new("render_frame");
        let cards = engine.frame(now).render_with(|book: &Book, slot: SlotContext| {
            format!("[{} @ {:.0}]", book.title, slot.x)
        });
        println!("{:>6} ms  {}", (now - origin).as_millis(), cards.join(" "));
        engine.mark_frame_presented();
    }

    now = end;
    engine.pointer_down(1, 500.0, 80.0, now);
    engine.pointer_move(1, 420.0);
    let intent = engine.pointer_up(1, 380.0, 82.0, now);
    println!("swipe -> {intent:?}");
    if let Some(ticket) = engine.current_ticket() {
        now += engine.config().slide_duration;
        engine.notify_animation_finished(ticket, now);
    }
    now += engine.config().reset_guard_delay;
    engine.advance(now);

    engine.pointer_down(2, 30.0, 80.0, now);
    engine.pointer_up(2, 31.0, 80.0, now);

    let ticket = engine.key_press(CarouselKey::ArrowLeft, now);
    println!("arrow left -> {ticket:?}");

    engine.dispose();
    Ok(())
}
