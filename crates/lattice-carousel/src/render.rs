//! Render descriptions handed to the host.
//!
//! The engine never draws. Each call to
//! [`CarouselEngine::frame`](crate::CarouselEngine::frame) returns a [`Frame`]:
//! the items to lay out left to right, the horizontal offset of the whole
//! strip, and whether the host should animate offset changes. Hosts with their
//! own animation system read [`Frame::slide`] and animate `from → to`
//! themselves; hosts that redraw every tick just use [`Frame::offset`].

use crate::animation::SlideSpan;
use crate::item::CarouselItem;

/// Where one item sits inside a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotContext {
    /// Position in the frame, left to right.
    pub slot: usize,
    /// Index of the item in the full sequence.
    pub sequence_index: usize,
    /// Left edge of the slot relative to the strip origin, before the strip
    /// offset is applied.
    pub x: f32,
    /// Item width in logical pixels.
    pub width: f32,
}

/// One positioned item.
#[derive(Debug, Clone, Copy)]
pub struct FrameSlot<'a, T> {
    /// The item.
    pub item: &'a T,
    /// Its placement.
    pub context: SlotContext,
}

/// A per-item render template.
///
/// Implemented for every `Fn(&T, SlotContext) -> O`, so any closure works.
pub trait RenderTemplate<T> {
    /// What one rendered item looks like.
    type Output;

    /// Render `item` at `context`.
    fn render(&self, item: &T, context: SlotContext) -> Self::Output;
}

impl<T, O, F> RenderTemplate<T> for F
where
    F: Fn(&T, SlotContext) -> O,
{
    type Output = O;

    fn render(&self, item: &T, context: SlotContext) -> O {
        self(item, context)
    }
}

/// What the host should draw at one instant.
#[derive(Debug, Clone)]
pub struct Frame<'a, T> {
    slots: Vec<FrameSlot<'a, T>>,
    offset: f32,
    drag_offset: f32,
    transitions_enabled: bool,
    slide: Option<SlideSpan>,
    step: f32,
}

impl<'a, T: CarouselItem> Frame<'a, T> {
    /// Lay out `items` (sequence index, item) at consecutive item steps.
    pub(crate) fn new(
        items: impl IntoIterator<Item = (usize, &'a T)>,
        item_width: f32,
        step: f32,
    ) -> Self {
        let slots = items
            .into_iter()
            .enumerate()
            .map(|(slot, (sequence_index, item))| FrameSlot {
                item,
                context: SlotContext {
                    slot,
                    sequence_index,
                    x: slot as f32 * step,
                    width: item_width,
                },
            })
            .collect();
        Self {
            slots,
            offset: 0.0,
            drag_offset: 0.0,
            transitions_enabled: true,
            slide: None,
            step,
        }
    }

    pub(crate) fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub(crate) fn with_drag_offset(mut self, drag_offset: f32) -> Self {
        self.drag_offset = drag_offset;
        self
    }

    pub(crate) fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions_enabled = enabled;
        self
    }

    pub(crate) fn with_slide(mut self, slide: Option<SlideSpan>) -> Self {
        self.slide = slide;
        self
    }

    /// The positioned items, left to right.
    pub fn slots(&self) -> &[FrameSlot<'a, T>] {
        &self.slots
    }

    /// The items, left to right.
    pub fn items(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.slots.iter().map(|slot| slot.item)
    }

    /// Keys of the items, left to right.
    pub fn keys(&self) -> Vec<&'a str> {
        self.slots.iter().map(|slot| slot.item.key()).collect()
    }

    /// Number of items in the frame: `k` at rest, `k + 1` mid-slide.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Horizontal strip offset in logical pixels.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Live horizontal drag displacement, `0.0` unless a pointer is pressed.
    ///
    /// Hosts may use it for rubber-band feedback; it never moves the window.
    pub fn drag_offset(&self) -> f32 {
        self.drag_offset
    }

    /// Whether the host should animate changes to [`offset`](Self::offset).
    pub fn transitions_enabled(&self) -> bool {
        self.transitions_enabled
    }

    /// The slide in flight, if any.
    pub fn slide(&self) -> Option<SlideSpan> {
        self.slide
    }

    /// Distance between adjacent slot origins.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Items whose slot lies inside a viewport of `window_size` slots at the
    /// current offset.
    pub fn visible_items(&self, window_size: usize) -> Vec<&'a T> {
        let half = self.step / 2.0;
        let end = window_size as f32 * self.step - half;
        self.slots
            .iter()
            .filter(|slot| {
                let left = slot.context.x + self.offset;
                left > -half && left < end
            })
            .map(|slot| slot.item)
            .collect()
    }

    /// The item under carousel-local `x`, ignoring the gaps between items.
    pub fn hit_test(&self, x: f32) -> Option<&'a T> {
        let local = x - self.offset;
        if local < 0.0 || self.step <= 0.0 {
            return None;
        }
        let slot = (local / self.step).floor() as usize;
        let within = local - slot as f32 * self.step;
        self.slots
            .get(slot)
            .filter(|slot| within < slot.context.width)
            .map(|slot| slot.item)
    }

    /// Apply a render template to every item, left to right.
    pub fn render_with<R: RenderTemplate<T>>(&self, template: R) -> Vec<R::Output> {
        self.slots
            .iter()
            .map(|slot| template.render(slot.item, slot.context))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Direction;

    fn sequence() -> Vec<String> {
        (0..6).map(|i| format!("I{i}")).collect()
    }

    fn frame<'a>(items: &'a [String], indices: &[usize]) -> Frame<'a, String> {
        Frame::new(indices.iter().map(|&i| (i, &items[i])), 100.0, 120.0)
    }

    #[test]
    fn test_layout() {
        let items = sequence();
        let frame = frame(&items, &[4, 5, 0]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.keys(), vec!["I4", "I5", "I0"]);
        let xs: Vec<f32> = frame.slots().iter().map(|s| s.context.x).collect();
        assert_eq!(xs, vec![0.0, 120.0, 240.0]);
        assert_eq!(frame.slots()[2].context.sequence_index, 0);
        assert!(frame.transitions_enabled());
        assert!(frame.slide().is_none());
    }

    #[test]
    fn test_render_with_closure() {
        let items = sequence();
        let frame = frame(&items, &[1, 2]);
        let rendered = frame.render_with(|item: &String, ctx: SlotContext| {
            format!("{}@{}", item, ctx.x)
        });
        assert_eq!(rendered, vec!["I1@0", "I2@120"]);
    }

    #[test]
    fn test_hit_test() {
        let items = sequence();
        let frame = frame(&items, &[0, 1, 2]);
        assert_eq!(frame.hit_test(10.0).map(String::as_str), Some("I0"));
        assert_eq!(frame.hit_test(130.0).map(String::as_str), Some("I1"));
        // The gap between items.
        assert_eq!(frame.hit_test(110.0), None);
        assert_eq!(frame.hit_test(-5.0), None);
        assert_eq!(frame.hit_test(1000.0), None);
    }

    #[test]
    fn test_hit_test_follows_offset() {
        let items = sequence();
        let frame = frame(&items, &[0, 1, 2, 3]).with_offset(-120.0);
        assert_eq!(frame.hit_test(10.0).map(String::as_str), Some("I1"));
    }

    #[test]
    fn test_visible_items_at_settled_offset() {
        let items = sequence();
        let forward = frame(&items, &[0, 1, 2, 3])
            .with_offset(-120.0)
            .with_slide(Some(SlideSpan::for_direction(Direction::Forward, 120.0)));
        let visible: Vec<&str> = forward.visible_items(3).into_iter().map(String::as_str).collect();
        assert_eq!(visible, vec!["I1", "I2", "I3"]);

        let at_rest = frame(&items, &[5, 0, 1, 2]);
        let visible: Vec<&str> = at_rest.visible_items(3).into_iter().map(String::as_str).collect();
        assert_eq!(visible, vec!["I5", "I0", "I1"]);
    }
}
