//! The item capability and rotation direction.

use std::sync::Arc;

/// Capability every carousel item provides: a stable key.
///
/// The engine never looks inside an item beyond its key. Keys are used to keep
/// the carousel position stable when the sequence is refreshed, and should be
/// unique within one sequence.
pub trait CarouselItem {
    /// The stable, unique key of this item.
    fn key(&self) -> &str;
}

impl CarouselItem for String {
    fn key(&self) -> &str {
        self
    }
}

impl<T: CarouselItem + ?Sized> CarouselItem for Arc<T> {
    fn key(&self) -> &str {
        (**self).key()
    }
}

impl<T: CarouselItem + ?Sized> CarouselItem for Box<T> {
    fn key(&self) -> &str {
        (**self).key()
    }
}

/// Direction of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Advance: the leading item leaves, the next item enters at the trailing edge.
    Forward,
    /// Retreat: the trailing item leaves, the previous item enters at the leading edge.
    Backward,
}

impl Direction {
    /// Direction for a horizontal drag displacement.
    ///
    /// A leftward drag (negative `dx`) advances, a rightward drag retreats.
    pub fn from_drag(dx: f32) -> Self {
        if dx < 0.0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_key() {
        let item = String::from("quote-7");
        assert_eq!(item.key(), "quote-7");
        assert_eq!(Arc::new(item).key(), "quote-7");
    }

    #[test]
    fn test_direction_from_drag() {
        assert_eq!(Direction::from_drag(-60.0), Direction::Forward);
        assert_eq!(Direction::from_drag(60.0), Direction::Backward);
        assert_eq!(Direction::from_drag(0.0), Direction::Backward);
    }
}
