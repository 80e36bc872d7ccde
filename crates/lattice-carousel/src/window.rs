//! Window state and the rotation algorithm.
//!
//! A [`WindowState`] owns the item sequence and a cursor into it. The window is
//! the circular slice `sequence[cursor .. cursor + k]` (indices modulo `N`).
//! Nothing here is ever cached across a mutation: every index is derived from
//! the live sequence length at the moment it is asked for, so a sequence that
//! is refreshed mid-rotation cannot produce a stale or out-of-bounds index.

use crate::item::{CarouselItem, Direction};

/// How the window behaves for the current sequence length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// No items. Nothing is rendered and no timers are armed.
    Empty,
    /// `0 < N <= k`. All items are shown in order and rotation is disabled.
    Static,
    /// `N > k`. The window rotates.
    Rotating,
}

/// The rendered slice of a circular sequence plus its logical cursor.
#[derive(Debug, Clone)]
pub struct WindowState<T> {
    sequence: Vec<T>,
    window_size: usize,
    cursor: usize,
}

impl<T: CarouselItem> WindowState<T> {
    /// Create an empty window of `window_size` items.
    ///
    /// A window size of zero is treated as one.
    pub fn new(window_size: usize) -> Self {
        Self {
            sequence: Vec::new(),
            window_size: window_size.max(1),
            cursor: 0,
        }
    }

    /// The configured window size `k`.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// The sequence length `N`.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The logical index of the leading window item.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The full item sequence.
    pub fn sequence(&self) -> &[T] {
        &self.sequence
    }

    /// The current window mode.
    pub fn mode(&self) -> WindowMode {
        match self.sequence.len() {
            0 => WindowMode::Empty,
            n if n <= self.window_size => WindowMode::Static,
            _ => WindowMode::Rotating,
        }
    }

    /// Whether rotation is possible (`N > k`).
    #[inline]
    pub fn is_rotatable(&self) -> bool {
        self.mode() == WindowMode::Rotating
    }

    /// Number of items visible at rest: `min(N, k)`.
    pub fn visible_len(&self) -> usize {
        self.sequence.len().min(self.window_size)
    }

    /// Replace the sequence.
    ///
    /// On first availability the window starts at the first item. On refresh
    /// the leading item is followed by key when it still exists; otherwise the
    /// old cursor is normalized against the new length. A sequence that no
    /// longer rotates always rests at cursor zero.
    ///
    /// Returns `true` if the visible window changed.
    pub fn set_sequence(&mut self, items: Vec<T>) -> bool {
        let before = self.window_keys();

        let leading_key = self
            .sequence
            .get(self.cursor)
            .map(|item| item.key().to_owned());
        self.sequence = items;

        self.cursor = match (&leading_key, self.mode()) {
            (_, WindowMode::Empty | WindowMode::Static) => 0,
            (None, WindowMode::Rotating) => 0,
            (Some(key), WindowMode::Rotating) => self
                .sequence
                .iter()
                .position(|item| item.key() == key.as_str())
                .unwrap_or(self.cursor % self.sequence.len()),
        };

        let changed = before != self.window_keys();
        tracing::debug!(
            target: "lattice_carousel::window",
            len = self.sequence.len(),
            window_size = self.window_size,
            cursor = self.cursor,
            mode = ?self.mode(),
            changed,
            "sequence replaced"
        );
        changed
    }

    /// Sequence indices of the window at rest, in display order.
    pub fn window_indices(&self) -> Vec<usize> {
        let n = self.sequence.len();
        (0..self.visible_len())
            .map(|offset| (self.cursor + offset) % n)
            .collect()
    }

    /// The items of the window at rest, in display order.
    pub fn window(&self) -> Vec<&T> {
        self.window_indices()
            .into_iter()
            .map(|i| &self.sequence[i])
            .collect()
    }

    /// Keys of the window at rest.
    pub fn window_keys(&self) -> Vec<String> {
        self.window().into_iter().map(|item| item.key().to_owned()).collect()
    }

    /// Sequence index of the item entering the window on a rotation.
    ///
    /// Forward brings in `sequence[(cursor + k) mod N]`, Backward brings in
    /// `sequence[(cursor - 1) mod N]`. Returns `None` unless `N > k`.
    pub fn boundary_index(&self, direction: Direction) -> Option<usize> {
        if !self.is_rotatable() {
            return None;
        }
        let n = self.sequence.len();
        Some(match direction {
            Direction::Forward => (self.cursor + self.window_size) % n,
            Direction::Backward => (self.cursor + n - 1) % n,
        })
    }

    /// The item entering the window on a rotation.
    pub fn boundary_item(&self, direction: Direction) -> Option<&T> {
        self.boundary_index(direction).map(|i| &self.sequence[i])
    }

    /// Sequence indices of the transient `k + 1` strip rendered while a
    /// rotation is in flight.
    ///
    /// Forward appends the boundary at the trailing edge, Backward prepends it
    /// at the leading edge.
    pub fn strip_indices(&self, direction: Direction) -> Option<Vec<usize>> {
        let boundary = self.boundary_index(direction)?;
        let mut indices = self.window_indices();
        match direction {
            Direction::Forward => indices.push(boundary),
            Direction::Backward => indices.insert(0, boundary),
        }
        Some(indices)
    }

    /// The items of the transient strip.
    pub fn strip(&self, direction: Direction) -> Option<Vec<&T>> {
        self.strip_indices(direction)
            .map(|indices| indices.into_iter().map(|i| &self.sequence[i]).collect())
    }

    /// Commit a settled rotation: move the cursor by exactly one.
    ///
    /// `N` is read from the live sequence. If the sequence stopped rotating
    /// since the rotation started, nothing moves and `false` is returned.
    pub fn commit(&mut self, direction: Direction) -> bool {
        if !self.is_rotatable() {
            tracing::debug!(
                target: "lattice_carousel::window",
                len = self.sequence.len(),
                "commit skipped, sequence no longer rotates"
            );
            self.cursor = 0;
            return false;
        }
        let n = self.sequence.len();
        let cursor = self.cursor % n;
        self.cursor = match direction {
            Direction::Forward => (cursor + 1) % n,
            Direction::Backward => (cursor + n - 1) % n,
        };
        tracing::trace!(target: "lattice_carousel::window", ?direction, cursor = self.cursor, "rotation committed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("I{i}")).collect()
    }

    fn keys(window: Vec<&String>) -> Vec<&str> {
        window.into_iter().map(String::as_str).collect()
    }

    fn window_at(n: usize, k: usize, cursor: usize) -> WindowState<String> {
        let mut state = WindowState::new(k);
        state.set_sequence(items(n));
        for _ in 0..cursor {
            state.commit(Direction::Forward);
        }
        state
    }

    #[test]
    fn test_first_availability_takes_first_k() {
        let state = window_at(10, 4, 0);
        assert_eq!(state.mode(), WindowMode::Rotating);
        assert_eq!(keys(state.window()), vec!["I0", "I1", "I2", "I3"]);
    }

    #[test]
    fn test_modes() {
        let mut state = WindowState::<String>::new(4);
        assert_eq!(state.mode(), WindowMode::Empty);
        assert!(state.window().is_empty());

        state.set_sequence(items(4));
        assert_eq!(state.mode(), WindowMode::Static);
        assert!(!state.is_rotatable());

        state.set_sequence(items(2));
        assert_eq!(state.mode(), WindowMode::Static);
        assert_eq!(keys(state.window()), vec!["I0", "I1"]);

        state.set_sequence(items(5));
        assert_eq!(state.mode(), WindowMode::Rotating);
    }

    #[test]
    fn test_boundary_forward_wraps() {
        let state = window_at(10, 4, 9);
        assert_eq!(state.cursor(), 9);
        assert_eq!(state.boundary_index(Direction::Forward), Some(3));
        assert_eq!(keys(state.window()), vec!["I9", "I0", "I1", "I2"]);
    }

    #[test]
    fn test_boundary_backward_wraps() {
        let state = window_at(10, 4, 0);
        assert_eq!(state.boundary_index(Direction::Backward), Some(9));
        assert_eq!(state.boundary_item(Direction::Backward).map(String::as_str), Some("I9"));
    }

    #[test]
    fn test_no_boundary_when_not_rotatable() {
        let state = window_at(4, 4, 0);
        assert_eq!(state.boundary_index(Direction::Forward), None);
        assert!(state.strip(Direction::Forward).is_none());
    }

    #[test]
    fn test_strip_layout() {
        let state = window_at(10, 4, 0);
        assert_eq!(
            keys(state.strip(Direction::Forward).unwrap()),
            vec!["I0", "I1", "I2", "I3", "I4"]
        );
        assert_eq!(
            keys(state.strip(Direction::Backward).unwrap()),
            vec!["I9", "I0", "I1", "I2", "I3"]
        );
    }

    #[test]
    fn test_commit_matches_strip_after_slide() {
        // The committed window must equal the strip minus the item that slid out.
        for direction in [Direction::Forward, Direction::Backward] {
            let mut state = window_at(7, 3, 5);
            let strip: Vec<String> = state
                .strip(direction)
                .unwrap()
                .into_iter()
                .cloned()
                .collect();
            let expected: Vec<String> = match direction {
                Direction::Forward => strip[1..].to_vec(),
                Direction::Backward => strip[..3].to_vec(),
            };
            assert!(state.commit(direction));
            assert_eq!(state.window_keys(), expected);
        }
    }

    #[test]
    fn test_round_trip() {
        let mut state = window_at(6, 4, 2);
        let before = state.window_keys();
        state.commit(Direction::Forward);
        state.commit(Direction::Backward);
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.window_keys(), before);
    }

    #[test]
    fn test_refresh_follows_leading_key() {
        let mut state = window_at(10, 3, 4);
        let mut refreshed = items(10);
        refreshed.insert(0, "NEW".to_string());
        state.set_sequence(refreshed);
        assert_eq!(state.cursor(), 5);
        assert_eq!(keys(state.window()), vec!["I4", "I5", "I6"]);
    }

    #[test]
    fn test_refresh_without_leading_key_normalizes() {
        let mut state = window_at(10, 3, 8);
        let refreshed: Vec<String> = (0..6).map(|i| format!("J{i}")).collect();
        state.set_sequence(refreshed);
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_commit_after_shrink_is_skipped() {
        let mut state = window_at(10, 4, 3);
        state.set_sequence(items(3));
        assert!(!state.commit(Direction::Forward));
        assert_eq!(state.cursor(), 0);
        assert_eq!(keys(state.window()), vec!["I0", "I1", "I2"]);
    }

    #[test]
    fn test_every_rotation_keeps_a_valid_window() {
        let n = 9;
        let k = 4;
        let mut state = window_at(n, k, 0);
        let pattern = [
            Direction::Forward,
            Direction::Forward,
            Direction::Backward,
            Direction::Forward,
            Direction::Backward,
            Direction::Backward,
            Direction::Backward,
        ];
        for direction in pattern.iter().cycle().take(60) {
            state.commit(*direction);
            let indices = state.window_indices();
            assert_eq!(indices.len(), k);
            for pair in indices.windows(2) {
                assert_eq!(pair[1], (pair[0] + 1) % n);
            }
            assert_eq!(indices[0], state.cursor());
        }
    }
}
