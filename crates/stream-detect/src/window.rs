//! Bounded observation storage.
//!
//! Provides:
//! - **RingBuffer**: fixed-capacity circular buffer, oldest entry evicted first
//! - **SlidingWindow**: the detector's numeric window with summary statistics

// ── Ring Buffer ─────────────────────────────────────────────────────────

/// A bounded circular buffer.
///
/// When full, the oldest item is overwritten. Capacity is fixed at
/// construction, so the length can never exceed it.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    buffer: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a ring buffer with the given capacity (at least 1).
    pub fn new(capacity: usize) -> Self {
        let cap = capacity.max(1);
        Self {
            buffer: vec![None; cap],
            head: 0,
            len: 0,
        }
    }

    /// Push an item, returning the evicted oldest item if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = self.buffer[self.head].replace(item);
        self.head = (self.head + 1) % self.buffer.len();
        if self.len < self.buffer.len() {
            self.len += 1;
        }
        evicted
    }

    /// Item at logical position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let pos = (self.start() + index) % self.buffer.len();
        self.buffer[pos].as_ref()
    }

    /// Most recently pushed item.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterate over items in insertion order (oldest first).
    pub fn iter(&self) -> RingBufferIter<'_, T> {
        RingBufferIter {
            buffer: &self.buffer,
            pos: self.start(),
            remaining: self.len,
        }
    }

    /// Copy out the contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Maximum capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Clear all items.
    pub fn clear(&mut self) {
        for slot in &mut self.buffer {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    fn start(&self) -> usize {
        (self.head + self.buffer.len() - self.len) % self.buffer.len()
    }
}

/// Iterator over a RingBuffer.
pub struct RingBufferIter<'a, T> {
    buffer: &'a [Option<T>],
    pos: usize,
    remaining: usize,
}

impl<'a, T> Iterator for RingBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.buffer[self.pos].as_ref();
        self.pos = (self.pos + 1) % self.buffer.len();
        self.remaining -= 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for RingBufferIter<'a, T> {}

// ── Sliding Window ──────────────────────────────────────────────────────

/// Mean and population standard deviation of a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowMoments {
    pub mean: f64,
    pub std_dev: f64,
}

/// The detector's sliding window of recent observations.
///
/// Values are kept in arrival order; `Pattern` and `Change` depend on it.
#[derive(Clone, Debug)]
pub struct SlidingWindow {
    values: RingBuffer<f64>,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: RingBuffer::new(capacity),
        }
    }

    /// Append an observation, evicting the oldest one when at capacity.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.values.push(value)
    }

    /// Newest observation.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Observation immediately before the newest one.
    pub fn previous(&self) -> Option<f64> {
        self.values
            .len()
            .checked_sub(2)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Consecutive `(older, newer)` pairs in arrival order.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.iter().zip(self.iter().skip(1))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Mean of the window, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let scale = self.scale();
        if scale == 0.0 {
            return Some(0.0);
        }
        let n = self.len() as f64;
        Some(self.iter().map(|x| x / scale).sum::<f64>() / n * scale)
    }

    /// Mean and population standard deviation, `None` with fewer than two values.
    ///
    /// Values are divided by the largest magnitude in the window before they
    /// are summed, so any window of finite values yields finite moments. A
    /// window of identical values has a standard deviation of exactly 0.
    pub fn moments(&self) -> Option<WindowMoments> {
        if self.len() < 2 {
            return None;
        }
        let scale = self.scale();
        if scale == 0.0 {
            return Some(WindowMoments {
                mean: 0.0,
                std_dev: 0.0,
            });
        }
        let n = self.len() as f64;
        let mean = self.iter().map(|x| x / scale).sum::<f64>() / n;
        let variance = self
            .iter()
            .map(|x| (x / scale - mean).powi(2))
            .sum::<f64>()
            / n;
        Some(WindowMoments {
            mean: mean * scale,
            std_dev: variance.max(0.0).sqrt() * scale,
        })
    }

    /// Largest absolute value in the window.
    fn scale(&self) -> f64 {
        self.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_push_and_iter() {
        let mut rb = RingBuffer::new(3);
        assert!(rb.is_empty());
        assert_eq!(rb.push(1), None);
        assert_eq!(rb.push(2), None);
        assert_eq!(rb.push(3), None);
        assert!(rb.is_full());
        assert_eq!(rb.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut rb = RingBuffer::new(3);
        for i in 0..5 {
            rb.push(i);
        }
        assert_eq!(rb.len(), 3);
        assert_eq!(rb.to_vec(), vec![2, 3, 4]);
        assert_eq!(rb.push(5), Some(2));
        assert_eq!(rb.to_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn ring_buffer_indexed_access() {
        let mut rb = RingBuffer::new(4);
        for i in 10..16 {
            rb.push(i);
        }
        assert_eq!(rb.get(0), Some(&12));
        assert_eq!(rb.get(3), Some(&15));
        assert_eq!(rb.get(4), None);
        assert_eq!(rb.last(), Some(&15));
    }

    #[test]
    fn ring_buffer_zero_capacity_clamped() {
        let mut rb = RingBuffer::new(0);
        assert_eq!(rb.capacity(), 1);
        rb.push("a");
        rb.push("b");
        assert_eq!(rb.to_vec(), vec!["b"]);
    }

    #[test]
    fn ring_buffer_clear() {
        let mut rb = RingBuffer::new(2);
        rb.push(1);
        rb.push(2);
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.last(), None);
        assert_eq!(rb.iter().count(), 0);
    }

    #[test]
    fn window_latest_and_previous() {
        let mut w = SlidingWindow::new(3);
        assert_eq!(w.latest(), None);
        w.push(1.0);
        assert_eq!(w.latest(), Some(1.0));
        assert_eq!(w.previous(), None);
        w.push(2.0);
        w.push(3.0);
        w.push(4.0);
        assert_eq!(w.latest(), Some(4.0));
        assert_eq!(w.previous(), Some(3.0));
        assert_eq!(w.to_vec(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn window_pairs_follow_arrival_order() {
        let mut w = SlidingWindow::new(3);
        for v in [5.0, 1.0, 2.0, 3.0] {
            w.push(v);
        }
        let pairs: Vec<_> = w.pairs().collect();
        assert_eq!(pairs, vec![(1.0, 2.0), (2.0, 3.0)]);
    }

    #[test]
    fn window_moments() {
        let mut w = SlidingWindow::new(10);
        assert_eq!(w.mean(), None);
        w.push(2.0);
        assert_eq!(w.mean(), Some(2.0));
        assert!(w.moments().is_none());
        for v in [4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            w.push(v);
        }
        let m = w.moments().unwrap();
        assert!((m.mean - 5.0).abs() < 1e-12);
        assert!((m.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn window_identical_values_have_zero_spread() {
        let mut w = SlidingWindow::new(4);
        for _ in 0..4 {
            w.push(10.0);
        }
        let m = w.moments().unwrap();
        assert_eq!(m.mean, 10.0);
        assert_eq!(m.std_dev, 0.0);

        let mut w = SlidingWindow::new(3);
        for _ in 0..3 {
            w.push(0.1);
        }
        assert_eq!(w.moments().unwrap().std_dev, 0.0);
    }

    #[test]
    fn window_all_zero() {
        let mut w = SlidingWindow::new(3);
        w.push(0.0);
        w.push(0.0);
        assert_eq!(w.mean(), Some(0.0));
        assert_eq!(w.moments(), Some(WindowMoments { mean: 0.0, std_dev: 0.0 }));
    }

    #[test]
    fn moments_of_huge_values_stay_finite() {
        let m = f64::MAX / 2.0;
        let mut w = SlidingWindow::new(10);
        for v in [m, m, m, -m] {
            w.push(v);
        }
        let mean = w.mean().unwrap();
        let moments = w.moments().unwrap();
        assert!(mean.is_finite());
        assert!((mean / m - 0.5).abs() < 1e-12);
        assert!((moments.mean / m - 0.5).abs() < 1e-12);
        assert!(moments.std_dev.is_finite());
        assert!((moments.std_dev / m - 0.75f64.sqrt()).abs() < 1e-12);

        let mut w = SlidingWindow::new(2);
        w.push(f64::MAX);
        w.push(f64::MAX);
        assert_eq!(w.mean(), Some(f64::MAX));
        assert_eq!(w.moments().unwrap().std_dev, 0.0);
    }
}
