//! Window - the resident slice of the logical sequence.
//!
//! A [`Window`] holds up to `capacity` values plus two cursors:
//! - `head`: next free write slot, and the pop cursor (pop reads `head - 1`)
//! - `max_head`: number of valid values currently loaded

/// The fixed-capacity in-memory window.
///
/// Invariant: `head <= max_head <= capacity`.
pub struct Window {
    slots: Box<[f64]>,
    head: usize,
    max_head: usize,
}

impl Window {
    /// Create an empty window.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");

        Self {
            slots: vec![0.0; capacity].into_boxed_slice(),
            head: 0,
            max_head: 0,
        }
    }

    // ========================================================================
    // Cursor queries
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn max_head(&self) -> usize {
        self.max_head
    }

    /// Check if no write slot is left.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.head == self.capacity()
    }

    /// Number of free write slots after `head`.
    #[inline]
    pub fn room(&self) -> usize {
        self.capacity() - self.head
    }

    /// The valid values, oldest first.
    #[inline]
    pub fn valid(&self) -> &[f64] {
        &self.slots[..self.max_head]
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Store one value at `head`.
    ///
    /// Everything past the new value is discarded from the valid range.
    ///
    /// # Panics
    /// Panics if the window is full.
    #[inline]
    pub fn push(&mut self, value: f64) {
        assert!(!self.is_full(), "push into a full window");
        self.slots[self.head] = value;
        self.head += 1;
        self.max_head = self.head;
    }

    /// Copy as many of `values` as fit. Returns the number copied.
    pub fn push_slice(&mut self, values: &[f64]) -> usize {
        let n = values.len().min(self.room());
        self.slots[self.head..self.head + n].copy_from_slice(&values[..n]);
        self.head += n;
        self.max_head = self.head;
        n
    }

    /// Move `slots[stop..capacity)` to the front after the first `stop`
    /// values were written out.
    ///
    /// # Panics
    /// Panics if `stop` exceeds the capacity.
    pub fn shift_retained(&mut self, stop: usize) {
        let capacity = self.capacity();
        assert!(stop <= capacity, "stop index past window end");

        self.slots.copy_within(stop..capacity, 0);
        self.head = capacity - stop;
        self.max_head = self.head;
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Step the cursor back and return the value under it.
    ///
    /// Returns `None` once the cursor is at the front.
    #[inline]
    pub fn pop(&mut self) -> Option<f64> {
        if self.head == 0 {
            return None;
        }
        self.head -= 1;
        Some(self.slots[self.head])
    }

    /// Put the cursor at `head`.
    ///
    /// # Panics
    /// Panics if `head` is past the valid range.
    #[inline]
    pub fn seek(&mut self, head: usize) {
        assert!(head <= self.max_head, "seek past valid values");
        self.head = head;
    }

    /// Put the cursor after the last valid value.
    #[inline]
    pub fn seek_end(&mut self) {
        self.head = self.max_head;
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Mutable access to every slot, for loading a block in place.
    ///
    /// Follow with [`set_loaded`](Window::set_loaded).
    #[inline]
    pub fn slots_mut(&mut self) -> &mut [f64] {
        &mut self.slots
    }

    /// Mark the first `count` slots valid and put the cursor after them.
    ///
    /// # Panics
    /// Panics if `count` exceeds the capacity.
    pub fn set_loaded(&mut self, count: usize) {
        assert!(count <= self.capacity(), "loaded more values than capacity");
        self.head = count;
        self.max_head = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_new() {
        let window = Window::new(4);
        assert_eq!(window.capacity(), 4);
        assert_eq!(window.head(), 0);
        assert_eq!(window.max_head(), 0);
        assert_eq!(window.room(), 4);
        assert!(window.valid().is_empty());
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_window_zero_capacity() {
        Window::new(0);
    }

    #[test]
    fn test_push_pop() {
        let mut window = Window::new(3);
        window.push(1.0);
        window.push(2.0);
        assert_eq!(window.valid(), &[1.0, 2.0]);

        assert_eq!(window.pop(), Some(2.0));
        assert_eq!(window.head(), 1);
        // Pop only moves the cursor
        assert_eq!(window.max_head(), 2);

        assert_eq!(window.pop(), Some(1.0));
        assert_eq!(window.pop(), None);
    }

    #[test]
    fn test_push_until_full() {
        let mut window = Window::new(2);
        window.push(1.0);
        assert!(!window.is_full());
        window.push(2.0);
        assert!(window.is_full());
        assert_eq!(window.room(), 0);
    }

    #[test]
    #[should_panic(expected = "push into a full window")]
    fn test_push_overflow() {
        let mut window = Window::new(1);
        window.push(1.0);
        window.push(2.0);
    }

    #[test]
    fn test_push_slice_bounded_by_room() {
        let mut window = Window::new(4);
        window.push(0.0);

        let n = window.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(n, 3);
        assert!(window.is_full());
        assert_eq!(window.valid(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_shift_retained() {
        let mut window = Window::new(5);
        window.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        window.shift_retained(3);
        assert_eq!(window.head(), 2);
        assert_eq!(window.max_head(), 2);
        assert_eq!(window.valid(), &[4.0, 5.0]);
    }

    #[test]
    fn test_shift_everything() {
        let mut window = Window::new(3);
        window.push_slice(&[1.0, 2.0, 3.0]);

        window.shift_retained(3);
        assert_eq!(window.head(), 0);
        assert!(window.valid().is_empty());
    }

    #[test]
    fn test_seek() {
        let mut window = Window::new(4);
        window.push_slice(&[1.0, 2.0, 3.0]);
        window.pop();
        window.pop();

        window.seek_end();
        assert_eq!(window.head(), 3);

        window.seek(1);
        assert_eq!(window.pop(), Some(1.0));
    }

    #[test]
    #[should_panic(expected = "seek past valid values")]
    fn test_seek_past_valid() {
        let mut window = Window::new(4);
        window.push(1.0);
        window.seek(2);
    }

    #[test]
    fn test_load_in_place() {
        let mut window = Window::new(4);
        window.push(9.0);

        window.slots_mut()[..3].copy_from_slice(&[1.0, 2.0, 3.0]);
        window.set_loaded(3);

        assert_eq!(window.head(), 3);
        assert_eq!(window.valid(), &[1.0, 2.0, 3.0]);
    }
}
