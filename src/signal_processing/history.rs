use crate::constants::MAX_WINDOW_SIZE;

/// Circular measurement history for the windowed filter
///
/// Storage is a fixed array sized to [`MAX_WINDOW_SIZE`]; only the first
/// `window_size` slots are logically part of the window. The slot at
/// `write_index` is the next one to be overwritten, which also makes it the
/// oldest value in the window.
#[derive(Debug, Clone)]
pub struct WindowHistory {
    buffer: [f64; MAX_WINDOW_SIZE],
    window_size: usize,
    write_index: usize,
}

impl WindowHistory {
    /// Create a history with every slot set to `fill`
    ///
    /// `window_size` must already be within `1..=MAX_WINDOW_SIZE`.
    pub fn new(window_size: usize, fill: f64) -> Self {
        debug_assert!((1..=MAX_WINDOW_SIZE).contains(&window_size));
        Self {
            buffer: [fill; MAX_WINDOW_SIZE],
            window_size,
            write_index: 0,
        }
    }

    /// Overwrite the oldest value in the window
    pub fn push(&mut self, value: f64) {
        self.buffer[self.write_index] = value;
        self.write_index = (self.write_index + 1) % self.window_size;
    }

    /// Values in the window, oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.window_size).map(move |i| self.buffer[(i + self.write_index) % self.window_size])
    }

    /// Set every slot, including those beyond the current window
    pub fn fill(&mut self, value: f64) {
        self.buffer.fill(value);
    }

    /// Change the logical window length
    ///
    /// Stored values are kept. The write position is wrapped into the new
    /// range so the next push always lands inside the window.
    pub fn resize(&mut self, window_size: usize) {
        debug_assert!((1..=MAX_WINDOW_SIZE).contains(&window_size));
        self.window_size = window_size;
        self.write_index %= window_size;
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Raw storage, all `MAX_WINDOW_SIZE` slots
    pub fn slots(&self) -> &[f64] {
        &self.buffer
    }
}
