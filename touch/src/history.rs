use heapless::HistoryBuffer;

/// Rolling window of the last `N` readings.
///
/// The window starts out zero-filled and every slot is scanned from the first push, so until
/// `N` readings have arrived the minimum is pulled down to zero. [`History::is_warm`] tells
/// callers when that startup transient is over.
pub struct History<const N: usize> {
    buf: HistoryBuffer<u16, N>,
    pushed: usize,
}

impl<const N: usize> History<N> {
    pub fn new() -> Self {
        Self {
            buf: HistoryBuffer::new_with(0),
            pushed: 0,
        }
    }

    /// Append a reading, overwriting the oldest
    pub fn push(&mut self, reading: u16) {
        self.buf.write(reading);
        if self.pushed < N {
            self.pushed += 1;
        }
    }

    /// True once the window holds `N` real readings
    pub fn is_warm(&self) -> bool {
        self.pushed >= N
    }

    /// The most recently pushed reading
    pub fn recent(&self) -> Option<u16> {
        if self.pushed == 0 {
            None
        } else {
            self.buf.recent().copied()
        }
    }

    /// All slots of the window, in storage order
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.buf.as_slice().iter().copied()
    }

    /// Smallest and largest value in the window
    pub fn min_max(&self) -> (u16, u16) {
        self.iter()
            .fold((u16::MAX, u16::MIN), |(min, max), x| (min.min(x), max.max(x)))
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}
