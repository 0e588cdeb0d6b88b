//! Fixed-capacity ring buffer holding the most recent seconds of audio.

/// Circular sample store with a single write cursor.
///
/// The buffer always holds the last `capacity` samples written; older
/// samples are silently overwritten. Readers ask for "the last `n` samples
/// ending at the cursor" rather than tracking a read position, so there is
/// no consumption and no locking: the single writer and single reader are
/// the same thread.
pub struct RingBuffer {
    buffer: Vec<f32>,
    write_pos: usize,
    capacity: usize,
    /// Total samples ever written; the logical session timeline in samples.
    total_written: u64,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be non-zero");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            capacity,
            total_written: 0,
        }
    }

    /// Copy a block at the cursor, wrapping to index 0 past the end.
    pub fn write(&mut self, samples: &[f32]) {
        let mut remaining = samples;
        while !remaining.is_empty() {
            let n = remaining.len().min(self.capacity - self.write_pos);
            self.buffer[self.write_pos..self.write_pos + n].copy_from_slice(&remaining[..n]);
            self.write_pos = (self.write_pos + n) % self.capacity;
            remaining = &remaining[n..];
        }
        self.total_written += samples.len() as u64;
    }

    /// Return the last `n` samples ending at the cursor, in order.
    ///
    /// Panics when `n` exceeds the capacity: callers size their windows
    /// against the buffer at construction, so that is a programming error,
    /// not a runtime condition.
    pub fn read_last(&self, n: usize) -> Vec<f32> {
        assert!(
            n <= self.capacity,
            "read_last({}) exceeds ring capacity {}",
            n,
            self.capacity
        );
        if n <= self.write_pos {
            self.buffer[self.write_pos - n..self.write_pos].to_vec()
        } else {
            // Wraparound: tail of the buffer, then the front up to the cursor
            let mut out = Vec::with_capacity(n);
            out.extend_from_slice(&self.buffer[self.capacity - (n - self.write_pos)..]);
            out.extend_from_slice(&self.buffer[..self.write_pos]);
            out
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }
}
