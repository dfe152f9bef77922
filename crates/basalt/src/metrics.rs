//! Per-codec counters.
//!
//! [`CodecMetrics`] accumulates over the lifetime of a
//! [`Codec`](crate::Codec). Memory figures are refreshed after every call
//! on the compiled backend and stay zero on the native one.

use basalt_memory::LinearMemory;

/// Cumulative call counters and the current memory footprint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecMetrics {
    /// Number of encode calls that reached a backend.
    pub encode_calls: u64,
    /// Number of decode calls that reached validation or a backend.
    pub decode_calls: u64,
    /// Number of those calls that returned an error.
    pub failed_calls: u64,
    /// Total input bytes of successful calls.
    pub bytes_in: u64,
    /// Total output bytes of successful calls.
    pub bytes_out: u64,
    /// Current linear memory size, in bytes.
    pub memory_bytes: usize,
    /// Current linear memory size, in pages.
    pub memory_pages: usize,
    /// Number of growth events so far. Views older than this are stale.
    pub grow_epoch: u64,
    /// Pages added by growth since instantiation.
    pub pages_grown: u64,
}

impl CodecMetrics {
    pub(crate) fn record_encode(&mut self, bytes_in: usize, bytes_out: Option<usize>) {
        self.encode_calls += 1;
        self.record(bytes_in, bytes_out);
    }

    pub(crate) fn record_decode(&mut self, bytes_in: usize, bytes_out: Option<usize>) {
        self.decode_calls += 1;
        self.record(bytes_in, bytes_out);
    }

    pub(crate) fn observe_memory(&mut self, memory: &LinearMemory) {
        self.memory_bytes = memory.size();
        self.memory_pages = memory.page_count();
        self.grow_epoch = memory.epoch();
        self.pages_grown = memory.pages_grown();
    }

    fn record(&mut self, bytes_in: usize, bytes_out: Option<usize>) {
        match bytes_out {
            Some(out) => {
                self.bytes_in += bytes_in as u64;
                self.bytes_out += out as u64;
            }
            None => self.failed_calls += 1,
        }
    }
}
