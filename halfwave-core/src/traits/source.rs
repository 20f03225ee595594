//! Pull-based data source contract
//!
//! The producer only yields data when asked. A consumer registers a wake
//! callback once with [`DataSource::connect`], then calls
//! [`DataSource::pull`] each time it has room for another chunk. When the
//! producer has new data after having returned nothing, it invokes the wake
//! callback; whoever owns the consumer answers with
//! [`DataSink::pull_request`].

/// Upstream producer of raw sample bytes
pub trait DataSource {
    /// Register the consumer that will pull from this source
    ///
    /// `wake` may be called from any context, including while the consumer
    /// is mid-`pull`. It must only schedule the `pull_request`, never run it.
    fn connect(&mut self, wake: fn());

    /// Take the next chunk of bytes
    ///
    /// An empty slice means no data is currently available.
    fn pull(&mut self) -> &[u8];
}

/// Downstream consumer that can be told data is available
pub trait DataSink {
    /// Upstream has data; start consuming if not already doing so
    fn pull_request(&mut self);
}
